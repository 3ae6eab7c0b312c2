use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;

/// A node-map entry: either a terminal leaf holding an external id's box, or a
/// branch holding child keys and their combined bounding box.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRecord<T>
where
    T: DimensionType,
{
    /// A leaf node; terminal, holds one external id's box.
    Leaf {
        /// The key of the parent branch.
        parent: Key,
        /// The leaf's own bounding box.
        bb: BoundingBox<T>,
    },
    /// A branch node; holds an ordered sequence of child keys.
    Branch {
        /// Ordered child keys. Order matters for tie-breaks during insert,
        /// which prefers the earliest entry in the child list.
        children: Vec<Key>,
        /// The parent branch's key, or `None` for the root.
        parent: Option<Key>,
        /// The smallest box containing the union of all children's boxes.
        bb: BoundingBox<T>,
    },
}

impl<T> NodeRecord<T>
where
    T: DimensionType,
{
    /// The node's bounding box, regardless of variant.
    pub fn bb(&self) -> &BoundingBox<T> {
        match self {
            NodeRecord::Leaf { bb, .. } => bb,
            NodeRecord::Branch { bb, .. } => bb,
        }
    }

    /// `true` for [`NodeRecord::Leaf`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRecord::Leaf { .. })
    }

    /// `true` for [`NodeRecord::Branch`].
    pub fn is_branch(&self) -> bool {
        matches!(self, NodeRecord::Branch { .. })
    }

    /// The node's parent key, if any (the root branch has none).
    pub fn parent(&self) -> Option<&Key> {
        match self {
            NodeRecord::Leaf { parent, .. } => Some(parent),
            NodeRecord::Branch { parent, .. } => parent.as_ref(),
        }
    }

    /// Reference to the children of a branch, or `None` for a leaf.
    pub fn children(&self) -> Option<&[Key]> {
        match self {
            NodeRecord::Leaf { .. } => None,
            NodeRecord::Branch { children, .. } => Some(children),
        }
    }
}
