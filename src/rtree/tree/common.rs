use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::geometry::{combine, combine_multiple};
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::rtree::nodemap::NodeMap;

/// Grows `current` to also contain `incoming`. A box with zero dimensions
/// (the not-yet-established root placeholder) is treated as wide open rather
/// than fed into [`combine`], which expects both sides to share a
/// dimensionality.
pub(super) fn grow_box<T: DimensionType>(
    current: &BoundingBox<T>,
    incoming: &BoundingBox<T>,
) -> BoundingBox<T> {
    if current.is_empty() {
        incoming.clone()
    } else {
        combine(current, incoming)
    }
}

/// Recomputes `key`'s box from its current children, then does the same for
/// every ancestor up to the root. Used after a removal or a shrinking update,
/// where the new box cannot simply be grown from the old one.
pub(super) fn recompute_upward<T, M>(nodes: &mut M, mut key: Key, ndim: usize)
where
    T: DimensionType,
    M: NodeMap<T>,
{
    loop {
        let record = match nodes.get(&key) {
            Some(r) => r.clone(),
            None => return,
        };
        let (children, parent) = match &record {
            NodeRecord::Branch { children, parent, .. } => (children.clone(), parent.clone()),
            NodeRecord::Leaf { .. } => return,
        };
        let child_boxes: Vec<BoundingBox<T>> = children
            .iter()
            .filter_map(|c| nodes.get(c).map(|r| r.bb().clone()))
            .collect();
        let new_bb = combine_multiple(child_boxes.iter(), ndim);

        let mut updated = record;
        if let NodeRecord::Branch { bb, .. } = &mut updated {
            *bb = new_bb;
        }
        nodes.put(key.clone(), updated);

        match parent {
            Some(p) => key = p,
            None => return,
        }
    }
}

/// Removes leaf `leaf` from the tree: detaches it from its parent's child
/// list, then walks upward pruning any non-root branch left with zero
/// children and recomputing the box of every branch that survives. A no-op
/// if `leaf` is absent or not a leaf.
pub(super) fn retract_leaf<T, M>(nodes: &mut M, leaf: &Key, ndim: usize)
where
    T: DimensionType,
    M: NodeMap<T>,
{
    let parent = match nodes.get(leaf) {
        Some(NodeRecord::Leaf { parent, .. }) => parent.clone(),
        _ => return,
    };
    nodes.remove(leaf);

    let mut parent_record = nodes.get(&parent).cloned().expect("parent exists");
    if let NodeRecord::Branch { children, .. } = &mut parent_record {
        children.retain(|c| c != leaf);
    }
    nodes.put(parent.clone(), parent_record);

    let mut key = parent;
    loop {
        let record = match nodes.get(&key) {
            Some(r) => r.clone(),
            None => return,
        };
        let (children, parent_of_key) = match &record {
            NodeRecord::Branch { children, parent, .. } => (children.clone(), parent.clone()),
            NodeRecord::Leaf { .. } => return,
        };
        let is_root = parent_of_key.is_none();

        if children.is_empty() && !is_root {
            nodes.remove(&key);
            if let Some(p) = parent_of_key {
                let mut ancestor = nodes.get(&p).cloned().expect("ancestor exists");
                if let NodeRecord::Branch { children, .. } = &mut ancestor {
                    children.retain(|c| c != &key);
                }
                nodes.put(p.clone(), ancestor);
                key = p;
                continue;
            }
            return;
        }

        let child_boxes: Vec<BoundingBox<T>> = children
            .iter()
            .filter_map(|c| nodes.get(c).map(|r| r.bb().clone()))
            .collect();
        let new_bb = combine_multiple(child_boxes.iter(), ndim);
        let mut updated = record;
        if let NodeRecord::Branch { bb, .. } = &mut updated {
            *bb = new_bb;
        }
        nodes.put(key.clone(), updated);

        match parent_of_key {
            Some(p) => key = p,
            None => return,
        }
    }
}
