//! The R-tree engine: insert, delete, update and query over a [`NodeMap`]
//! backend, plus the minimum-enlargement descent and quadratic split that
//! keep it capacity-bounded.
//!
//! Every mutating method takes `&self` and returns a new [`Tree`] value
//! rather than mutating in place, treating the engine itself as a pure
//! function from `(tree, op) -> tree'`. On failure the tree returned
//! alongside the error is byte-identical to the receiver.

mod common;
mod delete;
mod insert;
mod query;
mod update;

use crate::error::Error;
use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::config::TreeOptions;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::idgen::IdGen;
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::rtree::nodemap::NodeMap;

/// A dynamic R-tree over `T`-typed coordinates, backed by a [`NodeMap`]
/// implementation `M`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree<T, M>
where
    T: DimensionType,
    M: NodeMap<T>,
{
    nodes: M,
    root: Key,
    ticket: (u64, u64),
    width: usize,
    ndim: Option<usize>,
}

impl<T, M> Tree<T, M>
where
    T: DimensionType,
    M: NodeMap<T>,
{
    /// Builds an empty tree: one root branch with no children and a
    /// placeholder box.
    pub fn new(opts: &TreeOptions) -> Self {
        let mut idgen = IdGen::seeded(opts.get_seed());
        let root_id = idgen.next();
        let mut nodes = M::new();
        nodes.put(
            Key::Internal(root_id),
            NodeRecord::Branch {
                children: Vec::new(),
                parent: None,
                bb: BoundingBox::empty(0),
            },
        );
        Self {
            nodes,
            root: Key::Internal(root_id),
            ticket: idgen.ticket(),
            width: opts.get_width(),
            ndim: None,
        }
    }

    /// The key of the current root branch.
    pub fn root(&self) -> &Key {
        &self.root
    }

    /// The id generator's current state vector, persistable as a ticket.
    pub fn ticket(&self) -> (u64, u64) {
        self.ticket
    }

    /// The configured maximum children per branch.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The dimensionality established by the first insert, if any.
    pub fn dimensionality(&self) -> Option<usize> {
        self.ndim
    }

    /// Looks up a node record by key.
    pub fn get(&self, key: &Key) -> Option<&NodeRecord<T>> {
        self.nodes.get(key)
    }

    /// The total number of node records (branches and leaves) in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` iff the tree holds only its empty root branch.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Direct access to the underlying node map, e.g. for replication diffing.
    pub fn nodes(&self) -> &M {
        &self.nodes
    }

    /// Writes `value` under `key` directly, bypassing descent, splitting and
    /// box propagation. Used only by
    /// [`crate::rtree::dispatcher::Dispatcher::reconstruct_from_crdt`] to fold
    /// a CRDT snapshot's entries back into the local node map at join time;
    /// the snapshot already reflects a structurally valid tree, so none of
    /// the engine's bookkeeping needs to re-run.
    pub(crate) fn put_raw(&mut self, key: Key, value: NodeRecord<T>) {
        self.nodes.put(key, value);
    }

    /// Overwrites the root branch key directly, bypassing the engine's own
    /// split/merge bookkeeping. Used alongside [`Tree::put_raw`] to restore a
    /// joining peer's root pointer from a CRDT snapshot once the snapshot's
    /// entries have been folded in, so the local tree agrees with its source
    /// about which branch is current.
    pub(crate) fn set_root_raw(&mut self, root: Key) {
        self.root = root;
    }

    /// Overwrites the id generator's ticket directly. Used alongside
    /// [`Tree::set_root_raw`] when reconstructing from a CRDT snapshot, so a
    /// joining peer resumes minting branch ids from the same state as its
    /// source rather than from its own, possibly stale, ticket.
    pub(crate) fn set_ticket_raw(&mut self, ticket: (u64, u64)) {
        self.ticket = ticket;
    }

    /// Draws and records a fresh internal branch key.
    fn mint_key(&mut self) -> Key {
        let mut gen = IdGen::from_ticket(self.ticket);
        let id = gen.next();
        self.ticket = gen.ticket();
        Key::Internal(id)
    }

    /// Establishes dimensionality on the first call, rejects mismatches after.
    fn check_dimensionality(&mut self, bb: &BoundingBox<T>) -> Result<(), Error> {
        match self.ndim {
            None => {
                self.ndim = Some(bb.len());
                Ok(())
            }
            Some(expected) if expected == bb.len() => Ok(()),
            Some(expected) => Err(Error::DimensionMismatch {
                expected,
                actual: bb.len(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rtree::nodemap::PlainNodeMap;

    #[test]
    fn new_tree_has_one_empty_root_branch() {
        let tree = Tree::<f64, PlainNodeMap<f64>>::new(&TreeOptions::default());
        assert!(tree.is_empty());
        assert_eq!(tree.dimensionality(), None);
        match tree.get(tree.root()) {
            Some(NodeRecord::Branch { children, parent, .. }) => {
                assert!(children.is_empty());
                assert_eq!(*parent, None);
            }
            _ => panic!("root must be a branch"),
        }
    }
}
