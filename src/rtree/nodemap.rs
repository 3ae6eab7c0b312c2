//! Flat key→node-record storage backing a [`crate::rtree::Tree`].
//!
//! Two backends satisfy the same [`NodeMap`] contract: [`Plain`]
//! is a bare hash map, and [`HashSummarized`] additionally keeps a per-key
//! content hash so that [`HashSummarized::diff_keys`] can find the keys that
//! changed between two snapshots without a full structural walk. Switching
//! backends only changes which one `Tree` is generic over; the engine itself
//! never inspects which backend it has.

mod hash_summarized;
mod plain;

pub use hash_summarized::HashSummarizedNodeMap;
pub use plain::PlainNodeMap;

use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::types::HashSet;

/// Common contract for a node-map backend.
pub trait NodeMap<T>: Clone + PartialEq
where
    T: DimensionType,
{
    /// Builds an empty node map.
    fn new() -> Self;

    /// Looks up a node record by key.
    fn get(&self, key: &Key) -> Option<&NodeRecord<T>>;

    /// Inserts or overwrites a node record.
    fn put(&mut self, key: Key, value: NodeRecord<T>);

    /// Removes a node record, returning it if present.
    fn remove(&mut self, key: &Key) -> Option<NodeRecord<T>>;

    /// `true` iff `key` has a record.
    fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Iterates all key/record pairs. Order is unspecified.
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a Key, &'a NodeRecord<T>)> + 'a>;

    /// Number of node records stored.
    fn len(&self) -> usize;

    /// `true` iff no node records are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys whose records differ between `old` and `new`, used by the
    /// [`crate::rtree::dispatcher::Dispatcher`] to mirror changes into a
    /// CRDT. Backends that cannot diff cheaply (e.g. [`PlainNodeMap`])
    /// return an empty set, which the dispatcher reads as "nothing to
    /// mirror" — exactly right for `Standalone` mode, where the backend is
    /// `Plain` and there is no CRDT to mirror into.
    fn diff_keys(_old: &Self, _new: &Self) -> HashSet<Key> {
        HashSet::default()
    }
}
