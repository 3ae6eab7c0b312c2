//! Mirroring a [`Tree`]'s node map into a delta-CRDT-shaped key/value map so
//! that peers converge on an equivalent tree.
//!
//! The CRDT itself is an external collaborator: this module ships only the
//! pure diff/delta machinery plus [`LocalDeltaMap`], an in-memory reference
//! [`CrdtHandle`] good enough for single-process tests and demos. A
//! production deployment supplies its own `CrdtHandle` backed by a real
//! delta-CRDT library.
//!
//! A tree's `root` and `ticket` are not node-map entries — they live as
//! dedicated fields on [`Tree`] — but a peer reconstructing from a snapshot
//! still needs both to point its local tree at the correct root and resume
//! the id generator from the correct state. [`Delta::Root`] and
//! [`Delta::Ticket`] carry those two values through the same delta stream
//! that mirrors node-map entries, and [`CrdtHandle`] tracks the latest of
//! each alongside its entries so a join-time snapshot can restore them.

use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::rtree::nodemap::{HashSummarizedNodeMap, NodeMap};
use crate::types::HashMap;

/// One mutation to a CRDT-backed map: a node-map key was added or
/// overwritten, removed, or the tree's `root`/`ticket` changed. Left
/// serialization-format agnostic so embedding applications can encode it
/// however their transport requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Delta<T>
where
    T: DimensionType,
{
    /// `key`'s record was added or changed to `value`.
    Add(Key, NodeRecord<T>),
    /// `key`'s record was removed.
    Remove(Key),
    /// The tree's root branch key changed to this value.
    Root(Key),
    /// The id generator's ticket advanced to this value.
    Ticket((u64, u64)),
}

/// The external collaborator this crate mirrors mutations into. Implementors
/// own the anti-entropy / convergence protocol; this crate only ever calls
/// `apply_add`/`apply_remove`/`apply_root`/`apply_ticket` (to submit local
/// changes or fold in inbound ones) and `snapshot`/`root`/`ticket` (for
/// initial join).
pub trait CrdtHandle<T>
where
    T: DimensionType,
{
    /// Records that `key` now maps to `value`.
    fn apply_add(&mut self, key: Key, value: NodeRecord<T>);

    /// Records that `key` has been removed.
    fn apply_remove(&mut self, key: &Key);

    /// Records the tree's current root branch key.
    fn apply_root(&mut self, root: Key);

    /// Records the id generator's current ticket.
    fn apply_ticket(&mut self, ticket: (u64, u64));

    /// The full key/record map as currently observed by this replica.
    fn snapshot(&self) -> Vec<(Key, NodeRecord<T>)>;

    /// The most recently recorded root branch key, if any has been mirrored yet.
    fn root(&self) -> Option<Key>;

    /// The most recently recorded id generator ticket, if any has been mirrored yet.
    fn ticket(&self) -> Option<(u64, u64)>;
}

/// Computes the diff between two node-map snapshots and emits the
/// corresponding deltas: `Add(k, v)` for every key present in `new` that
/// differs from `old`, `Remove(k)` for every key that dropped out. Pure;
/// callers (the [`crate::rtree::dispatcher::Dispatcher`]) perform
/// submission to the CRDT, and separately mirror `root`/`ticket` changes
/// since those live outside the node map.
pub fn diff_and_emit<T>(
    old: &HashSummarizedNodeMap<T>,
    new: &HashSummarizedNodeMap<T>,
) -> Vec<Delta<T>>
where
    T: DimensionType,
{
    diff_and_emit_generic(old, new)
}

/// As [`diff_and_emit`], but over any [`NodeMap`] backend via the trait's
/// [`NodeMap::diff_keys`] default. Used by
/// [`crate::rtree::dispatcher::Dispatcher`] so it can mirror changes without
/// being specialized to [`HashSummarizedNodeMap`]; backends that answer
/// `diff_keys` with an empty set (e.g. [`crate::rtree::nodemap::PlainNodeMap`])
/// naturally produce no deltas.
pub fn diff_and_emit_generic<T, M>(old: &M, new: &M) -> Vec<Delta<T>>
where
    T: DimensionType,
    M: NodeMap<T>,
{
    M::diff_keys(old, new)
        .into_iter()
        .map(|key| match new.get(&key) {
            Some(record) => Delta::Add(key, record.clone()),
            None => Delta::Remove(key),
        })
        .collect()
}

/// Folds a batch of inbound deltas into `map`, in order, without re-running
/// any tree algorithm. The flat node-map representation is self-describing,
/// so applying `Add`/`Remove` directly is sufficient; `Root`/`Ticket`
/// deltas are skipped here since they don't target a node-map entry — the
/// dispatcher handles those by calling [`crate::rtree::tree::Tree::set_root_raw`]/
/// [`crate::rtree::tree::Tree::set_ticket_raw`] directly.
pub fn apply_deltas<T, M>(map: &mut M, deltas: impl IntoIterator<Item = Delta<T>>)
where
    T: DimensionType,
    M: NodeMap<T>,
{
    for delta in deltas {
        match delta {
            Delta::Add(key, value) => map.put(key, value),
            Delta::Remove(key) => {
                map.remove(&key);
            }
            Delta::Root(_) | Delta::Ticket(_) => {}
        }
    }
}

/// Rebuilds a node map from a CRDT snapshot taken at join time, by folding
/// every entry as an `Add`.
pub fn reconstruct_from_snapshot<T, M>(entries: Vec<(Key, NodeRecord<T>)>) -> M
where
    T: DimensionType,
    M: NodeMap<T>,
{
    let mut map = M::new();
    for (key, value) in entries {
        map.put(key, value);
    }
    map
}

/// An in-memory reference [`CrdtHandle`]: a bare key/value map with no
/// anti-entropy protocol of its own, plus the latest mirrored `root` and
/// `ticket`. Good enough for single-process tests and for `demos/`; a real
/// deployment replaces this with a genuine delta-CRDT library's handle.
/// Conflict resolution here is last-writer-wins by delta application order —
/// a reference choice, not a requirement on real collaborators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalDeltaMap<T>
where
    T: DimensionType,
{
    entries: HashMap<Key, NodeRecord<T>>,
    root: Option<Key>,
    ticket: Option<(u64, u64)>,
}

impl<T> LocalDeltaMap<T>
where
    T: DimensionType,
{
    /// Builds an empty handle.
    pub fn new() -> Self {
        Self {
            entries: HashMap::default(),
            root: None,
            ticket: None,
        }
    }
}

impl<T> CrdtHandle<T> for LocalDeltaMap<T>
where
    T: DimensionType,
{
    fn apply_add(&mut self, key: Key, value: NodeRecord<T>) {
        self.entries.insert(key, value);
    }

    fn apply_remove(&mut self, key: &Key) {
        self.entries.remove(key);
    }

    fn apply_root(&mut self, root: Key) {
        self.root = Some(root);
    }

    fn apply_ticket(&mut self, ticket: (u64, u64)) {
        self.ticket = Some(ticket);
    }

    fn snapshot(&self) -> Vec<(Key, NodeRecord<T>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn root(&self) -> Option<Key> {
        self.root.clone()
    }

    fn ticket(&self) -> Option<(u64, u64)> {
        self.ticket
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rtree::bounding_box::BoundingBox;

    fn leaf(parent: u64, lo: f64, hi: f64) -> NodeRecord<f64> {
        NodeRecord::Leaf {
            parent: Key::Internal(parent),
            bb: BoundingBox::from([lo..=hi].as_slice()),
        }
    }

    #[test]
    fn diff_and_emit_produces_add_and_remove_deltas() {
        let mut old = HashSummarizedNodeMap::<f64>::new();
        old.put(Key::Int(1), leaf(0, 0.0, 1.0));
        old.put(Key::Int(2), leaf(0, 1.0, 2.0));

        let mut new = old.clone();
        new.put(Key::Int(2), leaf(0, 1.0, 3.0));
        new.remove(&Key::Int(1));

        let mut deltas = diff_and_emit(&old, &new);
        deltas.sort_by_key(|d| match d {
            Delta::Add(k, _) | Delta::Remove(k) => format!("{:?}", k),
            Delta::Root(_) | Delta::Ticket(_) => String::new(),
        });

        assert_eq!(
            deltas,
            vec![
                Delta::Remove(Key::Int(1)),
                Delta::Add(Key::Int(2), leaf(0, 1.0, 3.0)),
            ]
        );
    }

    #[test]
    fn apply_deltas_replays_adds_and_removes_on_a_plain_map() {
        use crate::rtree::nodemap::PlainNodeMap;

        let mut map = PlainNodeMap::<f64>::new();
        apply_deltas(
            &mut map,
            vec![
                Delta::Add(Key::Int(1), leaf(0, 0.0, 1.0)),
                Delta::Add(Key::Int(2), leaf(0, 1.0, 2.0)),
            ],
        );
        assert_eq!(map.len(), 2);

        apply_deltas(&mut map, vec![Delta::Remove(Key::Int(1))]);
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&Key::Int(1)));
    }

    #[test]
    fn apply_deltas_ignores_root_and_ticket_deltas() {
        use crate::rtree::nodemap::PlainNodeMap;

        let mut map = PlainNodeMap::<f64>::new();
        apply_deltas(
            &mut map,
            vec![
                Delta::Add(Key::Int(1), leaf(0, 0.0, 1.0)),
                Delta::Root(Key::Internal(99)),
                Delta::Ticket((1, 2)),
            ],
        );
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn local_delta_map_round_trips_through_a_snapshot() {
        let mut handle = LocalDeltaMap::<f64>::new();
        handle.apply_add(Key::Int(1), leaf(0, 0.0, 1.0));
        handle.apply_add(Key::Int(2), leaf(0, 1.0, 2.0));
        handle.apply_remove(&Key::Int(2));
        handle.apply_root(Key::Internal(7));
        handle.apply_ticket((3, 4));

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(handle.root(), Some(Key::Internal(7)));
        assert_eq!(handle.ticket(), Some((3, 4)));

        let rebuilt: crate::rtree::nodemap::PlainNodeMap<f64> =
            reconstruct_from_snapshot(snapshot);
        assert_eq!(rebuilt.len(), 1);
        assert!(rebuilt.contains_key(&Key::Int(1)));
    }
}
