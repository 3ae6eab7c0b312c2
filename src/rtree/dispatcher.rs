//! The single-writer agent that owns one tree, its metadata, and (in
//! distributed mode) a CRDT handle, serializing every call against them. The
//! request-dispatch wrapper itself — the thing that actually receives
//! requests off a queue or a socket — is an external collaborator; what
//! lives here is the part the engine specifies: single ownership, one
//! mutation at a time, and the mirroring of every mutation into the CRDT
//! handle.

use crate::error::Error;
use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::config::TreeOptions;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;
use crate::rtree::nodemap::NodeMap;
use crate::rtree::replication::{diff_and_emit_generic, CrdtHandle, Delta};
use crate::rtree::tree::Tree;

/// Opaque cluster peer identifier.
pub type PeerId = String;

/// A [`CrdtHandle`] that discards everything, for [`Dispatcher`]s running in
/// `Standalone` mode that don't need a real CRDT collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCrdt;

impl<T> CrdtHandle<T> for NoCrdt
where
    T: DimensionType,
{
    fn apply_add(&mut self, _key: Key, _value: crate::rtree::node::NodeRecord<T>) {}
    fn apply_remove(&mut self, _key: &Key) {}
    fn apply_root(&mut self, _root: Key) {}
    fn apply_ticket(&mut self, _ticket: (u64, u64)) {}
    fn snapshot(&self) -> Vec<(Key, crate::rtree::node::NodeRecord<T>)> {
        Vec::new()
    }
    fn root(&self) -> Option<Key> {
        None
    }
    fn ticket(&self) -> Option<(u64, u64)> {
        None
    }
}

/// Owns `(tree, metadata, crdt handle, peer list)` and serializes all
/// mutating and read operations against them. `tree` is `None` until
/// [`Dispatcher::new`] runs; every operation against an uninitialized
/// dispatcher fails with [`Error::BadTree`] and leaves it untouched.
#[derive(Debug, Clone)]
pub struct Dispatcher<T, M, C = NoCrdt>
where
    T: DimensionType,
    M: NodeMap<T>,
    C: CrdtHandle<T>,
{
    tree: Option<Tree<T, M>>,
    options: TreeOptions,
    crdt: C,
    peers: Vec<PeerId>,
}

impl<T, M, C> Default for Dispatcher<T, M, C>
where
    T: DimensionType,
    M: NodeMap<T>,
    C: CrdtHandle<T> + Default,
{
    /// An uninitialized dispatcher: no tree yet, every op fails with
    /// [`Error::BadTree`] until [`Dispatcher::new`] runs.
    fn default() -> Self {
        Self {
            tree: None,
            options: TreeOptions::default(),
            crdt: C::default(),
            peers: Vec::new(),
        }
    }
}

impl<T, M, C> Dispatcher<T, M, C>
where
    T: DimensionType,
    M: NodeMap<T>,
    C: CrdtHandle<T>,
{
    /// Builds a dispatcher around a fresh, empty tree.
    pub fn new(opts: TreeOptions, crdt: C) -> Self {
        Self {
            tree: Some(Tree::new(&opts)),
            options: opts,
            crdt,
            peers: Vec::new(),
        }
    }

    /// The current tree snapshot, or `None` if [`Dispatcher::new`] hasn't
    /// run yet.
    pub fn tree(&self) -> Option<&Tree<T, M>> {
        self.tree.as_ref()
    }

    /// The dispatcher's configuration.
    pub fn metadata(&self) -> &TreeOptions {
        &self.options
    }

    /// Direct access to the CRDT handle, e.g. so an embedding application can
    /// read its `snapshot()` to ship to a newly joined peer.
    pub fn crdt(&self) -> &C {
        &self.crdt
    }

    /// Replaces the known peer list.
    pub fn set_members(&mut self, peers: Vec<PeerId>) {
        self.peers = peers;
    }

    /// The current peer list.
    pub fn members(&self) -> &[PeerId] {
        &self.peers
    }

    /// Adds `peer` to the known peer list if absent, in response to a
    /// membership `node_up` event. Membership propagation itself is the
    /// external collaborator's job; this just keeps the local list current.
    pub fn on_node_up(&mut self, peer: PeerId) {
        if !self.peers.contains(&peer) {
            self.peers.push(peer);
        }
    }

    /// Removes `peer` from the known peer list, in response to a `node_down`
    /// event.
    pub fn on_node_down(&mut self, peer: &PeerId) {
        self.peers.retain(|p| p != peer);
    }

    /// A human-readable dump of the current tree, gated by
    /// `TreeOptions::is_verbose`. This is the crate's only diagnostic
    /// surface; logging proper is an external collaborator.
    pub fn dump(&self) -> Option<String> {
        if !self.options.is_verbose() {
            return None;
        }
        let tree = self.tree.as_ref()?;
        Some(format!(
            "root={} width={} nodes={} dim={:?}",
            tree.root(),
            tree.width(),
            tree.len(),
            tree.dimensionality()
        ))
    }

    /// Inserts a single leaf.
    pub fn insert(&mut self, id: Key, bb: BoundingBox<T>) -> Result<(), Error> {
        self.mutate(|tree| tree.insert(id, bb))
    }

    /// Inserts every `(id, box)` pair.
    pub fn bulk_insert(&mut self, leaves: Vec<(Key, BoundingBox<T>)>) -> Result<(), Error> {
        self.mutate(|tree| tree.bulk_insert(leaves))
    }

    /// Inserts or updates `id`.
    pub fn upsert(&mut self, id: Key, bb: BoundingBox<T>) -> Result<(), Error> {
        self.mutate(|tree| tree.upsert(id, bb))
    }

    /// Deletes the leaf keyed by `id`; a no-op if absent.
    pub fn delete(&mut self, id: Key) -> Result<(), Error> {
        self.mutate(|tree| tree.delete(&id))
    }

    /// Deletes every id in `ids`.
    pub fn bulk_delete(&mut self, ids: Vec<Key>) -> Result<(), Error> {
        self.mutate(|tree| tree.bulk_delete(ids))
    }

    /// Moves the leaf keyed by `id` to `new_box`.
    pub fn update(&mut self, id: Key, new_box: BoundingBox<T>) -> Result<(), Error> {
        self.mutate(|tree| tree.update(id, new_box))
    }

    /// Applies every `(id, box)` update.
    pub fn bulk_update(&mut self, updates: Vec<(Key, BoundingBox<T>)>) -> Result<(), Error> {
        self.mutate(|tree| tree.bulk_update(updates))
    }

    /// Leaf ids whose boxes overlap `area`.
    pub fn query(&self, area: &BoundingBox<T>) -> Result<Vec<Key>, Error> {
        Ok(self.tree.as_ref().ok_or(Error::BadTree)?.query(area))
    }

    /// Node keys at exactly `depth` whose boxes overlap `area`.
    pub fn pquery(&self, area: &BoundingBox<T>, depth: usize) -> Result<Vec<Key>, Error> {
        Ok(self.tree.as_ref().ok_or(Error::BadTree)?.pquery(area, depth))
    }

    /// Runs `f` against the live tree, replaces it with the result, and — if
    /// `f` succeeded — mirrors whatever node-map keys changed, plus any
    /// change to `root`/`ticket`, into the CRDT handle. On failure the tree
    /// is replaced with the unchanged value `f` returned, so the dispatcher's
    /// pre-call state is preserved byte-for-byte.
    fn mutate<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&Tree<T, M>) -> Result<Tree<T, M>, (Error, Tree<T, M>)>,
    {
        let current = self.tree.as_ref().ok_or(Error::BadTree)?;
        match f(current) {
            Ok(new_tree) => {
                let mut deltas: Vec<Delta<T>> =
                    diff_and_emit_generic(current.nodes(), new_tree.nodes());
                if new_tree.root() != current.root() {
                    deltas.push(Delta::Root(new_tree.root().clone()));
                }
                if new_tree.ticket() != current.ticket() {
                    deltas.push(Delta::Ticket(new_tree.ticket()));
                }
                self.tree = Some(new_tree);
                for delta in deltas {
                    match delta {
                        Delta::Add(key, value) => self.crdt.apply_add(key, value),
                        Delta::Remove(key) => self.crdt.apply_remove(&key),
                        Delta::Root(root) => self.crdt.apply_root(root),
                        Delta::Ticket(ticket) => self.crdt.apply_ticket(ticket),
                    }
                }
                Ok(())
            }
            Err((err, unchanged)) => {
                self.tree = Some(unchanged);
                Err(err)
            }
        }
    }

    /// Rebuilds the local tree from a CRDT snapshot taken at join time: folds
    /// every node-map entry in as an `Add`, then restores `root` and `ticket`
    /// to whatever the handle last mirrored, so the joining peer's tree
    /// points at the same root branch and resumes id generation from the
    /// same state as the peer it joined from. Only meaningful once
    /// [`Dispatcher::new`] has run; a missing tree is a no-op.
    pub fn reconstruct_from_crdt(&mut self) {
        let snapshot = self.crdt.snapshot();
        let root = self.crdt.root();
        let ticket = self.crdt.ticket();
        if snapshot.is_empty() && root.is_none() && ticket.is_none() {
            return;
        }
        if let Some(tree) = self.tree.as_mut() {
            for (key, value) in snapshot {
                tree.put_raw(key, value);
            }
            if let Some(root) = root {
                tree.set_root_raw(root);
            }
            if let Some(ticket) = ticket {
                tree.set_ticket_raw(ticket);
            }
        }
    }
}
