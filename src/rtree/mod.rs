//! A dynamic R-tree index over axis-aligned bounding boxes of runtime-
//! established dimensionality, optionally mirrored into a delta-CRDT-shaped
//! key/value map for eventually-consistent replication across peers.
//!
//! The engine ([`Tree`]) is a pure value type: every mutating method
//! consumes `&self` and returns a new `Tree`, never mutating in place. The
//! [`Dispatcher`] is the single-writer facade that owns one live tree plus
//! its metadata and (optionally) a CRDT handle, and is the crate's only
//! component allowed to hold `&mut` state across calls.

pub mod bounding_box;
pub mod config;
pub mod dimension_type;
pub mod dispatcher;
pub mod extent;
pub mod geometry;
pub mod idgen;
pub mod key;
pub mod node;
pub mod nodemap;
pub mod replication;
pub mod split;
pub mod tree;

pub use bounding_box::BoundingBox;
pub use config::{Backend, Mode, OptionValue, TreeOptions};
pub use dimension_type::DimensionType;
pub use dispatcher::Dispatcher;
pub use idgen::IdGen;
pub use key::Key;
pub use node::NodeRecord;
pub use nodemap::{HashSummarizedNodeMap, NodeMap, PlainNodeMap};
pub use replication::{CrdtHandle, Delta, LocalDeltaMap};
pub use tree::Tree;
