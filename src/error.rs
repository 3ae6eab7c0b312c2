use std::{error, fmt};

use crate::rtree::Key;

/// Errors returned by [`crate::rtree::Tree`] operations and by the [`crate::dispatcher::Dispatcher`]
/// that serializes access to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An operation was attempted against an engine that has not been initialized yet
    /// (i.e. `new` was never called, or the tree was torn down). The caller's state is
    /// left untouched.
    BadTree,
    /// An insert targeted a key that already exists in the node map. The tree is returned
    /// unchanged; callers should use `update` or `upsert` instead.
    KeyExists(Key),
    /// A box was inserted whose dimensionality does not match the dimensionality already
    /// established by the tree's first insert. The source this crate is modeled on leaves
    /// this case undefined; we reject it explicitly instead.
    DimensionMismatch {
        /// Dimensionality established at the tree's first insert.
        expected: usize,
        /// Dimensionality of the box that was rejected.
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadTree => write!(f, "the engine has not been initialized"),
            Self::KeyExists(key) => write!(f, "key {:?} already exists in the tree", key),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "box has {} dimensions, but the tree was established with {}",
                actual, expected
            ),
        }
    }
}

impl error::Error for Error {}
