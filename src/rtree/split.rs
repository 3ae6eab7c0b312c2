//! Overfull-node splitting.
//!
//! [`QuadraticSplit`] is the one strategy this crate ships, but the engine
//! depends only on the [`SplittingStrategy`] trait so an alternative (linear,
//! exhaustive) could be swapped in without touching the insert path.

mod quadratic;

pub use quadratic::QuadraticSplit;

use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;

/// One of the two groups produced by a split.
pub struct SplitGroup<T>
where
    T: DimensionType,
{
    /// The combined box of every entry in the group.
    pub bb: BoundingBox<T>,
    /// The entries (child keys) assigned to the group.
    pub entries: Vec<Key>,
}

/// The two groups a split distributes `width + 1` entries into.
pub struct SplitResult<T>
where
    T: DimensionType,
{
    pub first: SplitGroup<T>,
    pub second: SplitGroup<T>,
}

/// A strategy for partitioning an overfull branch's entries into two groups.
pub trait SplittingStrategy<T>
where
    T: DimensionType,
{
    /// Splits `entries` (each a child key paired with its box) into two
    /// groups, neither of which ends with fewer than `min_group_size`
    /// entries; implementations force-assign remaining entries to whichever
    /// side would otherwise fall short.
    fn split(&self, entries: Vec<(Key, BoundingBox<T>)>, min_group_size: usize) -> SplitResult<T>;
}
