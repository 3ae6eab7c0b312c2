use crate::rtree::dimension_type::DimensionType;
use crate::rtree::extent::{Contains, Extent};
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::ops::RangeInclusive;

/// An N-dimensional axis-aligned bounding box.
///
/// Unlike a fixed-size coordinate array, the number of dimensions is
/// established at runtime by the first box a tree is built from (see
/// [`crate::rtree::Tree`]); most boxes are two or three dimensional, so the
/// extents are kept in a small inline vector to avoid a heap allocation for
/// the common case while still supporting arbitrary dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox<T>
where
    T: DimensionType,
{
    /// The dimensions of the box.
    ///
    /// Each entry represents the extent of the box along a particular axis.
    pub dims: SmallVec<[Extent<T>; 4]>,
}

impl<T> BoundingBox<T>
where
    T: DimensionType,
{
    /// Initializes a new box from the specified dimensions.
    pub fn new(dims: SmallVec<[Extent<T>; 4]>) -> Self {
        Self { dims }
    }

    /// Initializes a new box from the specified inclusive ranges.
    pub fn new_from_ranges<R: Borrow<[RangeInclusive<T>]>>(dims: R) -> Self {
        let dims: &[RangeInclusive<T>] = dims.borrow();
        Self {
            dims: dims.iter().map(Extent::from).collect(),
        }
    }

    /// Builds the reserved all-zero "empty" sentinel box for `ndim` dimensions.
    ///
    /// Only the root branch of an empty tree is allowed to carry this box.
    pub fn empty(ndim: usize) -> Self {
        Self {
            dims: std::iter::repeat(Extent::new(T::zero(), T::zero()))
                .take(ndim)
                .collect(),
        }
    }

    /// Gets the number of dimensions of the bounding box.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Returns whether this box carries no dimensions at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Tests whether this is the reserved all-zero sentinel box.
    pub fn is_sentinel(&self) -> bool {
        !self.dims.is_empty()
            && self
                .dims
                .iter()
                .all(|e| e.start == T::zero() && e.end == T::zero())
    }

    /// Tests whether this box fully contains another one.
    ///
    /// Panics (in debug builds) if the two boxes do not share a dimensionality;
    /// callers are expected to have rejected mismatches via [`crate::Error::DimensionMismatch`]
    /// before reaching here.
    pub fn contains(&self, other: &BoundingBox<T>) -> bool {
        debug_assert_eq!(self.len(), other.len(), "dimensionality mismatch");
        self.dims
            .iter()
            .zip(other.dims.iter())
            .all(|(a, b)| a.contains(*b))
    }
}

impl<T, R> From<R> for BoundingBox<T>
where
    T: DimensionType,
    R: Borrow<[RangeInclusive<T>]>,
{
    fn from(dims: R) -> Self {
        Self::new_from_ranges(dims)
    }
}
