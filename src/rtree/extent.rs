use crate::rtree::dimension_type::DimensionType;
use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Range, RangeInclusive};

/// Extents along a dimension.
#[derive(Copy, Clone, PartialEq)]
pub struct Extent<T>
where
    T: DimensionType,
{
    /// The start coordinate of the extent.
    pub start: T,
    /// The end coordinate of the extent.
    pub end: T,
}

impl<T> Extent<T>
where
    T: DimensionType,
{
    /// Initializes a new box from coordinates.
    ///
    /// ## Arguments
    /// * `start` - The start coordinate along the dimension.
    /// * `end` - The end coordinate along the dimension.
    pub fn new(start: T, end: T) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Initializes a new box from coordinates.
    ///
    /// ## Arguments
    /// * `start` - The start coordinate along the dimension.
    /// * `end` - The end coordinate along the dimension.
    pub fn new_from_range<R: Borrow<RangeInclusive<T>>>(range: R) -> Self {
        let range = range.borrow();
        debug_assert!(range.start() <= range.end());
        Self {
            start: range.start().clone(),
            end: range.end().clone(),
        }
    }
}

impl<T> Default for Extent<T>
where
    T: DimensionType,
{
    fn default() -> Self {
        Self {
            start: T::zero(),
            end: T::one(),
        }
    }
}

impl<T, R: Borrow<RangeInclusive<T>>> From<R> for Extent<T>
where
    T: DimensionType,
{
    fn from(range: R) -> Self {
        Self::new_from_range(range)
    }
}

impl<T> Into<RangeInclusive<T>> for Extent<T>
where
    T: DimensionType,
{
    fn into(self) -> RangeInclusive<T> {
        self.start..=self.end
    }
}

pub trait Contains<T> {
    fn contains(self, value: T) -> bool;
}

impl<T> Contains<T> for Extent<T>
where
    T: DimensionType,
{
    fn contains(self, value: T) -> bool {
        self.start <= value && value <= self.end
    }
}

impl<T> Contains<Extent<T>> for Extent<T>
where
    T: DimensionType,
{
    fn contains(self, value: Extent<T>) -> bool {
        // Since we require that start <= end, we only need to test the boundaries.
        self.start <= value.start && value.end <= self.end
    }
}

impl<T> Contains<Range<T>> for Extent<T>
where
    T: DimensionType,
{
    fn contains(self, value: Range<T>) -> bool {
        self.start <= value.start
            && value.start <= self.end
            && self.start <= value.end
            && value.end <= self.end
    }
}

impl<T> Contains<RangeInclusive<T>> for Extent<T>
where
    T: DimensionType,
{
    fn contains(self, value: RangeInclusive<T>) -> bool {
        let start = value.start();
        let end = value.end();
        &self.start <= start && start <= &self.end && &self.start <= end && end <= &self.end
    }
}

impl<T> Debug for Extent<T>
where
    T: DimensionType + Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl<T> Display for Extent<T>
where
    T: DimensionType + Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
