//! Pure, dimensionality-polymorphic functions on [`BoundingBox`] values.
//!
//! None of these touch a tree; they only operate on boxes, which keeps them
//! directly testable against the literal values from the geometry unit
//! checks.

use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::extent::Extent;
use smallvec::SmallVec;

/// Builds `count` copies of `T` by repeated addition; used to materialize small
/// integer-ish constants (`100`, in `overlap_area`) generically over `T: Num`.
fn repeat<T: DimensionType>(count: u32) -> T {
    let mut acc = T::zero();
    for _ in 0..count {
        acc = acc + T::one();
    }
    acc
}

/// Per-axis `(min lo, max hi)` union of two boxes.
///
/// If either box is the all-zero sentinel (an empty root's placeholder box),
/// the other box is returned untouched rather than unioned with `[(0,0), …]` —
/// this is what lets an empty root's first insert set its box directly to the
/// inserted leaf's box.
pub fn combine<T: DimensionType>(a: &BoundingBox<T>, b: &BoundingBox<T>) -> BoundingBox<T> {
    if a.is_sentinel() {
        return b.clone();
    }
    if b.is_sentinel() {
        return a.clone();
    }
    debug_assert_eq!(a.len(), b.len(), "dimensionality mismatch");
    let dims: SmallVec<[Extent<T>; 4]> = a
        .dims
        .iter()
        .zip(b.dims.iter())
        .map(|(x, y)| {
            let start = if x.start < y.start { x.start } else { y.start };
            let end = if x.end > y.end { x.end } else { y.end };
            Extent::new(start, end)
        })
        .collect();
    BoundingBox::new(dims)
}

/// Folds [`combine`] over a sequence of boxes, skipping the all-zero sentinel.
///
/// Returns the `ndim`-dimensional sentinel box if `boxes` is empty or every
/// entry is itself the sentinel — this is the only place an empty branch's
/// box is ever (re)computed.
pub fn combine_multiple<'a, T: DimensionType + 'a>(
    boxes: impl IntoIterator<Item = &'a BoundingBox<T>>,
    ndim: usize,
) -> BoundingBox<T> {
    let mut acc: Option<BoundingBox<T>> = None;
    for b in boxes {
        if b.is_sentinel() {
            continue;
        }
        acc = Some(match acc {
            None => b.clone(),
            Some(a) => combine(&a, b),
        });
    }
    acc.unwrap_or_else(|| BoundingBox::empty(ndim))
}

/// `true` iff every axis has `a.lo ≤ b.hi ∧ b.lo ≤ a.hi`.
pub fn overlap<T: DimensionType>(a: &BoundingBox<T>, b: &BoundingBox<T>) -> bool {
    debug_assert_eq!(a.len(), b.len(), "dimensionality mismatch");
    a.dims
        .iter()
        .zip(b.dims.iter())
        .all(|(x, y)| x.start <= y.end && y.start <= x.end)
}

/// `true` iff `outer` fully contains `inner` (every axis: `outer.lo ≤ inner.lo ∧ inner.hi ≤ outer.hi`).
pub fn contained<T: DimensionType>(outer: &BoundingBox<T>, inner: &BoundingBox<T>) -> bool {
    outer.contains(inner)
}

/// `true` iff `outer` contains `inner` and they share at least one axis endpoint.
pub fn in_border<T: DimensionType>(outer: &BoundingBox<T>, inner: &BoundingBox<T>) -> bool {
    contained(outer, inner)
        && outer
            .dims
            .iter()
            .zip(inner.dims.iter())
            .any(|(o, i)| o.start == i.start || o.end == i.end)
}

/// Product of `(hi - lo)` over axes; the all-zero sentinel returns `-1` to
/// distinguish "unset" from an actual zero-volume box.
pub fn area<T: DimensionType>(bb: &BoundingBox<T>) -> T {
    if bb.is_sentinel() {
        return T::zero() - T::one();
    }
    bb.dims
        .iter()
        .fold(T::one(), |acc, e| acc * (e.end - e.start))
}

/// `area(combine(current, incoming)) - area(current)`, treating a `-1` sentinel
/// area on `current` as `0`.
pub fn enlargement_area<T: DimensionType>(current: &BoundingBox<T>, incoming: &BoundingBox<T>) -> T {
    let grown = combine(current, incoming);
    let base = if current.is_sentinel() {
        T::zero()
    } else {
        area(current)
    };
    area(&grown) - base
}

/// Sum of axis midpoints, `Σ (lo + hi) / 2`.
pub fn middle_value<T: DimensionType>(bb: &BoundingBox<T>) -> T {
    let two = T::one() + T::one();
    bb.dims
        .iter()
        .fold(T::zero(), |acc, e| acc + (e.start + e.end) / two)
}

/// Per-axis midpoint.
pub fn centroid<T: DimensionType>(bb: &BoundingBox<T>) -> SmallVec<[T; 4]> {
    let two = T::one() + T::one();
    bb.dims.iter().map(|e| (e.start + e.end) / two).collect()
}

/// `100 · vol(intersection) / vol(smaller)`, clamped to `[0, 100]`.
///
/// Matches the reference implementation's percentage-of-smaller-area metric
/// rather than raw intersection volume.
pub fn overlap_area<T: DimensionType>(a: &BoundingBox<T>, b: &BoundingBox<T>) -> T {
    if !overlap(a, b) {
        return T::zero();
    }
    debug_assert_eq!(a.len(), b.len(), "dimensionality mismatch");

    let intersection_volume = a
        .dims
        .iter()
        .zip(b.dims.iter())
        .fold(T::one(), |acc, (x, y)| {
            let lo = if x.start > y.start { x.start } else { y.start };
            let hi = if x.end < y.end { x.end } else { y.end };
            let len = if hi > lo { hi - lo } else { T::zero() };
            acc * len
        });

    let area_a = area(a);
    let area_b = area(b);
    let smaller = if area_a < area_b { area_a } else { area_b };
    if smaller <= T::zero() {
        return T::zero();
    }

    let hundred: T = repeat(100);
    let scaled = hundred * intersection_volume / smaller;
    if scaled > hundred {
        hundred
    } else {
        scaled
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bb(ranges: &[std::ops::RangeInclusive<f64>]) -> BoundingBox<f64> {
        BoundingBox::from(ranges)
    }

    #[test]
    fn combine_matches_literal_example() {
        let a = bb(&[3.0..=19.0, -4.0..=20.0]);
        let b = bb(&[-5.0..=6.0, -4.0..=11.0]);
        let c = combine(&a, &b);
        assert_eq!(c, bb(&[-5.0..=19.0, -4.0..=20.0]));
    }

    #[test]
    fn overlap_matches_literal_examples() {
        assert!(!overlap(&bb(&[0.0..=0.0, 0.0..=1.0]), &bb(&[1.0..=2.0, -1.0..=5.0])));
        assert!(overlap(&bb(&[1.0..=2.0, 0.0..=1.0]), &bb(&[1.0..=2.0, -1.0..=5.0])));
    }

    #[test]
    fn contained_and_in_border_match_literal_examples() {
        let outer = bb(&[0.0..=10.0, 0.0..=10.0]);
        let inner = bb(&[0.0..=5.0, 0.0..=5.0]);
        assert!(contained(&outer, &inner));
        assert!(in_border(&outer, &inner));
    }

    #[test]
    fn area_matches_literal_examples() {
        assert_eq!(area(&BoundingBox::<f64>::empty(2)), -1.0);
        assert_eq!(area(&bb(&[0.0..=1.0, 0.0..=1.0])), 1.0);
        assert_eq!(area(&bb(&[-10.0..=0.0, 0.0..=1.0])), 10.0);
    }

    #[test]
    fn enlargement_area_matches_literal_example() {
        let current = bb(&[10.0..=12.0, 10.0..=11.0]);
        let incoming = bb(&[1.0..=2.0, -1.0..=5.0]);
        assert_eq!(enlargement_area(&current, &incoming), 130.0);
    }

    #[test]
    fn enlargement_area_treats_sentinel_as_zero() {
        let current = BoundingBox::<f64>::empty(2);
        let incoming = bb(&[1.0..=2.0, -1.0..=5.0]);
        // area(incoming) = 1 * 6 = 6, base treated as 0.
        assert_eq!(enlargement_area(&current, &incoming), 6.0);
    }

    #[test]
    fn overlap_area_is_100_for_identical_boxes() {
        let a = bb(&[0.0..=10.0, 0.0..=10.0]);
        assert_eq!(overlap_area(&a, &a), 100.0);
    }

    #[test]
    fn overlap_area_is_zero_when_disjoint() {
        let a = bb(&[0.0..=1.0, 0.0..=1.0]);
        let b = bb(&[5.0..=6.0, 5.0..=6.0]);
        assert_eq!(overlap_area(&a, &b), 0.0);
    }

    #[test]
    fn overlap_area_is_partial_for_a_quarter_overlap() {
        let a = bb(&[0.0..=10.0, 0.0..=10.0]);
        let b = bb(&[5.0..=15.0, 5.0..=15.0]);
        // intersection is 5x5=25, smaller area is 100 -> 25%.
        assert_eq!(overlap_area(&a, &b), 25.0);
    }

    #[test]
    fn combine_multiple_skips_sentinel() {
        let a = BoundingBox::<f64>::empty(2);
        let b = bb(&[1.0..=2.0, 1.0..=2.0]);
        assert_eq!(combine_multiple([&a, &b], 2), b);
        assert_eq!(combine_multiple(std::iter::empty(), 2), BoundingBox::empty(2));
    }

    #[test]
    fn middle_value_and_centroid_match() {
        let b = bb(&[0.0..=10.0, -4.0..=4.0]);
        assert_eq!(middle_value(&b), 5.0 + 0.0);
        assert_eq!(centroid(&b).into_vec(), vec![5.0, 0.0]);
    }
}
