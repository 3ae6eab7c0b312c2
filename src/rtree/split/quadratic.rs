use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::geometry::{area, combine, enlargement_area};
use crate::rtree::key::Key;
use crate::rtree::split::{SplitGroup, SplitResult, SplittingStrategy};

/// Quadratic-cost node splitting: picks the seed pair that wastes the most
/// area if combined, then repeatedly assigns the remaining entry with the
/// largest enlargement-cost difference to whichever group it prefers,
/// forcing the rest to one side once the other has no room left to satisfy
/// `min_group_size`.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuadraticSplit;

impl<T> SplittingStrategy<T> for QuadraticSplit
where
    T: DimensionType,
{
    fn split(&self, mut entries: Vec<(Key, BoundingBox<T>)>, min_group_size: usize) -> SplitResult<T> {
        debug_assert!(entries.len() >= 2);

        let (i, j) = pick_seeds(&entries);
        let (hi, lo) = (i.max(j), i.min(j));
        let (key_b, box_b) = entries.remove(hi);
        let (key_a, box_a) = entries.remove(lo);

        let mut group_a_bb = box_a;
        let mut group_b_bb = box_b;
        let mut group_a = vec![key_a];
        let mut group_b = vec![key_b];

        let mut remaining = entries;
        while !remaining.is_empty() {
            let a_needed = min_group_size.saturating_sub(group_a.len());
            let b_needed = min_group_size.saturating_sub(group_b.len());

            if a_needed > 0 && a_needed >= remaining.len() {
                for (key, bb) in remaining.drain(..) {
                    group_a_bb = combine(&group_a_bb, &bb);
                    group_a.push(key);
                }
                break;
            }
            if b_needed > 0 && b_needed >= remaining.len() {
                for (key, bb) in remaining.drain(..) {
                    group_b_bb = combine(&group_b_bb, &bb);
                    group_b.push(key);
                }
                break;
            }

            let mut best_idx = 0;
            let mut best_diff: Option<T> = None;
            let mut best_enl_a = T::zero();
            let mut best_enl_b = T::zero();
            for (idx, (_, bb)) in remaining.iter().enumerate() {
                let enl_a = enlargement_area(&group_a_bb, bb);
                let enl_b = enlargement_area(&group_b_bb, bb);
                let diff = if enl_a > enl_b {
                    enl_a - enl_b
                } else {
                    enl_b - enl_a
                };
                let better = match best_diff {
                    None => true,
                    Some(d) => diff > d,
                };
                if better {
                    best_diff = Some(diff);
                    best_idx = idx;
                    best_enl_a = enl_a;
                    best_enl_b = enl_b;
                }
            }

            let (key, bb) = remaining.remove(best_idx);
            if assign_to_a(best_enl_a, best_enl_b, area(&group_a_bb), area(&group_b_bb), group_a.len(), group_b.len()) {
                group_a_bb = combine(&group_a_bb, &bb);
                group_a.push(key);
            } else {
                group_b_bb = combine(&group_b_bb, &bb);
                group_b.push(key);
            }
        }

        SplitResult {
            first: SplitGroup {
                bb: group_a_bb,
                entries: group_a,
            },
            second: SplitGroup {
                bb: group_b_bb,
                entries: group_b,
            },
        }
    }
}

/// Picks the pair with the greatest "wasted area". Ties keep the
/// lexicographically smallest `(i, j)` since later equal candidates never
/// replace the current best.
fn pick_seeds<T: DimensionType>(entries: &[(Key, BoundingBox<T>)]) -> (usize, usize) {
    let n = entries.len();
    let mut best = (0usize, 1usize.min(n.saturating_sub(1)));
    let mut best_waste: Option<T> = None;
    for i in 0..n {
        for j in (i + 1)..n {
            let combined = combine(&entries[i].1, &entries[j].1);
            let waste = area(&combined) - area(&entries[i].1) - area(&entries[j].1);
            let better = match best_waste {
                None => true,
                Some(w) => waste > w,
            };
            if better {
                best_waste = Some(waste);
                best = (i, j);
            }
        }
    }
    best
}

fn assign_to_a<T: DimensionType>(
    enl_a: T,
    enl_b: T,
    area_a: T,
    area_b: T,
    count_a: usize,
    count_b: usize,
) -> bool {
    if enl_a < enl_b {
        return true;
    }
    if enl_a > enl_b {
        return false;
    }
    if area_a < area_b {
        return true;
    }
    if area_a > area_b {
        return false;
    }
    count_a < count_b
}
