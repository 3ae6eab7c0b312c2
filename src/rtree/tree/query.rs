use super::Tree;
use crate::error::Error;
use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::geometry::overlap;
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::rtree::nodemap::NodeMap;

impl<T, M> Tree<T, M>
where
    T: DimensionType,
    M: NodeMap<T>,
{
    /// Returns every leaf id whose box overlaps `area`. Depth-first from the
    /// root; a branch is only descended into if its own box overlaps.
    /// Result order is unspecified.
    pub fn query(&self, area: &BoundingBox<T>) -> Vec<Key> {
        let mut hits = Vec::new();
        self.query_from(&self.root, area, &mut hits);
        hits
    }

    fn query_from(&self, key: &Key, area: &BoundingBox<T>, hits: &mut Vec<Key>) {
        match self.nodes.get(key) {
            Some(NodeRecord::Leaf { bb, .. }) => {
                if overlap(bb, area) {
                    hits.push(key.clone());
                }
            }
            Some(NodeRecord::Branch { children, bb, .. }) => {
                if !overlap(bb, area) {
                    return;
                }
                for child in children {
                    self.query_from(child, area, hits);
                }
            }
            None => {}
        }
    }

    /// Returns every node key at exactly `depth` (0 = root) whose box
    /// overlaps `area`. A depth past the tree's actual depth yields matching
    /// leaves instead.
    pub fn pquery(&self, area: &BoundingBox<T>, depth: usize) -> Vec<Key> {
        let mut hits = Vec::new();
        self.pquery_from(&self.root, area, depth, &mut hits);
        hits
    }

    fn pquery_from(&self, key: &Key, area: &BoundingBox<T>, depth_remaining: usize, hits: &mut Vec<Key>) {
        let record = match self.nodes.get(key) {
            Some(r) => r,
            None => return,
        };
        if !overlap(record.bb(), area) {
            return;
        }
        match record {
            NodeRecord::Leaf { .. } => hits.push(key.clone()),
            NodeRecord::Branch { children, .. } => {
                if depth_remaining == 0 {
                    hits.push(key.clone());
                    return;
                }
                for child in children.clone() {
                    self.pquery_from(&child, area, depth_remaining - 1, hits);
                }
            }
        }
    }
}

/// A handle over an engine that may not have been constructed yet.
/// [`crate::dispatcher::Dispatcher`] is the sole caller of this; a bare
/// [`Tree`] is always initialized once built.
pub(crate) fn require_initialized<T, M>(tree: Option<&Tree<T, M>>) -> Result<&Tree<T, M>, Error>
where
    T: DimensionType,
    M: NodeMap<T>,
{
    tree.ok_or(Error::BadTree)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rtree::config::TreeOptions;
    use crate::rtree::nodemap::PlainNodeMap;

    fn bb(ranges: &[std::ops::RangeInclusive<f64>]) -> BoundingBox<f64> {
        BoundingBox::from(ranges)
    }

    fn seven_leaf_tree() -> Tree<f64, PlainNodeMap<f64>> {
        let leaves: Vec<(Key, BoundingBox<f64>)> = vec![
            (Key::from(0), bb(&[4.0..=5.0, 6.0..=7.0])),
            (Key::from(1), bb(&[-34.0..=-33.0, 40.0..=41.0])),
            (Key::from(2), bb(&[-50.0..=-49.0, 15.0..=16.0])),
            (Key::from(3), bb(&[33.0..=34.0, -10.0..=-9.0])),
            (Key::from(4), bb(&[35.0..=36.0, -9.0..=-8.0])),
            (Key::from(5), bb(&[0.0..=1.0, -9.0..=-8.0])),
            (Key::from(6), bb(&[9.0..=10.0, 9.0..=10.0])),
        ];
        Tree::new(&TreeOptions::default().width(6))
            .bulk_insert(leaves)
            .unwrap()
    }

    fn sorted_ints(mut keys: Vec<Key>) -> Vec<i64> {
        let mut ints: Vec<i64> = keys
            .drain(..)
            .map(|k| match k {
                Key::Int(v) => v,
                other => panic!("expected int key, got {:?}", other),
            })
            .collect();
        ints.sort_unstable();
        ints
    }

    #[test]
    fn query_matches_literal_scenarios() {
        let tree = seven_leaf_tree();

        assert_eq!(sorted_ints(tree.query(&bb(&[4.0..=5.0, 6.0..=7.0]))), vec![0]);
        assert_eq!(
            sorted_ints(tree.query(&bb(&[-60.0..=0.0, 0.0..=100.0]))),
            vec![1, 2]
        );
        assert_eq!(
            sorted_ints(tree.query(&bb(&[-100.0..=100.0, -100.0..=100.0]))),
            vec![0, 1, 2, 3, 4, 5, 6]
        );
        assert!(tree.query(&bb(&[1.0..=2.0, 1.0..=2.0])).is_empty());
    }

    #[test]
    fn pquery_depth_zero_returns_root_iff_it_overlaps() {
        let tree = seven_leaf_tree();
        let whole = bb(&[-100.0..=100.0, -100.0..=100.0]);
        assert_eq!(tree.pquery(&whole, 0), vec![tree.root().clone()]);

        let elsewhere = bb(&[1000.0..=1001.0, 1000.0..=1001.0]);
        assert!(tree.pquery(&elsewhere, 0).is_empty());
    }

    #[test]
    fn pquery_past_tree_depth_returns_matching_leaves() {
        let tree = seven_leaf_tree();
        let whole = bb(&[-100.0..=100.0, -100.0..=100.0]);
        assert_eq!(sorted_ints(tree.pquery(&whole, 1000)), vec![0, 1, 2, 3, 4, 5, 6]);
    }
}
