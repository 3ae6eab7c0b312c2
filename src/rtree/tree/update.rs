use super::common::{recompute_upward, retract_leaf};
use super::Tree;
use crate::error::Error;
use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::rtree::nodemap::NodeMap;

impl<T, M> Tree<T, M>
where
    T: DimensionType,
    M: NodeMap<T>,
{
    /// Moves the leaf keyed by `id` to `new_box`. If the
    /// leaf's current parent still contains `new_box`, the leaf is updated
    /// in place and ancestor boxes only shrink upward; otherwise the leaf is
    /// detached and reinserted, possibly under a different parent. Updating
    /// an absent id is a no-op that returns the same tree value.
    pub fn update(&self, id: Key, new_box: BoundingBox<T>) -> Result<Self, (Error, Self)> {
        if !self.nodes.contains_key(&id) {
            return Ok(self.clone());
        }
        let mut next = self.clone();
        if let Err(e) = next.check_dimensionality(&new_box) {
            return Err((e, self.clone()));
        }
        next.update_established(id, new_box);
        Ok(next)
    }

    /// Applies every `(id, box)` update in order; equivalent to the
    /// sequential composition of [`Tree::update`], atomic with respect to
    /// failures.
    pub fn bulk_update(
        &self,
        updates: impl IntoIterator<Item = (Key, BoundingBox<T>)>,
    ) -> Result<Self, (Error, Self)> {
        let mut current = self.clone();
        for (id, bb) in updates {
            current = current.update(id, bb).map_err(|(e, _)| (e, self.clone()))?;
        }
        Ok(current)
    }

    fn update_established(&mut self, id: Key, new_box: BoundingBox<T>) {
        let parent = match self.nodes.get(&id) {
            Some(NodeRecord::Leaf { parent, .. }) => parent.clone(),
            _ => return,
        };
        let parent_still_contains = self
            .nodes
            .get(&parent)
            .map(|r| r.bb().contains(&new_box))
            .unwrap_or(false);

        if parent_still_contains {
            self.nodes.put(
                id,
                NodeRecord::Leaf {
                    parent: parent.clone(),
                    bb: new_box,
                },
            );
            let ndim = self.ndim.unwrap_or(0);
            recompute_upward(&mut self.nodes, parent, ndim);
        } else {
            let ndim = self.ndim.unwrap_or(0);
            retract_leaf(&mut self.nodes, &id, ndim);
            self.insert_established(id, new_box);
        }
    }
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

    #[test]
    fn update_within_parent_box_keeps_the_same_parent() {
        let tree = seven_leaf_tree();
        let parent_before = match tree.get(&Key::from(0)) {
            Some(NodeRecord::Leaf { parent, .. }) => parent.clone(),
            _ => panic!("leaf 0 must exist"),
        };
        let updated = tree
            .update(Key::from(0), bb(&[13.0..=14.0, 6.0..=7.0]))
            .unwrap();
        let parent_after = match updated.get(&Key::from(0)) {
            Some(NodeRecord::Leaf { parent, bb: leaf_bb }) => {
                assert_eq!(*leaf_bb, bb(&[13.0..=14.0, 6.0..=7.0]));
                parent.clone()
            }
            _ => panic!("leaf 0 must exist"),
        };
        assert_eq!(parent_before, parent_after);
    }

    #[test]
    fn update_outside_parent_box_reparents() {
        let tree = seven_leaf_tree();
        let parent_before = match tree.get(&Key::from(0)) {
            Some(NodeRecord::Leaf { parent, .. }) => parent.clone(),
            _ => panic!("leaf 0 must exist"),
        };
        let updated = tree
            .update(Key::from(0), bb(&[-5.0..=-4.0, 6.0..=7.0]))
            .unwrap();
        let parent_after = match updated.get(&Key::from(0)) {
            Some(NodeRecord::Leaf { parent, bb: leaf_bb }) => {
                assert_eq!(*leaf_bb, bb(&[-5.0..=-4.0, 6.0..=7.0]));
                parent.clone()
            }
            _ => panic!("leaf 0 must exist"),
        };
        assert_ne!(parent_before, parent_after);
    }

    #[test]
    fn update_of_absent_id_is_identity() {
        let tree = seven_leaf_tree();
        let again = tree.update(Key::from(999), bb(&[0.0..=1.0, 0.0..=1.0])).unwrap();
        assert_eq!(tree, again);
    }
}
