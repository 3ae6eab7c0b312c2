use super::common::retract_leaf;
use super::Tree;
use crate::error::Error;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;
use crate::rtree::nodemap::NodeMap;

impl<T, M> Tree<T, M>
where
    T: DimensionType,
    M: NodeMap<T>,
{
    /// Deletes the leaf keyed by `id`. Deleting an absent key is a
    /// deliberate no-op that returns the same tree value, not an error.
    pub fn delete(&self, id: &Key) -> Result<Self, (Error, Self)> {
        if !self.nodes.contains_key(id) {
            return Ok(self.clone());
        }
        let mut next = self.clone();
        let ndim = next.ndim.unwrap_or(0);
        retract_leaf(&mut next.nodes, id, ndim);
        Ok(next)
    }

    /// Deletes every id in order; equivalent to the sequential composition of
    /// [`Tree::delete`], atomic with respect to failures.
    pub fn bulk_delete(&self, ids: impl IntoIterator<Item = Key>) -> Result<Self, (Error, Self)> {
        let mut current = self.clone();
        for id in ids {
            current = current.delete(&id).map_err(|(e, _)| (e, self.clone()))?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rtree::bounding_box::BoundingBox;
    use crate::rtree::config::TreeOptions;
    use crate::rtree::node::NodeRecord;
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
    fn delete_of_absent_key_is_identity() {
        let tree = seven_leaf_tree();
        let again = tree.delete(&Key::from(999)).unwrap();
        assert_eq!(tree, again);
    }

    #[test]
    fn deleting_all_leaves_collapses_root_to_sentinel_box() {
        let tree = seven_leaf_tree();
        let all_ids: Vec<Key> = (0..7).map(Key::from).collect();
        let emptied = tree.bulk_delete(all_ids.clone()).unwrap();

        match emptied.get(emptied.root()) {
            Some(NodeRecord::Branch { children, bb: root_bb, .. }) => {
                assert!(children.is_empty());
                assert_eq!(*root_bb, bb(&[0.0..=0.0, 0.0..=0.0]));
            }
            other => panic!("expected branch root, got {:?}", other),
        }

        // Deleting again is the identity.
        let again = emptied.bulk_delete(all_ids).unwrap();
        assert_eq!(emptied, again);
    }
}
