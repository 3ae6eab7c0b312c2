use super::common::grow_box;
use super::Tree;
use crate::error::Error;
use crate::rtree::bounding_box::BoundingBox;
use crate::rtree::dimension_type::DimensionType;
use crate::rtree::geometry::{area, combine, enlargement_area};
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::rtree::nodemap::NodeMap;
use crate::rtree::split::{QuadraticSplit, SplitResult, SplittingStrategy};

impl<T, M> Tree<T, M>
where
    T: DimensionType,
    M: NodeMap<T>,
{
    /// Inserts a single leaf. Fails with [`Error::KeyExists`] if
    /// `id` is already a key in the tree, or [`Error::DimensionMismatch`] if
    /// `bb`'s dimensionality doesn't match what the tree's first insert
    /// established. Either way the tree returned is unchanged.
    pub fn insert(&self, id: Key, bb: BoundingBox<T>) -> Result<Self, (Error, Self)> {
        if self.nodes.contains_key(&id) {
            return Err((Error::KeyExists(id), self.clone()));
        }
        let mut next = self.clone();
        if let Err(e) = next.check_dimensionality(&bb) {
            return Err((e, self.clone()));
        }
        next.insert_established(id, bb);
        Ok(next)
    }

    /// Inserts every `(id, box)` pair in order; equivalent to the sequential
    /// composition of [`Tree::insert`]. Atomic: on the first
    /// failure the tree returned is the original receiver, not a partially
    /// applied prefix.
    pub fn bulk_insert(
        &self,
        leaves: impl IntoIterator<Item = (Key, BoundingBox<T>)>,
    ) -> Result<Self, (Error, Self)> {
        let mut current = self.clone();
        for (id, bb) in leaves {
            current = current.insert(id, bb).map_err(|(e, _)| (e, self.clone()))?;
        }
        Ok(current)
    }

    /// Inserts `bb` as a new leaf if `id` is absent, otherwise updates the
    /// existing leaf in place.
    pub fn upsert(&self, id: Key, bb: BoundingBox<T>) -> Result<Self, (Error, Self)> {
        if self.nodes.contains_key(&id) {
            self.update(id, bb)
        } else {
            self.insert(id, bb)
        }
    }

    /// Descends to the cheapest leaf-parent branch, appends the leaf, grows
    /// every ancestor's box, and splits any branch left overfull. Assumes
    /// `id` is absent and `bb`'s dimensionality already matches the tree's.
    fn insert_established(&mut self, id: Key, bb: BoundingBox<T>) {
        let mut path = vec![self.root.clone()];
        let mut current = self.root.clone();
        loop {
            let children = match self.nodes.get(&current) {
                Some(NodeRecord::Branch { children, .. }) => children.clone(),
                _ => unreachable!("descent path must only contain branches"),
            };
            let children_are_leaves = children
                .iter()
                .all(|c| self.nodes.get(c).map_or(true, |r| r.is_leaf()));
            if children.is_empty() || children_are_leaves {
                break;
            }
            current = self.choose_subtree(&children, &bb);
            path.push(current.clone());
        }

        // Append the leaf, grow the target branch's own box.
        self.nodes.put(
            id.clone(),
            NodeRecord::Leaf {
                parent: current.clone(),
                bb: bb.clone(),
            },
        );
        let mut target = self.nodes.get(&current).cloned().expect("target exists");
        if let NodeRecord::Branch { children, bb: tbb, .. } = &mut target {
            children.push(id);
            *tbb = grow_box(tbb, &bb);
        }
        self.nodes.put(current.clone(), target);

        // Propagate the enlarged box to every ancestor above the target.
        for ancestor in path[..path.len() - 1].iter().rev() {
            let mut record = self.nodes.get(ancestor).cloned().expect("ancestor exists");
            if let NodeRecord::Branch { bb: abb, .. } = &mut record {
                *abb = grow_box(abb, &bb);
            }
            self.nodes.put(ancestor.clone(), record);
        }

        self.split_overflowing_ancestors(&path);
    }

    /// Picks the child whose box needs the least enlargement to contain
    /// `bb`; ties go to the smaller current area, then to the earliest entry
    /// in `children`.
    fn choose_subtree(&self, children: &[Key], bb: &BoundingBox<T>) -> Key {
        let mut best_idx = 0;
        let mut best_enlargement: Option<T> = None;
        let mut best_area = T::zero();
        for (idx, child) in children.iter().enumerate() {
            let child_bb = self.nodes.get(child).expect("child exists").bb();
            let enlargement = enlargement_area(child_bb, bb);
            let current_area = area(child_bb);
            let better = match best_enlargement {
                None => true,
                Some(best) => {
                    enlargement < best || (enlargement == best && current_area < best_area)
                }
            };
            if better {
                best_enlargement = Some(enlargement);
                best_area = current_area;
                best_idx = idx;
            }
        }
        children[best_idx].clone()
    }

    /// Walks `path` from its end (the just-grown leaf-parent branch) upward,
    /// splitting any branch left with more than `width` children. A split at
    /// the root mints a brand-new root whose two children are the halves.
    fn split_overflowing_ancestors(&mut self, path: &[Key]) {
        let mut idx = path.len() - 1;
        loop {
            let node_key = path[idx].clone();
            let overflow = matches!(
                self.nodes.get(&node_key),
                Some(NodeRecord::Branch { children, .. }) if children.len() > self.width
            );
            if !overflow {
                return;
            }

            let sibling = self.split_branch(&node_key);

            if idx == 0 {
                let group_a = self.nodes.get(&node_key).expect("split group exists").clone();
                let group_b = self.nodes.get(&sibling).expect("split group exists").clone();
                let new_root_bb = combine(group_a.bb(), group_b.bb());
                let new_root = self.mint_key();

                self.reparent(&node_key, Some(new_root.clone()));
                self.reparent(&sibling, Some(new_root.clone()));
                self.nodes.put(
                    new_root.clone(),
                    NodeRecord::Branch {
                        children: vec![node_key, sibling],
                        parent: None,
                        bb: new_root_bb,
                    },
                );
                self.root = new_root;
                return;
            }

            let parent_key = path[idx - 1].clone();
            let mut parent = self.nodes.get(&parent_key).cloned().expect("parent exists");
            let sibling_bb = self.nodes.get(&sibling).expect("sibling exists").bb().clone();
            if let NodeRecord::Branch { children, bb, .. } = &mut parent {
                children.push(sibling);
                *bb = grow_box(bb, &sibling_bb);
            }
            self.nodes.put(parent_key, parent);
            idx -= 1;
        }
    }

    /// Splits the overfull branch at `key` into two groups via
    /// [`QuadraticSplit`]: `key` keeps the first group, a freshly minted key
    /// gets the second. Returns the new sibling's key.
    fn split_branch(&mut self, key: &Key) -> Key {
        let (children, parent) = match self.nodes.get(key) {
            Some(NodeRecord::Branch { children, parent, .. }) => (children.clone(), parent.clone()),
            _ => unreachable!("split target must be a branch"),
        };
        let entries: Vec<(Key, BoundingBox<T>)> = children
            .iter()
            .map(|c| (c.clone(), self.nodes.get(c).expect("child exists").bb().clone()))
            .collect();
        let min_group_size = (entries.len() + 1) / 2;

        let SplitResult { first, second } = QuadraticSplit.split(entries, min_group_size);

        let new_key = self.mint_key();

        self.nodes.put(
            key.clone(),
            NodeRecord::Branch {
                children: first.entries,
                parent: parent.clone(),
                bb: first.bb,
            },
        );
        self.nodes.put(
            new_key.clone(),
            NodeRecord::Branch {
                children: second.entries,
                parent,
                bb: second.bb,
            },
        );
        self.reparent_children(&new_key);
        self.reparent_children(key);

        new_key
    }

    /// Sets every child of branch `key` to point back at `key` as parent.
    fn reparent_children(&mut self, key: &Key) {
        let children = match self.nodes.get(key) {
            Some(NodeRecord::Branch { children, .. }) => children.clone(),
            _ => return,
        };
        for child in children {
            let mut record = self.nodes.get(&child).cloned().expect("child exists");
            match &mut record {
                NodeRecord::Leaf { parent, .. } => *parent = key.clone(),
                NodeRecord::Branch { parent, .. } => *parent = Some(key.clone()),
            }
            self.nodes.put(child, record);
        }
    }

    /// Sets branch `key`'s own `parent` field.
    fn reparent(&mut self, key: &Key, parent: Option<Key>) {
        let mut record = self.nodes.get(key).cloned().expect("node exists");
        if let NodeRecord::Branch { parent: p, .. } = &mut record {
            *p = parent;
        }
        self.nodes.put(key.clone(), record);
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

    fn new_tree(width: usize) -> Tree<f64, PlainNodeMap<f64>> {
        Tree::new(&TreeOptions::default().width(width))
    }

    #[test]
    fn single_insert_forms_a_leaf_under_root() {
        let tree = new_tree(6);
        let tree = tree.insert(Key::from(1), bb(&[1.0..=2.0, 3.0..=4.0])).unwrap();
        match tree.get(&Key::from(1)) {
            Some(NodeRecord::Leaf { parent, bb: leaf_bb }) => {
                assert_eq!(parent, tree.root());
                assert_eq!(*leaf_bb, bb(&[1.0..=2.0, 3.0..=4.0]));
            }
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_insert_is_rejected_and_leaves_tree_unchanged() {
        let tree = new_tree(6).insert(Key::from(1), bb(&[1.0..=2.0, 3.0..=4.0])).unwrap();
        let (err, unchanged) = tree
            .insert(Key::from(1), bb(&[3.0..=4.0, 5.0..=6.0]))
            .unwrap_err();
        assert_eq!(err, Error::KeyExists(Key::from(1)));
        assert_eq!(unchanged, tree);
    }

    #[test]
    fn mismatched_dimensionality_is_rejected() {
        let tree = new_tree(6).insert(Key::from(1), bb(&[1.0..=2.0])).unwrap();
        let (err, unchanged) = tree
            .insert(Key::from(2), bb(&[1.0..=2.0, 3.0..=4.0]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(unchanged, tree);
    }

    #[test]
    fn bulk_insert_of_seven_causes_root_split_with_expected_box() {
        let leaves: Vec<(Key, BoundingBox<f64>)> = vec![
            (Key::from(0), bb(&[4.0..=5.0, 6.0..=7.0])),
            (Key::from(1), bb(&[-34.0..=-33.0, 40.0..=41.0])),
            (Key::from(2), bb(&[-50.0..=-49.0, 15.0..=16.0])),
            (Key::from(3), bb(&[33.0..=34.0, -10.0..=-9.0])),
            (Key::from(4), bb(&[35.0..=36.0, -9.0..=-8.0])),
            (Key::from(5), bb(&[0.0..=1.0, -9.0..=-8.0])),
            (Key::from(6), bb(&[9.0..=10.0, 9.0..=10.0])),
        ];
        let tree = new_tree(6).bulk_insert(leaves).unwrap();

        match tree.get(tree.root()) {
            Some(NodeRecord::Branch { children, bb: root_bb, .. }) => {
                assert_eq!(children.len(), 2);
                assert_eq!(*root_bb, bb(&[-50.0..=36.0, -10.0..=41.0]));
            }
            other => panic!("expected branch root, got {:?}", other),
        }
    }

    #[test]
    fn upsert_on_existing_leaf_updates_in_place() {
        let tree = new_tree(6).insert(Key::from(1), bb(&[1.0..=2.0, 3.0..=4.0])).unwrap();
        let tree = tree.upsert(Key::from(1), bb(&[3.0..=4.0, 5.0..=6.0])).unwrap();
        match tree.get(&Key::from(1)) {
            Some(NodeRecord::Leaf { bb: leaf_bb, .. }) => {
                assert_eq!(*leaf_bb, bb(&[3.0..=4.0, 5.0..=6.0]));
            }
            other => panic!("expected leaf, got {:?}", other),
        }
    }
}
