use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::rtree::nodemap::NodeMap;
use crate::types::{HashMap, HashSet};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A node map that additionally keeps a per-key content hash, so that
/// [`HashSummarizedNodeMap::diff_keys`] can find the keys that changed
/// between two snapshots in time proportional to the number of changes
/// rather than the size of the map. Used whenever the tree is replicated
/// (`mode = Distributed`).
///
/// Coordinates (`T`) are only required to be `Num + PartialOrd + Copy`
/// (they need not implement `Hash` — `f64` famously doesn't), so the
/// content hash is computed over each record's `Debug` rendering rather
/// than a derived `Hash` impl. This is a summary, not a cryptographic
/// digest: it exists purely to make `diff_keys` cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct HashSummarizedNodeMap<T>
where
    T: DimensionType,
{
    entries: HashMap<Key, NodeRecord<T>>,
    digests: HashMap<Key, u64>,
}

fn digest_of<T: DimensionType>(record: &NodeRecord<T>) -> u64 {
    let mut hasher = DefaultHasher::new();
    format!("{:?}", record).hash(&mut hasher);
    hasher.finish()
}

impl<T> HashSummarizedNodeMap<T>
where
    T: DimensionType,
{
    /// Keys whose records differ between `old` and `new`: present in one but
    /// not the other, or present in both with a different digest.
    pub fn diff_keys(old: &Self, new: &Self) -> HashSet<Key> {
        let mut changed = HashSet::default();
        for (key, digest) in old.digests.iter() {
            match new.digests.get(key) {
                Some(new_digest) if new_digest == digest => {}
                _ => {
                    changed.insert(key.clone());
                }
            }
        }
        for key in new.digests.keys() {
            if !old.digests.contains_key(key) {
                changed.insert(key.clone());
            }
        }
        changed
    }
}

impl<T> NodeMap<T> for HashSummarizedNodeMap<T>
where
    T: DimensionType,
{
    fn new() -> Self {
        Self {
            entries: HashMap::default(),
            digests: HashMap::default(),
        }
    }

    fn get(&self, key: &Key) -> Option<&NodeRecord<T>> {
        self.entries.get(key)
    }

    fn put(&mut self, key: Key, value: NodeRecord<T>) {
        let digest = digest_of(&value);
        self.digests.insert(key.clone(), digest);
        self.entries.insert(key, value);
    }

    fn remove(&mut self, key: &Key) -> Option<NodeRecord<T>> {
        self.digests.remove(key);
        self.entries.remove(key)
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a Key, &'a NodeRecord<T>)> + 'a> {
        Box::new(self.entries.iter())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn diff_keys(old: &Self, new: &Self) -> HashSet<Key> {
        Self::diff_keys(old, new)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rtree::bounding_box::BoundingBox;

    fn leaf(parent: u64, lo: f64, hi: f64) -> NodeRecord<f64> {
        NodeRecord::Leaf {
            parent: Key::Internal(parent),
            bb: BoundingBox::from([lo..=hi].as_slice()),
        }
    }

    #[test]
    fn diff_keys_finds_added_removed_and_changed() {
        let mut a = HashSummarizedNodeMap::<f64>::new();
        a.put(Key::Int(1), leaf(0, 0.0, 1.0));
        a.put(Key::Int(2), leaf(0, 1.0, 2.0));

        let mut b = a.clone();
        b.put(Key::Int(2), leaf(0, 1.0, 3.0)); // changed
        b.remove(&Key::Int(1)); // removed
        b.put(Key::Int(3), leaf(0, 5.0, 6.0)); // added

        let diff = HashSummarizedNodeMap::diff_keys(&a, &b);
        assert_eq!(diff.len(), 3);
        assert!(diff.contains(&Key::Int(1)));
        assert!(diff.contains(&Key::Int(2)));
        assert!(diff.contains(&Key::Int(3)));
    }

    #[test]
    fn diff_keys_is_empty_for_identical_maps() {
        let mut a = HashSummarizedNodeMap::<f64>::new();
        a.put(Key::Int(1), leaf(0, 0.0, 1.0));
        let b = a.clone();
        assert!(HashSummarizedNodeMap::diff_keys(&a, &b).is_empty());
    }
}
