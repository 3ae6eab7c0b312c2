use crate::rtree::dimension_type::DimensionType;
use crate::rtree::key::Key;
use crate::rtree::node::NodeRecord;
use crate::rtree::nodemap::NodeMap;
use crate::types::HashMap;

/// A bare key→record mapping; the default backend for a standalone tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainNodeMap<T>
where
    T: DimensionType,
{
    entries: HashMap<Key, NodeRecord<T>>,
}

impl<T> NodeMap<T> for PlainNodeMap<T>
where
    T: DimensionType,
{
    fn new() -> Self {
        Self {
            entries: HashMap::default(),
        }
    }

    fn get(&self, key: &Key) -> Option<&NodeRecord<T>> {
        self.entries.get(key)
    }

    fn put(&mut self, key: Key, value: NodeRecord<T>) {
        self.entries.insert(key, value);
    }

    fn remove(&mut self, key: &Key) -> Option<NodeRecord<T>> {
        self.entries.remove(key)
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a Key, &'a NodeRecord<T>)> + 'a> {
        Box::new(self.entries.iter())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
