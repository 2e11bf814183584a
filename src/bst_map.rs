use std::fmt::Debug;

use crate::bst_base::{bst::Bst, DefaultBst};

/// Map-style convenience wrapper over the instrumented tree, keyed by
/// natural order.
pub struct BstMap<K, V> {
    _tree: DefaultBst<K, V>,
}

impl<K, V> BstMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + Debug,
{
    pub fn new() -> Self {
        Self { _tree: Bst::new() }
    }

    pub fn is_empty(&self) -> bool {
        self._tree.is_empty()
    }

    pub fn len(&self) -> usize {
        self._tree.size()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self._tree.search(key).is_ok()
    }

    /// Insert or replace. Removing an existing entry first keeps `len` equal
    /// to the number of stored entries, which the engine's raw insert counter
    /// does not guarantee on overwrite.
    pub fn put(&mut self, key: K, value: V) {
        if self._tree.search(&key).is_ok() {
            let _ = self._tree.remove(&key);
        }
        self._tree.insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self._tree.search(key).ok()
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self._tree.remove(key).ok()
    }
}

impl<K, V> Default for BstMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
