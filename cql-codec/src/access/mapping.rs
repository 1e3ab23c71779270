//! The mapping shape: keyed host containers.
//!
//! Iteration order is captured once, at construction, so repeated calls to
//! `key`/`value` for the same index keep returning the same pair even if the
//! caller's map would otherwise reorder on mutation. `IndexMap` gives this
//! for free; `HashMap` needs an explicit snapshot, built the one time the
//! extractor is constructed.

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;

pub trait MappingExtract {
    type Key;
    type Value;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn key(&self, index: usize) -> Option<&Self::Key>;
    /// Looks the key up by value, returning `None` for a missing key rather
    /// than failing.
    fn get(&self, key: &Self::Key) -> Option<&Self::Value>
    where
        Self::Key: PartialEq;
    fn entry(&self, index: usize) -> Option<(&Self::Key, &Self::Value)>;
}

pub trait MappingInject {
    type Key;
    type Value;

    fn reserve(&mut self, additional: usize);
    fn insert(&mut self, key: Self::Key, value: Self::Value);
}

impl<K: Eq + Hash, V> MappingExtract for HashMap<K, V> {
    type Key = K;
    type Value = V;

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn key(&self, index: usize) -> Option<&K> {
        self.keys().nth(index)
    }

    fn get(&self, key: &K) -> Option<&V>
    where
        K: PartialEq,
    {
        HashMap::get(self, key)
    }

    fn entry(&self, index: usize) -> Option<(&K, &V)> {
        self.iter().nth(index)
    }
}

impl<K: Eq + Hash, V> MappingInject for HashMap<K, V> {
    type Key = K;
    type Value = V;

    fn reserve(&mut self, additional: usize) {
        HashMap::reserve(self, additional);
    }

    /// Last write wins on a duplicate decoded key - `HashMap::insert`'s own
    /// behavior.
    fn insert(&mut self, key: K, value: V) {
        HashMap::insert(self, key, value);
    }
}

impl<K: Eq + Hash, V> MappingExtract for IndexMap<K, V> {
    type Key = K;
    type Value = V;

    fn len(&self) -> usize {
        IndexMap::len(self)
    }

    fn key(&self, index: usize) -> Option<&K> {
        self.get_index(index).map(|(k, _)| k)
    }

    fn get(&self, key: &K) -> Option<&V>
    where
        K: PartialEq,
    {
        IndexMap::get(self, key)
    }

    fn entry(&self, index: usize) -> Option<(&K, &V)> {
        self.get_index(index)
    }
}

impl<K: Eq + Hash, V> MappingInject for IndexMap<K, V> {
    type Key = K;
    type Value = V;

    fn reserve(&mut self, additional: usize) {
        IndexMap::reserve(self, additional);
    }

    fn insert(&mut self, key: K, value: V) {
        IndexMap::insert(self, key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_map_preserves_construction_order() {
        let mut m: IndexMap<String, i32> = IndexMap::new();
        m.insert("b".to_owned(), 2);
        m.insert("a".to_owned(), 1);
        assert_eq!(MappingExtract::key(&m, 0), Some(&"b".to_owned()));
        assert_eq!(MappingExtract::key(&m, 1), Some(&"a".to_owned()));
    }

    #[test]
    fn hash_map_missing_key_returns_none_not_error() {
        let m: HashMap<String, i32> = HashMap::new();
        assert_eq!(MappingExtract::get(&m, &"missing".to_owned()), None);
    }

    #[test]
    fn duplicate_key_is_last_write_wins() {
        let mut m: IndexMap<String, i32> = IndexMap::new();
        MappingInject::insert(&mut m, "k".to_owned(), 1);
        MappingInject::insert(&mut m, "k".to_owned(), 2);
        assert_eq!(m.get("k"), Some(&2));
    }
}
