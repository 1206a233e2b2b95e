use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexMap;

/// An insertion ordered map where every key owns a list of values.
/// Keys keep the order they were first added in, and values keep the order they were added to their key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueMap<K: Hash + Eq, V> {
    entries: IndexMap<K, Vec<V>>,
}

impl<K: Hash + Eq, V> Default for MultiValueMap<K, V> {
    fn default() -> Self {
        MultiValueMap { entries: IndexMap::new() }
    }
}

impl<K: Hash + Eq, V> MultiValueMap<K, V> {
    /// Creates a new empty map.
    pub fn new() -> MultiValueMap<K, V> {
        MultiValueMap::default()
    }

    /// Appends a value to the values of the given key.
    pub fn add(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// Replaces all values of the given key with a single value. An existing key keeps its position.
    pub fn set(&mut self, key: K, value: V) {
        self.entries.insert(key, vec![value]);
    }

    /// Gets all values of the given key. Returns an empty slice if the key is absent.
    pub fn get<Q>(&self, key: &Q) -> &[V]
        where K: Borrow<Q>,
              Q: Hash + Eq + ?Sized
    {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    /// Gets the first value added for the given key.
    pub fn get_first<Q>(&self, key: &Q) -> Option<&V>
        where K: Borrow<Q>,
              Q: Hash + Eq + ?Sized
    {
        self.get(key).first()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
        where K: Borrow<Q>,
              Q: Hash + Eq + ?Sized
    {
        self.entries.contains_key(key)
    }

    /// Removes the given key and returns its values. The remaining keys keep their order.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Vec<V>>
        where K: Borrow<Q>,
              Q: Hash + Eq + ?Sized
    {
        self.entries.shift_remove(key)
    }

    /// The keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item=&K> {
        self.entries.keys()
    }

    /// Every key with its values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item=(&K, &[V])> {
        self.entries.iter().map(|(k, values)| (k, values.as_slice()))
    }

    /// Every key value pair, flattened, in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item=(&K, &V)> {
        self.entries.iter().flat_map(|(k, values)| values.iter().map(move |v| (k, v)))
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for MultiValueMap<K, V> {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(MultiValueMap::new(), |mut map, (k, v)| {
            map.add(k, v);
            map
        })
    }
}
