use crate::errors::MapError;
use super::FxBuildHasher;

use std::{
    borrow::Borrow,
    fmt::{self, Debug},
    hash::{BuildHasher, Hash},
    iter::Flatten,
    slice,
};
use tracing::debug;


/// Capacity used by `HashtableMap::new`
pub const DEFAULT_CAPACITY: usize = 64;

/// The table doubles once len / capacity reaches this ratio
pub const MAX_LOAD_FACTOR: f64 = 0.8;


/// Key/value pair stored in a bucket chain
#[derive(Clone)]
struct Pair<K, V> {
    key: K,
    value: V,
}


/// Hash map with separate chaining
/// K: key, V: value, S: hasher (FxHasher unless specified)
///
/// Each slot of the table owns an unordered chain of pairs, searched linearly.
/// Putting an existing key overwrites its value, so a key is stored at most once.
/// Capacity only grows: when the load factor reaches `MAX_LOAD_FACTOR` the table
/// is rebuilt at twice the size and every key is re-hashed in one pass.
#[derive(Clone)]
pub struct HashtableMap<K, V, S = FxBuildHasher> {
    table: Vec<Vec<Pair<K, V>>>,
    len: usize,
    hash_builder: S,
}


impl<K, V> HashtableMap<K, V, FxBuildHasher> {

    /// Empty map with `DEFAULT_CAPACITY` buckets
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, FxBuildHasher::default())
    }

    /// Empty map with `capacity` buckets, capacity must be non-zero
    pub fn with_capacity(capacity: usize) -> Result<Self, MapError> {
        Self::with_capacity_and_hasher(capacity, FxBuildHasher::default())
    }
}

impl<K, V, S> HashtableMap<K, V, S> {

    /// Empty map with `capacity` buckets using the given hasher
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::InvalidArgument("capacity must be greater than zero".to_string()));
        }
        Ok(Self::from_parts(capacity, hash_builder))
    }

    fn from_parts(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: empty_table(capacity),
            len: 0,
            hash_builder,
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Drop every entry, the bucket count is kept
    pub fn clear(&mut self) {
        for bucket in self.table.iter_mut() {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Iterate over entries in bucket order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            pairs: self.table.iter().flatten(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K, V, S> HashtableMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{

    /// Insert a key/value pair
    /// Returns the previous value when the key was already present
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let bucket = &mut self.table[index];

        // overwrite in place - never store the same key twice
        if let Some(pair) = bucket.iter_mut().find(|pair| pair.key == key) {
            return Some(std::mem::replace(&mut pair.value, value));
        }

        bucket.push(Pair { key, value });
        self.len += 1;

        if self.load_factor() >= MAX_LOAD_FACTOR {
            self.resize();
        }
        None
    }

    /// Value stored under `key`
    pub fn get<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table[self.bucket_index(key)]
            .iter()
            .find(|pair| pair.key.borrow() == key)
            .map(|pair| &pair.value)
            .ok_or(MapError::NotFound)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.table[index]
            .iter_mut()
            .find(|pair| pair.key.borrow() == key)
            .map(|pair| &mut pair.value)
            .ok_or(MapError::NotFound)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_ok()
    }

    /// Remove the entry stored under `key` and return its value
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let bucket = &mut self.table[index];
        let position = bucket
            .iter()
            .position(|pair| pair.key.borrow() == key)
            .ok_or(MapError::NotFound)?;

        // chains are unordered, so the last pair can fill the gap
        let pair = bucket.swap_remove(position);
        self.len -= 1;
        Ok(pair.value)
    }

    fn bucket_index<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        bucket_for(&self.hash_builder, key, self.capacity())
    }

    /// Double the bucket count and re-hash every pair against the new capacity
    fn resize(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2;
        let mut new_table = empty_table(new_capacity);

        for pair in std::mem::take(&mut self.table).into_iter().flatten() {
            let index = bucket_for(&self.hash_builder, &pair.key, new_capacity);
            new_table[index].push(pair);
        }

        self.table = new_table;
        debug!(len = self.len, old_capacity, new_capacity, "hashtable resized");
    }
}


fn empty_table<K, V>(capacity: usize) -> Vec<Vec<Pair<K, V>>> {
    (0..capacity).map(|_| Vec::new()).collect()
}

fn bucket_for<S: BuildHasher, Q: Hash + ?Sized>(hash_builder: &S, key: &Q, capacity: usize) -> usize {
    (hash_builder.hash_one(key) % capacity as u64) as usize
}


impl<K, V> Default for HashtableMap<K, V, FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, V: Debug, S> Debug for HashtableMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for HashtableMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for HashtableMap<K, V, FxBuildHasher> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashtableMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


/// Borrowing iterator over a `HashtableMap`
pub struct Iter<'a, K, V> {
    pairs: Flatten<slice::Iter<'a, Vec<Pair<K, V>>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.pairs.next()?;
        self.remaining -= 1;
        Some((&pair.key, &pair.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}


#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{BuildHasherDefault, Hasher};

    // Sends every key to the same bucket so chains get exercised
    #[derive(Default)]
    struct CollidingHasher;

    impl Hasher for CollidingHasher {
        fn finish(&self) -> u64 {
            7
        }
        fn write(&mut self, _bytes: &[u8]) {}
    }

    type CollidingMap<K, V> = HashtableMap<K, V, BuildHasherDefault<CollidingHasher>>;

    #[test]
    fn test_put_and_get() {
        let mut map = HashtableMap::new();
        map.put("one".to_string(), 1);
        map.put("two".to_string(), 2);

        assert_eq!(map.get("one"), Ok(&1));
        assert_eq!(map.get("two"), Ok(&2));
        assert_eq!(map.get("three"), Err(MapError::NotFound));
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let mut map = HashtableMap::new();
        assert_eq!(map.put("one", 1), None);
        assert_eq!(map.put("one", 11), Some(1));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("one"), Ok(&11));
    }

    #[test]
    fn test_contains_key() {
        let mut map = HashtableMap::new();
        map.put("one", 1);
        map.put("two", 2);

        assert!(map.contains_key("one"));
        assert!(!map.contains_key("three"));
    }

    #[test]
    fn test_remove() {
        let mut map = HashtableMap::new();
        map.put("one", 1);
        map.put("two", 2);

        assert_eq!(map.remove("one"), Ok(1));
        assert!(!map.contains_key("one"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove("one"), Err(MapError::NotFound));
    }

    #[test]
    fn test_get_mut() {
        let mut map = HashtableMap::new();
        map.put(3u32, vec![1]);
        map.get_mut(&3).unwrap().push(2);

        assert_eq!(map.get(&3).unwrap(), &vec![1, 2]);
        assert!(map.get_mut(&4).is_err());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut map = HashtableMap::with_capacity(4).unwrap();
        for i in 0..10 {
            map.put(i, i);
        }
        let capacity = map.capacity();

        map.clear();

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert!(!map.contains_key(&3));
    }

    #[test]
    fn test_capacity() {
        let map: HashtableMap<String, i32> = HashtableMap::with_capacity(10).unwrap();
        assert_eq!(map.capacity(), 10);

        let map: HashtableMap<String, i32> = HashtableMap::new();
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let result: Result<HashtableMap<u8, u8>, _> = HashtableMap::with_capacity(0);
        assert!(matches!(result, Err(MapError::InvalidArgument(_))));
    }

    #[test]
    fn test_resize_doubles_capacity() {
        let mut map = HashtableMap::with_capacity(5).unwrap();
        for i in 0..3 {
            map.put(i, i);
        }
        assert_eq!(map.capacity(), 5);

        // 4 / 5 hits the threshold
        map.put(3, 3);
        assert_eq!(map.capacity(), 10);

        for i in 0..4 {
            assert_eq!(map.get(&i), Ok(&i));
        }
    }

    #[test]
    fn test_load_factor_stays_below_threshold() {
        let mut map = HashtableMap::with_capacity(2).unwrap();
        for i in 0..1000 {
            map.put(i, i * 2);
            assert!(map.load_factor() < MAX_LOAD_FACTOR, "load factor {} after {} puts", map.load_factor(), i + 1);
        }
        assert_eq!(map.len(), 1000);
        assert_eq!(map.get(&999), Ok(&1998));
    }

    #[test]
    fn test_colliding_keys_share_a_chain() {
        let mut map: CollidingMap<&str, i32> = HashtableMap::with_capacity_and_hasher(8, Default::default()).unwrap();
        map.put("a", 1);
        map.put("b", 2);
        map.put("c", 3);
        map.put("b", 20);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("b"), Ok(&20));
        assert_eq!(map.remove("a"), Ok(1));
        assert_eq!(map.get("c"), Ok(&3));
        assert_eq!(map.get("a"), Err(MapError::NotFound));
    }

    #[test]
    fn test_iter_visits_every_entry() {
        let map: HashtableMap<u32, u32> = (0..50).map(|i| (i, i + 100)).collect();

        assert_eq!(map.iter().len(), 50);
        let mut keys: Vec<u32> = map.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, (0..50).collect::<Vec<_>>());
        assert_eq!(map.values().sum::<u32>(), (100..150).sum());
    }
}
