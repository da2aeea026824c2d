use crate::error::Error;
use crate::map::ShardedMap;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe string-keyed store.
///
/// Code written against this trait can swap [`ShardedMap`] for
/// [`SingleLockMap`] (or any other backing) without changes.
pub trait KeyValueStore<V>: Send + Sync {
    /// Insert or overwrite `key`, returning the previous value if any.
    fn put(&self, key: String, value: V) -> Option<Arc<V>>;

    /// Look up `key`. `None` means absent.
    fn get(&self, key: &str) -> Option<Arc<V>>;

    /// Whether `key` is present.
    fn exists(&self, key: &str) -> bool;

    /// Delete `key`, failing with [`Error::KeyNotFound`] if it is absent.
    fn remove(&self, key: &str) -> Result<(), Error>;

    /// Number of entries.
    fn count(&self) -> usize;
}

impl<V> KeyValueStore<V> for ShardedMap<V>
where
    V: Send + Sync,
{
    fn put(&self, key: String, value: V) -> Option<Arc<V>> {
        ShardedMap::put(self, key, value)
    }

    fn get(&self, key: &str) -> Option<Arc<V>> {
        ShardedMap::get(self, key)
    }

    fn exists(&self, key: &str) -> bool {
        ShardedMap::exists(self, key)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        ShardedMap::remove(self, key)
    }

    fn count(&self) -> usize {
        ShardedMap::count(self)
    }
}

/// A map behind one global read-write lock.
///
/// Every operation contends on the same lock. Useful as a reference
/// implementation in tests and as a baseline in benchmarks.
pub struct SingleLockMap<V> {
    map: RwLock<HashMap<String, Arc<V>>>,
}

impl<V> SingleLockMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for SingleLockMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> KeyValueStore<V> for SingleLockMap<V>
where
    V: Send + Sync,
{
    fn put(&self, key: String, value: V) -> Option<Arc<V>> {
        self.map.write().insert(key, Arc::new(value))
    }

    fn get(&self, key: &str) -> Option<Arc<V>> {
        self.map.read().get(key).cloned()
    }

    fn exists(&self, key: &str) -> bool {
        self.map.read().contains_key(key)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.map
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or(Error::KeyNotFound)
    }

    fn count(&self) -> usize {
        self.map.read().len()
    }
}
