use crate::stats::ShardStats;
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Outcome of a removal performed inside a single critical section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Removal<V> {
    /// The key was present and has been deleted.
    Deleted(Arc<V>),
    /// The key was absent; nothing changed.
    NotFound,
}

/// A single shard containing a HashMap protected by a read-write lock.
///
/// The map is only touched through the lock, in write mode for mutations and
/// read mode for lookups.
pub(crate) struct Shard<V> {
    map: RwLock<HashMap<String, Arc<V>>>,
    stats: ShardStats,
}

impl<V> Shard<V>
where
    V: Send + Sync,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RwLock::new(HashMap::with_capacity(capacity)),
            stats: ShardStats::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<V>>> {
        self.stats.record_lock_acquisition();
        #[cfg(feature = "lock-timing")]
        let started = std::time::Instant::now();
        let guard = self.map.read();
        #[cfg(feature = "lock-timing")]
        self.stats
            .record_lock_wait(u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX));
        guard
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<V>>> {
        self.stats.record_lock_acquisition();
        #[cfg(feature = "lock-timing")]
        let started = std::time::Instant::now();
        let guard = self.map.write();
        #[cfg(feature = "lock-timing")]
        self.stats
            .record_lock_wait(u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX));
        guard
    }

    /// Insert or overwrite a key, returning the previous value if any.
    pub fn put(&self, key: String, value: V) -> Option<Arc<V>> {
        let mut map = self.write();
        let previous = map.insert(key, Arc::new(value));
        self.stats.record_write();
        previous
    }

    /// Get a value by key, returning an Arc to enable zero-copy access.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let map = self.read();
        let result = map.get(key).cloned();
        if result.is_some() {
            self.stats.record_read();
        }
        result
    }

    /// Check if a key exists without cloning the value.
    pub fn exists(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Delete a key if present. A missing key is not an error at this level.
    pub fn remove(&self, key: &str) -> Removal<V> {
        let mut map = self.write();
        match map.remove(key) {
            Some(value) => {
                self.stats.record_remove();
                Removal::Deleted(value)
            }
            None => Removal::NotFound,
        }
    }

    /// Get the number of entries in this shard.
    pub fn size(&self) -> usize {
        self.read().len()
    }

    /// Check if this shard is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Get a snapshot of statistics for this shard.
    pub fn stats(&self) -> crate::stats::ShardOps {
        self.stats.snapshot()
    }

    /// Copy out every entry under a single read lock.
    pub fn entries(&self) -> Vec<(String, Arc<V>)> {
        let map = self.read();
        map.iter()
            .map(|(key, value)| (key.clone(), Arc::clone(value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_overwrites_without_growing() {
        let shard = Shard::new();
        assert!(shard.put("k".to_string(), 1).is_none());
        assert_eq!(*shard.put("k".to_string(), 2).unwrap(), 1);
        assert_eq!(shard.size(), 1);
        assert_eq!(*shard.get("k").unwrap(), 2);
    }

    #[test]
    fn test_remove_reports_absence() {
        let shard: Shard<i32> = Shard::new();
        assert_eq!(shard.remove("missing"), Removal::NotFound);

        shard.put("k".to_string(), 7);
        assert_eq!(shard.remove("k"), Removal::Deleted(Arc::new(7)));
        assert!(!shard.exists("k"));
        assert!(shard.is_empty());
    }

    #[test]
    fn test_entries() {
        let shard = Shard::with_capacity(4);
        shard.put("a".to_string(), 1);
        shard.put("b".to_string(), 2);

        let mut entries = shard.entries();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a");
        assert_eq!(*entries[1].1, 2);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_stats_recorded() {
        let shard = Shard::new();
        shard.put("k".to_string(), 1);
        shard.get("k");
        shard.get("missing");
        shard.remove("k");

        let ops = shard.stats();
        assert_eq!(ops.writes, 1);
        assert_eq!(ops.reads, 1);
        assert_eq!(ops.removes, 1);
        assert_eq!(ops.lock_acquisitions, 4);
    }

    #[cfg(feature = "lock-timing")]
    #[test]
    fn test_lock_wait_recorded() {
        use std::time::Duration;

        let shard = Shard::new();
        shard.put("k".to_string(), 1);

        std::thread::scope(|s| {
            let guard = shard.map.write();
            let reader = s.spawn(|| shard.get("k").map(|v| *v));
            std::thread::sleep(Duration::from_millis(50));
            drop(guard);
            assert_eq!(reader.join().unwrap(), Some(1));
        });

        // The reader blocked behind the writer for most of the sleep.
        assert!(shard.stats().lock_wait_nanos > 0);
    }
}
