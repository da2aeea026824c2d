use crate::config::{create_hasher, Config, DefaultRouter, HashFunction, RoutingConfig, ShardRouter};
use crate::error::Error;
use crate::hash::ShardHasher;
use crate::shard::{Removal, Shard};
use crate::stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Concurrent string-keyed map sharded across independently locked segments.
///
/// Every key is routed to exactly one shard by hashing its bytes and taking
/// the hash modulo the shard count. Each shard has its own read-write lock,
/// so operations on different shards never block each other. No operation
/// holds more than one shard lock at a time. Values are wrapped in `Arc<V>`
/// so lookups can share them without copying.
///
/// The shard vector is fixed at construction and never resized, so reading
/// it needs no synchronization of its own.
///
/// # Example
///
/// ```rust
/// use shardkv::ShardedMap;
///
/// let map = ShardedMap::create(10)?;
/// map.put("t1", "t1");
/// map.put("t2", "t2");
/// assert_eq!(map.count(), 2);
///
/// if let Some(value) = map.get("t1") {
///     println!("Found: {}", *value);
/// }
/// # Ok::<(), shardkv::Error>(())
/// ```
pub struct ShardedMap<V> {
    shards: Box<[Shard<V>]>,
    hash: ShardHasher,
    routing: RoutingConfig,
}

impl<V> ShardedMap<V>
where
    V: Send + Sync,
{
    /// Create a new map with defaults (16 shards, FNV-1).
    pub fn new() -> Self {
        Self::from_valid_config(Config::default())
    }

    /// Create a map with `shard_count` empty shards.
    ///
    /// Returns [`Error::InvalidShardCount`] when `shard_count` is zero.
    pub fn create(shard_count: usize) -> Result<Self, Error> {
        Self::with_config(Config {
            shard_count,
            ..Config::default()
        })
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        if config.shard_count == 0 {
            warn!(
                shard_count = config.shard_count,
                "rejected sharded map construction"
            );
            return Err(Error::InvalidShardCount);
        }
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: Config) -> Self {
        let shards: Box<[Shard<V>]> = (0..config.shard_count)
            .map(|_| match config.capacity_per_shard {
                Some(capacity) => Shard::with_capacity(capacity),
                None => Shard::new(),
            })
            .collect();

        debug!(
            shard_count = shards.len(),
            hash_function = ?config.hash_function,
            routing = config.routing.kind(),
            "created sharded map"
        );

        Self {
            shards,
            hash: create_hasher(config.hash_function),
            routing: config.routing,
        }
    }

    /// Number of shards, fixed for the lifetime of the map.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// The hash function used for routing.
    pub fn hash_function(&self) -> HashFunction {
        match self.hash {
            ShardHasher::Fnv1 => HashFunction::Fnv1,
            ShardHasher::AHash => HashFunction::AHash,
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash => HashFunction::FxHash,
        }
    }

    /// Figure out which shard this key belongs to.
    ///
    /// Pure in `(key, shard_count)`: the same key always lands on the same
    /// shard for as long as the map lives.
    #[inline]
    pub fn shard_index(&self, key: &str) -> usize {
        let hash = self.hash.hash_key(key);
        let count = self.shards.len();
        match &self.routing {
            RoutingConfig::Default => DefaultRouter.route(hash, count),
            RoutingConfig::Custom(router) => router.route(hash, count) % count,
        }
    }

    #[inline]
    fn shard(&self, key: &str) -> &Shard<V> {
        &self.shards[self.shard_index(key)]
    }

    /// Insert or overwrite a key. Returns the old value if the key existed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardkv::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// assert!(map.put("key", "value").is_none());
    /// assert_eq!(map.put("key", "new_value").unwrap().as_ref(), &"value");
    /// assert_eq!(map.count(), 1);
    /// ```
    pub fn put(&self, key: impl Into<String>, value: V) -> Option<Arc<V>> {
        let key = key.into();
        self.shard(&key).put(key, value)
    }

    /// Get a value by key. `None` means the key is absent, which is not an error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardkv::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// map.put("key", 123);
    /// assert_eq!(*map.get("key").unwrap(), 123);
    /// assert!(map.get("missing").is_none());
    /// ```
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.shard(key).get(key)
    }

    /// Check whether a key is present.
    pub fn exists(&self, key: &str) -> bool {
        self.shard(key).exists(key)
    }

    /// Remove a key, failing with [`Error::KeyNotFound`] if it is absent.
    ///
    /// The presence check and the deletion happen under one write lock on
    /// the key's shard. When several threads remove the same key at once,
    /// exactly one of them succeeds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardkv::{Error, ShardedMap};
    ///
    /// let map = ShardedMap::new();
    /// map.put("test", 123);
    /// assert!(map.remove("test").is_ok());
    /// assert_eq!(map.remove("test"), Err(Error::KeyNotFound));
    /// ```
    pub fn remove(&self, key: &str) -> Result<(), Error> {
        self.take(key).map(|_| ()).ok_or_else(|| {
            trace!(key = %key, "remove of absent key");
            Error::KeyNotFound
        })
    }

    /// Remove a key and hand back its value, if it existed.
    pub fn take(&self, key: &str) -> Option<Arc<V>> {
        match self.shard(key).remove(key) {
            Removal::Deleted(value) => Some(value),
            Removal::NotFound => None,
        }
    }

    /// Total number of entries across all shards.
    ///
    /// Visits the shards in index order, holding each read lock only while
    /// reading that shard's size. The result is not a linearizable snapshot:
    /// writes to shards already visited, or not yet visited, may or may not
    /// be reflected. In a quiescent map it is exact.
    pub fn count(&self) -> usize {
        self.shards.iter().map(|shard| shard.size()).sum()
    }

    /// Check if the map is empty. Same caveats as [`count`](Self::count).
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Number of entries in each shard, in shard index order.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.size()).collect()
    }

    /// Get detailed statistics about the map and its shards.
    pub fn stats(&self) -> Stats {
        let shard_sizes = self.shard_loads();
        let operations: Vec<ShardOps> = self.shards.iter().map(|s| s.stats()).collect();
        let size = shard_sizes.iter().sum();

        Stats {
            size,
            shard_sizes,
            operations,
        }
    }

    /// Structured per-shard load and operation report.
    pub fn diagnostics(&self) -> Diagnostics {
        let shards = self
            .shards
            .iter()
            .map(|s| ShardDiagnostics::new(s.size(), s.stats()))
            .collect();
        Diagnostics::from_shards(shards)
    }

    /// Snapshot iterator over all key-value pairs, in no particular order.
    ///
    /// Each shard is copied under its own read lock, one after another, so
    /// the result carries the same caveat as [`count`](Self::count).
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardkv::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// map.put("key1", "value1");
    /// map.put("key2", "value2");
    ///
    /// assert_eq!(map.iter_snapshot().count(), 2);
    /// ```
    pub fn iter_snapshot(&self) -> crate::iter::SnapshotIter<V> {
        crate::iter::SnapshotIter::new(&self.shards)
    }
}

impl<V> Default for ShardedMap<V>
where
    V: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for ShardedMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedMap")
            .field("shard_count", &self.shards.len())
            .field("hash", &self.hash)
            .field("routing", &self.routing)
            .finish()
    }
}
