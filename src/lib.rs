//! # shardkv
//!
//! A concurrent string-keyed map sharded across independently locked segments.
//!
//! The map splits its keys across a fixed number of shards, each with its own
//! read-write lock. A key is routed to its shard by hashing its bytes (32-bit
//! FNV-1 by default) and taking the hash modulo the shard count, so operations
//! on different shards never block each other. Values are stored behind
//! `Arc<V>` so you can share them without copying.
//!
//! ## Features
//!
//! - **Sharded Locking**: One read-write lock per shard, never more than one held at a time
//! - **Deterministic Routing**: Same key always maps to the same shard
//! - **Strict Remove**: Presence check and deletion share one critical section
//! - **Zero-Copy Reads**: Values stored as `Arc<V>` for efficient sharing
//! - **Configurable**: Choose shard count, hash function and router
//! - **Statistics**: Per-shard load and operation tracking
//!
//! ## Consistency
//!
//! [`ShardedMap::count`] and the other whole-map views visit the shards one at
//! a time. They are exact on a quiescent map but are not a linearizable
//! snapshot while writers are active. There are no multi-key transactions.
//!
//! ## Example
//!
//! ```rust
//! use shardkv::{Error, ShardedMap};
//!
//! let map = ShardedMap::create(10)?;
//!
//! map.put("test", 123);
//! assert!(map.exists("test"));
//! assert_eq!(*map.get("test").unwrap(), 123);
//!
//! map.remove("test")?;
//! assert_eq!(map.remove("test"), Err(Error::KeyNotFound));
//! assert_eq!(map.count(), 0);
//! # Ok::<(), shardkv::Error>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use shardkv::{ShardMapBuilder, HashFunction};
//!
//! let map = ShardMapBuilder::new()
//!     .shard_count(32)?
//!     .hash_function(HashFunction::AHash)
//!     .capacity_per_shard(64)
//!     .build::<i32>()?;
//! # Ok::<(), shardkv::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
/// Hash function implementations.
pub mod hash;
/// Iterator implementations.
pub mod iter;
/// Main ShardedMap implementation.
pub mod map;
/// Internal shard implementation.
pub(crate) mod shard;
/// Statistics and metrics collection.
pub mod stats;
/// The map contract and a single-lock backing.
pub mod store;

// Re-export main types
pub use config::{Config, HashFunction, RoutingConfig, ShardMapBuilder, ShardRouter};
pub use error::Error;
pub use map::ShardedMap;
pub use stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
pub use store::{KeyValueStore, SingleLockMap};
