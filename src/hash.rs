use std::hash::Hasher;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1 over raw bytes (multiply, then xor).
#[inline]
pub fn fnv1_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV32_OFFSET_BASIS;
    for &byte in bytes {
        hash = hash.wrapping_mul(FNV32_PRIME);
        hash ^= u32::from(byte);
    }
    hash
}

/// Hash function implementation for shard assignment.
/// Uses an enum to keep routing free of trait objects on the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShardHasher {
    /// 32-bit FNV-1 (default).
    #[default]
    Fnv1,
    /// AHash with fixed keys, so hashes agree across map instances.
    AHash,
    /// FxHash implementation (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
}

impl ShardHasher {
    /// Hash a key's UTF-8 bytes to determine which shard it belongs to.
    pub fn hash_key(&self, key: &str) -> u64 {
        match self {
            ShardHasher::Fnv1 => u64::from(fnv1_32(key.as_bytes())),
            ShardHasher::AHash => {
                let mut hasher = ahash::AHasher::default();
                hasher.write(key.as_bytes());
                hasher.finish()
            }
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash => {
                let mut hasher = fxhash::FxHasher::default();
                hasher.write(key.as_bytes());
                hasher.finish()
            }
        }
    }
}
