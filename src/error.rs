/// Errors that can occur when operating on a ShardedMap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested key was not found in the map.
    #[error("key not found")]
    KeyNotFound,
    /// The shard count is invalid (must be greater than 0).
    #[error("shard count must be greater than 0")]
    InvalidShardCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            Error::InvalidShardCount.to_string(),
            "shard count must be greater than 0"
        );
    }
}
