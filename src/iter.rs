use crate::shard::Shard;
use std::sync::Arc;

/// Snapshot-based iterator over the entries of a map.
///
/// Entries are copied out shard by shard, each under that shard's read lock,
/// before iteration starts. Later modifications are not observed. Because the
/// shards are not locked together the result is not a single global instant.
pub struct SnapshotIter<V> {
    entries: std::vec::IntoIter<(String, Arc<V>)>,
}

impl<V> SnapshotIter<V>
where
    V: Send + Sync,
{
    pub(crate) fn new(shards: &[Shard<V>]) -> Self {
        let entries: Vec<_> = shards.iter().flat_map(|shard| shard.entries()).collect();
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<V> Iterator for SnapshotIter<V> {
    type Item = (String, Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<V> ExactSizeIterator for SnapshotIter<V> {}
