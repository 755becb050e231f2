//! Single-entry block cache.
//!
//! Holds at most one block. A lookup hits only when the cached block id
//! matches; any other block replaces the entry wholesale.

use super::record::{Block, BlockId};

struct CachedBlock {
    id: BlockId,
    data: Block,
}

/// Most-recently-read block, if any
#[derive(Default)]
pub struct BlockCache {
    entry: Option<CachedBlock>,
}

impl BlockCache {
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the cached block if its id is `block_id`.
    pub fn get(&self, block_id: BlockId) -> Option<&Block> {
        self.entry
            .as_ref()
            .filter(|cached| cached.id == block_id)
            .map(|cached| &cached.data)
    }

    /// Replaces whatever is cached with `data`.
    pub fn replace(&mut self, block_id: BlockId, data: Block) {
        match self.entry.as_mut() {
            Some(cached) => {
                cached.id = block_id;
                cached.data = data;
            }
            None => self.entry = Some(CachedBlock { id: block_id, data }),
        }
    }

    pub fn cached_id(&self) -> Option<BlockId> {
        self.entry.as_ref().map(|cached| cached.id)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::BLOCK_SIZE;

    #[test]
    fn test_block_cache_new_is_empty() {
        let cache = BlockCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.cached_id(), None);
        assert!(cache.get(0).is_none());
    }

    #[test]
    fn test_block_cache_hit_only_on_matching_id() {
        let mut cache = BlockCache::new();
        cache.replace(7, [1u8; BLOCK_SIZE]);

        assert!(cache.get(7).is_some());
        assert!(cache.get(8).is_none());
        assert_eq!(cache.cached_id(), Some(7));
    }

    #[test]
    fn test_block_cache_replace_evicts_previous() {
        let mut cache = BlockCache::new();
        cache.replace(7, [1u8; BLOCK_SIZE]);
        cache.replace(9, [2u8; BLOCK_SIZE]);

        assert!(cache.get(7).is_none());
        assert_eq!(cache.get(9).unwrap()[0], 2);
    }

    #[test]
    fn test_block_cache_clear() {
        let mut cache = BlockCache::new();
        cache.replace(1, [0u8; BLOCK_SIZE]);
        cache.clear();
        assert!(cache.is_empty());
    }
}
