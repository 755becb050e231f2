//! Block-cached record reader.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::block_cache::BlockCache;
use super::block_device::BlockDevice;
use super::record::{slot_bytes, Block, BlockId, Record, BLOCK_SIZE, RECORDS_PER_BLOCK};
use crate::errors::{FinderError, FinderResult};

/// What to do when a block read fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RetryPolicy {
    /// Retry immediately, forever. A persistently failing device hangs the
    /// caller.
    #[default]
    Unbounded,
    /// Give up after `attempts` failed reads, sleeping `backoff` between them.
    Bounded { attempts: u32, backoff: Duration },
}

/// Statistics about record store operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub block_reads: u64,
    pub failed_reads: u64,
}

/// Read-only access to `record_count` records laid out from `base_block`.
pub struct RecordStore<D> {
    device: D,
    cache: BlockCache,
    base_block: BlockId,
    record_count: usize,
    retry: RetryPolicy,
    stats: StoreStats,
}

impl<D: BlockDevice> RecordStore<D> {
    pub fn new(device: D, base_block: BlockId, record_count: usize) -> Self {
        Self::with_retry_policy(device, base_block, record_count, RetryPolicy::Unbounded)
    }

    pub fn with_retry_policy(
        device: D,
        base_block: BlockId,
        record_count: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            device,
            cache: BlockCache::new(),
            base_block,
            record_count,
            retry,
            stats: StoreStats::default(),
        }
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Block holding record `index`.
    pub fn block_id_of(&self, index: usize) -> BlockId {
        self.base_block + (index / RECORDS_PER_BLOCK) as BlockId
    }

    /// Reads record `index`, going to the device only when its block is not
    /// the cached one.
    pub fn read_record(&mut self, index: usize) -> FinderResult<Record> {
        if index >= self.record_count {
            return Err(FinderError::IndexOutOfRange {
                index,
                count: self.record_count,
            });
        }

        let block_id = self.block_id_of(index);
        let slot = index % RECORDS_PER_BLOCK;

        if let Some(block) = self.cache.get(block_id) {
            self.stats.cache_hits += 1;
            return Record::decode(slot_bytes(block, slot));
        }

        self.stats.cache_misses += 1;
        let mut block = [0u8; BLOCK_SIZE];
        self.fetch_block(block_id, &mut block)?;
        let record = Record::decode(slot_bytes(&block, slot))?;
        self.cache.replace(block_id, block);
        Ok(record)
    }

    fn fetch_block(&mut self, block_id: BlockId, buf: &mut Block) -> FinderResult<()> {
        let mut failures: u32 = 0;
        loop {
            match self.device.read_block(block_id, buf) {
                Ok(()) => {
                    self.stats.block_reads += 1;
                    log::debug!("Read block {}", block_id);
                    return Ok(());
                }
                Err(err) => {
                    failures = failures.saturating_add(1);
                    self.stats.failed_reads += 1;
                    log::warn!("Read block {} failed, trying again: {}", block_id, err);

                    if let RetryPolicy::Bounded { attempts, backoff } = self.retry {
                        if failures >= attempts {
                            log::error!(
                                "Giving up on block {} after {} attempts",
                                block_id,
                                failures
                            );
                            return Err(FinderError::StorageUnavailable {
                                block_id,
                                attempts: failures,
                            });
                        }
                        if !backoff.is_zero() {
                            std::thread::sleep(backoff);
                        }
                    }
                }
            }
        }
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn cached_block(&self) -> Option<BlockId> {
        self.cache.cached_id()
    }

    /// Drops the cached block so the next read goes to the device.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlockDevice;

    const BASE: BlockId = 4_000_000;

    fn store_with(count: usize) -> RecordStore<MemoryBlockDevice> {
        let records: Vec<Record> = (0..count)
            .map(|i| Record::new(i as i32 * 10, i as i32 * 20, (i % 11) as u8, &format!("r{}", i)))
            .collect();
        let device = MemoryBlockDevice::from_records(BASE, &records).unwrap();
        RecordStore::new(device, BASE, count)
    }

    #[test]
    fn test_block_id_of() {
        let store = store_with(20);
        assert_eq!(store.block_id_of(0), BASE);
        assert_eq!(store.block_id_of(7), BASE);
        assert_eq!(store.block_id_of(8), BASE + 1);
        assert_eq!(store.block_id_of(19), BASE + 2);
    }

    #[test]
    fn test_same_block_reads_once() {
        let mut store = store_with(20);
        let a = store.read_record(2).unwrap();
        let b = store.read_record(5).unwrap();

        assert_eq!(a.name(), "r2");
        assert_eq!(b.name(), "r5");
        assert_eq!(store.device().read_count(), 1);
        assert_eq!(
            store.stats(),
            StoreStats {
                cache_hits: 1,
                cache_misses: 1,
                block_reads: 1,
                failed_reads: 0,
            }
        );
    }

    #[test]
    fn test_other_block_evicts_cached_block() {
        let mut store = store_with(20);
        store.read_record(1).unwrap();
        assert_eq!(store.cached_block(), Some(BASE));

        store.read_record(9).unwrap();
        assert_eq!(store.cached_block(), Some(BASE + 1));
        assert_eq!(store.device().read_count(), 2);

        // going back re-reads block BASE
        store.read_record(0).unwrap();
        assert_eq!(store.device().read_count(), 3);
        assert_eq!(store.stats().cache_hits, 0);
    }

    #[test]
    fn test_out_of_range_index_rejected_without_io() {
        let mut store = store_with(10);
        let result = store.read_record(10);
        assert!(matches!(
            result,
            Err(FinderError::IndexOutOfRange { index: 10, count: 10 })
        ));
        assert_eq!(store.device().read_count(), 0);
    }

    #[test]
    fn test_unbounded_retry_recovers_from_transient_failures() {
        let mut store = store_with(8);
        store.device_mut().fail_next(5);

        let record = store.read_record(3).unwrap();
        assert_eq!(record.name(), "r3");
        assert_eq!(store.stats().failed_reads, 5);
        assert_eq!(store.stats().block_reads, 1);
        assert_eq!(store.device().read_count(), 6);
    }

    #[test]
    fn test_bounded_retry_surfaces_failure() {
        let records = vec![Record::new(0, 0, 5, "only")];
        let mut device = MemoryBlockDevice::from_records(0, &records).unwrap();
        device.set_unavailable(true);
        let mut store = RecordStore::with_retry_policy(
            device,
            0,
            1,
            RetryPolicy::Bounded {
                attempts: 3,
                backoff: Duration::ZERO,
            },
        );

        let result = store.read_record(0);
        assert!(matches!(
            result,
            Err(FinderError::StorageUnavailable { block_id: 0, attempts: 3 })
        ));
        assert_eq!(store.device().read_count(), 3);
        assert!(store.cached_block().is_none());

        store.device_mut().set_unavailable(false);
        assert_eq!(store.read_record(0).unwrap().name(), "only");
    }

    #[test]
    fn test_invalidate_forces_reread() {
        let mut store = store_with(8);
        store.read_record(0).unwrap();
        store.invalidate();
        store.read_record(0).unwrap();
        assert_eq!(store.device().read_count(), 2);
    }
}
