//! Block-cached, read-only record storage.
//!
//! Records are fixed-size slots grouped eight to a block. The store keeps the
//! most recently read block in a single-entry cache, so scanning records in
//! index order costs one device read per block.

pub mod block_cache;
pub mod block_device;
pub mod record;
pub mod record_store;

pub use block_cache::BlockCache;
pub use block_device::{BlockDevice, FileBlockDevice, MemoryBlockDevice};
pub use record::{
    encode_blocks, Block, BlockId, Record, BLOCK_SIZE, NAME_LEN, RECORDS_PER_BLOCK, RECORD_SIZE,
};
pub use record_store::{RecordStore, RetryPolicy, StoreStats};
