//! Block device abstraction for record storage.
//!
//! Devices transfer exactly one 512 byte block per call. No read-ahead or
//! buffering happens here; caching is the record store's job.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::record::{encode_blocks, Block, BlockId, Record, BLOCK_SIZE};
use crate::errors::{FinderError, FinderResult};

/// Persistent storage addressed in fixed-size blocks.
pub trait BlockDevice {
    /// Reads block `block_id` into `buf`. A failure may be transient; the
    /// caller decides whether to retry.
    fn read_block(&mut self, block_id: BlockId, buf: &mut Block) -> FinderResult<()>;
}

impl<T: BlockDevice + ?Sized> BlockDevice for Box<T> {
    fn read_block(&mut self, block_id: BlockId, buf: &mut Block) -> FinderResult<()> {
        (**self).read_block(block_id, buf)
    }
}

/// Raw image file where block `id` lives at byte offset `id * 512`.
pub struct FileBlockDevice {
    file: File,
    path: PathBuf,
}

impl FileBlockDevice {
    /// Opens an existing image read-only.
    pub fn open(path: impl AsRef<Path>) -> FinderResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).open(path)?;
        log::debug!("Opened block image at {:?}", path);
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Writes `records` as consecutive blocks starting at `base_block`,
    /// creating the image if needed. Blocks before `base_block` are left
    /// sparse.
    pub fn write_image(
        path: impl AsRef<Path>,
        base_block: BlockId,
        records: &[Record],
    ) -> FinderResult<()> {
        let bytes = encode_blocks(records)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.as_ref())?;
        file.seek(SeekFrom::Start(base_block * BLOCK_SIZE as u64))?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlockDevice for FileBlockDevice {
    fn read_block(&mut self, block_id: BlockId, buf: &mut Block) -> FinderResult<()> {
        let offset = block_id.checked_mul(BLOCK_SIZE as u64).ok_or_else(|| {
            FinderError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Block {} is beyond the addressable range", block_id),
            ))
        })?;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;
        Ok(())
    }
}

/// In-memory block image.
///
/// Holds the blocks from `first_block` onward and can be told to fail a
/// number of upcoming reads, or every read, to exercise retry handling.
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    first_block: BlockId,
    blocks: Vec<Block>,
    reads: u64,
    pending_failures: u32,
    unavailable: bool,
}

impl MemoryBlockDevice {
    pub fn new(first_block: BlockId, blocks: Vec<Block>) -> Self {
        Self {
            first_block,
            blocks,
            reads: 0,
            pending_failures: 0,
            unavailable: false,
        }
    }

    /// Builds an image holding `records` starting at `first_block`.
    pub fn from_records(first_block: BlockId, records: &[Record]) -> FinderResult<Self> {
        let bytes = encode_blocks(records)?;
        let blocks = bytes
            .chunks_exact(BLOCK_SIZE)
            .map(|chunk| {
                let mut block = [0u8; BLOCK_SIZE];
                block.copy_from_slice(chunk);
                block
            })
            .collect();
        Ok(Self::new(first_block, blocks))
    }

    /// Makes the next `count` reads fail.
    pub fn fail_next(&mut self, count: u32) {
        self.pending_failures = count;
    }

    /// Makes every read fail until cleared.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of read attempts, failed ones included.
    pub fn read_count(&self) -> u64 {
        self.reads
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl BlockDevice for MemoryBlockDevice {
    fn read_block(&mut self, block_id: BlockId, buf: &mut Block) -> FinderResult<()> {
        self.reads += 1;

        if self.unavailable {
            return Err(FinderError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "Device unavailable",
            )));
        }
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            return Err(FinderError::Io(io::Error::new(
                io::ErrorKind::Interrupted,
                "Injected read failure",
            )));
        }

        let block = block_id
            .checked_sub(self.first_block)
            .and_then(|rel| self.blocks.get(rel as usize))
            .ok_or_else(|| {
                FinderError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("Block {} not present in image", block_id),
                ))
            })?;
        buf.copy_from_slice(block);
        Ok(())
    }
}
