//! On-disk record layout.
//!
//! A record occupies a 64 byte slot: little-endian `i32` latitude, `i32`
//! longitude, a `u8` rating and a 55 byte name. Eight slots make one block.

use std::borrow::Cow;
use std::fmt;

use crate::errors::{FinderError, FinderResult};
use crate::rating::display_rating;

/// Size of one record slot in bytes
pub const RECORD_SIZE: usize = 64;

/// Number of records transferred per block read
pub const RECORDS_PER_BLOCK: usize = 8;

/// Size of one storage block in bytes
pub const BLOCK_SIZE: usize = RECORD_SIZE * RECORDS_PER_BLOCK;

/// Usable bytes of the name field
pub const NAME_LEN: usize = 55;

/// lat + lon + rating
const HEADER_LEN: usize = 9;

/// Block identifier on the underlying device
pub type BlockId = u64;

/// One raw storage block
pub type Block = [u8; BLOCK_SIZE];

/// A point of interest as stored on the block device.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Latitude in fixed-point (degrees * 100000)
    pub lat: i32,
    /// Longitude in fixed-point (degrees * 100000)
    pub lon: i32,
    /// Raw rating on the 0–10 scale
    pub rating: u8,
    name: [u8; NAME_LEN],
}

impl Record {
    /// Creates a record, truncating `name` to the 55 bytes the slot can hold.
    pub fn new(lat: i32, lon: i32, rating: u8, name: &str) -> Self {
        let mut end = name.len().min(NAME_LEN);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        let mut buf = [0u8; NAME_LEN];
        buf[..end].copy_from_slice(&name.as_bytes()[..end]);
        Record {
            lat,
            lon,
            rating,
            name: buf,
        }
    }

    /// The name bytes up to the first NUL, or the full field if unterminated.
    pub fn name_bytes(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_LEN);
        &self.name[..len]
    }

    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_bytes())
    }

    /// Rating on the 1–5 display scale.
    pub fn display_rating(&self) -> u8 {
        display_rating(self.rating)
    }

    /// Decodes a record from a 64 byte slot.
    pub fn decode(slot: &[u8]) -> FinderResult<Self> {
        if slot.len() < RECORD_SIZE {
            return Err(FinderError::Serialization(format!(
                "Record slot too small: {} bytes (need {})",
                slot.len(),
                RECORD_SIZE
            )));
        }

        let ((lat, lon, rating), _): ((i32, i32, u8), usize) =
            bincode::serde::decode_from_slice(&slot[..HEADER_LEN], bincode::config::legacy())?;

        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&slot[HEADER_LEN..HEADER_LEN + NAME_LEN]);

        Ok(Record {
            lat,
            lon,
            rating,
            name,
        })
    }

    /// Encodes this record into a 64 byte slot.
    pub fn encode(&self, slot: &mut [u8]) -> FinderResult<()> {
        if slot.len() < RECORD_SIZE {
            return Err(FinderError::Serialization(format!(
                "Record slot too small: {} bytes (need {})",
                slot.len(),
                RECORD_SIZE
            )));
        }

        bincode::serde::encode_into_slice(
            (self.lat, self.lon, self.rating),
            &mut slot[..HEADER_LEN],
            bincode::config::legacy(),
        )?;
        slot[HEADER_LEN..HEADER_LEN + NAME_LEN].copy_from_slice(&self.name);
        Ok(())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("lat", &self.lat)
            .field("lon", &self.lon)
            .field("rating", &self.rating)
            .field("name", &self.name())
            .finish()
    }
}

/// Returns the slot bytes of `slot` within `block`.
pub(crate) fn slot_bytes(block: &Block, slot: usize) -> &[u8] {
    let start = slot * RECORD_SIZE;
    &block[start..start + RECORD_SIZE]
}

/// Lays out `records` into consecutive blocks, zero-padding the last one.
pub fn encode_blocks(records: &[Record]) -> FinderResult<Vec<u8>> {
    let blocks = records.len().div_ceil(RECORDS_PER_BLOCK);
    let mut bytes = vec![0u8; blocks * BLOCK_SIZE];
    for (record, slot) in records.iter().zip(bytes.chunks_exact_mut(RECORD_SIZE)) {
        record.encode(slot)?;
    }
    Ok(bytes)
}
