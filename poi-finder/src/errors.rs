//! Error and result types shared by every component of the finder.

use std::io;
use thiserror::Error;

use crate::store::BlockId;

/// Errors that can occur while reading records or configuring the engine.
///
/// Under the default [`RetryPolicy::Unbounded`](crate::store::RetryPolicy)
/// storage failures never reach the caller; [`FinderError::StorageUnavailable`]
/// is produced only by the bounded policy.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Block {block_id} unavailable after {attempts} failed read attempts")]
    StorageUnavailable { block_id: BlockId, attempts: u32 },

    #[error("Record index {index} out of range (store holds {count} records)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<bincode::error::DecodeError> for FinderError {
    fn from(err: bincode::error::DecodeError) -> Self {
        FinderError::Serialization(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for FinderError {
    fn from(err: bincode::error::EncodeError) -> Self {
        FinderError::Serialization(err.to_string())
    }
}

/// Result type for finder operations
pub type FinderResult<T> = Result<T, FinderError>;
