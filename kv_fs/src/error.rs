//! Filesystem error types

use crate::handle::Handle;
use kv_store::{CodecError, StoreError};
use thiserror::Error;

/// Errors that can occur during filesystem operations
///
/// Every public operation validates at its boundary and reports one of
/// these before any record is persisted for that operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// Malformed call argument (empty path, numeric overflow, bad encoding)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The head record is absent; the filesystem was never initialized
    /// or has been reset
    #[error("filesystem is not initialized")]
    NotInitialized,

    /// No directory record at the given canonical path
    #[error("directory not found: {0}")]
    DirNotFound(String),

    /// No file entry at the given path
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// The handle is not currently open
    #[error("invalid handle: {0}")]
    InvalidHandle(Handle),

    /// The block value is absent from the store
    #[error("block not found: {0}")]
    BlockNotFound(u64),

    /// A child with that name already exists in the directory
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The operation is not valid for the target (mutating the root,
    /// treating a directory path as a file)
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A persisted record failed to decode
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The underlying key-value store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CodecError> for FsError {
    fn from(err: CodecError) -> Self {
        FsError::Corrupt(err.to_string())
    }
}

impl From<serde_json::Error> for FsError {
    fn from(err: serde_json::Error) -> Self {
        FsError::Corrupt(err.to_string())
    }
}
