//! Record persistence over the key-value store
//!
//! Records are namespaced by kind so that distinct (kind, sub-key) pairs
//! can never collide. Head and directory records are serialized as JSON;
//! blocks go through the byte codec.

use crate::error::FsError;
use crate::record::{DirRecord, HeadRecord};
use kv_store::{codec, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key namespace shared by every record
pub const KEY_PREFIX: &str = "kvfs";

/// Sub-key of the singleton head record
pub const HEAD_SUB_KEY: &str = "head";

/// Record namespaces within the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Filesystem configuration (the head record)
    Config,
    /// Directory records, keyed by canonical path
    Dir,
    /// File content blocks, keyed by block identifier
    Block,
}

impl RecordKind {
    fn as_str(self) -> &'static str {
        match self {
            RecordKind::Config => "config",
            RecordKind::Dir => "dir",
            RecordKind::Block => "block",
        }
    }
}

/// Build the store key for a record
///
/// The kind sits between the fixed prefix and the sub-key, so keys of
/// different kinds are distinct whatever the sub-key contains.
pub fn record_key(kind: RecordKind, sub: &str) -> String {
    format!("{}${}:{}", KEY_PREFIX, kind.as_str(), sub)
}

/// Directory record persistence seam
///
/// The directory tree logic only needs these three operations, so tests
/// can drive it with any backend, not just a [`RecordStore`].
pub trait DirectoryStore {
    /// Load the directory record stored under a canonical path
    fn load_dir(&self, path: &str) -> Result<Option<DirRecord>, FsError>;

    /// Persist a directory record under its own path
    fn store_dir(&mut self, dir: &DirRecord) -> Result<(), FsError>;

    /// Remove the directory record stored under a canonical path
    fn remove_dir(&mut self, path: &str) -> Result<(), FsError>;
}

/// Typed record access over a raw key-value store
#[derive(Debug)]
pub struct RecordStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Wrap a key-value store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Unwrap back into the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FsError> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn put_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), FsError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)?;
        Ok(())
    }

    /// Read the head record, if the filesystem is initialized
    pub fn head(&self) -> Result<Option<HeadRecord>, FsError> {
        self.get_json(&record_key(RecordKind::Config, HEAD_SUB_KEY))
    }

    /// Persist the head record
    pub fn put_head(&mut self, head: &HeadRecord) -> Result<(), FsError> {
        self.put_json(&record_key(RecordKind::Config, HEAD_SUB_KEY), head)
    }

    /// Remove the head record
    pub fn remove_head(&mut self) -> Result<(), FsError> {
        self.store
            .remove(&record_key(RecordKind::Config, HEAD_SUB_KEY))?;
        Ok(())
    }

    /// Read a block's content, `None` if the block is not stored
    pub fn block(&self, id: u64) -> Result<Option<Vec<u8>>, FsError> {
        match self.store.get(&record_key(RecordKind::Block, &id.to_string()))? {
            Some(raw) => Ok(Some(codec::decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// Persist a block's content
    pub fn put_block(&mut self, id: u64, bytes: &[u8]) -> Result<(), FsError> {
        let raw = codec::encode(bytes);
        self.store
            .set(&record_key(RecordKind::Block, &id.to_string()), &raw)?;
        Ok(())
    }

    /// Remove a block's content
    pub fn remove_block(&mut self, id: u64) -> Result<(), FsError> {
        self.store
            .remove(&record_key(RecordKind::Block, &id.to_string()))?;
        Ok(())
    }
}

impl<S: KeyValueStore> DirectoryStore for RecordStore<S> {
    fn load_dir(&self, path: &str) -> Result<Option<DirRecord>, FsError> {
        self.get_json(&record_key(RecordKind::Dir, path))
    }

    fn store_dir(&mut self, dir: &DirRecord) -> Result<(), FsError> {
        self.put_json(&record_key(RecordKind::Dir, &dir.path), dir)
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), FsError> {
        self.store.remove(&record_key(RecordKind::Dir, path))?;
        Ok(())
    }
}
