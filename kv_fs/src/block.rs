//! Block allocation and whole-block I/O
//!
//! Block identifiers come from the head record's counter and are handed
//! out exactly once. Freeing removes the stored value but never returns
//! the identifier to the pool.

use crate::error::FsError;
use crate::store::RecordStore;
use kv_store::KeyValueStore;
use log::debug;

/// Block identifier allocation and content access
pub struct BlockAllocator;

impl BlockAllocator {
    /// Allocate a fresh block identifier
    ///
    /// Persists an empty block under the new identifier and the advanced
    /// head counter. Fails with [`FsError::NotInitialized`] when the head
    /// record is absent.
    pub fn allocate<S: KeyValueStore>(records: &mut RecordStore<S>) -> Result<u64, FsError> {
        let mut head = records.head()?.ok_or(FsError::NotInitialized)?;
        let id = head.take_block_id();
        records.put_block(id, &[])?;
        records.put_head(&head)?;
        debug!("allocated block {id}");
        Ok(id)
    }

    /// Free a block's storage
    ///
    /// Idempotent; freeing an identifier with no stored value is not an
    /// error at this layer.
    pub fn free<S: KeyValueStore>(records: &mut RecordStore<S>, id: u64) -> Result<(), FsError> {
        records.remove_block(id)?;
        debug!("freed block {id}");
        Ok(())
    }

    /// Read a block's whole content
    pub fn read<S: KeyValueStore>(records: &RecordStore<S>, id: u64) -> Result<Vec<u8>, FsError> {
        records.block(id)?.ok_or(FsError::BlockNotFound(id))
    }

    /// Replace a block's whole content
    pub fn write<S: KeyValueStore>(
        records: &mut RecordStore<S>,
        id: u64,
        bytes: &[u8],
    ) -> Result<(), FsError> {
        records.put_block(id, bytes)
    }
}
