//! Positional read/write engine
//!
//! Reads and writes address a file's single block with
//! `{offset, length, position}`: `offset` indexes the caller's buffer,
//! `position` indexes the block. Writing past the current end grows the
//! block to exactly `position + length`; gap bytes between the old end
//! and `position` are zero-filled, a deliberate choice since the store
//! gives no other defined byte value.

use crate::block::BlockAllocator;
use crate::clock;
use crate::error::FsError;
use crate::record::FileRecord;
use crate::store::{DirectoryStore, RecordStore};
use kv_store::KeyValueStore;

/// Options for a positional read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Index into the destination buffer to start copying at
    pub offset: usize,
    /// Maximum bytes to copy; `None` reads as much as fits
    pub length: Option<usize>,
    /// Index into the file content to start reading at
    pub position: usize,
}

/// Options for a positional write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Index into the source buffer to start copying from
    pub offset: usize,
    /// Maximum bytes to write; `None` writes the rest of the source
    pub length: Option<usize>,
    /// Index into the file content to start writing at; `None` is 0
    /// (or the current size for handles opened with `APPEND`)
    pub position: Option<usize>,
}

/// Byte-level I/O against a file's block
pub struct IoEngine;

impl IoEngine {
    /// Read file content into `buf`
    ///
    /// The copied length is clamped to the requested length, the content
    /// remaining after `position`, and the buffer capacity after
    /// `offset`. A `position` at or beyond the stored size copies zero
    /// bytes; that is not an error.
    pub fn read<S: KeyValueStore>(
        records: &RecordStore<S>,
        file: &FileRecord,
        buf: &mut [u8],
        opts: &ReadOptions,
    ) -> Result<usize, FsError> {
        let content = BlockAllocator::read(records, file.block)?;
        if opts.position >= content.len() {
            return Ok(0);
        }
        let available = content.len() - opts.position;
        let capacity = buf.len().saturating_sub(opts.offset);
        let length = opts.length.unwrap_or(usize::MAX).min(available).min(capacity);
        if length == 0 {
            return Ok(0);
        }
        buf[opts.offset..opts.offset + length]
            .copy_from_slice(&content[opts.position..opts.position + length]);
        Ok(length)
    }

    /// Write bytes from `data` into the file at a position
    ///
    /// Returns the byte count written together with the updated file
    /// record (new size and modification time), which has already been
    /// persisted into the owning directory. A write whose clamped length
    /// is zero is a complete no-op: the block does not grow to
    /// `position` and the modification time is untouched.
    pub fn write<S: KeyValueStore>(
        records: &mut RecordStore<S>,
        file: &FileRecord,
        data: &[u8],
        opts: &WriteOptions,
    ) -> Result<(usize, FileRecord), FsError> {
        let available = data.len().saturating_sub(opts.offset);
        let length = opts.length.unwrap_or(usize::MAX).min(available);
        if length == 0 {
            // Nothing to copy, nothing to grow
            return Ok((0, file.clone()));
        }
        let position = opts.position.unwrap_or(0);
        let end = position
            .checked_add(length)
            .ok_or_else(|| FsError::InvalidArgument("write range overflows".to_string()))?;

        let mut content = BlockAllocator::read(records, file.block)?;
        if end > content.len() {
            content.resize(end, 0);
        }
        content[position..end].copy_from_slice(&data[opts.offset..opts.offset + length]);

        let updated = Self::commit(records, file, &content)?;
        Ok((length, updated))
    }

    /// Replace the file's whole content
    pub fn replace<S: KeyValueStore>(
        records: &mut RecordStore<S>,
        file: &FileRecord,
        data: &[u8],
    ) -> Result<FileRecord, FsError> {
        Self::commit(records, file, data)
    }

    /// Persist the block, then the size/mtime bookkeeping in the parent
    /// directory. The block goes first: an interruption in between
    /// leaves stale metadata, never lost content.
    fn commit<S: KeyValueStore>(
        records: &mut RecordStore<S>,
        file: &FileRecord,
        content: &[u8],
    ) -> Result<FileRecord, FsError> {
        BlockAllocator::write(records, file.block, content)?;

        let mut updated = file.clone();
        updated.size = content.len() as u64;
        updated.utc = clock::now_millis();

        let mut parent = records
            .load_dir(&updated.path)?
            .ok_or_else(|| FsError::DirNotFound(updated.path.clone()))?;
        if !parent.update_file(&updated) {
            return Err(FsError::FileNotFound(updated.full_path()));
        }
        records.store_dir(&parent)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DirRecord, HeadRecord};
    use crate::tree::DirectoryTree;
    use kv_store::MemoryStore;

    fn fixture() -> (RecordStore<MemoryStore>, FileRecord) {
        let mut records = RecordStore::new(MemoryStore::new());
        records.put_head(&HeadRecord::new()).unwrap();
        let mut root = DirRecord::new("/");
        root.add_dir("data");
        records.store_dir(&root).unwrap();
        records.store_dir(&DirRecord::new("/data")).unwrap();

        let block = BlockAllocator::allocate(&mut records).unwrap();
        let file = FileRecord {
            name: "a.txt".to_string(),
            path: "/data".to_string(),
            size: 0,
            utc: 0,
            block,
        };
        DirectoryTree::insert_file(&mut records, file.clone()).unwrap();
        (records, file)
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let (mut records, file) = fixture();
        let (written, file) =
            IoEngine::write(&mut records, &file, b"hello", &WriteOptions::default()).unwrap();
        assert_eq!(written, 5);
        assert_eq!(file.size, 5);

        let mut buf = [0u8; 5];
        let read = IoEngine::read(&records, &file, &mut buf, &ReadOptions::default()).unwrap();
        assert_eq!(read, 5);
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn test_read_clamps_to_buffer_capacity() {
        let (mut records, file) = fixture();
        let (_, file) =
            IoEngine::write(&mut records, &file, b"0123456789", &WriteOptions::default()).unwrap();

        let mut buf = [0u8; 4];
        let read = IoEngine::read(&records, &file, &mut buf, &ReadOptions::default()).unwrap();
        assert_eq!(read, 4);
        assert_eq!(&buf, b"0123");
    }

    #[test]
    fn test_read_at_offset_and_position() {
        let (mut records, file) = fixture();
        let (_, file) =
            IoEngine::write(&mut records, &file, b"0123456789", &WriteOptions::default()).unwrap();

        let mut buf = [b'.'; 8];
        let opts = ReadOptions {
            offset: 2,
            length: Some(3),
            position: 4,
        };
        let read = IoEngine::read(&records, &file, &mut buf, &opts).unwrap();
        assert_eq!(read, 3);
        assert_eq!(&buf, b"..456...");
    }

    #[test]
    fn test_read_past_end_copies_nothing() {
        let (mut records, file) = fixture();
        let (_, file) =
            IoEngine::write(&mut records, &file, b"abc", &WriteOptions::default()).unwrap();

        let mut buf = [0u8; 4];
        let opts = ReadOptions {
            position: 3,
            ..Default::default()
        };
        assert_eq!(IoEngine::read(&records, &file, &mut buf, &opts).unwrap(), 0);
        let opts = ReadOptions {
            position: 100,
            ..Default::default()
        };
        assert_eq!(IoEngine::read(&records, &file, &mut buf, &opts).unwrap(), 0);
    }

    #[test]
    fn test_append_at_size_preserves_prefix() {
        let (mut records, file) = fixture();
        let (_, file) =
            IoEngine::write(&mut records, &file, b"front", &WriteOptions::default()).unwrap();
        let opts = WriteOptions {
            position: Some(5),
            ..Default::default()
        };
        let (written, file) = IoEngine::write(&mut records, &file, b"back", &opts).unwrap();
        assert_eq!(written, 4);
        assert_eq!(file.size, 9);
        assert_eq!(
            BlockAllocator::read(&records, file.block).unwrap(),
            b"frontback"
        );
    }

    #[test]
    fn test_gap_is_zero_filled() {
        let (mut records, file) = fixture();
        let (_, file) =
            IoEngine::write(&mut records, &file, b"ab", &WriteOptions::default()).unwrap();
        let opts = WriteOptions {
            position: Some(5),
            ..Default::default()
        };
        let (_, file) = IoEngine::write(&mut records, &file, b"cd", &opts).unwrap();
        assert_eq!(file.size, 7);
        assert_eq!(
            BlockAllocator::read(&records, file.block).unwrap(),
            b"ab\0\0\0cd"
        );
    }

    #[test]
    fn test_overwrite_inside_does_not_shrink() {
        let (mut records, file) = fixture();
        let (_, file) =
            IoEngine::write(&mut records, &file, b"0123456789", &WriteOptions::default()).unwrap();
        let (written, file) =
            IoEngine::write(&mut records, &file, b"XY", &WriteOptions::default()).unwrap();
        assert_eq!(written, 2);
        assert_eq!(file.size, 10);
        assert_eq!(
            BlockAllocator::read(&records, file.block).unwrap(),
            b"XY23456789"
        );
    }

    #[test]
    fn test_write_source_slice_clamped() {
        let (mut records, file) = fixture();
        let opts = WriteOptions {
            offset: 3,
            length: Some(100),
            position: None,
        };
        let (written, file) = IoEngine::write(&mut records, &file, b"0123456", &opts).unwrap();
        assert_eq!(written, 4);
        assert_eq!(BlockAllocator::read(&records, file.block).unwrap(), b"3456");
    }

    #[test]
    fn test_zero_length_write_is_a_no_op() {
        let (mut records, file) = fixture();
        let (_, file) =
            IoEngine::write(&mut records, &file, b"abc", &WriteOptions::default()).unwrap();
        let opts = WriteOptions {
            position: Some(100),
            ..Default::default()
        };
        let (written, unchanged) = IoEngine::write(&mut records, &file, b"", &opts).unwrap();
        assert_eq!(written, 0);
        assert_eq!(unchanged, file);
        assert_eq!(BlockAllocator::read(&records, file.block).unwrap(), b"abc");
    }

    #[test]
    fn test_write_position_overflow_rejected() {
        let (mut records, file) = fixture();
        let opts = WriteOptions {
            position: Some(usize::MAX),
            ..Default::default()
        };
        assert!(matches!(
            IoEngine::write(&mut records, &file, b"x", &opts),
            Err(FsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_write_updates_mtime() {
        let (mut records, file) = fixture();
        let (_, updated) =
            IoEngine::write(&mut records, &file, b"x", &WriteOptions::default()).unwrap();
        assert!(updated.utc >= file.utc);
        // The directory record carries the new metadata
        let stored = DirectoryTree::get_file(&records, "/data/a.txt")
            .unwrap()
            .unwrap();
        assert_eq!(stored.size, 1);
        assert_eq!(stored.utc, updated.utc);
    }

    #[test]
    fn test_replace_shrinks_content() {
        let (mut records, file) = fixture();
        let (_, file) =
            IoEngine::write(&mut records, &file, b"0123456789", &WriteOptions::default()).unwrap();
        let file = IoEngine::replace(&mut records, &file, b"xy").unwrap();
        assert_eq!(file.size, 2);
        assert_eq!(BlockAllocator::read(&records, file.block).unwrap(), b"xy");
    }
}
