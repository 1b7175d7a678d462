//! Public filesystem surface
//!
//! [`FileSystem`] owns all mutable state for one filesystem instance:
//! the record store and the open-handle table. Nothing is process-global,
//! so tests can run any number of independent instances.
//!
//! User paths resolve under one of two logical roots: `/data` for user
//! files and `/assets` for bundled assets. `mkdir` and `readdir` address
//! the tree from `/` directly.

use crate::block::BlockAllocator;
use crate::clock;
use crate::error::FsError;
use crate::flags::OpenFlags;
use crate::handle::{Handle, HandleTable, OpenHandle};
use crate::io::{IoEngine, ReadOptions, WriteOptions};
use crate::record::{DirRecord, FileRecord, HeadRecord};
use crate::store::{DirectoryStore, RecordStore};
use crate::tree::DirectoryTree;
use kv_store::KeyValueStore;
use log::{debug, info};
use std::collections::VecDeque;

/// Logical root for user files
pub const DATA_ROOT: &str = "/data";

/// Logical root for bundled assets
pub const ASSETS_ROOT: &str = "/assets";

/// File metadata returned by `stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatInfo {
    /// Content size in bytes
    pub size: u64,
    /// Last-modified time, epoch milliseconds
    pub mtime_ms: u64,
}

/// Counts reported by a full reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    /// Files whose blocks were freed
    pub deleted_files: u64,
    /// Directory records removed (the root included)
    pub deleted_dirs: u64,
}

/// A filesystem instance over a key-value store
pub struct FileSystem<S: KeyValueStore> {
    records: RecordStore<S>,
    handles: HandleTable,
}

impl<S: KeyValueStore> FileSystem<S> {
    /// Create a filesystem over a store
    ///
    /// Does not touch the store; call [`initialize`](Self::initialize)
    /// or let `open` do it lazily.
    pub fn new(store: S) -> Self {
        Self {
            records: RecordStore::new(store),
            handles: HandleTable::new(),
        }
    }

    /// Unwrap back into the underlying store
    pub fn into_store(self) -> S {
        self.records.into_inner()
    }

    /// Whether the head record is present
    pub fn is_initialized(&self) -> Result<bool, FsError> {
        Ok(self.records.head()?.is_some())
    }

    /// Create the head record and the `/`, `/data`, `/assets` directories
    ///
    /// Idempotent: an already-initialized filesystem is left untouched.
    /// The head is persisted last, so a partially written tree is never
    /// reported as initialized.
    pub fn initialize(&mut self) -> Result<(), FsError> {
        if self.is_initialized()? {
            return Ok(());
        }
        info!("initializing filesystem");
        let mut root = DirRecord::new("/");
        root.add_dir("data");
        root.add_dir("assets");
        self.records.store_dir(&root)?;
        self.records.store_dir(&DirRecord::new(DATA_ROOT))?;
        self.records.store_dir(&DirRecord::new(ASSETS_ROOT))?;
        self.records.put_head(&HeadRecord::new())?;
        Ok(())
    }

    /// Delete every file block, every directory record and the head
    ///
    /// Walks the tree breadth-first from the root. Open handles are left
    /// in place; they dangle like any handle whose file was removed.
    pub fn reset(&mut self) -> Result<ResetReport, FsError> {
        let head = self.require_head()?;
        let root = DirectoryTree::get_directory(&self.records, &head.root)?
            .ok_or_else(|| FsError::DirNotFound(head.root.clone()))?;

        let mut deleted_files = 0u64;
        let mut deleted_dirs = 0u64;
        let mut queue = VecDeque::from([root]);
        while let Some(dir) = queue.pop_front() {
            let blocks: Vec<u64> = dir.files().map(|f| f.block).collect();
            for block in blocks {
                BlockAllocator::free(&mut self.records, block)?;
                deleted_files += 1;
            }
            for name in dir.dir_names() {
                let child_path = fs_path::join(&dir.path, name);
                if let Some(child) = self.records.load_dir(&child_path)? {
                    queue.push_back(child);
                }
            }
            self.records.remove_dir(&dir.path)?;
            deleted_dirs += 1;
        }
        self.records.remove_head()?;
        info!("reset filesystem: {deleted_files} files, {deleted_dirs} dirs");
        Ok(ResetReport {
            deleted_files,
            deleted_dirs,
        })
    }

    /// Open a file under `/data`
    ///
    /// Initializes the filesystem first if it never was. See
    /// [`OpenFlags`] for creation and truncation behavior.
    pub fn open(&mut self, path: &str, flags: OpenFlags) -> Result<Handle, FsError> {
        self.ensure_initialized()?;
        self.open_at(DATA_ROOT, path, flags)
    }

    /// Open a file under `/assets`
    pub fn open_asset(&mut self, path: &str, flags: OpenFlags) -> Result<Handle, FsError> {
        self.ensure_initialized()?;
        self.open_at(ASSETS_ROOT, path, flags)
    }

    /// Close an open handle
    pub fn close(&mut self, handle: Handle) -> Result<(), FsError> {
        self.handles.close(handle)
    }

    /// File metadata under `/data`
    pub fn stat(&self, path: &str) -> Result<StatInfo, FsError> {
        self.require_head()?;
        self.stat_at(DATA_ROOT, path)
    }

    /// File metadata under `/assets`
    pub fn stat_asset(&self, path: &str) -> Result<StatInfo, FsError> {
        self.require_head()?;
        self.stat_at(ASSETS_ROOT, path)
    }

    /// Read through an open handle
    ///
    /// The file record is re-resolved on every call; a handle whose file
    /// was removed reads as [`FsError::FileNotFound`].
    pub fn read(
        &mut self,
        handle: Handle,
        buf: &mut [u8],
        opts: &ReadOptions,
    ) -> Result<usize, FsError> {
        let (_, file) = self.resolve_handle(handle)?;
        IoEngine::read(&self.records, &file, buf, opts)
    }

    /// Write through an open handle
    ///
    /// With `APPEND` and no explicit position, the write starts at the
    /// current file size.
    pub fn write(
        &mut self,
        handle: Handle,
        data: &[u8],
        opts: &WriteOptions,
    ) -> Result<usize, FsError> {
        let (open, file) = self.resolve_handle(handle)?;
        let mut opts = opts.clone();
        if opts.position.is_none() && open.flags.contains(OpenFlags::APPEND) {
            let at_end = usize::try_from(file.size)
                .map_err(|_| FsError::InvalidArgument("file too large for this host".to_string()))?;
            opts.position = Some(at_end);
        }
        let (written, _) = IoEngine::write(&mut self.records, &file, data, &opts)?;
        Ok(written)
    }

    /// Read a whole file under `/data`
    pub fn read_whole(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.require_head()?;
        let file = self.data_file(path)?;
        BlockAllocator::read(&self.records, file.block)
    }

    /// Read a whole file under `/data` as UTF-8 text
    pub fn read_whole_string(&self, path: &str) -> Result<String, FsError> {
        String::from_utf8(self.read_whole(path)?)
            .map_err(|_| FsError::InvalidArgument("file content is not valid UTF-8".to_string()))
    }

    /// Replace a file's whole content under `/data`
    ///
    /// The file must already exist; whole-file writes never create.
    pub fn write_whole(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        self.require_head()?;
        let file = self.data_file(path)?;
        IoEngine::replace(&mut self.records, &file, data)?;
        Ok(())
    }

    /// Remove a file under `/data` and free its block
    pub fn remove(&mut self, path: &str) -> Result<(), FsError> {
        self.require_head()?;
        let file = self.data_file(path)?;
        let removed = DirectoryTree::remove_file(&mut self.records, &file.path, &file.name)?;
        BlockAllocator::free(&mut self.records, removed.block)?;
        debug!("removed {}", removed.full_path());
        Ok(())
    }

    /// Rename or move a file, both paths under `/data`
    pub fn rename(&mut self, old_path: &str, new_path: &str) -> Result<(), FsError> {
        self.require_head()?;
        if old_path.ends_with('/') || new_path.ends_with('/') {
            return Err(FsError::InvalidArgument(
                "rename requires file paths".to_string(),
            ));
        }
        let file = self.data_file(old_path)?;
        let new_full = fs_path::join(DATA_ROOT, new_path);
        let parsed = fs_path::parse(&new_full);
        DirectoryTree::move_file(&mut self.records, &file, &parsed.dir, &parsed.base)?;
        debug!("renamed {} -> {new_full}", file.full_path());
        Ok(())
    }

    /// Create one directory level, path rooted at `/`
    pub fn mkdir(&mut self, path: &str) -> Result<(), FsError> {
        self.require_head()?;
        DirectoryTree::create_directory(&mut self.records, path)?;
        Ok(())
    }

    /// List a directory, path rooted at `/`
    ///
    /// Child directories come first, then files, insertion order within
    /// each.
    pub fn readdir(&self, path: &str) -> Result<Vec<String>, FsError> {
        let head = self.require_head()?;
        let full = fs_path::join(&head.root, path);
        let dir = DirectoryTree::get_directory(&self.records, &full)?
            .ok_or(FsError::DirNotFound(full))?;
        Ok(dir.list_names())
    }

    /// Number of currently open handles
    pub fn open_handles(&self) -> usize {
        self.handles.len()
    }

    fn ensure_initialized(&mut self) -> Result<(), FsError> {
        if !self.is_initialized()? {
            self.initialize()?;
        }
        Ok(())
    }

    fn require_head(&self) -> Result<HeadRecord, FsError> {
        self.records.head()?.ok_or(FsError::NotInitialized)
    }

    fn open_at(&mut self, root: &str, path: &str, flags: OpenFlags) -> Result<Handle, FsError> {
        if path.is_empty() {
            return Err(FsError::InvalidArgument("empty path".to_string()));
        }
        if path.ends_with('/') {
            return Err(FsError::InvalidOperation(format!("not a file path: {path}")));
        }
        let full = fs_path::join(root, path);
        let file = match DirectoryTree::get_file(&self.records, &full)? {
            Some(file) => {
                if flags.contains(OpenFlags::CREATE | OpenFlags::EXCL) {
                    return Err(FsError::AlreadyExists(full));
                }
                if flags.contains(OpenFlags::TRUNC) && file.size > 0 {
                    IoEngine::replace(&mut self.records, &file, &[])?
                } else {
                    file
                }
            }
            None => {
                if !flags.contains(OpenFlags::CREATE) {
                    return Err(FsError::FileNotFound(full));
                }
                self.create_file(&full)?
            }
        };
        let handle = self.handles.insert(file.full_path(), flags);
        debug!("opened {} as {handle}", file.full_path());
        Ok(handle)
    }

    fn create_file(&mut self, full: &str) -> Result<FileRecord, FsError> {
        let parsed = fs_path::parse(full);
        let parent = DirectoryTree::get_directory(&self.records, &parsed.dir)?
            .ok_or_else(|| FsError::DirNotFound(parsed.dir.clone()))?;
        // Reject before allocating so a name collision cannot leak a block
        if parent.has_child(&parsed.base) {
            return Err(FsError::AlreadyExists(full.to_string()));
        }
        let block = BlockAllocator::allocate(&mut self.records)?;
        let file = FileRecord {
            name: parsed.base,
            path: parent.path,
            size: 0,
            utc: clock::now_millis(),
            block,
        };
        DirectoryTree::insert_file(&mut self.records, file.clone())?;
        Ok(file)
    }

    fn resolve_handle(&self, handle: Handle) -> Result<(OpenHandle, FileRecord), FsError> {
        let open = self
            .handles
            .get(handle)
            .ok_or(FsError::InvalidHandle(handle))?
            .clone();
        let file = DirectoryTree::get_file(&self.records, &open.path)?
            .ok_or_else(|| FsError::FileNotFound(open.path.clone()))?;
        Ok((open, file))
    }

    fn stat_at(&self, root: &str, path: &str) -> Result<StatInfo, FsError> {
        let full = fs_path::join(root, path);
        let file =
            DirectoryTree::get_file(&self.records, &full)?.ok_or(FsError::FileNotFound(full))?;
        Ok(StatInfo {
            size: file.size,
            mtime_ms: file.utc,
        })
    }

    fn data_file(&self, path: &str) -> Result<FileRecord, FsError> {
        let full = fs_path::join(DATA_ROOT, path);
        DirectoryTree::get_file(&self.records, &full)?.ok_or(FsError::FileNotFound(full))
    }
}
