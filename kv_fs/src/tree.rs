//! Directory tree maintenance
//!
//! Directory records are stored flat, keyed by canonical path, so every
//! lookup is a single fetch and every mutation is read-mutate-persist on
//! one or two records. Name comparisons are byte-exact and
//! case-sensitive.
//!
//! There is no rollback: when a move touches two parents, the record
//! capturing the addition is persisted before the record capturing the
//! removal, so an interruption can duplicate an entry but never orphan
//! one.

use crate::error::FsError;
use crate::record::{DirRecord, FileRecord};
use crate::store::DirectoryStore;

/// Tree operations over any [`DirectoryStore`]
pub struct DirectoryTree;

impl DirectoryTree {
    /// Fetch the directory record at a path, if present
    pub fn get_directory<D: DirectoryStore>(
        store: &D,
        path: &str,
    ) -> Result<Option<DirRecord>, FsError> {
        store.load_dir(&fs_path::normalize(path))
    }

    /// Fetch the file record at a path, if present
    ///
    /// Resolves the parent directory, then scans its children. A path
    /// with a trailing separator never names a file.
    pub fn get_file<D: DirectoryStore>(
        store: &D,
        path: &str,
    ) -> Result<Option<FileRecord>, FsError> {
        if path.ends_with('/') {
            return Ok(None);
        }
        let parsed = fs_path::parse(&fs_path::join("/", path));
        let Some(parent) = store.load_dir(&parsed.dir)? else {
            return Ok(None);
        };
        Ok(parent.file(&parsed.base).cloned())
    }

    /// Create exactly one directory level
    ///
    /// The immediate parent must already exist; nothing is created
    /// implicitly. Creating directly under the root is refused.
    pub fn create_directory<D: DirectoryStore>(
        store: &mut D,
        path: &str,
    ) -> Result<DirRecord, FsError> {
        let parsed = fs_path::parse(&fs_path::join("/", path));
        if parsed.base.is_empty() {
            return Err(FsError::InvalidOperation(
                "cannot create the root directory".to_string(),
            ));
        }
        let mut parent = store
            .load_dir(&parsed.dir)?
            .ok_or_else(|| FsError::DirNotFound(parsed.dir.clone()))?;
        if parent.path == parsed.root {
            return Err(FsError::InvalidOperation(
                "cannot create directories directly under the root".to_string(),
            ));
        }
        if !parent.add_dir(parsed.base.clone()) {
            return Err(FsError::AlreadyExists(fs_path::join(
                &parsed.dir,
                &parsed.base,
            )));
        }
        let dir = DirRecord::new(fs_path::join(&parsed.dir, &parsed.base));
        store.store_dir(&dir)?;
        store.store_dir(&parent)?;
        Ok(dir)
    }

    /// Insert a file entry into its owning directory
    ///
    /// `file.path` names the parent. Fails with `AlreadyExists` when the
    /// name is taken by any child.
    pub fn insert_file<D: DirectoryStore>(store: &mut D, file: FileRecord) -> Result<(), FsError> {
        let mut parent = store
            .load_dir(&file.path)?
            .ok_or_else(|| FsError::DirNotFound(file.path.clone()))?;
        let full = file.full_path();
        if !parent.add_file(file) {
            return Err(FsError::AlreadyExists(full));
        }
        store.store_dir(&parent)
    }

    /// Remove a file entry from its parent, returning the record
    ///
    /// The caller owns freeing the associated block.
    pub fn remove_file<D: DirectoryStore>(
        store: &mut D,
        parent_path: &str,
        name: &str,
    ) -> Result<FileRecord, FsError> {
        let mut parent = store
            .load_dir(parent_path)?
            .ok_or_else(|| FsError::DirNotFound(parent_path.to_string()))?;
        let file = parent
            .remove_file(name)
            .ok_or_else(|| FsError::FileNotFound(fs_path::join(parent_path, name)))?;
        store.store_dir(&parent)?;
        Ok(file)
    }

    /// Move a file entry to a new parent and/or name
    ///
    /// Fails with `AlreadyExists` when any child at the destination holds
    /// `new_name`, with `DirNotFound` when the destination parent is
    /// absent, and with `FileNotFound` when the file is not present in
    /// its claimed parent.
    pub fn move_file<D: DirectoryStore>(
        store: &mut D,
        file: &FileRecord,
        new_parent_path: &str,
        new_name: &str,
    ) -> Result<FileRecord, FsError> {
        let old_parent_path = fs_path::normalize(&file.path);
        let new_parent_path = fs_path::normalize(new_parent_path);

        if old_parent_path == new_parent_path {
            let mut parent = store
                .load_dir(&new_parent_path)?
                .ok_or_else(|| FsError::DirNotFound(new_parent_path.clone()))?;
            if parent.has_child(new_name) {
                return Err(FsError::AlreadyExists(fs_path::join(
                    &new_parent_path,
                    new_name,
                )));
            }
            let mut moved = parent
                .remove_file(&file.name)
                .ok_or_else(|| FsError::FileNotFound(file.full_path()))?;
            moved.name = new_name.to_string();
            parent.add_file(moved.clone());
            store.store_dir(&parent)?;
            return Ok(moved);
        }

        let mut old_parent = store
            .load_dir(&old_parent_path)?
            .ok_or_else(|| FsError::DirNotFound(old_parent_path.clone()))?;
        let mut new_parent = store
            .load_dir(&new_parent_path)?
            .ok_or_else(|| FsError::DirNotFound(new_parent_path.clone()))?;
        if new_parent.has_child(new_name) {
            return Err(FsError::AlreadyExists(fs_path::join(
                &new_parent_path,
                new_name,
            )));
        }
        let mut moved = old_parent
            .remove_file(&file.name)
            .ok_or_else(|| FsError::FileNotFound(file.full_path()))?;
        moved.name = new_name.to_string();
        moved.path = new_parent.path.clone();
        new_parent.add_file(moved.clone());
        // Addition before removal
        store.store_dir(&new_parent)?;
        store.store_dir(&old_parent)?;
        Ok(moved)
    }
}
