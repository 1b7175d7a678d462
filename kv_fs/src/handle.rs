//! Open file handle table
//!
//! Handles are process-scoped tokens for an open (path, flags) pair.
//! They are never persisted and do not pin the underlying file: removing
//! a file while a handle is open leaves the handle dangling, and later
//! reads through it fail to resolve a file record.

use crate::clock;
use crate::error::FsError;
use crate::flags::OpenFlags;
use core::fmt;
use std::collections::HashMap;

/// Seed offset mixed into the epoch-millisecond base value
const HANDLE_SEED_OFFSET: u64 = 0x5EED;

/// Range the seed is folded into before probing
const HANDLE_RANGE: u64 = 1 << 20;

/// An opaque open-file token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// Rebuild a handle from its raw value
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Raw numeric value of this handle
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

/// State held for one open handle
#[derive(Debug, Clone)]
pub struct OpenHandle {
    /// Canonical path the handle was opened at
    pub path: String,
    /// Flags the handle was opened with
    pub flags: OpenFlags,
}

/// In-memory registry of open handles
///
/// Handle values are seeded from the current time plus a fixed offset,
/// folded into a fixed range, then probed linearly upward until an
/// unused value is found. Uniqueness among currently-open handles is the
/// only guarantee; there is no theoretical upper bound on probing, which
/// is acceptable for the small tables this system sees.
#[derive(Debug, Default)]
pub struct HandleTable {
    open: HashMap<Handle, OpenHandle>,
}

impl HandleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open (path, flags) pair and return its handle
    pub fn insert(&mut self, path: String, flags: OpenFlags) -> Handle {
        let seed = (clock::now_millis() + HANDLE_SEED_OFFSET) % HANDLE_RANGE;
        let handle = self.probe_from(seed);
        self.open.insert(handle, OpenHandle { path, flags });
        handle
    }

    fn probe_from(&self, seed: u64) -> Handle {
        let mut value = seed;
        while self.open.contains_key(&Handle(value)) {
            value += 1;
        }
        Handle(value)
    }

    /// Look up an open handle
    pub fn get(&self, handle: Handle) -> Option<&OpenHandle> {
        self.open.get(&handle)
    }

    /// Close a handle
    ///
    /// Closing a handle that is not open (including a second close) is
    /// `InvalidHandle`.
    pub fn close(&mut self, handle: Handle) -> Result<(), FsError> {
        self.open
            .remove(&handle)
            .map(|_| ())
            .ok_or(FsError::InvalidHandle(handle))
    }

    /// Number of currently open handles
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Whether no handles are open
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut table = HandleTable::new();
        let handle = table.insert("/data/a.txt".to_string(), OpenFlags::READ);
        let open = table.get(handle).unwrap();
        assert_eq!(open.path, "/data/a.txt");
        assert_eq!(open.flags, OpenFlags::READ);
    }

    #[test]
    fn test_handles_are_unique_while_open() {
        let mut table = HandleTable::new();
        let mut handles = Vec::new();
        for i in 0..64 {
            handles.push(table.insert(format!("/data/{i}.txt"), OpenFlags::READ));
        }
        let mut sorted = handles.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), handles.len());
        assert_eq!(table.len(), 64);
    }

    #[test]
    fn test_probe_skips_occupied_values() {
        let mut table = HandleTable::new();
        let first = table.insert("/data/a".to_string(), OpenFlags::READ);
        // The next probe from the same seed must not collide
        let probed = table.probe_from(first.as_raw());
        assert_ne!(probed, first);
        assert_eq!(probed.as_raw(), first.as_raw() + 1);
    }

    #[test]
    fn test_close() {
        let mut table = HandleTable::new();
        let handle = table.insert("/data/a".to_string(), OpenFlags::READ);
        table.close(handle).unwrap();
        assert!(table.get(handle).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_double_close_is_invalid_handle() {
        let mut table = HandleTable::new();
        let handle = table.insert("/data/a".to_string(), OpenFlags::READ);
        table.close(handle).unwrap();
        assert_eq!(table.close(handle), Err(FsError::InvalidHandle(handle)));
    }

    #[test]
    fn test_close_unknown_handle() {
        let mut table = HandleTable::new();
        let ghost = Handle::from_raw(12345);
        assert_eq!(table.close(ghost), Err(FsError::InvalidHandle(ghost)));
    }
}
