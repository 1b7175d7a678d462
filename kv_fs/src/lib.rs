//! # Key-Value-Backed Filesystem
//!
//! This crate implements a hierarchical filesystem (directories, files,
//! positional byte I/O, open file handles) on top of a flat string
//! key-value store.
//!
//! ## Philosophy
//!
//! The host gives us nothing but get/set/remove of string values. Every
//! structural guarantee a filesystem offers (unique paths, parent/child
//! consistency, space reclamation) is simulated from independent
//! records with no transactions and no range queries.
//!
//! ## Design
//!
//! - Directory records are stored flat, keyed by canonical absolute path;
//!   lookup never traverses
//! - File metadata lives inside the parent directory record; file content
//!   lives in a separately keyed block
//! - Block identifiers come from a persisted monotonic counter and are
//!   never recycled
//! - Open handles are in-memory state owned by one [`FileSystem`] value;
//!   nothing pins a file against removal
//! - Multi-record mutations persist the addition before the removal;
//!   there is no rollback

pub mod block;
mod clock;
pub mod error;
pub mod flags;
pub mod fs;
pub mod handle;
pub mod io;
pub mod record;
pub mod store;
pub mod tree;

pub use block::BlockAllocator;
pub use error::FsError;
pub use flags::OpenFlags;
pub use fs::{FileSystem, ResetReport, StatInfo, ASSETS_ROOT, DATA_ROOT};
pub use handle::{Handle, HandleTable, OpenHandle};
pub use io::{IoEngine, ReadOptions, WriteOptions};
pub use record::{ChildEntry, DirRecord, FileRecord, HeadRecord};
pub use store::{record_key, DirectoryStore, RecordKind, RecordStore};
pub use tree::DirectoryTree;
