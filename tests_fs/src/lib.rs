//! Filesystem Scenario Tests
//!
//! End-to-end tests driving the public filesystem surface against the
//! in-memory store backend.
//!
//! ## Test Philosophy
//!
//! - Every scenario starts from a fresh, independent instance
//! - Tests observe only the public surface: what a host integration sees
//! - Error cases assert the exact error kind, not just failure

use kv_fs::FileSystem;
use kv_store::MemoryStore;

/// Fresh, initialized filesystem over an in-memory store
pub fn fresh_fs() -> FileSystem<MemoryStore> {
    let mut fs = FileSystem::new(MemoryStore::new());
    fs.initialize().expect("initialize in-memory filesystem");
    fs
}

/// Create a file under `/data` with the given content, then close it
pub fn seed_file(fs: &mut FileSystem<MemoryStore>, path: &str, content: &[u8]) {
    let handle = fs
        .open(path, kv_fs::OpenFlags::CREATE | kv_fs::OpenFlags::WRITE)
        .expect("create seed file");
    fs.write(handle, content, &kv_fs::WriteOptions::default())
        .expect("write seed content");
    fs.close(handle).expect("close seed file");
}
