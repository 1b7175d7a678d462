//! # Key-Value Store Boundary
//!
//! This crate defines the host storage boundary for the virtual filesystem.
//!
//! ## Design
//!
//! - The host persists string values under string keys; nothing more
//! - No transactions, no enumeration by prefix, no range queries
//! - `MemoryStore` is a complete in-memory backend for tests and hosting
//! - The `codec` module carries raw bytes through string values losslessly

pub mod codec;
pub mod store;

pub use codec::{decode, encode, CodecError};
pub use store::{KeyValueStore, MemoryStore, StoreError};
