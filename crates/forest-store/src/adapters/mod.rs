//! # Adapters Module
//!
//! - `storage`: in-memory and directory-backed `Store` implementations

pub mod storage;

pub use storage::{FileStore, MemoryStore};
