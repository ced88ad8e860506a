//! Storage Adapters
//!
//! Implementations of the `Store` trait.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
