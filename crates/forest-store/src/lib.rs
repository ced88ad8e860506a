//! # Forest Store
//!
//! The storage family for forest nodes.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `ports/` - the `Store` capability
//! - `adapters/` - `MemoryStore` and the directory-backed `FileStore`
//! - `service/` - `CacheStore`, a read-through cache composed of two stores
//! - `domain/` - errors, `ChildCache`, tree queries and deep validation
//!
//! ## Concurrency
//!
//! None of these stores are safe for concurrent mutation. Share one through
//! the archive in `forest-bus`, which serializes every operation.
//!
//! ## Usage
//!
//! ```ignore
//! use forest_store::{ancestry_of, CacheStore, FileStore, MemoryStore, Store};
//!
//! let mut store = CacheStore::new(MemoryStore::new(), FileStore::open(dir)?)?;
//! store.add(node)?;
//! let ancestors = ancestry_of(&store, &id)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::storage::{FileStore, MemoryStore};
pub use domain::child_cache::ChildCache;
pub use domain::errors::{StoreError, WalkError};
pub use domain::tree::{
    ancestry_of, descendants_of, leaves_of, walk, walk_nodes, VisitError, Walk,
};
pub use domain::validation::validate_deep;
pub use ports::outbound::Store;
pub use service::CacheStore;
