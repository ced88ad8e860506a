//! # Composed Stores
//!
//! Stores built out of other stores.

mod cache;

pub use cache::CacheStore;
