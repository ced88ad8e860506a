//! # Domain Layer
//!
//! Store-independent logic that runs over any `Store`.
//!
//! ## Modules
//!
//! - `errors` - store and walk error types
//! - `child_cache` - parent to children index
//! - `tree` - breadth-first walks, ancestry, descendants and leaves
//! - `validation` - deep validation against a store

pub mod child_cache;
pub mod errors;
pub mod tree;
pub mod validation;
