//! # Forest Test Suite
//!
//! Scenarios that need more than one crate at a time.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── archive_flows.rs   # Archive over every store, hooks, concurrency
//!     ├── storage_flows.rs   # FileStore + CacheStore composition, walks
//!     └── tamper.rs          # Modified bytes and files are caught
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p forest-tests
//! cargo bench -p forest-tests
//! ```

pub mod integration;
