//! # Ports Layer
//!
//! - `outbound.rs` - the `Store` capability every storage adapter provides

pub mod outbound;
