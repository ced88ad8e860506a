//! # Forest Bus - Concurrent Archive
//!
//! The only thread-safe boundary in the forest. An `Archive` owns a store on
//! a dedicated worker thread and executes requests one at a time, in
//! submission order. Subscribers observe new nodes through pre-add and
//! post-add hooks.
//!
//! ```text
//!  caller A ─┐                       ┌──────────────────────┐
//!  caller B ─┼── job + oneshot ────▶ │ worker: Store + hooks │
//!  caller C ─┘   (blocking reply)    └──────────────────────┘
//! ```
//!
//! Archive methods block the calling thread; do not call them from inside
//! an async runtime worker or from a hook.

pub mod archive;
pub mod config;
pub mod subscriber;

pub use archive::Archive;
pub use config::{ArchiveConfig, DEFAULT_THREAD_NAME};
pub use subscriber::{Hook, Phase, Subscription};
