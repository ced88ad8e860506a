//! # Domain Errors
//!
//! Store and traversal failures. A missing node is `Ok(None)` from a
//! lookup, never an error; `NotFound` is only raised by operations that
//! require the node to exist.

use forest_types::{DecodeError, QualifiedHash, ValidationError};
use thiserror::Error;

/// Errors raised by any `Store`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An operation required a node that is not stored.
    #[error("node {0} not found")]
    NotFound(QualifiedHash),

    /// Backing persistence failed.
    #[error("{operation} failed for {target}: {source}")]
    Io {
        operation: &'static str,
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes do not decode.
    #[error("stored node {target} is corrupt: {source}")]
    Corrupt {
        target: String,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The archive worker has shut down.
    #[error("archive is closed")]
    Closed,
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, target: impl ToString, source: std::io::Error) -> Self {
        StoreError::Io {
            operation,
            target: target.to_string(),
            source,
        }
    }

    /// True when the failure means a reference could not be resolved.
    pub fn is_reference_missing(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound(_)
                | StoreError::Validation(ValidationError::ReferenceMissing { .. })
        )
    }
}

/// Errors raised by tree traversal.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("walk requires a store")]
    MissingStore,

    #[error("walk requires a non-null root")]
    MissingRoot,

    #[error("walk requires a visitor")]
    MissingVisitor,

    /// The visitor stopped the walk.
    #[error("visitor stopped at {id}: {source}")]
    Visitor {
        id: QualifiedHash,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store failed while the walk was at `id`.
    #[error("store failed at {id}: {source}")]
    Store {
        id: QualifiedHash,
        #[source]
        source: StoreError,
    },

    /// A visited id has no node in the store.
    #[error("walked to {0} but it is not stored")]
    Unresolved(QualifiedHash),
}
