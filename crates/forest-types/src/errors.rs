//! # Error Types
//!
//! Decode, field, build and validation failures for forest nodes.
//!
//! Decode errors mean the bytes could not be parsed at all. Validation
//! errors mean a well-formed node failed a consistency check, so the node
//! can still be inspected.

use crate::fields::{NodeType, QualifiedHash};
use crate::twig::TwigError;
use forest_crypto::CryptoError;
use thiserror::Error;

/// Failures while parsing bytes into fields or nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before a component was complete.
    #[error("truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A tag byte outside the known set for its namespace.
    #[error("unknown {namespace} tag {tag}")]
    UnknownTag { namespace: &'static str, tag: u8 },

    /// A descriptor whose type fixes the length declared another length.
    #[error("{namespace} type {kind} requires length {expected}, got {actual}")]
    LengthMismatch {
        namespace: &'static str,
        kind: &'static str,
        expected: u16,
        actual: u16,
    },

    /// Schema version other than the supported one.
    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u16),

    /// A node's id descriptor names no digest algorithm.
    #[error("id descriptor {0} cannot produce an identifier")]
    UnusableIdDescriptor(String),

    /// Bytes left over after a complete top-level decode.
    #[error("{0} trailing bytes after node")]
    TrailingBytes(usize),

    /// Decoded a node of a different variant than requested.
    #[error("expected {expected} node, found {actual}")]
    WrongNodeType { expected: NodeType, actual: NodeType },

    /// Text form of a qualified value could not be parsed.
    #[error("invalid qualified text {0:?}")]
    InvalidText(String),

    /// Failure inside a named node field.
    #[error("field {field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Attach the name of the node field being decoded.
    pub fn in_field(self, field: &'static str) -> Self {
        DecodeError::Field {
            field,
            source: Box::new(self),
        }
    }
}

/// Field-level invariant violations, raised when building or validating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Payload longer than a u16 length can describe.
    #[error("payload of {len} bytes exceeds the 65535 byte limit")]
    PayloadTooLarge { len: usize },

    /// A descriptor type that fixes its length was given another length.
    #[error("{namespace} type {kind} requires length {expected}, got {actual}")]
    WrongLength {
        namespace: &'static str,
        kind: &'static str,
        expected: u16,
        actual: usize,
    },

    /// Human-readable names must be a single line.
    #[error("{field} contains a newline")]
    NameContainsNewline { field: &'static str },

    /// UTF-8 typed content that is not UTF-8.
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    /// Twig typed content that does not parse.
    #[error("{field} is not valid twig: {source}")]
    InvalidTwig {
        field: &'static str,
        #[source]
        source: TwigError,
    },

    /// Structural rule of a node variant broken.
    #[error("{node_type} node: {reason}")]
    Structure {
        node_type: NodeType,
        reason: &'static str,
    },
}

/// Failures while constructing a signed node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// The signer's key is not the identity's key.
    #[error("signer key does not belong to identity {identity}")]
    KeyMismatch { identity: QualifiedHash },

    /// Identity nodes cannot parent conversation content.
    #[error("a {0} node cannot be the parent of a reply")]
    InvalidParent(NodeType),
}

/// Consistency check failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field invariant does not hold.
    #[error("malformed node: {0}")]
    Malformed(#[from] FieldError),

    /// Recomputed digest differs from the claimed identifier.
    #[error("identity mismatch: expected {expected}, computed {actual}")]
    IdentityMismatch {
        expected: QualifiedHash,
        actual: QualifiedHash,
    },

    /// Signature does not verify under the signer's key.
    #[error("invalid signature on {id}")]
    SignatureInvalid { id: QualifiedHash },

    /// The identity offered for verification is not the node's signer.
    #[error("node {id} is signed by {signer_id}, not {identity}")]
    SignerMismatch {
        id: QualifiedHash,
        signer_id: QualifiedHash,
        identity: QualifiedHash,
    },

    /// A referenced node is not available.
    #[error("{reference} {target} referenced by {id} is missing")]
    ReferenceMissing {
        id: QualifiedHash,
        reference: &'static str,
        target: QualifiedHash,
    },

    /// A referenced node has the wrong variant.
    #[error("{reference} {target} referenced by {id} is a {actual} node, expected {expected}")]
    WrongReferenceType {
        id: QualifiedHash,
        reference: &'static str,
        target: QualifiedHash,
        expected: NodeType,
        actual: NodeType,
    },

    /// Tree depth is not one more than the parent's.
    #[error("node {id} has depth {actual}, expected {expected}")]
    DepthMismatch {
        id: QualifiedHash,
        expected: u32,
        actual: u32,
    },
}
