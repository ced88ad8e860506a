//! # Forest Types
//!
//! The wire format and node model of the forest: an append-only tree of
//! signed, content-addressed records.
//!
//! ## Layers
//!
//! - `fields` - tags, descriptors, qualified values and the progressive codec
//! - `twig` - the key/value format used inside metadata
//! - `nodes` - Identity, Community, Conversation and Reply, their codec and builder
//! - `validation` - checks that need nothing but the node and its signer
//! - `ports` / `adapters` - signing, verification and clock capabilities
//!
//! ## Identifiers
//!
//! A node id is the SHA-512/256 digest of every field before the signature.
//! It is recomputed on every decode and never read off the wire.

pub mod adapters;
pub mod errors;
pub mod fields;
pub mod nodes;
pub mod ports;
pub mod twig;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{Ed25519Signer, Ed25519Verifier, FixedTimeSource, SystemTimeSource};
pub use errors::{BuildError, DecodeError, FieldError, ValidationError};
pub use fields::{
    ContentType, Decode, Encode, HashType, KeyType, NodeType, QualifiedContent, QualifiedHash,
    QualifiedKey, QualifiedSignature, SignatureType,
};
pub use nodes::{
    new_identity, new_identity_at, Builder, CommonFields, Community, Conversation, Identity,
    Node, Reply, SCHEMA_VERSION,
};
pub use ports::{Signer, TimeSource, Verifier};
pub use twig::Twig;
pub use validation::{validate_fields, validate_id, validate_shallow, validate_signature};
