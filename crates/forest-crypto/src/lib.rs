//! # Forest Crypto - Signing and Digest Primitives
//!
//! The concrete cryptography behind forest nodes. The node layer only ever
//! sees these through its `Signer`/`Verifier` ports, so nothing here knows
//! about node layouts or wire formats.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-512/256 | Content-addressed node identifiers |
//! | `signatures` | Ed25519 | Identity signatures over node bytes |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **SHA-512/256**: Truncated SHA-512, immune to length extension

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha512_256, Sha512_256Hasher, DIGEST_LENGTH};
pub use signatures::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
