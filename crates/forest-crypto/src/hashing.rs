//! # SHA-512/256 Hashing
//!
//! Node identifiers are the SHA-512/256 digest of a node's signed bytes.
//! The truncated variant keeps identifiers at 32 bytes while running at
//! SHA-512 speed on 64-bit hosts.

use sha2::{Digest, Sha512_256};

/// Length of a SHA-512/256 digest in bytes.
pub const DIGEST_LENGTH: usize = 32;

/// SHA-512/256 output.
pub type Hash = [u8; DIGEST_LENGTH];

/// Stateful SHA-512/256 hasher.
pub struct Sha512_256Hasher {
    inner: Sha512_256,
}

impl Sha512_256Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha512_256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        let mut out = [0u8; DIGEST_LENGTH];
        out.copy_from_slice(&self.inner.finalize());
        out
    }
}

impl Default for Sha512_256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with SHA-512/256 (one-shot).
pub fn sha512_256(data: &[u8]) -> Hash {
    let mut hasher = Sha512_256Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
