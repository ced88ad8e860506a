//! # Ports
//!
//! Capabilities the node layer needs but does not implement. Production
//! adapters live in `adapters`; tests inject their own.

use crate::fields::{QualifiedKey, QualifiedSignature};
use forest_crypto::CryptoError;

/// Produces signatures on behalf of one identity.
pub trait Signer: Send + Sync {
    fn sign(&self, message: &[u8]) -> Result<QualifiedSignature, CryptoError>;

    /// Key that verifies this signer's signatures.
    fn public_key(&self) -> QualifiedKey;
}

/// Checks signatures. Unknown key or signature types never verify.
pub trait Verifier: Send + Sync {
    fn verify(&self, key: &QualifiedKey, message: &[u8], signature: &QualifiedSignature) -> bool;
}

/// Wall clock used to stamp `created`, in milliseconds since the Unix epoch.
pub trait TimeSource: Send + Sync {
    fn now_millis(&self) -> u64;
}

impl<S: Signer + ?Sized> Signer for &S {
    fn sign(&self, message: &[u8]) -> Result<QualifiedSignature, CryptoError> {
        (**self).sign(message)
    }

    fn public_key(&self) -> QualifiedKey {
        (**self).public_key()
    }
}
