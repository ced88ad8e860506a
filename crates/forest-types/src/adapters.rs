//! Ed25519 and system-clock implementations of the ports.

use crate::fields::{KeyType, QualifiedKey, QualifiedSignature, SignatureType};
use crate::ports::{Signer, TimeSource, Verifier};
use forest_crypto::{CryptoError, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use tracing::trace;

/// Signs with an in-memory Ed25519 key pair.
#[derive(Debug)]
pub struct Ed25519Signer {
    keypair: Ed25519KeyPair,
}

impl Ed25519Signer {
    pub fn new(keypair: Ed25519KeyPair) -> Self {
        Self { keypair }
    }

    pub fn generate() -> Self {
        Self::new(Ed25519KeyPair::generate())
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::new(Ed25519KeyPair::from_seed(seed))
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<QualifiedSignature, CryptoError> {
        Ok(QualifiedSignature::ed25519(&self.keypair.sign(message)))
    }

    fn public_key(&self) -> QualifiedKey {
        QualifiedKey::ed25519(&self.keypair.public_key())
    }
}

/// Verifies Ed25519 signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl Verifier for Ed25519Verifier {
    fn verify(&self, key: &QualifiedKey, message: &[u8], signature: &QualifiedSignature) -> bool {
        if key.kind() != KeyType::Ed25519 || signature.kind() != SignatureType::Ed25519 {
            trace!(key = %key.kind(), signature = %signature.kind(), "unsupported algorithm");
            return false;
        }
        let verified = Ed25519PublicKey::from_slice(key.payload()).and_then(|public| {
            let sig = Ed25519Signature::from_slice(signature.payload())?;
            public.verify(message, &sig)
        });
        verified.is_ok()
    }
}

/// Reads the host clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub u64);

impl TimeSource for FixedTimeSource {
    fn now_millis(&self) -> u64 {
        self.0
    }
}
