//! Descriptors: a namespaced type tag plus the byte length of what follows.

use super::codec::{Decode, Encode};
use super::tags::{ContentType, HashType, KeyType, SignatureType, Tag};
use crate::errors::{DecodeError, FieldError};
use std::fmt;

/// Encoded size of any descriptor.
pub const DESCRIPTOR_LENGTH: usize = 3;

/// Largest payload a descriptor can announce.
pub const MAX_PAYLOAD_LENGTH: usize = u16::MAX as usize;

/// `{type, length}` header for a payload in namespace `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Descriptor<T: Tag> {
    kind: T,
    length: u16,
}

pub type HashDescriptor = Descriptor<HashType>;
pub type ContentDescriptor = Descriptor<ContentType>;
pub type KeyDescriptor = Descriptor<KeyType>;
pub type SignatureDescriptor = Descriptor<SignatureType>;

impl<T: Tag> Descriptor<T> {
    /// Create a descriptor, enforcing the u16 limit and any fixed length.
    pub fn new(kind: T, length: usize) -> Result<Self, FieldError> {
        if length > MAX_PAYLOAD_LENGTH {
            return Err(FieldError::PayloadTooLarge { len: length });
        }
        if let Some(expected) = kind.fixed_length() {
            if usize::from(expected) != length {
                return Err(FieldError::WrongLength {
                    namespace: T::NAMESPACE,
                    kind: kind.label(),
                    expected,
                    actual: length,
                });
            }
        }
        Ok(Self {
            kind,
            length: length as u16,
        })
    }

    /// Descriptor for a type with a fixed length.
    pub(crate) fn fixed(kind: T) -> Self {
        Self {
            kind,
            length: kind.fixed_length().unwrap_or(0),
        }
    }

    pub fn kind(&self) -> T {
        self.kind
    }

    pub fn length(&self) -> u16 {
        self.length
    }
}

impl HashDescriptor {
    /// The descriptor every node built here uses for its id.
    pub fn sha512_256() -> Self {
        Self::fixed(HashType::Sha512_256)
    }
}

impl<T: Tag> Encode for Descriptor<T> {
    fn encode_into(&self, out: &mut Vec<u8>) {
        self.kind.as_u8().encode_into(out);
        self.length.encode_into(out);
    }

    fn encoded_len(&self) -> usize {
        DESCRIPTOR_LENGTH
    }
}

impl<T: Tag> Decode for Descriptor<T> {
    fn decode(input: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (tag, rest) = u8::decode(input)?;
        let kind = T::from_u8(tag)?;
        let (length, rest) = u16::decode(rest)?;
        if let Some(expected) = kind.fixed_length() {
            if expected != length {
                return Err(DecodeError::LengthMismatch {
                    namespace: T::NAMESPACE,
                    kind: kind.label(),
                    expected,
                    actual: length,
                });
            }
        }
        Ok((Self { kind, length }, rest))
    }
}

impl<T: Tag> fmt::Display for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.label(), self.length)
    }
}
