//! # Qualified Values
//!
//! A descriptor followed by exactly `descriptor.length` payload bytes. Every
//! variable-length node field is one of these.
//!
//! The text form `<TYPE>_<len>__<hex>` names node files on disk and shows up
//! in logs; the null hash renders as `NULL_0__`.

use super::codec::{take, Decode, Encode};
use super::descriptor::{Descriptor, DESCRIPTOR_LENGTH};
use super::tags::{ContentType, HashType, KeyType, SignatureType, Tag};
use crate::errors::{DecodeError, FieldError};
use std::fmt;
use std::str::FromStr;

/// A tagged, length-prefixed payload.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Qualified<T: Tag> {
    descriptor: Descriptor<T>,
    payload: Vec<u8>,
}

pub type QualifiedHash = Qualified<HashType>;
pub type QualifiedContent = Qualified<ContentType>;
pub type QualifiedKey = Qualified<KeyType>;
pub type QualifiedSignature = Qualified<SignatureType>;

impl<T: Tag> Qualified<T> {
    pub fn new(kind: T, payload: impl Into<Vec<u8>>) -> Result<Self, FieldError> {
        let payload = payload.into();
        let descriptor = Descriptor::new(kind, payload.len())?;
        Ok(Self {
            descriptor,
            payload,
        })
    }

    /// Zero-length stand-in that is replaced before a node leaves the builder.
    pub(crate) fn placeholder(kind: T) -> Self {
        Self {
            descriptor: Descriptor::fixed(kind),
            payload: Vec::new(),
        }
    }

    pub fn descriptor(&self) -> Descriptor<T> {
        self.descriptor
    }

    pub fn kind(&self) -> T {
        self.descriptor.kind()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl QualifiedHash {
    /// The reserved "no parent" hash.
    pub fn null() -> Self {
        Self::placeholder(HashType::Null)
    }

    pub fn is_null(&self) -> bool {
        self.kind() == HashType::Null
    }

    /// Wrap a digest already known to have the right length.
    pub(crate) fn from_digest(kind: HashType, digest: Vec<u8>) -> Self {
        Self {
            descriptor: Descriptor::fixed(kind),
            payload: digest,
        }
    }
}

impl QualifiedContent {
    pub fn utf8(text: &str) -> Result<Self, FieldError> {
        Self::new(ContentType::Utf8, text.as_bytes())
    }

    /// Payload as text, when the content is UTF-8 typed and valid.
    pub fn as_str(&self) -> Option<&str> {
        match self.kind() {
            ContentType::Utf8 => std::str::from_utf8(&self.payload).ok(),
            ContentType::Twig => None,
        }
    }
}

impl<T: Tag> Encode for Qualified<T> {
    fn encode_into(&self, out: &mut Vec<u8>) {
        self.descriptor.encode_into(out);
        out.extend_from_slice(&self.payload);
    }

    fn encoded_len(&self) -> usize {
        DESCRIPTOR_LENGTH + self.payload.len()
    }
}

impl<T: Tag> Decode for Qualified<T> {
    fn decode(input: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (descriptor, rest) = Descriptor::<T>::decode(input)?;
        let (payload, rest) = take(rest, usize::from(descriptor.length()))?;
        Ok((
            Self {
                descriptor,
                payload: payload.to_vec(),
            },
            rest,
        ))
    }
}

impl<T: Tag> fmt::Display for Qualified<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}__{}", self.descriptor, hex::encode(&self.payload))
    }
}

impl<T: Tag> fmt::Debug for Qualified<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<T: Tag> FromStr for Qualified<T> {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidText(s.to_string());
        let (head, hex_payload) = s.split_once("__").ok_or_else(invalid)?;
        let (label, length) = head.rsplit_once('_').ok_or_else(invalid)?;
        let kind = T::from_label(label).ok_or_else(invalid)?;
        let length: usize = length.parse().map_err(|_| invalid())?;
        let payload = hex::decode(hex_payload).map_err(|_| invalid())?;
        if payload.len() != length {
            return Err(invalid());
        }
        Self::new(kind, payload).map_err(|_| invalid())
    }
}

// Keys and signatures cross into forest-crypto as raw bytes.
impl QualifiedKey {
    pub fn ed25519(public_key: &forest_crypto::Ed25519PublicKey) -> Self {
        Self {
            descriptor: Descriptor::fixed(KeyType::Ed25519),
            payload: public_key.as_bytes().to_vec(),
        }
    }
}

impl QualifiedSignature {
    pub fn ed25519(signature: &forest_crypto::Ed25519Signature) -> Self {
        Self {
            descriptor: Descriptor::fixed(SignatureType::Ed25519),
            payload: signature.as_bytes().to_vec(),
        }
    }
}
