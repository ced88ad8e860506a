//! # Wire Fields
//!
//! Tags, descriptors and qualified values, plus the progressive codec they
//! share with the node layer.

mod codec;
mod descriptor;
mod qualified;
mod tags;

pub use codec::{take, Decode, Encode};
pub use descriptor::{
    ContentDescriptor, Descriptor, HashDescriptor, KeyDescriptor, SignatureDescriptor,
    DESCRIPTOR_LENGTH, MAX_PAYLOAD_LENGTH,
};
pub use qualified::{
    Qualified, QualifiedContent, QualifiedHash, QualifiedKey, QualifiedSignature,
};
pub use tags::{ContentType, HashType, KeyType, NodeType, SignatureType, Tag};
