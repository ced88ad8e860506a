//! # Shallow Validation
//!
//! Checks that need nothing beyond the node itself and, optionally, the
//! identity that signed it. Checks that resolve references through a store
//! live with the stores.
//!
//! Order: field invariants, then the signature, then the id. A tampered
//! signed field therefore surfaces as `SignatureInvalid` before the id is
//! compared.

use crate::errors::{FieldError, ValidationError};
use crate::fields::{ContentType, HashType, KeyType, NodeType, QualifiedContent, QualifiedHash};
use crate::nodes::{Identity, Node, SCHEMA_VERSION};
use crate::ports::Verifier;
use crate::twig::Twig;

fn structure(node_type: NodeType, reason: &'static str) -> FieldError {
    FieldError::Structure { node_type, reason }
}

/// Content must decode under its declared type.
pub fn validate_content(field: &'static str, content: &QualifiedContent) -> Result<(), FieldError> {
    match content.kind() {
        ContentType::Utf8 => std::str::from_utf8(content.payload())
            .map(|_| ())
            .map_err(|_| FieldError::InvalidUtf8 { field }),
        ContentType::Twig => Twig::decode(content.payload())
            .map(|_| ())
            .map_err(|source| FieldError::InvalidTwig { field, source }),
    }
}

fn validate_name(name: &QualifiedContent) -> Result<(), FieldError> {
    validate_content("name", name)?;
    if name.payload().contains(&b'\n') {
        return Err(FieldError::NameContainsNewline { field: "name" });
    }
    Ok(())
}

/// Per-field and per-variant structural rules.
pub fn validate_fields(node: &Node) -> Result<(), FieldError> {
    let node_type = node.node_type();
    let common = node.common();
    if common.schema_version != SCHEMA_VERSION {
        return Err(structure(node_type, "unsupported schema version"));
    }
    if common.id_descriptor.kind() != HashType::Sha512_256 {
        return Err(structure(node_type, "id descriptor must name a digest"));
    }
    validate_content("metadata", &common.metadata)?;

    let is_root = common.parent.is_null();
    if is_root && common.tree_depth != 0 {
        return Err(structure(node_type, "root nodes must have depth 0"));
    }

    match node {
        Node::Identity(identity) => {
            validate_name(&identity.name)?;
            if identity.public_key.kind() == KeyType::NoKey {
                return Err(structure(node_type, "identity has no public key"));
            }
            if !is_root || !common.signer_id.is_null() {
                return Err(structure(node_type, "identity must be a self-signed root"));
            }
        }
        Node::Community(community) => {
            validate_name(&community.name)?;
            if !is_root {
                return Err(structure(node_type, "community must be a root"));
            }
        }
        Node::Conversation(conversation) => {
            validate_content("content", &conversation.content)?;
            if is_root {
                return Err(structure(node_type, "conversation needs a parent community"));
            }
        }
        Node::Reply(reply) => {
            validate_content("content", &reply.content)?;
            if is_root || reply.community_id.is_null() {
                return Err(structure(node_type, "reply needs a parent and a community"));
            }
        }
    }
    if node_type != NodeType::Identity && common.signer_id.is_null() {
        return Err(structure(node_type, "missing signer"));
    }
    Ok(())
}

/// Recompute the id and compare it with `expected`.
pub fn validate_id(node: &Node, expected: &QualifiedHash) -> Result<(), ValidationError> {
    let actual = node.compute_id();
    if &actual != expected {
        return Err(ValidationError::IdentityMismatch {
            expected: expected.clone(),
            actual,
        });
    }
    Ok(())
}

/// Verify the node's signature with `identity`'s key.
///
/// Identity nodes are checked against themselves, so `identity` must be the
/// node itself in that case.
pub fn validate_signature(
    node: &Node,
    identity: &Identity,
    verifier: &dyn Verifier,
) -> Result<(), ValidationError> {
    let expected_signer = match node {
        Node::Identity(_) => node.id(),
        _ => node.signer_id(),
    };
    if expected_signer != identity.id() {
        return Err(ValidationError::SignerMismatch {
            id: node.id().clone(),
            signer_id: expected_signer.clone(),
            identity: identity.id().clone(),
        });
    }
    let verified = verifier.verify(
        &identity.public_key,
        &node.signed_bytes(),
        &node.common().signature,
    );
    if !verified {
        return Err(ValidationError::SignatureInvalid {
            id: node.id().clone(),
        });
    }
    Ok(())
}

/// Self-contained checks. The signature is verified when the signer is an
/// identity node or `signer` is supplied.
pub fn validate_shallow(
    node: &Node,
    signer: Option<&Identity>,
    verifier: &dyn Verifier,
) -> Result<(), ValidationError> {
    validate_fields(node)?;
    match (node, signer) {
        (Node::Identity(identity), _) => validate_signature(node, identity, verifier)?,
        (_, Some(identity)) => validate_signature(node, identity, verifier)?,
        (_, None) => {}
    }
    validate_id(node, node.id())
}
