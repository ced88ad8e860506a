//! # Deep Validation
//!
//! Resolves a node's references through a store. A reference that is not
//! stored yet is `ReferenceMissing`, which callers can treat as "not synced"
//! rather than "corrupt".

use super::errors::StoreError;
use crate::ports::outbound::Store;
use forest_types::{
    validate_shallow, Identity, Node, NodeType, QualifiedHash, ValidationError, Verifier,
};

fn resolve<S: Store + ?Sized>(
    store: &S,
    node: &Node,
    reference: &'static str,
    target: &QualifiedHash,
) -> Result<Node, StoreError> {
    store.get(target)?.ok_or_else(|| {
        ValidationError::ReferenceMissing {
            id: node.id().clone(),
            reference,
            target: target.clone(),
        }
        .into()
    })
}

fn expect_type(
    node: &Node,
    reference: &'static str,
    found: &Node,
    allowed: &[NodeType],
) -> Result<(), ValidationError> {
    if allowed.contains(&found.node_type()) {
        return Ok(());
    }
    Err(ValidationError::WrongReferenceType {
        id: node.id().clone(),
        reference,
        target: found.id().clone(),
        expected: allowed[0],
        actual: found.node_type(),
    })
}

/// Check `node` against the references it makes into `store`, then verify
/// its signature with the resolved signer.
pub fn validate_deep<S: Store + ?Sized>(
    node: &Node,
    store: &S,
    verifier: &dyn Verifier,
) -> Result<(), StoreError> {
    let signer: Option<Identity> = match node {
        Node::Identity(_) => None,
        _ => {
            let found = resolve(store, node, "signer", node.signer_id())?;
            expect_type(node, "signer", &found, &[NodeType::Identity])?;
            found.as_identity().cloned()
        }
    };

    let parent_id = node.parent_id();
    if !parent_id.is_null() {
        let parent = resolve(store, node, "parent", parent_id)?;
        let allowed: &[NodeType] = match node {
            Node::Conversation(_) => &[NodeType::Community],
            _ => &[NodeType::Community, NodeType::Conversation, NodeType::Reply],
        };
        expect_type(node, "parent", &parent, allowed)?;
        let expected = parent.tree_depth() + 1;
        if node.tree_depth() != expected {
            return Err(ValidationError::DepthMismatch {
                id: node.id().clone(),
                expected,
                actual: node.tree_depth(),
            }
            .into());
        }
    }

    if let Node::Reply(reply) = node {
        let community = resolve(store, node, "community", &reply.community_id)?;
        expect_type(node, "community", &community, &[NodeType::Community])?;
        if !reply.conversation_id.is_null() {
            let root = resolve(store, node, "conversation", &reply.conversation_id)?;
            expect_type(
                node,
                "conversation",
                &root,
                &[NodeType::Conversation, NodeType::Reply],
            )?;
        }
    }

    validate_shallow(node, signer.as_ref(), verifier)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::test_utils::Scenario;
    use forest_types::Ed25519Verifier;

    #[test]
    fn test_complete_store_validates() {
        let scenario = Scenario::new();
        let store = scenario.memory_store();
        for node in scenario.nodes() {
            validate_deep(&node, &store, &Ed25519Verifier).unwrap();
        }
    }

    #[test]
    fn test_missing_parent_is_reference_missing() {
        let scenario = Scenario::new();
        let mut store = MemoryStore::new();
        store.add(scenario.identity.clone().into()).unwrap();
        store.add(scenario.community.clone().into()).unwrap();

        let err = validate_deep(&scenario.r2.clone().into(), &store, &Ed25519Verifier).unwrap_err();
        assert!(err.is_reference_missing());
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::ReferenceMissing {
                reference: "parent",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_signer() {
        let scenario = Scenario::new();
        let store = MemoryStore::new();
        let err = validate_deep(&scenario.community.clone().into(), &store, &Ed25519Verifier)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::ReferenceMissing {
                reference: "signer",
                ..
            })
        ));
    }

    #[test]
    fn test_identity_needs_nothing_from_store() {
        let scenario = Scenario::new();
        let store = MemoryStore::new();
        validate_deep(&scenario.identity.clone().into(), &store, &Ed25519Verifier).unwrap();
    }

    #[test]
    fn test_depth_mismatch() {
        let scenario = Scenario::new();
        let store = scenario.memory_store();
        let mut node: Node = scenario.r2.clone().into();
        node.common_mut().tree_depth = 7;
        assert!(matches!(
            validate_deep(&node, &store, &Ed25519Verifier),
            Err(StoreError::Validation(ValidationError::DepthMismatch {
                expected: 2,
                actual: 7,
                ..
            }))
        ));
    }

    #[test]
    fn test_tampered_node_fails_signature() {
        let scenario = Scenario::new();
        let store = scenario.memory_store();
        let mut reply = scenario.r3a.clone();
        reply.content = forest_types::QualifiedContent::utf8("edited").unwrap();
        assert!(matches!(
            validate_deep(&reply.into(), &store, &Ed25519Verifier),
            Err(StoreError::Validation(ValidationError::SignatureInvalid { .. }))
        ));
    }
}
