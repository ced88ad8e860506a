//! # Tamper Detection
//!
//! Altered bytes must never pass as the node they claim to be, whether they
//! arrive over the wire or sit in a store directory.

#[cfg(test)]
mod tests {
    use super::super::init_test_logging;
    use forest_store::test_utils::Scenario;
    use forest_store::{validate_deep, FileStore, MemoryStore, Store, StoreError};
    use forest_types::test_utils::TestForest;
    use forest_types::{
        validate_id, validate_shallow, DecodeError, Ed25519Verifier, Node, ValidationError,
    };
    use std::fs;

    fn position_of(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .position(|w| w == needle)
            .expect("needle present")
    }

    #[test]
    fn test_modified_content_fails_signature() {
        init_test_logging();
        let forest = TestForest::new();
        let original = forest.reply_to(&Node::from(forest.conversation.clone()), "tamper me");
        let mut bytes = original.marshal();
        let at = position_of(&bytes, b"tamper me");
        bytes[at] = b'T';

        let forged = Node::unmarshal(&bytes).unwrap();
        assert_ne!(forged.id(), original.id());
        assert_eq!(
            validate_shallow(&forged, Some(&forest.identity), &Ed25519Verifier),
            Err(ValidationError::SignatureInvalid {
                id: forged.id().clone()
            })
        );
        // the forged bytes can not be passed off under the original id
        assert!(matches!(
            validate_id(&forged, original.id()),
            Err(ValidationError::IdentityMismatch { .. })
        ));
    }

    #[test]
    fn test_modified_signature_keeps_id_but_fails() {
        init_test_logging();
        let forest = TestForest::new();
        let original = Node::from(forest.community.clone());
        let mut bytes = original.marshal();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let forged = Node::unmarshal(&bytes).unwrap();
        assert_eq!(forged.id(), original.id());
        assert!(matches!(
            validate_shallow(&forged, Some(&forest.identity), &Ed25519Verifier),
            Err(ValidationError::SignatureInvalid { .. })
        ));
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let forest = TestForest::new();
        let bytes = Node::from(forest.reply.clone()).marshal();
        for len in [0, 1, 7, bytes.len() / 2, bytes.len() - 1] {
            assert!(Node::unmarshal(&bytes[..len]).is_err(), "prefix of {len} bytes");
        }
        let mut longer = bytes.clone();
        longer.push(0);
        assert!(matches!(
            Node::unmarshal(&longer),
            Err(DecodeError::TrailingBytes(1))
        ));
    }

    #[test]
    fn test_foreign_signer_rejected_by_deep_validation() {
        init_test_logging();
        let scenario = Scenario::new();
        let store = scenario.memory_store();
        let stranger = scenario.forest.stranger_identity();

        // claims to be signed by the stranger, who is not stored
        let mut forged = Node::from(scenario.r1.clone());
        forged.common_mut().signer_id = stranger.id().clone();
        let err = validate_deep(&forged, &store, &Ed25519Verifier).unwrap_err();
        assert!(err.is_reference_missing());

        // once stored, the stranger's key does not verify alice's signature
        let mut store = store;
        store.add(stranger.clone().into()).unwrap();
        assert!(validate_deep(&forged, &store, &Ed25519Verifier).is_err());
    }

    #[test]
    fn test_renamed_file_is_caught() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.add(scenario.r3a.clone().into()).unwrap();

        // r3b's name, r3a's bytes
        fs::copy(
            dir.path().join(scenario.r3a.id().to_string()),
            dir.path().join(scenario.r3b.id().to_string()),
        )
        .unwrap();

        let err = store.get(scenario.r3b.id()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::IdentityMismatch { .. })
        ));
        assert!(store.get(scenario.r3a.id()).unwrap().is_some());
    }

    #[test]
    fn test_garbage_file_is_corrupt_and_skipped_by_scans() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new();
        let mut store = FileStore::open(dir.path()).unwrap();
        for node in scenario.nodes() {
            store.add(node).unwrap();
        }
        fs::write(dir.path().join(scenario.unstored.id().to_string()), b"garbage").unwrap();
        fs::write(dir.path().join("README"), b"not a node").unwrap();

        assert!(matches!(
            store.get(scenario.unstored.id()),
            Err(StoreError::Corrupt { .. })
        ));

        let mut copy = MemoryStore::new();
        store.copy_into(&mut copy).unwrap();
        assert_eq!(copy.len(), scenario.nodes().len());
        assert_eq!(store.children(scenario.r3b.id()).unwrap(), Vec::new());
    }
}
