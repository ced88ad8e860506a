//! # Storage Flows
//!
//! `CacheStore` over a `FileStore`, across process-like restarts.

#[cfg(test)]
mod tests {
    use super::super::init_test_logging;
    use forest_store::test_utils::Scenario;
    use forest_store::{ancestry_of, descendants_of, CacheStore, FileStore, MemoryStore, Store};
    use forest_types::test_utils::TestForest;
    use forest_types::{Node, NodeType};
    use std::collections::HashSet;

    #[test]
    fn test_cold_cache_promotes_from_disk() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new();
        {
            let mut warm =
                CacheStore::new(MemoryStore::new(), FileStore::open(dir.path()).unwrap()).unwrap();
            for node in scenario.nodes() {
                warm.add(node).unwrap();
            }
            assert_eq!(warm.cache().len(), scenario.nodes().len());
        }

        let cold =
            CacheStore::new(MemoryStore::new(), FileStore::open(dir.path()).unwrap()).unwrap();
        assert!(cold.cache().is_empty());

        let r2 = cold.get(scenario.r2.id()).unwrap();
        assert_eq!(r2, Some(Node::from(scenario.r2.clone())));
        assert!(cold.cache().contains(scenario.r2.id()));
        assert!(!cold.cache().contains(scenario.r1.id()));

        // structure comes from disk even for uncached nodes
        assert_eq!(
            ancestry_of(&cold, scenario.r3a.id()).unwrap(),
            vec![
                scenario.r2.id().clone(),
                scenario.r1.id().clone(),
                scenario.community.id().clone(),
            ]
        );
    }

    #[test]
    fn test_seeded_cache_is_written_through() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new();

        let store = CacheStore::new(scenario.memory_store(), FileStore::open(dir.path()).unwrap())
            .unwrap();
        let (_, back) = store.into_parts();
        for node in scenario.nodes() {
            assert!(back.get(node.id()).unwrap().is_some());
        }
    }

    #[test]
    fn test_remove_subtree_through_both_tiers() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new();
        let mut store =
            CacheStore::new(MemoryStore::new(), FileStore::open(dir.path()).unwrap()).unwrap();
        for node in scenario.nodes() {
            store.add(node).unwrap();
        }

        store.remove_subtree(scenario.r2.id()).unwrap();

        for gone in [&scenario.r2, &scenario.r3a, &scenario.r3b] {
            assert!(store.get(gone.id()).unwrap().is_none());
            assert!(!store.cache().contains(gone.id()));
            assert!(!dir.path().join(gone.id().to_string()).exists());
        }
        assert_eq!(store.children(scenario.r1.id()).unwrap(), Vec::new());
        assert_eq!(
            descendants_of(&store, scenario.community.id()).unwrap(),
            vec![scenario.r1.id().clone()]
        );
    }

    #[test]
    fn test_file_and_memory_agree() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let forest = TestForest::new();
        let mut file = FileStore::open(dir.path()).unwrap();
        let mut memory = MemoryStore::new();
        let extra = forest.reply_to(&Node::from(forest.reply.clone()), "second");
        let mut nodes = forest.all_nodes();
        nodes.push(extra.into());
        for node in &nodes {
            file.add(node.clone()).unwrap();
            memory.add(node.clone()).unwrap();
        }

        for node_type in [NodeType::Identity, NodeType::Community, NodeType::Reply] {
            let from_file: Vec<_> = file.recent(node_type, 10).unwrap();
            let from_memory: Vec<_> = memory.recent(node_type, 10).unwrap();
            assert_eq!(from_file, from_memory, "{node_type}");
        }

        let thread_root = forest.conversation.id();
        let community = forest.community.id();
        assert!(file.get_conversation(community, thread_root).unwrap().is_some());
        assert!(file
            .get_reply(community, thread_root, forest.reply.id())
            .unwrap()
            .is_some());
        assert!(file
            .get_reply(community, forest.reply.id(), thread_root)
            .unwrap()
            .is_none());

        let children_file: HashSet<_> = file.children(community).unwrap().into_iter().collect();
        let children_memory: HashSet<_> =
            memory.children(community).unwrap().into_iter().collect();
        assert_eq!(children_file, children_memory);
    }

    #[test]
    fn test_copy_between_backends() {
        init_test_logging();
        let source_dir = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new();

        let mut source = FileStore::open(source_dir.path()).unwrap();
        for node in scenario.nodes() {
            source.add(node).unwrap();
        }
        let mut target = FileStore::open(target_dir.path()).unwrap();
        source.copy_into(&mut target).unwrap();
        // copying again is a no-op
        source.copy_into(&mut target).unwrap();

        for node in scenario.nodes() {
            assert_eq!(target.get(node.id()).unwrap(), Some(node));
        }
    }
}
