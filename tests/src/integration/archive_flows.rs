//! # Archive Flows
//!
//! The archive in front of real store stacks, with several components
//! writing and subscribing at once.

#[cfg(test)]
mod tests {
    use super::super::init_test_logging;
    use forest_bus::{Archive, ArchiveConfig, Subscription};
    use forest_store::test_utils::Scenario;
    use forest_store::{walk, CacheStore, FileStore, MemoryStore, Store, StoreError, WalkError};
    use forest_types::test_utils::TestForest;
    use forest_types::{Ed25519Verifier, Node, NodeType, QualifiedHash};
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    /// Community plus ten replies, eleven ids reachable from the community:
    ///
    /// ```text
    /// community
    /// ├── a ── a1, a2 ── a2x
    /// ├── b ── b1, b2
    /// └── c ── c1, c2
    /// ```
    fn eleven_node_tree(forest: &TestForest) -> Vec<Node> {
        let community = Node::from(forest.community.clone());
        let mut nodes = vec![
            Node::from(forest.identity.clone()),
            community.clone(),
        ];
        for top in ["a", "b", "c"] {
            let parent = Node::from(forest.reply_to(&community, top));
            nodes.push(parent.clone());
            for leaf in ["1", "2"] {
                let child = Node::from(forest.reply_to(&parent, &format!("{top}{leaf}")));
                nodes.push(child.clone());
                if top == "a" && leaf == "2" {
                    nodes.push(forest.reply_to(&child, "a2x").into());
                }
            }
        }
        nodes
    }

    fn recorder() -> (Arc<Mutex<Vec<QualifiedHash>>>, impl Fn(&Node) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |node: &Node| sink.lock().push(node.id().clone()))
    }

    // =========================================================================
    // ARCHIVE OVER PERSISTENT STORES
    // =========================================================================

    #[test]
    fn test_archive_over_cached_file_store() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new();

        {
            let stack =
                CacheStore::new(MemoryStore::new(), FileStore::open(dir.path()).unwrap()).unwrap();
            let archive = Archive::new(stack, ArchiveConfig::default()).unwrap();
            for node in scenario.nodes() {
                archive.add_validated(node, Ed25519Verifier).unwrap();
            }

            assert_eq!(
                archive.ancestry_of(scenario.r3b.id()).unwrap(),
                vec![
                    scenario.r2.id().clone(),
                    scenario.r1.id().clone(),
                    scenario.community.id().clone(),
                ]
            );
            let leaves: HashSet<_> = archive
                .leaves_of(scenario.community.id())
                .unwrap()
                .into_iter()
                .collect();
            assert_eq!(
                leaves,
                HashSet::from([scenario.r3a.id().clone(), scenario.r3b.id().clone()])
            );
            archive.destroy();
        }

        // everything survived on disk
        let reopened = FileStore::open(dir.path()).unwrap();
        for node in scenario.nodes() {
            assert_eq!(reopened.get(node.id()).unwrap(), Some(node));
        }
        assert_eq!(reopened.children(scenario.r2.id()).unwrap().len(), 2);
    }

    #[test]
    fn test_add_validated_rejects_out_of_order_then_accepts() {
        init_test_logging();
        let scenario = Scenario::new();
        let archive = Archive::with_defaults(MemoryStore::new()).unwrap();
        let (seen, hook) = recorder();
        archive.subscribe_post_add(hook).unwrap();

        let early = archive.add_validated(scenario.r1.clone().into(), Ed25519Verifier);
        assert!(early.unwrap_err().is_reference_missing());
        assert!(seen.lock().is_empty());

        for node in scenario.nodes() {
            archive.add_validated(node, Ed25519Verifier).unwrap();
        }
        assert_eq!(seen.lock().len(), scenario.nodes().len());
    }

    // =========================================================================
    // PUB/SUB BETWEEN COMPONENTS
    // =========================================================================

    /// Two components share one archive; each hears the other's writes but
    /// never its own.
    #[test]
    fn test_components_do_not_hear_their_own_writes() {
        init_test_logging();
        let forest = TestForest::new();
        let archive = Arc::new(Archive::with_defaults(MemoryStore::new()).unwrap());

        let (left_seen, left_hook) = recorder();
        let (right_seen, right_hook) = recorder();
        let left = archive.subscribe_post_add(left_hook).unwrap();
        let right = archive.subscribe_post_add(right_hook).unwrap();
        assert_ne!(left, right);
        assert_ne!(left, Subscription::NONE);

        let nodes = forest.all_nodes();
        archive.add_as(nodes[0].clone(), left).unwrap();
        archive.add_as(nodes[1].clone(), right).unwrap();
        archive.add_as(nodes[2].clone(), left).unwrap();
        archive.add_as(nodes[3].clone(), right).unwrap();

        assert_eq!(
            *left_seen.lock(),
            vec![nodes[1].id().clone(), nodes[3].id().clone()]
        );
        assert_eq!(
            *right_seen.lock(),
            vec![nodes[0].id().clone(), nodes[2].id().clone()]
        );
    }

    #[test]
    fn test_pre_add_hook_runs_before_node_is_visible() {
        init_test_logging();
        let forest = TestForest::new();
        let archive = Archive::with_defaults(MemoryStore::new()).unwrap();
        let (pre_seen, pre_hook) = recorder();
        let (post_seen, post_hook) = recorder();
        archive.subscribe_pre_add(pre_hook).unwrap();
        archive.subscribe_post_add(post_hook).unwrap();

        let identity: Node = forest.identity.clone().into();
        archive.add(identity.clone()).unwrap();
        archive.add(identity.clone()).unwrap();

        assert_eq!(*pre_seen.lock(), vec![identity.id().clone()]);
        assert_eq!(*post_seen.lock(), vec![identity.id().clone()]);
    }

    // =========================================================================
    // CONCURRENCY
    // =========================================================================

    #[test]
    fn test_concurrent_writers_and_readers() {
        init_test_logging();
        let forest = TestForest::new();
        let nodes = eleven_node_tree(&forest);
        let archive = Arc::new(Archive::with_defaults(MemoryStore::new()).unwrap());
        let (seen, hook) = recorder();
        archive.subscribe_post_add(hook).unwrap();

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let archive = Arc::clone(&archive);
                let nodes = nodes.clone();
                std::thread::spawn(move || {
                    for node in nodes {
                        archive.add(node).unwrap();
                    }
                })
            })
            .collect();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let archive = Arc::clone(&archive);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let recent = archive.recent(NodeType::Reply, 3).unwrap();
                        assert!(recent.len() <= 3);
                    }
                })
            })
            .collect();
        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        let notified: HashSet<_> = seen.lock().iter().cloned().collect();
        assert_eq!(seen.lock().len(), nodes.len());
        assert_eq!(notified.len(), nodes.len());
        assert_eq!(
            archive
                .descendants_of(forest.community.id())
                .unwrap()
                .len(),
            10
        );
    }

    // =========================================================================
    // WALKS THROUGH THE ARCHIVE
    // =========================================================================

    #[derive(Debug)]
    struct Enough;

    impl std::fmt::Display for Enough {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("enough")
        }
    }

    impl std::error::Error for Enough {}

    #[test]
    fn test_walk_stops_after_five_of_eleven() {
        init_test_logging();
        let forest = TestForest::new();
        let archive = Archive::with_defaults(MemoryStore::new()).unwrap();
        for node in eleven_node_tree(&forest) {
            archive.add(node).unwrap();
        }

        let mut everything = Vec::new();
        walk(&archive, forest.community.id(), |id| {
            everything.push(id.clone());
            Ok(())
        })
        .unwrap();
        assert_eq!(everything.len(), 11);

        let mut visited = Vec::new();
        let result = walk(&archive, forest.community.id(), |id| {
            visited.push(id.clone());
            if visited.len() == 5 {
                return Err(Enough.into());
            }
            Ok(())
        });

        assert_eq!(visited.len(), 5);
        match result {
            Err(WalkError::Visitor { id, source }) => {
                assert_eq!(&id, &visited[4]);
                assert!(source.downcast_ref::<Enough>().is_some());
            }
            other => panic!("expected visitor error, got {other:?}"),
        }
    }

    #[test]
    fn test_destroyed_archive_refuses_work() {
        init_test_logging();
        let scenario = Scenario::new();
        let archive = Archive::with_defaults(scenario.memory_store()).unwrap();
        archive.destroy();

        let mut copy = MemoryStore::new();
        assert!(matches!(archive.copy_into(&mut copy), Err(StoreError::Closed)));
        assert!(matches!(
            archive.subscribe_post_add(|_| {}),
            Err(StoreError::Closed)
        ));
        assert!(copy.is_empty());
    }
}
