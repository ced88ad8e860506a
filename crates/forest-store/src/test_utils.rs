//! Store fixtures.

use crate::adapters::storage::MemoryStore;
use crate::ports::outbound::Store;
use forest_types::test_utils::TestForest;
use forest_types::{Community, Identity, Node, Reply};

/// A small reply tree under one community:
///
/// ```text
/// community
/// └── r1
///     └── r2
///         ├── r3a
///         └── r3b
/// ```
///
/// `unstored` is a valid reply under `r3b` that no store holds.
pub struct Scenario {
    pub forest: TestForest,
    pub identity: Identity,
    pub community: Community,
    pub r1: Reply,
    pub r2: Reply,
    pub r3a: Reply,
    pub r3b: Reply,
    pub unstored: Reply,
}

impl Scenario {
    pub fn new() -> Self {
        let forest = TestForest::new();
        let identity = forest.identity.clone();
        let community = forest.community.clone();
        let r1 = forest.reply_to(&Node::from(community.clone()), "r1");
        let r2 = forest.reply_to(&Node::from(r1.clone()), "r2");
        let r3a = forest.reply_to(&Node::from(r2.clone()), "r3a");
        let r3b = forest.reply_to(&Node::from(r2.clone()), "r3b");
        let unstored = forest.reply_to(&Node::from(r3b.clone()), "unstored");
        Self {
            forest,
            identity,
            community,
            r1,
            r2,
            r3a,
            r3b,
            unstored,
        }
    }

    /// Stored nodes, parents first.
    pub fn nodes(&self) -> Vec<Node> {
        vec![
            self.identity.clone().into(),
            self.community.clone().into(),
            self.r1.clone().into(),
            self.r2.clone().into(),
            self.r3a.clone().into(),
            self.r3b.clone().into(),
        ]
    }

    pub fn memory_store(&self) -> MemoryStore {
        let mut store = MemoryStore::new();
        for node in self.nodes() {
            store.add(node).expect("memory add");
        }
        store
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}
