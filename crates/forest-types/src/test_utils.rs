//! Deterministic signed fixtures.
//!
//! Seeds are fixed and the clock advances by one millisecond per node, so
//! every fixture has stable ids and a strict creation order.

use crate::adapters::{Ed25519Signer, FixedTimeSource};
use crate::nodes::{new_identity_at, Builder, Community, Conversation, Identity, Node, Reply};
use crate::ports::TimeSource;
use crate::twig::Twig;
use std::sync::atomic::{AtomicU64, Ordering};

pub const ALICE_SEED: [u8; 32] = [0xA1; 32];
pub const BOB_SEED: [u8; 32] = [0xB0; 32];

/// Clock that ticks forward on every read.
#[derive(Debug)]
pub struct SteppingTimeSource {
    next: AtomicU64,
}

impl SteppingTimeSource {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl TimeSource for SteppingTimeSource {
    fn now_millis(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

pub fn metadata() -> Twig {
    let mut twig = Twig::new();
    twig.set("fixture", 1, "true").ok();
    twig
}

/// A builder for a fresh identity derived from `seed`.
pub fn builder_for(seed: [u8; 32], name: &str) -> Builder<Ed25519Signer> {
    let signer = Ed25519Signer::from_seed(seed);
    let identity = new_identity_at(&signer, name, &metadata(), &FixedTimeSource(1_000))
        .expect("fixture identity");
    Builder::new(identity, signer)
        .expect("fixture builder")
        .with_time_source(SteppingTimeSource::starting_at(2_000))
}

/// One node of every variant, all signed by the same identity.
pub struct TestForest {
    pub builder: Builder<Ed25519Signer>,
    pub identity: Identity,
    pub community: Community,
    pub conversation: Conversation,
    pub reply: Reply,
}

impl TestForest {
    pub fn new() -> Self {
        let builder = builder_for(ALICE_SEED, "alice");
        let identity = builder.identity().clone();
        let community = builder
            .new_community("general", &metadata())
            .expect("fixture community");
        let conversation = builder
            .new_conversation(&community, "first post", &Twig::new())
            .expect("fixture conversation");
        let reply = builder
            .new_reply(&Node::from(conversation.clone()), "a reply", &metadata())
            .expect("fixture reply");
        Self {
            builder,
            identity,
            community,
            conversation,
            reply,
        }
    }

    pub fn all_nodes(&self) -> Vec<Node> {
        vec![
            self.identity.clone().into(),
            self.community.clone().into(),
            self.conversation.clone().into(),
            self.reply.clone().into(),
        ]
    }

    /// An unrelated identity.
    pub fn stranger_identity(&self) -> Identity {
        builder_for(BOB_SEED, "bob").identity().clone()
    }

    /// Reply to `parent` from this forest's identity.
    pub fn reply_to(&self, parent: &Node, content: &str) -> Reply {
        self.builder
            .new_reply(parent, content, &Twig::new())
            .expect("fixture reply")
    }
}

impl Default for TestForest {
    fn default() -> Self {
        Self::new()
    }
}
