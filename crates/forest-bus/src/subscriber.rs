//! # Subscriptions
//!
//! Hook registries for the archive. Ids come from one counter shared by
//! both registries; `Subscription::NONE` is never handed out, so it can
//! stand for "exclude nobody".

use forest_types::Node;
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// Handle for a registered hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subscription(u64);

impl Subscription {
    /// Never assigned to a hook.
    pub const NONE: Subscription = Subscription(0);

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Handler invoked inside the archive worker for each new node.
pub type Hook = Box<dyn Fn(&Node) + Send>;

/// When a hook fires relative to the store write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreAdd,
    PostAdd,
}

#[derive(Default)]
pub(crate) struct Hooks {
    last: u64,
    pre_add: BTreeMap<Subscription, Hook>,
    post_add: BTreeMap<Subscription, Hook>,
}

impl Hooks {
    fn in_use(&self, id: Subscription) -> bool {
        self.pre_add.contains_key(&id) || self.post_add.contains_key(&id)
    }

    fn next_id(&mut self) -> Subscription {
        loop {
            self.last = self.last.wrapping_add(1);
            let candidate = Subscription(self.last);
            if candidate != Subscription::NONE && !self.in_use(candidate) {
                return candidate;
            }
        }
    }

    fn registry(&mut self, phase: Phase) -> &mut BTreeMap<Subscription, Hook> {
        match phase {
            Phase::PreAdd => &mut self.pre_add,
            Phase::PostAdd => &mut self.post_add,
        }
    }

    pub(crate) fn subscribe(&mut self, phase: Phase, hook: Hook) -> Subscription {
        let id = self.next_id();
        self.registry(phase).insert(id, hook);
        id
    }

    /// Returns whether a hook was registered under `id`.
    pub(crate) fn unsubscribe(&mut self, phase: Phase, id: Subscription) -> bool {
        self.registry(phase).remove(&id).is_some()
    }

    /// Run every hook of `phase` in ascending id order, skipping `excluded`.
    pub(crate) fn notify(&self, phase: Phase, node: &Node, excluded: Subscription) {
        let registry = match phase {
            Phase::PreAdd => &self.pre_add,
            Phase::PostAdd => &self.post_add,
        };
        for (id, hook) in registry {
            if *id == excluded {
                continue;
            }
            trace!(subscription = %id, phase = ?phase, node = %node.id(), "dispatching hook");
            hook(node);
        }
    }
}
