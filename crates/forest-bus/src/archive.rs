//! # Archive
//!
//! Wraps a `Store` and funnels every operation, reads included, through one
//! worker thread. Callers block until their own request has run, so any
//! number of threads can share an `Archive` while the wrapped store only
//! ever sees one operation at a time.
//!
//! Hooks run on the worker thread. A hook must not call back into the
//! archive, and a hook that blocks stalls every caller. Pre-add hooks run
//! before the wrapped store accepts the node and are not retracted if that
//! add fails, so a pre-add subscriber may hear of a node that never becomes
//! visible. Post-add hooks only fire for nodes the store accepted.

use crate::config::ArchiveConfig;
use crate::subscriber::{Hook, Hooks, Phase, Subscription};
use forest_store::{
    ancestry_of, descendants_of, leaves_of, validate_deep, MemoryStore, Store, StoreError,
    WalkError,
};
use forest_types::{Community, Identity, Node, NodeType, QualifiedHash, Reply, Verifier};
use parking_lot::Mutex;
use std::any::Any;
use std::thread::JoinHandle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

/// State owned by the worker thread.
struct ArchiveState {
    store: Box<dyn Store + Send>,
    hooks: Hooks,
    running: bool,
}

impl ArchiveState {
    /// Pre-add hooks fire even when the store then rejects the node.
    fn add_as(&mut self, node: Node, excluded: Subscription) -> Result<(), StoreError> {
        if self.store.get(node.id())?.is_some() {
            trace!(id = %node.id(), "duplicate add ignored");
            return Ok(());
        }
        self.hooks.notify(Phase::PreAdd, &node, excluded);
        self.store.add(node.clone())?;
        debug!(id = %node.id(), node_type = %node.node_type(), "archived node");
        self.hooks.notify(Phase::PostAdd, &node, excluded);
        Ok(())
    }
}

type Job = Box<dyn FnOnce(&mut ArchiveState) + Send>;

/// Thread-safe, observable wrapper around a store.
pub struct Archive {
    sender: mpsc::UnboundedSender<Job>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Archive {
    /// Start a worker that owns `store`.
    pub fn new(store: impl Store + Send + 'static, config: ArchiveConfig) -> Result<Self, StoreError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let mut state = ArchiveState {
            store: Box::new(store),
            hooks: Hooks::default(),
            running: true,
        };
        let worker = std::thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    job(&mut state);
                    if !state.running {
                        break;
                    }
                }
                debug!("archive worker exiting");
            })
            .map_err(|e| StoreError::Io {
                operation: "spawn archive worker",
                target: config.thread_name.clone(),
                source: e,
            })?;
        info!(thread = %config.thread_name, "archive started");
        Ok(Self {
            sender,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Archive with the default configuration.
    pub fn with_defaults(store: impl Store + Send + 'static) -> Result<Self, StoreError> {
        Self::new(store, ArchiveConfig::default())
    }

    /// Run `op` on the worker and wait for its result.
    fn request<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut ArchiveState) -> T + Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |state| {
            // the caller may have given up; nothing to do then
            let _ = reply.send(op(state));
        });
        self.sender.send(job).map_err(|_| StoreError::Closed)?;
        response.blocking_recv().map_err(|_| StoreError::Closed)
    }

    /// `request` for operations that can themselves fail.
    fn call<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut ArchiveState) -> Result<T, StoreError> + Send + 'static,
    {
        self.request(op)?
    }

    pub fn get(&self, id: &QualifiedHash) -> Result<Option<Node>, StoreError> {
        let id = id.clone();
        self.call(move |s| s.store.get(&id))
    }

    pub fn get_identity(&self, id: &QualifiedHash) -> Result<Option<Identity>, StoreError> {
        let id = id.clone();
        self.call(move |s| s.store.get_identity(&id))
    }

    pub fn get_community(&self, id: &QualifiedHash) -> Result<Option<Community>, StoreError> {
        let id = id.clone();
        self.call(move |s| s.store.get_community(&id))
    }

    pub fn get_conversation(
        &self,
        community_id: &QualifiedHash,
        id: &QualifiedHash,
    ) -> Result<Option<Node>, StoreError> {
        let (community_id, id) = (community_id.clone(), id.clone());
        self.call(move |s| s.store.get_conversation(&community_id, &id))
    }

    pub fn get_reply(
        &self,
        community_id: &QualifiedHash,
        conversation_id: &QualifiedHash,
        id: &QualifiedHash,
    ) -> Result<Option<Reply>, StoreError> {
        let (community_id, conversation_id, id) =
            (community_id.clone(), conversation_id.clone(), id.clone());
        self.call(move |s| s.store.get_reply(&community_id, &conversation_id, &id))
    }

    pub fn children(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
        let id = id.clone();
        self.call(move |s| s.store.children(&id))
    }

    pub fn recent(&self, node_type: NodeType, n: usize) -> Result<Vec<Node>, StoreError> {
        self.call(move |s| s.store.recent(node_type, n))
    }

    /// Add `node`, notifying every subscriber. A node already present is
    /// ignored and notifies nobody.
    pub fn add(&self, node: Node) -> Result<(), StoreError> {
        self.add_as(node, Subscription::NONE)
    }

    /// Add `node` without notifying `subscription`, so a subscriber does
    /// not hear about its own writes.
    pub fn add_as(&self, node: Node, subscription: Subscription) -> Result<(), StoreError> {
        self.call(move |s| s.add_as(node, subscription))
    }

    /// Deep-validate `node` against the wrapped store, then add it.
    ///
    /// A node already present returns immediately without being validated
    /// again or notifying anyone.
    pub fn add_validated(
        &self,
        node: Node,
        verifier: impl Verifier + 'static,
    ) -> Result<(), StoreError> {
        self.call(move |s| {
            if s.store.get(node.id())?.is_some() {
                trace!(id = %node.id(), "duplicate add ignored before validation");
                return Ok(());
            }
            validate_deep(&node, &*s.store, &verifier)?;
            s.add_as(node, Subscription::NONE)
        })
    }

    /// Copy a consistent snapshot of the archive into `other`.
    pub fn copy_into(&self, other: &mut dyn Store) -> Result<(), StoreError> {
        let snapshot = self.call(|s| {
            let mut snapshot = MemoryStore::new();
            s.store.copy_into(&mut snapshot)?;
            Ok(snapshot)
        })?;
        snapshot.copy_into(other)
    }

    pub fn remove_subtree(&self, id: &QualifiedHash) -> Result<(), StoreError> {
        let id = id.clone();
        self.call(move |s| s.store.remove_subtree(&id))
    }

    /// Register a hook that runs before each new node is stored.
    pub fn subscribe_pre_add(
        &self,
        hook: impl Fn(&Node) + Send + 'static,
    ) -> Result<Subscription, StoreError> {
        let hook: Hook = Box::new(hook);
        self.request(move |s| s.hooks.subscribe(Phase::PreAdd, hook))
    }

    /// Register a hook that runs after each new node is stored.
    pub fn subscribe_post_add(
        &self,
        hook: impl Fn(&Node) + Send + 'static,
    ) -> Result<Subscription, StoreError> {
        let hook: Hook = Box::new(hook);
        self.request(move |s| s.hooks.subscribe(Phase::PostAdd, hook))
    }

    pub fn unsubscribe_pre_add(&self, subscription: Subscription) -> Result<bool, StoreError> {
        self.request(move |s| s.hooks.unsubscribe(Phase::PreAdd, subscription))
    }

    pub fn unsubscribe_post_add(&self, subscription: Subscription) -> Result<bool, StoreError> {
        self.request(move |s| s.hooks.unsubscribe(Phase::PostAdd, subscription))
    }

    /// Ancestors of `id`, nearest first, computed in one worker turn.
    pub fn ancestry_of(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
        let id = id.clone();
        self.call(move |s| ancestry_of(&*s.store, &id))
    }

    pub fn descendants_of(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, WalkError> {
        let target = id.clone();
        self.request(move |s| descendants_of(&*s.store, &target))
            .unwrap_or_else(|source| Err(closed_walk(id, source)))
    }

    pub fn leaves_of(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, WalkError> {
        let target = id.clone();
        self.request(move |s| leaves_of(&*s.store, &target))
            .unwrap_or_else(|source| Err(closed_walk(id, source)))
    }

    /// Stop the worker. Every later call returns `StoreError::Closed`.
    pub fn destroy(&self) {
        if self.request(|s| s.running = false).is_ok() {
            info!("archive destroyed");
        }
        if let Some(worker) = self.worker.lock().take() {
            if let Err(payload) = worker.join() {
                warn!(panic = %panic_message(payload.as_ref()), "archive worker panicked");
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

fn closed_walk(id: &QualifiedHash, source: StoreError) -> WalkError {
    WalkError::Store {
        id: id.clone(),
        source,
    }
}

impl Store for Archive {
    fn get(&self, id: &QualifiedHash) -> Result<Option<Node>, StoreError> {
        Archive::get(self, id)
    }

    fn get_identity(&self, id: &QualifiedHash) -> Result<Option<Identity>, StoreError> {
        Archive::get_identity(self, id)
    }

    fn get_community(&self, id: &QualifiedHash) -> Result<Option<Community>, StoreError> {
        Archive::get_community(self, id)
    }

    fn get_conversation(
        &self,
        community_id: &QualifiedHash,
        id: &QualifiedHash,
    ) -> Result<Option<Node>, StoreError> {
        Archive::get_conversation(self, community_id, id)
    }

    fn get_reply(
        &self,
        community_id: &QualifiedHash,
        conversation_id: &QualifiedHash,
        id: &QualifiedHash,
    ) -> Result<Option<Reply>, StoreError> {
        Archive::get_reply(self, community_id, conversation_id, id)
    }

    fn children(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
        Archive::children(self, id)
    }

    fn recent(&self, node_type: NodeType, n: usize) -> Result<Vec<Node>, StoreError> {
        Archive::recent(self, node_type, n)
    }

    fn add(&mut self, node: Node) -> Result<(), StoreError> {
        Archive::add(self, node)
    }

    fn copy_into(&self, other: &mut dyn Store) -> Result<(), StoreError> {
        Archive::copy_into(self, other)
    }

    fn remove_subtree(&mut self, id: &QualifiedHash) -> Result<(), StoreError> {
        Archive::remove_subtree(self, id)
    }
}
