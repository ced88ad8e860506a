use crate::domain::errors::StoreError;
use crate::ports::outbound::Store;
use forest_types::{Node, NodeType, QualifiedHash};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Ordering key for the recency index: newest first, then insertion order.
type RecentKey = (Reverse<u64>, u64);

struct Entry {
    node: Node,
    seq: u64,
}

/// In-memory node index.
///
/// Keeps an id map, a parent to ordered-children map and a per-type recency
/// index, all updated together on every `add`. Not safe for concurrent
/// mutation; share it through an `Archive`.
#[derive(Default)]
pub struct MemoryStore {
    items: HashMap<QualifiedHash, Entry>,
    children: HashMap<QualifiedHash, Vec<QualifiedHash>>,
    recent: HashMap<NodeType, BTreeMap<RecentKey, QualifiedHash>>,
    next_seq: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &QualifiedHash) -> bool {
        self.items.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> Vec<Node> {
        let mut entries: Vec<&Entry> = self.items.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.node.clone()).collect()
    }

    fn remove_one(&mut self, id: &QualifiedHash) {
        self.children.remove(id);
        let Some(entry) = self.items.remove(id) else {
            return;
        };
        let key = (Reverse(entry.node.created()), entry.seq);
        if let Some(index) = self.recent.get_mut(&entry.node.node_type()) {
            index.remove(&key);
        }
        let parent = entry.node.parent_id();
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.retain(|sibling| sibling != id);
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, id: &QualifiedHash) -> Result<Option<Node>, StoreError> {
        Ok(self.items.get(id).map(|entry| entry.node.clone()))
    }

    fn children(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
        Ok(self.children.get(id).cloned().unwrap_or_default())
    }

    fn recent(&self, node_type: NodeType, n: usize) -> Result<Vec<Node>, StoreError> {
        let Some(index) = self.recent.get(&node_type) else {
            return Ok(Vec::new());
        };
        Ok(index
            .values()
            .filter_map(|id| self.items.get(id))
            .take(n)
            .map(|entry| entry.node.clone())
            .collect())
    }

    fn add(&mut self, node: Node) -> Result<(), StoreError> {
        let id = node.id().clone();
        if self.items.contains_key(&id) {
            trace!(id = %id, "already stored");
            return Ok(());
        }
        let seq = self.next_seq;
        self.next_seq += 1;

        let parent = node.parent_id();
        if !parent.is_null() {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(id.clone());
        }
        self.recent
            .entry(node.node_type())
            .or_default()
            .insert((Reverse(node.created()), seq), id.clone());
        debug!(id = %id, node_type = %node.node_type(), "stored node");
        self.items.insert(id, Entry { node, seq });
        Ok(())
    }

    fn copy_into(&self, other: &mut dyn Store) -> Result<(), StoreError> {
        for node in self.nodes() {
            other.add(node)?;
        }
        Ok(())
    }

    fn remove_subtree(&mut self, id: &QualifiedHash) -> Result<(), StoreError> {
        if !self.items.contains_key(id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        // breadth-first, then delete deepest first
        let mut order = vec![id.clone()];
        let mut cursor = 0;
        while cursor < order.len() {
            if let Some(kids) = self.children.get(&order[cursor]) {
                order.extend(kids.iter().cloned());
            }
            cursor += 1;
        }
        for target in order.iter().rev() {
            self.remove_one(target);
        }
        debug!(id = %id, removed = order.len(), "removed subtree");
        Ok(())
    }
}
