//! # Two-Tier Cache
//!
//! A fast `cache` store in front of a slow `back` store.
//!
//! ## Invariant
//!
//! Everything in `cache` is also in `back`. Construction establishes it by
//! copying `cache` into `back`; `add` keeps it by writing `back` first.
//!
//! If the `cache` write in `add` fails the node is durable in `back` but not
//! cached until a later miss promotes it. There is no rollback.

use crate::domain::errors::StoreError;
use crate::ports::outbound::Store;
use forest_types::{Node, NodeType, QualifiedHash};
use std::cell::{Ref, RefCell};
use tracing::debug;

/// Read-through cache over a backing store.
pub struct CacheStore<C, B> {
    cache: RefCell<C>,
    back: B,
}

impl<C: Store, B: Store> CacheStore<C, B> {
    /// Copy everything in `cache` into `back`, failing if any copy fails.
    pub fn new(cache: C, mut back: B) -> Result<Self, StoreError> {
        cache.copy_into(&mut back)?;
        Ok(Self {
            cache: RefCell::new(cache),
            back,
        })
    }

    pub fn cache(&self) -> Ref<'_, C> {
        self.cache.borrow()
    }

    pub fn back(&self) -> &B {
        &self.back
    }

    pub fn into_parts(self) -> (C, B) {
        (self.cache.into_inner(), self.back)
    }
}

impl<C: Store, B: Store> Store for CacheStore<C, B> {
    /// Cache first; a back hit is promoted into the cache before returning.
    fn get(&self, id: &QualifiedHash) -> Result<Option<Node>, StoreError> {
        let cached = self.cache.borrow().get(id)?;
        if cached.is_some() {
            return Ok(cached);
        }
        let Some(node) = self.back.get(id)? else {
            return Ok(None);
        };
        self.cache.borrow_mut().add(node.clone())?;
        debug!(id = %id, "promoted node into cache");
        Ok(Some(node))
    }

    fn children(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
        self.back.children(id)
    }

    fn recent(&self, node_type: NodeType, n: usize) -> Result<Vec<Node>, StoreError> {
        self.back.recent(node_type, n)
    }

    fn add(&mut self, node: Node) -> Result<(), StoreError> {
        self.back.add(node.clone())?;
        self.cache.get_mut().add(node)
    }

    fn copy_into(&self, other: &mut dyn Store) -> Result<(), StoreError> {
        self.back.copy_into(other)
    }

    /// Back first, then every id of the subtree that made it into the cache.
    fn remove_subtree(&mut self, id: &QualifiedHash) -> Result<(), StoreError> {
        let mut doomed = vec![id.clone()];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let kids = self.back.children(&doomed[cursor])?;
            doomed.extend(kids);
            cursor += 1;
        }
        self.back.remove_subtree(id)?;

        let cache = self.cache.get_mut();
        for target in doomed.iter().rev() {
            match cache.remove_subtree(target) {
                Ok(()) | Err(StoreError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::test_utils::Scenario;

    /// Reads like an empty store, refuses every write.
    struct ReadOnlyStore;

    impl Store for ReadOnlyStore {
        fn get(&self, _: &QualifiedHash) -> Result<Option<Node>, StoreError> {
            Ok(None)
        }

        fn children(&self, _: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
            Ok(Vec::new())
        }

        fn recent(&self, _: NodeType, _: usize) -> Result<Vec<Node>, StoreError> {
            Ok(Vec::new())
        }

        fn add(&mut self, node: Node) -> Result<(), StoreError> {
            Err(StoreError::io(
                "add",
                node.id(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only"),
            ))
        }

        fn copy_into(&self, _: &mut dyn Store) -> Result<(), StoreError> {
            Ok(())
        }

        fn remove_subtree(&mut self, id: &QualifiedHash) -> Result<(), StoreError> {
            Err(StoreError::NotFound(id.clone()))
        }
    }

    #[test]
    fn test_construction_copies_cache_into_back() {
        let scenario = Scenario::new();
        let cache = scenario.memory_store();
        let store = CacheStore::new(cache, MemoryStore::new()).unwrap();
        assert_eq!(store.back().len(), scenario.nodes().len());
    }

    #[test]
    fn test_construction_fails_when_copy_fails() {
        let scenario = Scenario::new();
        let result = CacheStore::new(scenario.memory_store(), ReadOnlyStore);
        assert!(matches!(result, Err(StoreError::Io { operation: "add", .. })));
    }

    #[test]
    fn test_back_hit_is_promoted() {
        let scenario = Scenario::new();
        let store = CacheStore::new(MemoryStore::new(), scenario.memory_store()).unwrap();
        assert!(!store.cache().contains(scenario.r2.id()));

        let node = store.get(scenario.r2.id()).unwrap();
        assert!(node.is_some());
        assert!(store.cache().get(scenario.r2.id()).unwrap().is_some());
    }

    #[test]
    fn test_narrowing_getters_promote_too() {
        let scenario = Scenario::new();
        let store = CacheStore::new(MemoryStore::new(), scenario.memory_store()).unwrap();
        assert!(store.get_community(scenario.community.id()).unwrap().is_some());
        assert!(store.cache().contains(scenario.community.id()));
    }

    #[test]
    fn test_promotion_failure_is_surfaced() {
        let scenario = Scenario::new();
        let store = CacheStore::new(ReadOnlyStore, scenario.memory_store()).unwrap();
        assert!(store.get(scenario.r1.id()).is_err());
        // misses in both tiers are not errors
        assert!(store.get(scenario.unstored.id()).unwrap().is_none());
    }

    #[test]
    fn test_add_writes_both_tiers() {
        let scenario = Scenario::new();
        let mut store = CacheStore::new(MemoryStore::new(), MemoryStore::new()).unwrap();
        for node in scenario.nodes() {
            store.add(node).unwrap();
        }
        assert!(store.cache().contains(scenario.r3b.id()));
        assert!(store.back().contains(scenario.r3b.id()));
    }

    #[test]
    fn test_add_reports_cache_failure_after_back_write() {
        let scenario = Scenario::new();
        let mut store = CacheStore::new(ReadOnlyStore, MemoryStore::new()).unwrap();
        assert!(store.add(scenario.identity.clone().into()).is_err());
        assert!(store.back().contains(scenario.identity.id()));
    }

    #[test]
    fn test_structure_answered_by_back() {
        let scenario = Scenario::new();
        let store = CacheStore::new(MemoryStore::new(), scenario.memory_store()).unwrap();
        assert_eq!(store.children(scenario.r2.id()).unwrap().len(), 2);
        assert_eq!(store.recent(NodeType::Reply, 10).unwrap().len(), 4);
    }

    #[test]
    fn test_remove_subtree_clears_both_tiers() {
        let scenario = Scenario::new();
        let mut store = CacheStore::new(MemoryStore::new(), scenario.memory_store()).unwrap();
        // only a descendant is cached
        store.get(scenario.r3a.id()).unwrap();
        store.remove_subtree(scenario.r2.id()).unwrap();
        assert!(!store.cache().contains(scenario.r3a.id()));
        assert!(!store.back().contains(scenario.r2.id()));
        assert!(store.get(scenario.r3a.id()).unwrap().is_none());
    }
}
