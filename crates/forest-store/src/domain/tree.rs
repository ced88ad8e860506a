//! # Tree Queries
//!
//! Breadth-first walks and the ancestry/descendant/leaf queries built on
//! them. Everything here works over `&dyn Store`, so the same code serves
//! every store and the archive.

use super::errors::{StoreError, WalkError};
use crate::ports::outbound::Store;
use forest_types::{Node, QualifiedHash};
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// Error a visitor returns to stop a walk.
pub type VisitError = Box<dyn std::error::Error + Send + Sync>;

type Visitor<'a> = Box<dyn FnMut(&QualifiedHash) -> Result<(), VisitError> + 'a>;

/// A breadth-first walk, assembled piece by piece.
///
/// Each of store, root and visitor must be set before `run`; a missing one
/// is reported before anything is visited.
#[derive(Default)]
pub struct Walk<'a> {
    store: Option<&'a dyn Store>,
    root: Option<QualifiedHash>,
    visitor: Option<Visitor<'a>>,
}

impl<'a> Walk<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: &'a dyn Store) -> Self {
        self.store = Some(store);
        self
    }

    pub fn root(mut self, root: QualifiedHash) -> Self {
        self.root = Some(root);
        self
    }

    pub fn visitor(
        mut self,
        visitor: impl FnMut(&QualifiedHash) -> Result<(), VisitError> + 'a,
    ) -> Self {
        self.visitor = Some(Box::new(visitor));
        self
    }

    /// Visit the root and every reachable id in BFS order.
    pub fn run(self) -> Result<(), WalkError> {
        let store = self.store.ok_or(WalkError::MissingStore)?;
        let root = self
            .root
            .filter(|root| !root.is_null())
            .ok_or(WalkError::MissingRoot)?;
        let mut visitor = self.visitor.ok_or(WalkError::MissingVisitor)?;

        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(root.clone());
        queue.push_back(root);

        while let Some(id) = queue.pop_front() {
            if let Err(source) = visitor(&id) {
                trace!(id = %id, "walk stopped by visitor");
                return Err(WalkError::Visitor { id, source });
            }
            let children = match store.children(&id) {
                Ok(children) => children,
                Err(source) => return Err(WalkError::Store { id, source }),
            };
            for child in children {
                if seen.insert(child.clone()) {
                    queue.push_back(child);
                }
            }
        }
        Ok(())
    }
}

/// Breadth-first walk from `root`, calling `visitor` once per id.
pub fn walk<'a>(
    store: &'a dyn Store,
    root: &QualifiedHash,
    visitor: impl FnMut(&QualifiedHash) -> Result<(), VisitError> + 'a,
) -> Result<(), WalkError> {
    Walk::new()
        .store(store)
        .root(root.clone())
        .visitor(visitor)
        .run()
}

/// Like `walk`, but hands the visitor each resolved node.
pub fn walk_nodes<'a>(
    store: &'a dyn Store,
    root: &QualifiedHash,
    mut visitor: impl FnMut(&Node) -> Result<(), VisitError> + 'a,
) -> Result<(), WalkError> {
    let mut failure = None;
    let result = walk(store, root, |id| match store.get(id) {
        Ok(Some(node)) => visitor(&node),
        Ok(None) => {
            failure = Some(WalkError::Unresolved(id.clone()));
            Err("unresolved".into())
        }
        Err(source) => {
            failure = Some(WalkError::Store {
                id: id.clone(),
                source,
            });
            Err("store failure".into())
        }
    });
    match (result, failure) {
        (Err(_), Some(failure)) => Err(failure),
        (result, _) => result,
    }
}

/// Ancestors of `id`, nearest first. Stops quietly at the first ancestor
/// that is not stored; an unknown `id` yields an empty list.
pub fn ancestry_of(store: &dyn Store, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
    let Some(node) = store.get(id)? else {
        return Ok(Vec::new());
    };
    let mut ancestors = Vec::with_capacity(node.tree_depth() as usize);
    let mut next = node.parent_id().clone();
    while !next.is_null() {
        let Some(parent) = store.get(&next)? else {
            break;
        };
        ancestors.push(next);
        next = parent.parent_id().clone();
    }
    Ok(ancestors)
}

/// Every id below `id`, excluding `id` itself. Order is unspecified.
pub fn descendants_of(
    store: &dyn Store,
    id: &QualifiedHash,
) -> Result<Vec<QualifiedHash>, WalkError> {
    let mut descendants = Vec::new();
    walk(store, id, |visited| {
        if visited != id {
            descendants.push(visited.clone());
        }
        Ok(())
    })?;
    Ok(descendants)
}

/// Ids below `id` with no known children. Order is unspecified.
pub fn leaves_of(store: &dyn Store, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, WalkError> {
    let mut leaves = Vec::new();
    let mut failure = None;
    let result = walk(store, id, |visited| {
        if visited == id {
            return Ok(());
        }
        match store.children(visited) {
            Ok(children) if children.is_empty() => {
                leaves.push(visited.clone());
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(source) => {
                failure = Some(WalkError::Store {
                    id: visited.clone(),
                    source,
                });
                Err("store failure".into())
            }
        }
    });
    match (result, failure) {
        (Err(_), Some(failure)) => Err(failure),
        (result, _) => result.map(|()| leaves),
    }
}
