//! # Child Cache
//!
//! Parent id to a de-duplicated set of child ids. A parent recorded with no
//! children is still "known", which lets callers tell "no children" apart
//! from "never looked".

use forest_types::QualifiedHash;
use std::collections::{HashMap, HashSet};

/// Parent to children index.
#[derive(Debug, Default, Clone)]
pub struct ChildCache {
    elements: HashMap<QualifiedHash, HashSet<QualifiedHash>>,
}

impl ChildCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `children` into the parent's set, creating the entry if needed.
    pub fn add<'a>(
        &mut self,
        parent: &QualifiedHash,
        children: impl IntoIterator<Item = &'a QualifiedHash>,
    ) {
        let entry = self.elements.entry(parent.clone()).or_default();
        entry.extend(children.into_iter().cloned());
    }

    /// Known children, and whether the parent is known at all.
    pub fn get(&self, parent: &QualifiedHash) -> (Vec<QualifiedHash>, bool) {
        match self.elements.get(parent) {
            Some(children) => (children.iter().cloned().collect(), true),
            None => (Vec::new(), false),
        }
    }

    pub fn remove_child(&mut self, parent: &QualifiedHash, child: &QualifiedHash) {
        if let Some(children) = self.elements.get_mut(parent) {
            children.remove(child);
        }
    }

    /// Forget the parent entirely.
    pub fn remove_parent(&mut self, parent: &QualifiedHash) {
        self.elements.remove(parent);
    }
}
