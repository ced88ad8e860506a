use crate::domain::child_cache::ChildCache;
use crate::domain::errors::StoreError;
use crate::ports::outbound::Store;
use forest_types::{validate_id, Node, NodeType, QualifiedHash};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Name prefix of in-flight writes. Never parses as a node id.
const STAGING_PREFIX: &str = ".staging-";

/// Directory-backed store: one immutable file per node, named by the
/// node's id text.
///
/// A node is written to a staging file in the same directory and linked
/// into place only once complete, so a node file is either whole or absent
/// and an existing file is never replaced. Children are answered from a
/// `ChildCache` filled by one directory scan on the first miss and kept
/// current by `add` and `remove_subtree`.
pub struct FileStore {
    root: PathBuf,
    children: RefCell<ChildCache>,
    indexed: RefCell<bool>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StoreError::io("create dir", root.display(), e))?;
        info!(path = %root.display(), "opened file store");
        Ok(Self {
            root,
            children: RefCell::new(ChildCache::new()),
            indexed: RefCell::new(false),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &QualifiedHash) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn read(&self, id: &QualifiedHash) -> Result<Option<Node>, StoreError> {
        let bytes = match fs::read(self.path_for(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io("read", id, e)),
        };
        let node = Node::unmarshal(&bytes).map_err(|source| StoreError::Corrupt {
            target: id.to_string(),
            source,
        })?;
        // a file whose bytes hash to another id was renamed or corrupted
        validate_id(&node, id)?;
        Ok(Some(node))
    }

    /// Every readable node on disk. Unparseable entries are skipped.
    fn scan(&self) -> Result<Vec<Node>, StoreError> {
        let entries =
            fs::read_dir(&self.root).map_err(|e| StoreError::io("scan", self.root.display(), e))?;
        let mut nodes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("scan", self.root.display(), e))?;
            let name = entry.file_name();
            if name.to_str().is_some_and(|n| n.starts_with(STAGING_PREFIX)) {
                continue;
            }
            let Some(id) = name.to_str().and_then(|n| n.parse::<QualifiedHash>().ok()) else {
                warn!(file = ?name, "skipping file with non-id name");
                continue;
            };
            match self.read(&id) {
                Ok(Some(node)) => nodes.push(node),
                Ok(None) => {}
                Err(e) => warn!(id = %id, error = %e, "skipping unreadable node file"),
            }
        }
        Ok(nodes)
    }

    fn ensure_indexed(&self) -> Result<(), StoreError> {
        if *self.indexed.borrow() {
            return Ok(());
        }
        let nodes = self.scan()?;
        let mut cache = self.children.borrow_mut();
        for node in &nodes {
            cache.add(node.id(), []);
            if !node.parent_id().is_null() {
                cache.add(node.parent_id(), [node.id()]);
            }
        }
        *self.indexed.borrow_mut() = true;
        debug!(nodes = nodes.len(), "indexed file store children");
        Ok(())
    }

    /// Stage `fill`'s output and link it in under `id`. Returns `false`
    /// when a file for `id` already exists. A failed fill leaves nothing
    /// under the final name.
    fn write_new(
        &self,
        id: &QualifiedHash,
        fill: impl FnOnce(&mut File) -> io::Result<()>,
    ) -> Result<bool, StoreError> {
        let path = self.path_for(id);
        if path.exists() {
            return Ok(false);
        }
        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.root)
            .map_err(|e| StoreError::io("stage", id, e))?;
        fill(staged.as_file_mut()).map_err(|e| StoreError::io("write", id, e))?;
        match staged.persist_noclobber(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(StoreError::io("link", id, e.error)),
        }
    }
}

impl Store for FileStore {
    fn get(&self, id: &QualifiedHash) -> Result<Option<Node>, StoreError> {
        if id.is_null() {
            return Ok(None);
        }
        self.read(id)
    }

    fn children(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
        let (children, present) = self.children.borrow().get(id);
        if present {
            return Ok(children);
        }
        self.ensure_indexed()?;
        Ok(self.children.borrow().get(id).0)
    }

    /// Ties on `created` are broken by id, since files carry no insertion order.
    fn recent(&self, node_type: NodeType, n: usize) -> Result<Vec<Node>, StoreError> {
        let mut nodes: Vec<Node> = self
            .scan()?
            .into_iter()
            .filter(|node| node.node_type() == node_type)
            .collect();
        nodes.sort_by(|a, b| b.created().cmp(&a.created()).then_with(|| a.id().cmp(b.id())));
        nodes.truncate(n);
        Ok(nodes)
    }

    fn add(&mut self, node: Node) -> Result<(), StoreError> {
        let id = node.id().clone();
        let bytes = node.marshal();
        let written = self.write_new(&id, |file| {
            file.write_all(&bytes)?;
            file.sync_all()
        })?;
        if !written {
            trace!(id = %id, "already on disk");
            return Ok(());
        }

        // before the first scan the index is empty and the scan will see this file
        if *self.indexed.borrow() {
            let mut cache = self.children.borrow_mut();
            cache.add(&id, []);
            if !node.parent_id().is_null() {
                cache.add(node.parent_id(), [&id]);
            }
        }
        debug!(id = %id, "wrote node file");
        Ok(())
    }

    fn copy_into(&self, other: &mut dyn Store) -> Result<(), StoreError> {
        let mut nodes = self.scan()?;
        nodes.sort_by_key(|node| (node.tree_depth(), node.created()));
        for node in nodes {
            other.add(node)?;
        }
        Ok(())
    }

    fn remove_subtree(&mut self, id: &QualifiedHash) -> Result<(), StoreError> {
        let Some(root) = self.get(id)? else {
            return Err(StoreError::NotFound(id.clone()));
        };
        let mut order = vec![id.clone()];
        let mut cursor = 0;
        while cursor < order.len() {
            let kids = self.children(&order[cursor])?;
            order.extend(kids);
            cursor += 1;
        }
        for target in order.iter().rev() {
            match fs::remove_file(self.path_for(target)) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::io("remove", target, e)),
            }
            self.children.borrow_mut().remove_parent(target);
        }
        self.children
            .borrow_mut()
            .remove_child(root.parent_id(), id);
        debug!(id = %id, removed = order.len(), "removed subtree from disk");
        Ok(())
    }
}
