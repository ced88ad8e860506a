//! # Outbound Ports (Driven Ports)
//!
//! The `Store` capability. Memory, file and cache stores implement it, and
//! the archive wraps any of them.
//!
//! Lookups return `Ok(None)` for unknown ids; only real failures are errors.
//! `add` of an id that is already present succeeds without changing
//! anything.

use crate::domain::errors::StoreError;
use forest_types::{Community, Identity, Node, NodeType, QualifiedHash, Reply};

/// Insert, look up and traverse forest nodes.
pub trait Store {
    /// Any node by id.
    fn get(&self, id: &QualifiedHash) -> Result<Option<Node>, StoreError>;

    fn get_identity(&self, id: &QualifiedHash) -> Result<Option<Identity>, StoreError> {
        Ok(match self.get(id)? {
            Some(Node::Identity(identity)) => Some(identity),
            _ => None,
        })
    }

    fn get_community(&self, id: &QualifiedHash) -> Result<Option<Community>, StoreError> {
        Ok(match self.get(id)? {
            Some(Node::Community(community)) => Some(community),
            _ => None,
        })
    }

    /// A thread root within `community_id`: a conversation, or a reply
    /// posted directly to the community.
    fn get_conversation(
        &self,
        community_id: &QualifiedHash,
        id: &QualifiedHash,
    ) -> Result<Option<Node>, StoreError> {
        Ok(self.get(id)?.filter(|node| match node {
            Node::Conversation(c) => &c.common.parent == community_id,
            Node::Reply(r) => &r.community_id == community_id && r.conversation_id.is_null(),
            _ => false,
        }))
    }

    /// A reply within the given community and thread.
    fn get_reply(
        &self,
        community_id: &QualifiedHash,
        conversation_id: &QualifiedHash,
        id: &QualifiedHash,
    ) -> Result<Option<Reply>, StoreError> {
        Ok(match self.get(id)? {
            Some(Node::Reply(reply))
                if &reply.community_id == community_id
                    && reply.thread_root() == conversation_id =>
            {
                Some(reply)
            }
            _ => None,
        })
    }

    /// Direct children of `id`, empty when none are known.
    fn children(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError>;

    /// Up to `n` nodes of `node_type`, newest `created` first.
    fn recent(&self, node_type: NodeType, n: usize) -> Result<Vec<Node>, StoreError>;

    /// Insert a node. Re-adding a present id is a no-op.
    fn add(&mut self, node: Node) -> Result<(), StoreError>;

    /// Add every node held here to `other`, parents before children.
    fn copy_into(&self, other: &mut dyn Store) -> Result<(), StoreError>;

    /// Delete `id` and everything below it.
    fn remove_subtree(&mut self, id: &QualifiedHash) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, id: &QualifiedHash) -> Result<Option<Node>, StoreError> {
        (**self).get(id)
    }

    fn children(&self, id: &QualifiedHash) -> Result<Vec<QualifiedHash>, StoreError> {
        (**self).children(id)
    }

    fn recent(&self, node_type: NodeType, n: usize) -> Result<Vec<Node>, StoreError> {
        (**self).recent(node_type, n)
    }

    fn add(&mut self, node: Node) -> Result<(), StoreError> {
        (**self).add(node)
    }

    fn copy_into(&self, other: &mut dyn Store) -> Result<(), StoreError> {
        (**self).copy_into(other)
    }

    fn remove_subtree(&mut self, id: &QualifiedHash) -> Result<(), StoreError> {
        (**self).remove_subtree(id)
    }
}
