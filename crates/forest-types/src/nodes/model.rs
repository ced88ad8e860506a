//! # Node Model
//!
//! Four record variants over one shared field set. A node's id is never
//! stored on the wire; it is the digest of the node's signed bytes, set when
//! the node is built or decoded.

use crate::fields::{
    HashDescriptor, HashType, NodeType, QualifiedContent, QualifiedHash, QualifiedKey,
    QualifiedSignature,
};

/// The only schema version this crate reads or writes.
pub const SCHEMA_VERSION: u16 = 1;

/// Fields every node carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonFields {
    pub schema_version: u16,
    pub parent: QualifiedHash,
    /// Algorithm and length of this node's own id.
    pub id_descriptor: HashDescriptor,
    pub tree_depth: u32,
    /// Milliseconds since the Unix epoch.
    pub created: u64,
    pub metadata: QualifiedContent,
    pub signer_id: QualifiedHash,
    pub signature: QualifiedSignature,
    pub(crate) id: QualifiedHash,
}

impl CommonFields {
    /// The id this node was built or decoded with.
    pub fn id(&self) -> &QualifiedHash {
        &self.id
    }
}

/// A signing identity. Identities sign themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub common: CommonFields,
    pub name: QualifiedContent,
    pub public_key: QualifiedKey,
}

/// The root of one tree of conversations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub common: CommonFields,
    pub name: QualifiedContent,
}

/// A thread opener directly under a community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub common: CommonFields,
    pub content: QualifiedContent,
}

/// A message within a community's tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub common: CommonFields,
    pub community_id: QualifiedHash,
    /// Thread root, or the null hash when this reply is itself the root.
    pub conversation_id: QualifiedHash,
    pub content: QualifiedContent,
}

impl Reply {
    /// The id of the node that opened this reply's thread.
    pub fn thread_root(&self) -> &QualifiedHash {
        if self.conversation_id.is_null() {
            &self.common.id
        } else {
            &self.conversation_id
        }
    }
}

/// Any forest node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Identity(Identity),
    Community(Community),
    Conversation(Conversation),
    Reply(Reply),
}

impl Node {
    pub fn common(&self) -> &CommonFields {
        match self {
            Node::Identity(n) => &n.common,
            Node::Community(n) => &n.common,
            Node::Conversation(n) => &n.common,
            Node::Reply(n) => &n.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CommonFields {
        match self {
            Node::Identity(n) => &mut n.common,
            Node::Community(n) => &mut n.common,
            Node::Conversation(n) => &mut n.common,
            Node::Reply(n) => &mut n.common,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Identity(_) => NodeType::Identity,
            Node::Community(_) => NodeType::Community,
            Node::Conversation(_) => NodeType::Conversation,
            Node::Reply(_) => NodeType::Reply,
        }
    }

    pub fn id(&self) -> &QualifiedHash {
        &self.common().id
    }

    pub fn parent_id(&self) -> &QualifiedHash {
        &self.common().parent
    }

    pub fn signer_id(&self) -> &QualifiedHash {
        &self.common().signer_id
    }

    pub fn tree_depth(&self) -> u32 {
        self.common().tree_depth
    }

    pub fn created(&self) -> u64 {
        self.common().created
    }

    pub fn as_identity(&self) -> Option<&Identity> {
        match self {
            Node::Identity(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_community(&self) -> Option<&Community> {
        match self {
            Node::Community(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_conversation(&self) -> Option<&Conversation> {
        match self {
            Node::Conversation(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_reply(&self) -> Option<&Reply> {
        match self {
            Node::Reply(n) => Some(n),
            _ => None,
        }
    }

    /// Digest the signed bytes with the algorithm named by `id_descriptor`.
    pub fn compute_id(&self) -> QualifiedHash {
        digest(self.common().id_descriptor.kind(), &self.signed_bytes())
    }
}

pub(crate) fn digest(kind: HashType, bytes: &[u8]) -> QualifiedHash {
    match kind {
        HashType::Null => QualifiedHash::null(),
        HashType::Sha512_256 => {
            QualifiedHash::from_digest(kind, forest_crypto::sha512_256(bytes).to_vec())
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for Node {
                fn from(node: $variant) -> Self {
                    Node::$variant(node)
                }
            }
        )+
    };
}

impl_from_variant!(Identity, Community, Conversation, Reply);
