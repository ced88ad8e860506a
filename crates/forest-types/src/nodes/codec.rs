//! # Node Codec
//!
//! Field order, fixed per variant:
//!
//! ```text
//! schema_version u16 | node_type u8 | parent | id_descriptor | tree_depth u32
//! | created u64 | metadata | signer_id | <variant fields> | signature
//! ```
//!
//! Variant fields: Identity `name, public_key`; Community `name`;
//! Conversation `content`; Reply `community_id, conversation_id, content`.
//! Everything before `signature` is both the signed payload and the digest
//! input for the node id.

use super::model::{
    digest, CommonFields, Community, Conversation, Identity, Node, Reply, SCHEMA_VERSION,
};
use crate::errors::DecodeError;
use crate::fields::{
    Decode, Encode, HashDescriptor, HashType, NodeType, QualifiedContent, QualifiedHash,
    QualifiedKey, QualifiedSignature, Tag,
};

/// Decode one named field, tagging any failure with the field name.
fn field<'a, T: Decode>(name: &'static str, input: &'a [u8]) -> Result<(T, &'a [u8]), DecodeError> {
    T::decode(input).map_err(|e| e.in_field(name))
}

fn encode_common(common: &CommonFields, node_type: NodeType, out: &mut Vec<u8>) {
    common.schema_version.encode_into(out);
    node_type.as_u8().encode_into(out);
    common.parent.encode_into(out);
    common.id_descriptor.encode_into(out);
    common.tree_depth.encode_into(out);
    common.created.encode_into(out);
    common.metadata.encode_into(out);
    common.signer_id.encode_into(out);
}

/// Per-variant encoding hooks shared by the typed and polymorphic codecs.
pub(crate) trait Variant {
    const NODE_TYPE: NodeType;

    fn common(&self) -> &CommonFields;

    fn encode_body(&self, out: &mut Vec<u8>);

    fn signed_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_common(self.common(), Self::NODE_TYPE, &mut out);
        self.encode_body(&mut out);
        out
    }
}

impl Variant for Identity {
    const NODE_TYPE: NodeType = NodeType::Identity;

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn encode_body(&self, out: &mut Vec<u8>) {
        self.name.encode_into(out);
        self.public_key.encode_into(out);
    }
}

impl Variant for Community {
    const NODE_TYPE: NodeType = NodeType::Community;

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn encode_body(&self, out: &mut Vec<u8>) {
        self.name.encode_into(out);
    }
}

impl Variant for Conversation {
    const NODE_TYPE: NodeType = NodeType::Conversation;

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn encode_body(&self, out: &mut Vec<u8>) {
        self.content.encode_into(out);
    }
}

impl Variant for Reply {
    const NODE_TYPE: NodeType = NodeType::Reply;

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn encode_body(&self, out: &mut Vec<u8>) {
        self.community_id.encode_into(out);
        self.conversation_id.encode_into(out);
        self.content.encode_into(out);
    }
}

impl Node {
    /// The bytes covered by both the signature and the id digest.
    pub fn signed_bytes(&self) -> Vec<u8> {
        match self {
            Node::Identity(n) => Variant::signed_bytes(n),
            Node::Community(n) => Variant::signed_bytes(n),
            Node::Conversation(n) => Variant::signed_bytes(n),
            Node::Reply(n) => Variant::signed_bytes(n),
        }
    }

    /// Full wire form: signed bytes followed by the signature.
    pub fn marshal(&self) -> Vec<u8> {
        let mut out = self.signed_bytes();
        self.common().signature.encode_into(&mut out);
        out
    }

    /// Decode any variant, dispatching on the node type in the common prefix.
    ///
    /// The id is recomputed from the parsed bytes; trailing bytes are an error.
    pub fn unmarshal(bytes: &[u8]) -> Result<Node, DecodeError> {
        let (node, rest) = Self::decode(bytes)?;
        if !rest.is_empty() {
            return Err(DecodeError::TrailingBytes(rest.len()));
        }
        Ok(node)
    }
}

/// Common prefix fields, parsed once and shared by every variant decoder.
struct Prefix {
    schema_version: u16,
    node_type: NodeType,
    parent: QualifiedHash,
    id_descriptor: HashDescriptor,
    tree_depth: u32,
    created: u64,
    metadata: QualifiedContent,
    signer_id: QualifiedHash,
}

impl Prefix {
    fn decode(input: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (schema_version, rest) = field::<u16>("schema_version", input)?;
        if schema_version != SCHEMA_VERSION {
            return Err(DecodeError::UnsupportedVersion(schema_version));
        }
        let (tag, rest) = field::<u8>("node_type", rest)?;
        let node_type = NodeType::from_u8(tag).map_err(|e| e.in_field("node_type"))?;
        let (parent, rest) = field("parent", rest)?;
        let (id_descriptor, rest) = field::<HashDescriptor>("id_descriptor", rest)?;
        if id_descriptor.kind() == HashType::Null {
            return Err(DecodeError::UnusableIdDescriptor(id_descriptor.to_string()));
        }
        let (tree_depth, rest) = field("tree_depth", rest)?;
        let (created, rest) = field("created", rest)?;
        let (metadata, rest) = field("metadata", rest)?;
        let (signer_id, rest) = field("signer_id", rest)?;
        Ok((
            Self {
                schema_version,
                node_type,
                parent,
                id_descriptor,
                tree_depth,
                created,
                metadata,
                signer_id,
            },
            rest,
        ))
    }

    fn into_common(self, signature: QualifiedSignature, id: QualifiedHash) -> CommonFields {
        CommonFields {
            schema_version: self.schema_version,
            parent: self.parent,
            id_descriptor: self.id_descriptor,
            tree_depth: self.tree_depth,
            created: self.created,
            metadata: self.metadata,
            signer_id: self.signer_id,
            signature,
            id,
        }
    }
}

/// Variant-specific fields, decoded after the shared prefix.
enum Body {
    Identity {
        name: QualifiedContent,
        public_key: QualifiedKey,
    },
    Community {
        name: QualifiedContent,
    },
    Conversation {
        content: QualifiedContent,
    },
    Reply {
        community_id: QualifiedHash,
        conversation_id: QualifiedHash,
        content: QualifiedContent,
    },
}

impl Body {
    fn decode(node_type: NodeType, input: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        match node_type {
            NodeType::Identity => {
                let (name, rest) = field("name", input)?;
                let (public_key, rest) = field("public_key", rest)?;
                Ok((Body::Identity { name, public_key }, rest))
            }
            NodeType::Community => {
                let (name, rest) = field("name", input)?;
                Ok((Body::Community { name }, rest))
            }
            NodeType::Conversation => {
                let (content, rest) = field("content", input)?;
                Ok((Body::Conversation { content }, rest))
            }
            NodeType::Reply => {
                let (community_id, rest) = field("community_id", input)?;
                let (conversation_id, rest) = field("conversation_id", rest)?;
                let (content, rest) = field("content", rest)?;
                Ok((
                    Body::Reply {
                        community_id,
                        conversation_id,
                        content,
                    },
                    rest,
                ))
            }
        }
    }

    fn into_node(self, common: CommonFields) -> Node {
        match self {
            Body::Identity { name, public_key } => Node::Identity(Identity {
                common,
                name,
                public_key,
            }),
            Body::Community { name } => Node::Community(Community { common, name }),
            Body::Conversation { content } => Node::Conversation(Conversation { common, content }),
            Body::Reply {
                community_id,
                conversation_id,
                content,
            } => Node::Reply(Reply {
                common,
                community_id,
                conversation_id,
                content,
            }),
        }
    }
}

impl Decode for Node {
    fn decode(input: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (prefix, rest) = Prefix::decode(input)?;
        let (body, rest) = Body::decode(prefix.node_type, rest)?;
        let signed_len = input.len() - rest.len();
        let (signature, rest) = field::<QualifiedSignature>("signature", rest)?;
        let id = digest(prefix.id_descriptor.kind(), &input[..signed_len]);
        let common = prefix.into_common(signature, id);
        Ok((body.into_node(common), rest))
    }
}

impl Encode for Node {
    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.marshal());
    }

    fn encoded_len(&self) -> usize {
        self.marshal().len()
    }
}

macro_rules! impl_typed_unmarshal {
    ($($variant:ident),+) => {
        $(
            impl $variant {
                /// Decode bytes that must hold this variant.
                pub fn unmarshal(bytes: &[u8]) -> Result<Self, DecodeError> {
                    match Node::unmarshal(bytes)? {
                        Node::$variant(n) => Ok(n),
                        other => Err(DecodeError::WrongNodeType {
                            expected: NodeType::$variant,
                            actual: other.node_type(),
                        }),
                    }
                }

                pub fn signed_bytes(&self) -> Vec<u8> {
                    Variant::signed_bytes(self)
                }

                pub fn marshal(&self) -> Vec<u8> {
                    let mut out = Variant::signed_bytes(self);
                    self.common.signature.encode_into(&mut out);
                    out
                }

                pub fn id(&self) -> &QualifiedHash {
                    &self.common.id
                }
            }
        )+
    };
}

impl_typed_unmarshal!(Identity, Community, Conversation, Reply);
