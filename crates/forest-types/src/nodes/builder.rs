//! # Node Builder
//!
//! Produces signed nodes on behalf of one identity. Every node leaves the
//! builder with its signature and id already set.

use super::codec::Variant;
use super::model::{
    digest, CommonFields, Community, Conversation, Identity, Node, Reply, SCHEMA_VERSION,
};
use crate::adapters::SystemTimeSource;
use crate::errors::{BuildError, FieldError};
use crate::fields::{
    ContentType, HashDescriptor, NodeType, QualifiedContent, QualifiedHash, QualifiedSignature,
    SignatureType,
};
use crate::ports::{Signer, TimeSource};
use crate::twig::Twig;
use tracing::debug;

fn name_field(name: &str) -> Result<QualifiedContent, FieldError> {
    if name.contains('\n') {
        return Err(FieldError::NameContainsNewline { field: "name" });
    }
    QualifiedContent::utf8(name)
}

fn metadata_field(metadata: &Twig) -> Result<QualifiedContent, FieldError> {
    QualifiedContent::new(ContentType::Twig, metadata.encode())
}

fn unsigned_common(
    parent: QualifiedHash,
    tree_depth: u32,
    created: u64,
    metadata: QualifiedContent,
    signer_id: QualifiedHash,
) -> CommonFields {
    CommonFields {
        schema_version: SCHEMA_VERSION,
        parent,
        id_descriptor: HashDescriptor::sha512_256(),
        tree_depth,
        created,
        metadata,
        signer_id,
        signature: QualifiedSignature::placeholder(SignatureType::Ed25519),
        id: QualifiedHash::null(),
    }
}

/// Sign the variant's bytes and derive its id.
fn seal<V: Variant>(node: &mut V, signer: &dyn Signer) -> Result<(), BuildError>
where
    V: AsMut<CommonFields>,
{
    let signed = node.signed_bytes();
    let signature = signer.sign(&signed)?;
    let common = node.as_mut();
    common.signature = signature;
    common.id = digest(common.id_descriptor.kind(), &signed);
    Ok(())
}

/// Create a self-signed identity stamped with the system clock.
pub fn new_identity(
    signer: &dyn Signer,
    name: &str,
    metadata: &Twig,
) -> Result<Identity, BuildError> {
    new_identity_at(signer, name, metadata, &SystemTimeSource)
}

/// Create a self-signed identity stamped by `time`.
pub fn new_identity_at(
    signer: &dyn Signer,
    name: &str,
    metadata: &Twig,
    time: &dyn TimeSource,
) -> Result<Identity, BuildError> {
    let mut identity = Identity {
        common: unsigned_common(
            QualifiedHash::null(),
            0,
            time.now_millis(),
            metadata_field(metadata)?,
            QualifiedHash::null(),
        ),
        name: name_field(name)?,
        public_key: signer.public_key(),
    };
    seal(&mut identity, signer)?;
    debug!(id = %identity.common.id, "built identity");
    Ok(identity)
}

/// Builds nodes signed by one identity.
pub struct Builder<S> {
    identity: Identity,
    signer: S,
    time: Box<dyn TimeSource>,
}

impl<S: Signer> Builder<S> {
    /// The signer's public key must be the identity's key.
    pub fn new(identity: Identity, signer: S) -> Result<Self, BuildError> {
        if signer.public_key() != identity.public_key {
            return Err(BuildError::KeyMismatch {
                identity: identity.common.id.clone(),
            });
        }
        Ok(Self {
            identity,
            signer,
            time: Box::new(SystemTimeSource),
        })
    }

    pub fn with_time_source(mut self, time: impl TimeSource + 'static) -> Self {
        self.time = Box::new(time);
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    fn common(
        &self,
        parent: QualifiedHash,
        tree_depth: u32,
        metadata: &Twig,
    ) -> Result<CommonFields, FieldError> {
        Ok(unsigned_common(
            parent,
            tree_depth,
            self.time.now_millis(),
            metadata_field(metadata)?,
            self.identity.common.id.clone(),
        ))
    }

    pub fn new_community(&self, name: &str, metadata: &Twig) -> Result<Community, BuildError> {
        let mut community = Community {
            common: self.common(QualifiedHash::null(), 0, metadata)?,
            name: name_field(name)?,
        };
        seal(&mut community, &self.signer)?;
        debug!(id = %community.common.id, "built community");
        Ok(community)
    }

    pub fn new_conversation(
        &self,
        community: &Community,
        content: &str,
        metadata: &Twig,
    ) -> Result<Conversation, BuildError> {
        let mut conversation = Conversation {
            common: self.common(
                community.common.id.clone(),
                community.common.tree_depth + 1,
                metadata,
            )?,
            content: QualifiedContent::utf8(content)?,
        };
        seal(&mut conversation, &self.signer)?;
        debug!(id = %conversation.common.id, "built conversation");
        Ok(conversation)
    }

    /// Reply under a community, conversation or another reply.
    pub fn new_reply(
        &self,
        parent: &Node,
        content: &str,
        metadata: &Twig,
    ) -> Result<Reply, BuildError> {
        let (community_id, conversation_id) = match parent {
            Node::Community(c) => (c.common.id.clone(), QualifiedHash::null()),
            Node::Conversation(c) => (c.common.parent.clone(), c.common.id.clone()),
            Node::Reply(r) => (r.community_id.clone(), r.thread_root().clone()),
            Node::Identity(_) => return Err(BuildError::InvalidParent(NodeType::Identity)),
        };
        let mut reply = Reply {
            common: self.common(parent.id().clone(), parent.tree_depth() + 1, metadata)?,
            community_id,
            conversation_id,
            content: QualifiedContent::utf8(content)?,
        };
        seal(&mut reply, &self.signer)?;
        debug!(id = %reply.common.id, parent = %parent.id(), "built reply");
        Ok(reply)
    }
}

macro_rules! impl_as_mut_common {
    ($($variant:ident),+) => {
        $(
            impl AsMut<CommonFields> for $variant {
                fn as_mut(&mut self) -> &mut CommonFields {
                    &mut self.common
                }
            }
        )+
    };
}

impl_as_mut_common!(Identity, Community, Conversation, Reply);
