//! Node model, codec and builder.

mod builder;
mod codec;
mod model;

pub use builder::{new_identity, new_identity_at, Builder};
pub use model::{
    CommonFields, Community, Conversation, Identity, Node, Reply, SCHEMA_VERSION,
};
