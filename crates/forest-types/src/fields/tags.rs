//! Closed tag enumerations, one per descriptor namespace.

use crate::errors::DecodeError;
use std::fmt;
use std::hash::Hash;

/// A one-byte type tag belonging to a single namespace.
pub trait Tag: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// Namespace name used in diagnostics.
    const NAMESPACE: &'static str;

    /// Parse a wire tag, rejecting anything outside the known set.
    fn from_u8(tag: u8) -> Result<Self, DecodeError>;

    fn as_u8(self) -> u8;

    /// Uppercase label used by the text form.
    fn label(self) -> &'static str;

    /// Payload length this type requires, if it fixes one.
    fn fixed_length(self) -> Option<u16>;

    fn from_label(label: &str) -> Option<Self>;
}

macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $namespace:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal, $label:literal, $fixed:expr;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl Tag for $name {
            const NAMESPACE: &'static str = $namespace;

            fn from_u8(tag: u8) -> Result<Self, DecodeError> {
                match tag {
                    $($value => Ok($name::$variant),)+
                    _ => Err(DecodeError::UnknownTag {
                        namespace: $namespace,
                        tag,
                    }),
                }
            }

            fn as_u8(self) -> u8 {
                self as u8
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            fn fixed_length(self) -> Option<u16> {
                match self {
                    $($name::$variant => $fixed,)+
                }
            }

            fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

tag_enum! {
    /// Digest algorithms for identifiers.
    HashType, "hash" {
        /// No hash; marks a root's missing parent.
        Null = 0, "NULL", Some(0);
        Sha512_256 = 1, "SHA512_256", Some(32);
    }
}

tag_enum! {
    /// Encodings for human-readable and metadata payloads.
    ContentType, "content" {
        Utf8 = 1, "UTF8", None;
        Twig = 2, "TWIG", None;
    }
}

tag_enum! {
    /// Public key algorithms.
    KeyType, "key" {
        NoKey = 0, "NOKEY", Some(0);
        Ed25519 = 1, "ED25519", Some(32);
    }
}

tag_enum! {
    /// Signature algorithms.
    SignatureType, "signature" {
        Ed25519 = 1, "ED25519", Some(64);
    }
}

tag_enum! {
    /// Runtime variant of a node, carried in the common fields.
    NodeType, "node" {
        Identity = 1, "IDENTITY", None;
        Community = 2, "COMMUNITY", None;
        Conversation = 3, "CONVERSATION", None;
        Reply = 4, "REPLY", None;
    }
}
