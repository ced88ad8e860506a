//! # Twig Metadata
//!
//! Key/value pairs separated by NUL bytes:
//!
//! ```text
//! name/version \0 value \0 name/version \0 value
//! ```
//!
//! The version is the decimal number after the last `/` in a key, so names
//! may themselves contain slashes. There is no trailing NUL. Encoding sorts
//! keys, which makes the bytes of a given set of pairs unique.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

const KEY_DELIMITER: char = '/';
const SEPARATOR: u8 = 0;

/// Structural problems in twig data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TwigError {
    #[error("key {0:?} has no value")]
    MissingValue(String),

    #[error("key {0:?} has no version delimiter")]
    MissingVersion(String),

    #[error("key name must be non-empty")]
    EmptyName,

    #[error("invalid version in key {0:?}")]
    InvalidVersion(String),

    #[error("key {0:?} is not valid UTF-8")]
    InvalidKey(String),

    #[error("duplicate key {0}")]
    DuplicateKey(Key),

    #[error("NUL byte in {0}")]
    NulByte(&'static str),
}

/// A versioned twig key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    pub name: String,
    pub version: u64,
}

impl Key {
    pub fn new(name: impl Into<String>, version: u64) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    fn parse(raw: &[u8]) -> Result<Self, TwigError> {
        let text = std::str::from_utf8(raw)
            .map_err(|_| TwigError::InvalidKey(String::from_utf8_lossy(raw).into_owned()))?;
        let (name, version) = text
            .rsplit_once(KEY_DELIMITER)
            .ok_or_else(|| TwigError::MissingVersion(text.to_string()))?;
        if name.is_empty() {
            return Err(TwigError::EmptyName);
        }
        if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TwigError::InvalidVersion(text.to_string()));
        }
        let version = version
            .parse()
            .map_err(|_| TwigError::InvalidVersion(text.to_string()))?;
        Ok(Self::new(name, version))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, KEY_DELIMITER, self.version)
    }
}

/// A set of twig key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Twig {
    values: BTreeMap<Key, Vec<u8>>,
}

impl Twig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        version: u64,
        value: impl Into<Vec<u8>>,
    ) -> Result<&mut Self, TwigError> {
        let name = name.into();
        let value = value.into();
        if name.is_empty() {
            return Err(TwigError::EmptyName);
        }
        if name.as_bytes().contains(&SEPARATOR) {
            return Err(TwigError::NulByte("key"));
        }
        if value.contains(&SEPARATOR) {
            return Err(TwigError::NulByte("value"));
        }
        self.values.insert(Key::new(name, version), value);
        Ok(self)
    }

    pub fn get(&self, name: &str, version: u64) -> Option<&[u8]> {
        self.values
            .get(&Key::new(name, version))
            .map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str, version: u64) -> bool {
        self.get(name, version).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &[u8])> {
        self.values.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, (key, value)) in self.values.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            out.extend_from_slice(key.to_string().as_bytes());
            out.push(SEPARATOR);
            out.extend_from_slice(value);
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TwigError> {
        let mut twig = Self::new();
        if bytes.is_empty() {
            return Ok(twig);
        }
        let mut parts = bytes.split(|b| *b == SEPARATOR);
        while let Some(raw_key) = parts.next() {
            let key = Key::parse(raw_key)?;
            let value = parts
                .next()
                .ok_or_else(|| TwigError::MissingValue(key.to_string()))?;
            if twig.values.contains_key(&key) {
                return Err(TwigError::DuplicateKey(key));
            }
            twig.values.insert(key, value.to_vec());
        }
        Ok(twig)
    }
}
