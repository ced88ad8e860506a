//! # Progressive Binary Codec
//!
//! Every component decodes from the front of a buffer and hands back the
//! unconsumed remainder, so callers can stack further formats after it.
//! All integers are big-endian.

use crate::errors::DecodeError;

/// Types with a canonical big-endian wire encoding.
pub trait Encode {
    fn encode_into(&self, out: &mut Vec<u8>);

    fn encoded_len(&self) -> usize;

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }
}

/// Types that decode from a prefix of a buffer.
pub trait Decode: Sized {
    /// Decode one value, returning it with the remaining bytes.
    fn decode(input: &[u8]) -> Result<(Self, &[u8]), DecodeError>;

    /// Decode one value that must span the whole input.
    fn decode_exact(input: &[u8]) -> Result<Self, DecodeError> {
        let (value, rest) = Self::decode(input)?;
        if !rest.is_empty() {
            return Err(DecodeError::TrailingBytes(rest.len()));
        }
        Ok(value)
    }
}

/// Split `n` bytes off the front of `input`.
pub fn take(input: &[u8], n: usize) -> Result<(&[u8], &[u8]), DecodeError> {
    if input.len() < n {
        return Err(DecodeError::Truncated {
            needed: n,
            available: input.len(),
        });
    }
    Ok(input.split_at(n))
}

macro_rules! impl_int_codec {
    ($($ty:ty),+) => {
        $(
            impl Encode for $ty {
                fn encode_into(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_be_bytes());
                }

                fn encoded_len(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }
            }

            impl Decode for $ty {
                fn decode(input: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
                    let (head, rest) = take(input, std::mem::size_of::<$ty>())?;
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(head);
                    Ok((<$ty>::from_be_bytes(raw), rest))
                }
            }
        )+
    };
}

impl_int_codec!(u8, u16, u32, u64);
