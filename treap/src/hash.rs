// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Fixed-width node value stored in the treap.

use crate::errors::TreapError;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
    Write,
};
use ark_std::{
    fmt,
    str::FromStr,
    string::{String, ToString},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 32-byte big-endian hash value.
///
/// Ordering is the unsigned byte-wise comparison, which is also the numeric
/// order of the underlying 256-bit integer.
#[derive(Default, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Hash)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// Byte length of a hash value.
    pub const LEN: usize = 32;

    /// The all-zero value.
    pub const ZERO: Hash32 = Hash32([0u8; 32]);

    /// Left-pad a big-endian integer of at most 32 significant bytes.
    ///
    /// Leading zero bytes beyond the 32nd are ignored.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let significant = &bytes[start..];
        if significant.len() > Self::LEN {
            return None;
        }
        let mut out = [0u8; 32];
        out[Self::LEN - significant.len()..].copy_from_slice(significant);
        Some(Self(out))
    }

    /// The underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The value minus one, or `None` for zero.
    pub(crate) fn predecessor(&self) -> Option<Self> {
        let mut out = self.0;
        for byte in out.iter_mut().rev() {
            if *byte == 0 {
                *byte = 0xff;
            } else {
                *byte -= 1;
                return Some(Self(out));
            }
        }
        None
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<Hash32> for [u8; 32] {
    fn from(hash: Hash32) -> Self {
        hash.0
    }
}

impl AsRef<[u8]> for Hash32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self)
    }
}

/// Parses hex with an optional `0x` prefix. Shorter values are left-padded.
impl FromStr for Hash32 {
    type Err = TreapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() {
            return Err(TreapError::InvalidHash("empty hex string".to_string()));
        }
        let bytes = hex::decode(digits)?;
        Self::from_be_slice(&bytes).ok_or_else(|| {
            TreapError::InvalidHash(ark_std::format!("{} bytes exceed 32", bytes.len()))
        })
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl CanonicalSerialize for Hash32 {
    fn serialize_with_mode<W: Write>(
        &self,
        mut writer: W,
        _compress: Compress,
    ) -> Result<(), SerializationError> {
        writer.write_all(&self.0)?;
        Ok(())
    }

    fn serialized_size(&self, _compress: Compress) -> usize {
        Self::LEN
    }
}

impl CanonicalDeserialize for Hash32 {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        _compress: Compress,
        _validate: Validate,
    ) -> Result<Self, SerializationError> {
        let mut ret = [0u8; 32];
        reader.read_exact(&mut ret)?;
        Ok(Hash32(ret))
    }
}

impl Valid for Hash32 {
    fn check(&self) -> Result<(), SerializationError> {
        Ok(())
    }
}
