//! Fixed-width identifiers used throughout Atomix.
//!
//! Accounts, contracts and proxies share one 20-byte [`Address`] space.
//! Hashes are 32-byte [`H256`] words and predicate entry points are named by
//! a 4-byte [`Selector`]. All three render as `0x`-prefixed lowercase hex,
//! which is also their serde representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::keccak256;
use crate::error::AtomixError;

fn parse_hex<const N: usize>(s: &str) -> Result<[u8; N], AtomixError> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw).map_err(|e| AtomixError::Serialization(e.to_string()))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        AtomixError::Serialization(format!("expected {N} bytes, got {}", bytes.len()))
    })
}

macro_rules! hex_serde {
    ($ty:ident) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }

        impl FromStr for $ty {
            type Err = AtomixError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex(s).map(Self)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account, contract or proxy address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null address. Never a valid maker, validator or target.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Deterministically derive an address from an arbitrary label.
    ///
    /// Used for deployment addresses and well-known singletons: the last
    /// 20 bytes of `keccak256(label)`.
    #[must_use]
    pub fn derive(label: &[u8]) -> Self {
        Self::from_word(&keccak256(label))
    }

    /// Take the low 20 bytes of a 32-byte word.
    #[must_use]
    pub fn from_word(word: &H256) -> Self {
        let mut out = [0u8; 20];
        out.copy_from_slice(&word.0[12..]);
        Self(out)
    }

    /// Left-pad to a 32-byte word, as the structured hash encodes it.
    #[must_use]
    pub fn to_word(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[12..].copy_from_slice(&self.0);
        out
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

hex_serde!(Address);

// ---------------------------------------------------------------------------
// H256
// ---------------------------------------------------------------------------

/// A 32-byte hash or word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct H256(pub [u8; 32]);

impl H256 {
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

hex_serde!(H256);

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// A 4-byte entry-point selector naming a predicate inside a validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// Selector of a named entry point: the first four bytes of
    /// `keccak256(name)`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let digest = keccak256(name.as_bytes());
        let mut out = [0u8; 4];
        out.copy_from_slice(&digest.0[..4]);
        Self(out)
    }

    /// Right-pad to a 32-byte word (fixed-bytes encoding).
    #[must_use]
    pub fn to_word(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[..4].copy_from_slice(&self.0);
        out
    }
}

hex_serde!(Selector);
