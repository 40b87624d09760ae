//! Maker signatures and their wire encoding.
//!
//! Wire format: `v` as a 32-byte word, then `r`, then `s` (96 bytes), plus
//! an optional trailing scheme-tag byte. Without a tag the signature is
//! read as [`SignatureScheme::Structured`].

use core::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::crypto::{keccak256_concat, recover};
use crate::error::{AtomixError, Result};
use crate::{Address, H256};

/// Length of an untagged signature on the wire.
pub const SIGNATURE_LEN: usize = 96;

/// Which digest a signature was produced over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureScheme {
    /// Signed directly over the structured signing hash.
    #[default]
    Structured,
    /// Signed over `keccak(prefix ‖ "32" ‖ signing_hash)`.
    Prefixed,
    /// Opaque bytes checked by a contract maker's validation callback.
    Contract,
}

impl From<SignatureScheme> for u8 {
    fn from(value: SignatureScheme) -> Self {
        match value {
            SignatureScheme::Structured => 2,
            SignatureScheme::Prefixed => 3,
            SignatureScheme::Contract => 4,
        }
    }
}

impl TryFrom<u8> for SignatureScheme {
    type Error = AtomixError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(Self::Structured),
            3 => Ok(Self::Prefixed),
            4 => Ok(Self::Contract),
            other => Err(AtomixError::MalformedSignature {
                reason: format!("unsupported scheme tag {other}, expected 2, 3 or 4"),
            }),
        }
    }
}

/// An ECDSA signature `(v, r, s)` tagged with its scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub v: u8,
    pub r: H256,
    pub s: H256,
    pub scheme: SignatureScheme,
}

impl Signature {
    /// The placeholder signature passed when a maker authorizes by other means.
    pub const NULL: Self = Self {
        v: 27,
        r: H256::ZERO,
        s: H256::ZERO,
        scheme: SignatureScheme::Structured,
    };

    /// Encode as 96 bytes plus a trailing scheme tag.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SIGNATURE_LEN + 1);
        let mut v_word = [0u8; 32];
        v_word[31] = self.v;
        out.extend_from_slice(&v_word);
        out.extend_from_slice(&self.r.0);
        out.extend_from_slice(&self.s.0);
        out.push(self.scheme.into());
        out
    }

    /// Decode from the wire format, with or without a scheme tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let scheme = match bytes.len() {
            SIGNATURE_LEN => SignatureScheme::Structured,
            n if n == SIGNATURE_LEN + 1 => SignatureScheme::try_from(bytes[SIGNATURE_LEN])?,
            n => {
                return Err(AtomixError::MalformedSignature {
                    reason: format!("expected {SIGNATURE_LEN} or {} bytes, got {n}", SIGNATURE_LEN + 1),
                });
            }
        };
        if bytes[..31].iter().any(|b| *b != 0) {
            return Err(AtomixError::MalformedSignature {
                reason: "v does not fit in one byte".into(),
            });
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[32..64]);
        s.copy_from_slice(&bytes[64..96]);
        Ok(Self {
            v: bytes[31],
            r: H256(r),
            s: H256(s),
            scheme,
        })
    }

    /// Recover the address that signed `digest`, if any.
    ///
    /// Accepts `v` as either 27/28 or a raw 0/1 recovery id.
    #[must_use]
    pub fn recover(&self, digest: &H256) -> Option<Address> {
        let recovery_id = match self.v {
            0 | 1 => i32::from(self.v),
            27 | 28 => i32::from(self.v - 27),
            _ => return None,
        };
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r.0);
        compact[32..].copy_from_slice(&self.s.0);
        recover(digest, &compact, recovery_id).ok()
    }
}

/// Digest signed under [`SignatureScheme::Prefixed`].
#[must_use]
pub fn prefixed_digest(prefix: &str, signing_hash: &H256) -> H256 {
    keccak256_concat(&[prefix.as_bytes(), b"32", &signing_hash.0])
}
