//! Keccak-256 hashing and secp256k1 address recovery.
//!
//! The verification context is built once and shared; it carries the
//! precomputed tables that make repeated recovery cheap.

use once_cell::sync::Lazy;
use secp256k1::{
    Message, Secp256k1, VerifyOnly,
    ecdsa::{RecoverableSignature, RecoveryId},
};
use sha3::{Digest, Keccak256};

use crate::ids::{Address, H256};

static CONTEXT: Lazy<Secp256k1<VerifyOnly>> = Lazy::new(Secp256k1::verification_only);

/// Keccak-256 of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256(hasher.finalize().into())
}

/// Keccak-256 over the concatenation of several byte slices.
#[must_use]
pub fn keccak256_concat(parts: &[&[u8]]) -> H256 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    H256(hasher.finalize().into())
}

/// Address owning an uncompressed secp256k1 public key.
#[must_use]
pub fn address_of_public_key(public_key: &secp256k1::PublicKey) -> Address {
    let public_key = public_key.serialize_uncompressed();
    debug_assert_eq!(public_key[0], 0x04);
    Address::from_word(&keccak256(&public_key[1..]))
}

/// Recover the signing address of a 32-byte digest.
///
/// `recovery_id` is the raw 0/1 id, not the 27/28 `v` value.
pub fn recover(digest: &H256, compact: &[u8; 64], recovery_id: i32) -> Result<Address, secp256k1::Error> {
    let message = Message::from_digest_slice(&digest.0)?;
    let recovery_id = RecoveryId::from_i32(recovery_id)?;
    let signature = RecoverableSignature::from_compact(compact, recovery_id)?;
    let public_key = CONTEXT.recover_ecdsa(&message, &signature)?;
    Ok(address_of_public_key(&public_key))
}
