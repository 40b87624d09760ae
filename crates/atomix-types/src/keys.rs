//! Signing keypairs for tests and tooling.
//!
//! Only compiled with the `test-helpers` feature. The protocol itself never
//! signs; makers sign off-protocol.

use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use crate::crypto::address_of_public_key;
use crate::signature::prefixed_digest;
use crate::{Address, Domain, H256, Order, Signature, SignatureScheme};

/// A secp256k1 keypair and the address it controls.
#[derive(Debug, Clone)]
pub struct Keypair {
    secret: SecretKey,
    address: Address,
}

impl Keypair {
    /// Fresh random keypair.
    #[must_use]
    pub fn random() -> Self {
        loop {
            if let Ok(secret) = SecretKey::from_slice(&rand::random::<[u8; 32]>()) {
                return Self::from_secret(secret);
            }
        }
    }

    /// Keypair from raw secret bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, secp256k1::Error> {
        SecretKey::from_slice(bytes).map(Self::from_secret)
    }

    fn from_secret(secret: SecretKey) -> Self {
        let public = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret);
        Self {
            secret,
            address: address_of_public_key(&public),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a raw digest, tagging the result with `scheme`.
    #[must_use]
    pub fn sign_digest(&self, digest: &H256, scheme: SignatureScheme) -> Signature {
        let ctx = Secp256k1::signing_only();
        let message = Message::from_digest(digest.0);
        let (id, compact) = ctx
            .sign_ecdsa_recoverable(&message, &self.secret)
            .serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = 27 + id.to_i32() as u8;
        Signature {
            v,
            r: H256(r),
            s: H256(s),
            scheme,
        }
    }

    /// Sign an order's structured signing hash.
    #[must_use]
    pub fn sign_structured(&self, domain: &Domain, order: &Order) -> Signature {
        self.sign_digest(&domain.signing_hash(&order.hash()), SignatureScheme::Structured)
    }

    /// Sign an order the way a wallet's personal-message signer does.
    #[must_use]
    pub fn sign_prefixed(&self, prefix: &str, domain: &Domain, order: &Order) -> Signature {
        let digest = prefixed_digest(prefix, &domain.signing_hash(&order.hash()));
        self.sign_digest(&digest, SignatureScheme::Prefixed)
    }
}
