//! The order model and its structured (typed-data) hashing.
//!
//! An [`Order`] is never stored by the protocol. Only its hash keys the fill
//! and approval tables, so the hash must be a pure function of every field:
//! identical fields give an identical hash and any single-field change gives
//! a different one.
//!
//! Two hashes exist per order:
//! - [`Order::hash`]: the struct hash, `keccak(TYPE_HASH ‖ enc(fields))`.
//! - [`Domain::signing_hash`]: `keccak(0x1901 ‖ domain_separator ‖ struct_hash)`,
//!   which binds the order to one exchange instance on one chain.

use hex_literal::hex;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::crypto::keccak256;
use crate::{Address, H256, Selector};

/// Canonical type string of an order, in field order.
pub const ORDER_TYPE: &str = "Order(address registry,address maker,address validator,bytes4 predicate,bytes predicateParams,uint256 maximumFill,uint256 listingTime,uint256 expirationTime,uint256 salt)";

/// Canonical type string of the signing domain.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

// See tests for the pre-image
const DOMAIN_TYPE_HASH: [u8; 32] =
    hex!("8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f");

static ORDER_TYPE_HASH: Lazy<H256> = Lazy::new(|| keccak256(ORDER_TYPE.as_bytes()));

/// Big-endian 32-byte encoding of an unsigned integer.
pub(crate) fn uint_word(value: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

/// A signed, partially-fillable trade intent.
///
/// The order does not name assets or amounts directly. Its terms live in
/// `predicate_params`, which the `predicate` entry point of `validator`
/// interprets when a match is proposed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Authority registry whose proxies this order may be executed through.
    pub registry: Address,
    /// Account whose authorization the order represents.
    pub maker: Address,
    /// Contract holding the predicate.
    pub validator: Address,
    /// Predicate entry point inside `validator`.
    pub predicate: Selector,
    /// Opaque terms interpreted by the predicate.
    #[serde(with = "hex_bytes")]
    pub predicate_params: Vec<u8>,
    /// Fill capacity. The order is exhausted once `fill >= maximum_fill`.
    pub maximum_fill: u128,
    /// Earliest matchable time (unix seconds, inclusive).
    pub listing_time: u64,
    /// Latest matchable time (unix seconds, inclusive).
    pub expiration_time: u64,
    /// Entropy distinguishing otherwise identical orders.
    pub salt: u128,
}

impl Order {
    /// Structured hash of the order.
    #[must_use]
    pub fn hash(&self) -> H256 {
        let mut hasher = Keccak256::new();
        hasher.update(ORDER_TYPE_HASH.0);
        hasher.update(self.registry.to_word());
        hasher.update(self.maker.to_word());
        hasher.update(self.validator.to_word());
        hasher.update(self.predicate.to_word());
        hasher.update(keccak256(&self.predicate_params).0);
        hasher.update(uint_word(self.maximum_fill));
        hasher.update(uint_word(u128::from(self.listing_time)));
        hasher.update(uint_word(u128::from(self.expiration_time)));
        hasher.update(uint_word(self.salt));
        H256(hasher.finalize().into())
    }

    /// Whether `now` falls inside `[listing_time, expiration_time]`.
    #[must_use]
    pub fn is_live_at(&self, now: u64) -> bool {
        self.listing_time <= now && now <= self.expiration_time
    }
}

/// The signing domain of one exchange instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Domain {
    /// Hash of the domain itself.
    #[must_use]
    pub fn separator(&self) -> H256 {
        let mut hasher = Keccak256::new();
        hasher.update(DOMAIN_TYPE_HASH);
        hasher.update(keccak256(self.name.as_bytes()).0);
        hasher.update(keccak256(self.version.as_bytes()).0);
        hasher.update(uint_word(u128::from(self.chain_id)));
        hasher.update(self.verifying_contract.to_word());
        H256(hasher.finalize().into())
    }

    /// Digest a maker signs for an order with struct hash `order_hash`.
    #[must_use]
    pub fn signing_hash(&self, order_hash: &H256) -> H256 {
        let mut hasher = Keccak256::new();
        hasher.update([0x19, 0x01]);
        hasher.update(self.separator().0);
        hasher.update(order_hash.0);
        H256(hasher.finalize().into())
    }
}

/// Serde adapter rendering byte strings as `0x`-prefixed hex.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// A live, single-fill order with empty terms.
    #[must_use]
    pub fn dummy(registry: Address, maker: Address, validator: Address, predicate: Selector) -> Self {
        Self {
            registry,
            maker,
            validator,
            predicate,
            predicate_params: Vec::new(),
            maximum_fill: 1,
            listing_time: 0,
            expiration_time: 100_000_000_000,
            salt: rand::random(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn sample() -> Order {
        Order {
            registry: Address([1; 20]),
            maker: Address([2; 20]),
            validator: Address([3; 20]),
            predicate: Selector([4; 4]),
            predicate_params: vec![5, 6, 7],
            maximum_fill: 10,
            listing_time: 100,
            expiration_time: 200,
            salt: 42,
        }
    }

    fn domain() -> Domain {
        Domain {
            name: "Atomix Exchange".into(),
            version: "3.1".into(),
            chain_id: 50,
            verifying_contract: Address([9; 20]),
        }
    }

    #[test]
    fn domain_type_hash_preimage() {
        assert_eq!(H256(DOMAIN_TYPE_HASH), keccak256(DOMAIN_TYPE.as_bytes()));
    }

    #[test]
    fn order_hash_layout() {
        let order = sample();
        let mut preimage = Vec::new();
        preimage.extend_from_slice(&keccak256(ORDER_TYPE.as_bytes()).0);
        preimage.extend_from_slice(&order.registry.to_word());
        preimage.extend_from_slice(&order.maker.to_word());
        preimage.extend_from_slice(&order.validator.to_word());
        preimage.extend_from_slice(&order.predicate.to_word());
        preimage.extend_from_slice(&keccak256(&[5, 6, 7]).0);
        for n in [10u128, 100, 200, 42] {
            preimage.extend_from_slice(&uint_word(n));
        }
        assert_eq!(order.hash(), keccak256(&preimage));
    }

    #[test]
    fn signing_hash_binds_the_domain() {
        let hash = sample().hash();
        let a = domain();
        let mut b = domain();
        b.chain_id = 51;
        let mut c = domain();
        c.verifying_contract = Address([8; 20]);
        assert_ne!(a.signing_hash(&hash), b.signing_hash(&hash));
        assert_ne!(a.signing_hash(&hash), c.signing_hash(&hash));
        assert_eq!(a.signing_hash(&hash), domain().signing_hash(&hash));
    }

    #[test]
    fn live_window_is_inclusive() {
        let order = sample();
        assert!(!order.is_live_at(99));
        assert!(order.is_live_at(100));
        assert!(order.is_live_at(200));
        assert!(!order.is_live_at(201));
    }

    #[test]
    fn serde_uses_camel_case_and_hex() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["predicateParams"], "0x050607");
        assert_eq!(json["maximumFill"], 10);
        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[derive(Debug, Clone)]
    enum Mutation {
        Registry,
        Maker,
        Validator,
        Predicate,
        Params,
        MaximumFill,
        Listing,
        Expiration,
        Salt,
    }

    fn mutation() -> impl Strategy<Value = Mutation> {
        prop_oneof![
            Just(Mutation::Registry),
            Just(Mutation::Maker),
            Just(Mutation::Validator),
            Just(Mutation::Predicate),
            Just(Mutation::Params),
            Just(Mutation::MaximumFill),
            Just(Mutation::Listing),
            Just(Mutation::Expiration),
            Just(Mutation::Salt),
        ]
    }

    fn arb_order() -> impl Strategy<Value = Order> {
        (
            any::<[u8; 20]>(),
            any::<[u8; 20]>(),
            any::<[u8; 20]>(),
            any::<[u8; 4]>(),
            proptest::collection::vec(any::<u8>(), 0..64),
            any::<u128>(),
            any::<u64>(),
            any::<u64>(),
            any::<u128>(),
        )
            .prop_map(|(r, m, v, p, params, max, l, e, salt)| Order {
                registry: Address(r),
                maker: Address(m),
                validator: Address(v),
                predicate: Selector(p),
                predicate_params: params,
                maximum_fill: max,
                listing_time: l,
                expiration_time: e,
                salt,
            })
    }

    proptest! {
        #[test]
        fn hash_is_deterministic(order in arb_order()) {
            prop_assert_eq!(order.hash(), order.clone().hash());
        }

        #[test]
        fn any_single_field_change_changes_hash(order in arb_order(), m in mutation()) {
            let mut other = order.clone();
            match m {
                Mutation::Registry => other.registry.0[0] ^= 1,
                Mutation::Maker => other.maker.0[19] ^= 1,
                Mutation::Validator => other.validator.0[7] ^= 1,
                Mutation::Predicate => other.predicate.0[3] ^= 1,
                Mutation::Params => other.predicate_params.push(0),
                Mutation::MaximumFill => other.maximum_fill ^= 1,
                Mutation::Listing => other.listing_time ^= 1,
                Mutation::Expiration => other.expiration_time ^= 1,
                Mutation::Salt => other.salt ^= 1,
            }
            prop_assert_ne!(order.hash(), other.hash());
        }
    }
}
