//! Order authorization.
//!
//! An order hash is authorized for its maker when any one of the
//! [`Authorizer`] variants applies. They are tried cheapest first: caller
//! identity and table lookups before any signature recovery.

use atomix_types::signature::prefixed_digest;
use atomix_types::{Address, AtomixError, Env, Event, H256, Order, Result, Signature, SignatureScheme};
use serde::{Deserialize, Serialize};

use crate::host::World;

/// The rule under which an order was found authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authorizer {
    /// The caller is the maker.
    SelfCaller,
    /// The order already has a non-zero fill.
    Cached,
    /// The maker approved the hash on-protocol.
    PreApproved,
    /// ECDSA over the structured signing hash.
    StructuredEcdsa,
    /// ECDSA over the prefixed personal-message digest.
    PrefixedEcdsa,
    /// The contract maker's validation callback accepted the signature.
    ContractCallback,
}

impl World {
    /// Structured hash of `order`.
    pub fn order_hash(order: &Order) -> H256 {
        order.hash()
    }

    /// Digest a maker signs for `order` on this exchange.
    pub fn signing_hash(&self, order: &Order) -> H256 {
        self.domain.signing_hash(&order.hash())
    }

    /// Find a rule authorizing `hash` for `maker` when submitted by `caller`.
    pub fn authorize(&self, caller: &Address, hash: &H256, maker: &Address, signature: &Signature) -> Option<Authorizer> {
        if caller == maker {
            return Some(Authorizer::SelfCaller);
        }
        let state = &self.ledger.exchange;
        if state.fill(maker, hash) != 0 {
            return Some(Authorizer::Cached);
        }
        if state.is_approved(maker, hash) {
            return Some(Authorizer::PreApproved);
        }

        let signing_hash = self.domain.signing_hash(hash);

        // Contract accounts can only authorize through their callback.
        if self.is_contract(maker) {
            let accepted = self
                .ledger
                .contracts
                .get(maker)
                .is_some_and(|c| c.is_valid_signature(&signing_hash, &signature.to_bytes()));
            return accepted.then_some(Authorizer::ContractCallback);
        }

        match signature.scheme {
            SignatureScheme::Structured => (signature.recover(&signing_hash) == Some(*maker))
                .then_some(Authorizer::StructuredEcdsa),
            SignatureScheme::Prefixed => {
                let digest = prefixed_digest(&self.config.personal_sign_prefix, &signing_hash);
                (signature.recover(&digest) == Some(*maker)).then_some(Authorizer::PrefixedEcdsa)
            }
            SignatureScheme::Contract => None,
        }
    }

    pub fn is_authorized(&self, caller: &Address, hash: &H256, maker: &Address, signature: &Signature) -> bool {
        self.authorize(caller, hash, maker, signature).is_some()
    }

    /// Whether `order` could be matched right now, authorization aside.
    pub fn validate_parameters(&self, order: &Order) -> bool {
        self.check_parameters(order, &order.hash(), self.now()).is_ok()
    }

    pub(crate) fn check_parameters(&self, order: &Order, hash: &H256, now: u64) -> std::result::Result<(), String> {
        if order.validator.is_zero() {
            return Err("validator is null".into());
        }
        if order.registry != self.config.registry {
            return Err(format!("unknown registry {}", order.registry));
        }
        if order.listing_time > now {
            return Err(format!("not listed until {}", order.listing_time));
        }
        if now > order.expiration_time {
            return Err(format!("expired at {}", order.expiration_time));
        }
        let fill = self.ledger.exchange.fill(&order.maker, hash);
        if fill >= order.maximum_fill {
            return Err(format!("fill {fill} has reached maximum {}", order.maximum_fill));
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Maker operations
    // -----------------------------------------------------------------

    /// Pre-approve `order`. Only its maker may do this, once.
    ///
    /// With `inclusion` the full order is published in the event so
    /// off-protocol order books can pick it up.
    pub fn approve_order(&mut self, caller: Address, order: &Order, inclusion: bool) -> Result<()> {
        self.approve_order_as(caller, order, inclusion)
    }

    /// Pre-approve a hash the caller computed itself.
    pub fn approve_order_hash(&mut self, caller: Address, hash: H256) -> Result<()> {
        self.approve_order_hash_as(caller, hash)
    }

    /// Overwrite the caller's fill for `hash`. Setting a fill at or above the
    /// order's maximum is how a maker cancels.
    pub fn set_fill(&mut self, caller: Address, hash: H256, fill: u128) -> Result<()> {
        self.set_fill_as(caller, hash, fill)
    }

    pub(crate) fn approve_order_as(&mut self, caller: Address, order: &Order, inclusion: bool) -> Result<()> {
        if caller != order.maker {
            tracing::warn!(caller = %caller, maker = %order.maker, "Approval from non-maker");
            return Err(AtomixError::NotMaker { caller });
        }
        let hash = order.hash();
        self.record_approval(caller, hash, inclusion.then(|| order.clone()), inclusion)
    }

    pub(crate) fn approve_order_hash_as(&mut self, caller: Address, hash: H256) -> Result<()> {
        self.record_approval(caller, hash, None, false)
    }

    fn record_approval(&mut self, maker: Address, hash: H256, order: Option<Order>, inclusion: bool) -> Result<()> {
        if !self.ledger.exchange.approve(maker, hash) {
            return Err(AtomixError::AlreadyApproved);
        }
        self.emit(Event::OrderApproved {
            hash,
            maker,
            order,
            inclusion,
        });
        tracing::info!(maker = %maker, hash = %hash, inclusion, "Order approved");
        Ok(())
    }

    pub(crate) fn set_fill_as(&mut self, caller: Address, hash: H256, fill: u128) -> Result<()> {
        // The caller writes only its own row, so it is always the maker.
        if !self.is_authorized(&caller, &hash, &caller, &Signature::NULL) {
            return Err(AtomixError::NotAuthorized { hash, maker: caller });
        }
        if self.ledger.exchange.fill(&caller, &hash) == fill {
            return Err(AtomixError::NoOpFill);
        }
        self.ledger.exchange.set_fill(caller, hash, fill);
        self.emit(Event::OrderFillChanged {
            hash,
            maker: caller,
            fill,
        });
        tracing::info!(maker = %caller, hash = %hash, fill, "Order fill set");
        Ok(())
    }
}
