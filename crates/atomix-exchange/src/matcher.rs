//! The atomic match engine.
//!
//! `atomic_match` takes two orders, their authorizations and one proposed
//! call per order, and either applies all of it or none of it:
//!
//! 1. reject a self-match (equal hashes)
//! 2. authorize both orders
//! 3. check both orders' parameters against a single sampled `now`
//! 4. evaluate each order's predicate from its own side
//! 5. add each predicate's fill increment, bounded by `maximum_fill`
//! 6. drive call 1 through maker 1's proxy, then call 2 through maker 2's
//!    proxy carrying the attached value
//! 7. record `OrdersMatched`
//!
//! A guard flag refuses any match started while another one is running,
//! whether re-entered through a leg or a predicate.

use atomix_types::{
    Address, AtomixError, Env, Event, H256, Leg, MatchSide, PredicateInput, Result,
};
use serde::{Deserialize, Serialize};

use crate::authorization::Authorizer;
use crate::host::World;

/// Summary of a committed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub first_hash: H256,
    pub second_hash: H256,
    pub first_authorizer: Authorizer,
    pub second_authorizer: Authorizer,
    /// Fills after the match.
    pub first_fill: u128,
    pub second_fill: u128,
    pub metadata: H256,
}

impl World {
    /// Match `first` against `second` on behalf of `caller`, attaching
    /// `value` from the caller's balance to the second leg.
    pub fn atomic_match(&mut self, caller: Address, first: &MatchSide, second: &MatchSide, metadata: H256, value: u128) -> Result<MatchOutcome> {
        ensure_distinct(first, second)?;
        self.transaction(|w| {
            let available = w.balance_of(&caller);
            if available < value {
                return Err(AtomixError::InsufficientValue {
                    needed: value,
                    available,
                });
            }
            let exchange = w.config.exchange;
            w.move_value(caller, exchange, value)
                .map_err(|r| AtomixError::CallReverted {
                    reason: r.reason().to_string(),
                })?;
            w.guarded_match(caller, first, second, metadata, value)
        })
    }

    /// Match with `value` already held by the exchange.
    pub(crate) fn guarded_match(&mut self, caller: Address, first: &MatchSide, second: &MatchSide, metadata: H256, value: u128) -> Result<MatchOutcome> {
        ensure_distinct(first, second)?;
        if self.matching {
            tracing::warn!(caller = %caller, "Reentrant match rejected");
            return Err(AtomixError::Reentrancy);
        }
        self.matching = true;
        let result = self.transaction(|w| w.execute_match(caller, first, second, metadata, value));
        self.matching = false;

        match &result {
            Ok(outcome) => tracing::info!(
                first = %outcome.first_hash,
                second = %outcome.second_hash,
                first_fill = outcome.first_fill,
                second_fill = outcome.second_fill,
                metadata = %metadata,
                "Orders matched"
            ),
            Err(err) => tracing::warn!(caller = %caller, error = %err, "Match rejected"),
        }
        result
    }

    fn execute_match(&mut self, caller: Address, first: &MatchSide, second: &MatchSide, metadata: H256, value: u128) -> Result<MatchOutcome> {
        let now = self.now();
        let first_hash = first.order.hash();
        let second_hash = second.order.hash();

        let first_authorizer = self
            .authorize(&caller, &first_hash, &first.order.maker, &first.signature)
            .ok_or(AtomixError::FirstAuthFailed)?;
        let second_authorizer = self
            .authorize(&caller, &second_hash, &second.order.maker, &second.signature)
            .ok_or(AtomixError::SecondAuthFailed)?;
        tracing::debug!(?first_authorizer, ?second_authorizer, "Both orders authorized");

        self.check_parameters(&first.order, &first_hash, now)
            .map_err(|reason| AtomixError::params_invalid(Leg::First, reason))?;
        self.check_parameters(&second.order, &second_hash, now)
            .map_err(|reason| AtomixError::params_invalid(Leg::Second, reason))?;

        let first_previous = self.ledger.exchange.fill(&first.order.maker, &first_hash);
        let second_previous = self.ledger.exchange.fill(&second.order.maker, &second_hash);

        let first_increment = self.evaluate_predicate(Leg::First, caller, first, second, value, first_previous)?;
        let second_increment = self.evaluate_predicate(Leg::Second, caller, second, first, value, second_previous)?;

        let first_fill = self.bump_fill(Leg::First, first, &first_hash, first_previous, first_increment)?;
        let second_fill = self.bump_fill(Leg::Second, second, &second_hash, second_previous, second_increment)?;

        self.run_leg(Leg::First, first, 0)?;
        self.run_leg(Leg::Second, second, value)?;

        self.emit(Event::OrdersMatched {
            first_hash,
            second_hash,
            first_maker: first.order.maker,
            second_maker: second.order.maker,
            first_fill,
            second_fill,
            metadata,
        });

        Ok(MatchOutcome {
            first_hash,
            second_hash,
            first_authorizer,
            second_authorizer,
            first_fill,
            second_fill,
            metadata,
        })
    }

    /// Evaluate `own`'s predicate with `counter` as the other side.
    fn evaluate_predicate(&self, leg: Leg, caller: Address, own: &MatchSide, counter: &MatchSide, value: u128, previous_fill: u128) -> Result<u128> {
        let order = &own.order;
        let Some(validator) = self.ledger.contracts.get(&order.validator) else {
            return Err(AtomixError::NoSuchTarget {
                target: order.validator,
            });
        };
        let Some(library) = validator.predicates() else {
            return Err(AtomixError::ValidationFailed {
                leg,
                reason: format!("{} exposes no predicates", order.validator),
            });
        };

        let input = PredicateInput {
            params: &order.predicate_params,
            addresses: [
                order.registry,
                order.maker,
                own.call.target,
                counter.order.registry,
                counter.order.maker,
                counter.call.target,
                caller,
            ],
            modes: [own.call.mode, counter.call.mode],
            uints: [
                value,
                order.maximum_fill,
                u128::from(order.listing_time),
                u128::from(order.expiration_time),
                u128::from(counter.order.listing_time),
                previous_fill,
            ],
            payload: &own.call.payload,
            counter_payload: &counter.call.payload,
        };

        library
            .evaluate(&order.predicate, &input)
            .map_err(|r| AtomixError::ValidationFailed {
                leg,
                reason: r.reason().to_string(),
            })
    }

    fn bump_fill(&mut self, leg: Leg, side: &MatchSide, hash: &H256, previous: u128, increment: u128) -> Result<u128> {
        let maximum = side.order.maximum_fill;
        let fill = previous
            .checked_add(increment)
            .filter(|fill| *fill <= maximum)
            .ok_or(AtomixError::FillExceeded {
                leg,
                fill: previous.saturating_add(increment),
                maximum,
            })?;
        if fill != previous {
            self.ledger.exchange.set_fill(side.order.maker, *hash, fill);
        }
        Ok(fill)
    }

    fn run_leg(&mut self, leg: Leg, side: &MatchSide, value: u128) -> Result<()> {
        let target = side.call.target;
        if !self.is_contract(&target) {
            return Err(AtomixError::NoSuchTarget { target });
        }

        let maker = side.order.maker;
        let registry = &self.ledger.registry;
        let proxy = registry
            .proxy_of(&maker)
            .ok_or(AtomixError::ProxyNotFound { maker })?;
        let implementation = registry
            .proxy(&proxy)
            .map(atomix_registry::DelegateProxy::implementation);
        if implementation != Some(registry.implementation()) {
            return Err(AtomixError::WrongImplementation { proxy });
        }

        let exchange = self.config.exchange;
        self.move_value(exchange, proxy, value)
            .map_err(|r| AtomixError::call_failed(leg, r.reason()))?;
        self.execute_through_proxy(exchange, proxy, &side.call, value)
            .map_err(|r| AtomixError::call_failed(leg, r.reason()))?;
        tracing::debug!(%leg, maker = %maker, proxy = %proxy, target = %target, "Leg executed");
        Ok(())
    }
}

/// An order can never be matched against itself, whatever else is wrong
/// with the submission.
fn ensure_distinct(first: &MatchSide, second: &MatchSide) -> Result<()> {
    if first.order.hash() == second.order.hash() {
        return Err(AtomixError::SelfMatch);
    }
    Ok(())
}
