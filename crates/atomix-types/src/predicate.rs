//! The predicate-validator boundary.
//!
//! A validator is a contract exposing named predicates. For each order in a
//! match the engine evaluates that order's predicate against the proposed
//! calls, seen from the order's own side: "self" fields describe the order
//! and its call, "counter" fields the other order and its call.
//!
//! A predicate returns the fill increment to apply to its order. Zero means
//! the order is fill-exempt for this match. The engine, not the predicate,
//! enforces that the resulting fill stays within `maximum_fill`.

use crate::contract::Revert;
use crate::{Address, CallMode, Selector};

/// Number of address slots passed to a predicate.
pub const PREDICATE_ADDRESSES: usize = 7;
/// Number of integer slots passed to a predicate.
pub const PREDICATE_UINTS: usize = 6;

/// Everything a predicate may inspect.
///
/// Slot layout:
/// - `addresses`: `[registry, maker, target, counter_registry,
///   counter_maker, counter_target, matcher]`
/// - `modes`: `[mode, counter_mode]`
/// - `uints`: `[value, maximum_fill, listing_time, expiration_time,
///   counter_listing_time, previous_fill]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateInput<'a> {
    pub params: &'a [u8],
    pub addresses: [Address; PREDICATE_ADDRESSES],
    pub modes: [CallMode; 2],
    pub uints: [u128; PREDICATE_UINTS],
    pub payload: &'a [u8],
    pub counter_payload: &'a [u8],
}

impl PredicateInput<'_> {
    pub fn registry(&self) -> Address {
        self.addresses[0]
    }

    pub fn maker(&self) -> Address {
        self.addresses[1]
    }

    pub fn target(&self) -> Address {
        self.addresses[2]
    }

    pub fn counter_registry(&self) -> Address {
        self.addresses[3]
    }

    pub fn counter_maker(&self) -> Address {
        self.addresses[4]
    }

    pub fn counter_target(&self) -> Address {
        self.addresses[5]
    }

    /// Account that submitted the match.
    pub fn matcher(&self) -> Address {
        self.addresses[6]
    }

    pub fn mode(&self) -> CallMode {
        self.modes[0]
    }

    pub fn counter_mode(&self) -> CallMode {
        self.modes[1]
    }

    /// Value attached to the match.
    pub fn value(&self) -> u128 {
        self.uints[0]
    }

    pub fn maximum_fill(&self) -> u128 {
        self.uints[1]
    }

    pub fn listing_time(&self) -> u128 {
        self.uints[2]
    }

    pub fn expiration_time(&self) -> u128 {
        self.uints[3]
    }

    pub fn counter_listing_time(&self) -> u128 {
        self.uints[4]
    }

    /// Fill recorded for this order before the match.
    pub fn previous_fill(&self) -> u128 {
        self.uints[5]
    }
}

/// A set of named predicates.
pub trait PredicateLibrary {
    /// Evaluate the predicate named `selector`.
    ///
    /// `Ok(increment)` accepts the proposed calls and reports how much fill
    /// they consume. `Err` rejects them; unknown selectors are rejections.
    fn evaluate(&self, selector: &Selector, input: &PredicateInput<'_>) -> Result<u128, Revert>;
}
