//! Asset-swap predicates over the reference token contracts.
//!
//! Every market predicate requires both legs to be direct calls with no
//! attached value, the own call to hand the maker's asset to the counter
//! maker, and the counter call to hand the counter asset back. Fill is
//! counted in units of what the maker gives.
//!
//! Prices are expressed as a ratio: `numerator` units given trade for
//! `denominator` units received, so a proposal is acceptable iff
//! `given * denominator == received * numerator`.

use std::any::Any;

use atomix_assets::{FungibleCall, MultiTokenCall, UniqueCall};
use atomix_types::{
    Address, CallMode, Contract, Env, Message, PredicateInput, PredicateLibrary, Result as AxResult,
    Revert, Selector, decode_payload, encode_payload, require,
};
use serde::{Deserialize, Serialize};

/// Entry points of [`MarketPredicates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketPredicate {
    /// Fungible for fungible at a fixed ratio. Params: [`SwapParams`].
    AnyFungibleForFungible,
    /// One multi-token id for a fungible at a fixed ratio. Params:
    /// [`MultiTokenSwapParams`].
    AnyMultiTokenForFungible,
    /// A fungible for one multi-token id at a fixed ratio. Params:
    /// [`MultiTokenSwapParams`].
    AnyFungibleForMultiToken,
    /// One unique token for a fixed fungible price. Params:
    /// [`UniqueSwapParams`].
    UniqueForFungible,
    /// A fixed fungible price for one unique token. Params:
    /// [`UniqueSwapParams`].
    FungibleForUnique,
}

impl MarketPredicate {
    pub const ALL: [Self; 5] = [
        Self::AnyFungibleForFungible,
        Self::AnyMultiTokenForFungible,
        Self::AnyFungibleForMultiToken,
        Self::UniqueForFungible,
        Self::FungibleForUnique,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AnyFungibleForFungible => "anyFungibleForFungible",
            Self::AnyMultiTokenForFungible => "anyMultiTokenForFungible",
            Self::AnyFungibleForMultiToken => "anyFungibleForMultiToken",
            Self::UniqueForFungible => "uniqueForFungible",
            Self::FungibleForUnique => "fungibleForUnique",
        }
    }

    #[must_use]
    pub fn selector(self) -> Selector {
        Selector::from_name(self.name())
    }

    pub fn from_selector(selector: &Selector) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.selector() == *selector)
    }
}

/// Terms of a fungible/fungible swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    pub give: Address,
    pub get: Address,
    pub numerator: u128,
    pub denominator: u128,
}

/// Terms of a swap with one multi-token id on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiTokenSwapParams {
    pub give: Address,
    pub get: Address,
    pub token_id: u128,
    pub numerator: u128,
    pub denominator: u128,
}

/// Terms of a unique-token sale or purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueSwapParams {
    pub give: Address,
    pub get: Address,
    pub token_id: u128,
    pub price: u128,
}

macro_rules! params_encoding {
    ($($ty:ty),*) => {$(
        impl $ty {
            /// Encode as an order's `predicate_params`.
            pub fn encode(&self) -> AxResult<Vec<u8>> {
                encode_payload(self)
            }
        }
    )*};
}

params_encoding!(SwapParams, MultiTokenSwapParams, UniqueSwapParams);

/// Validator with the [`MarketPredicate`] entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketPredicates;

/// Checks shared by every market predicate.
fn check_shape(input: &PredicateInput<'_>, give: Address, get: Address) -> Result<(), Revert> {
    require!(input.value() == 0, "market orders take no value");
    require!(
        input.mode() == CallMode::Direct && input.counter_mode() == CallMode::Direct,
        "market calls must be direct"
    );
    require!(input.target() == give, "call target is not the offered token");
    require!(input.counter_target() == get, "counter call target is not the requested token");
    Ok(())
}

fn check_ratio(given: u128, received: u128, numerator: u128, denominator: u128) -> Result<(), Revert> {
    require!(numerator > 0 && denominator > 0, "ratio terms must be non-zero");
    require!(given > 0, "trade amount must be non-zero");
    let lhs = given.checked_mul(denominator);
    let rhs = received.checked_mul(numerator);
    require!(lhs.is_some() && lhs == rhs, "price ratio mismatch");
    Ok(())
}

/// Amount moved by a fungible `TransferFrom` from `from` to `to`.
fn fungible_amount(payload: &[u8], from: Address, to: Address) -> Result<u128, Revert> {
    match decode_payload(payload)? {
        FungibleCall::TransferFrom {
            from: f,
            to: t,
            amount,
        } if f == from && t == to => Ok(amount),
        _ => Err(Revert::new("fungible call is not a transfer between the makers")),
    }
}

/// Amount of `id` moved by a multi-token `SafeTransferFrom` from `from` to `to`.
fn multi_amount(payload: &[u8], from: Address, to: Address, id: u128) -> Result<u128, Revert> {
    match decode_payload(payload)? {
        MultiTokenCall::SafeTransferFrom {
            from: f,
            to: t,
            id: i,
            amount,
        } if f == from && t == to => {
            require!(i == id, "token id mismatch");
            Ok(amount)
        }
        _ => Err(Revert::new("multi-token call is not a transfer between the makers")),
    }
}

fn unique_transfer(payload: &[u8], from: Address, to: Address, id: u128) -> Result<(), Revert> {
    match decode_payload(payload)? {
        UniqueCall::TransferFrom { from: f, to: t, id: i } if f == from && t == to => {
            require!(i == id, "token id mismatch");
            Ok(())
        }
        _ => Err(Revert::new("unique-token call is not a transfer between the makers")),
    }
}

impl MarketPredicates {
    fn fungible_for_fungible(input: &PredicateInput<'_>) -> Result<u128, Revert> {
        let params: SwapParams = decode_payload(input.params)?;
        check_shape(input, params.give, params.get)?;
        let given = fungible_amount(input.payload, input.maker(), input.counter_maker())?;
        let received = fungible_amount(input.counter_payload, input.counter_maker(), input.maker())?;
        check_ratio(given, received, params.numerator, params.denominator)?;
        Ok(given)
    }

    fn multi_for_fungible(input: &PredicateInput<'_>) -> Result<u128, Revert> {
        let params: MultiTokenSwapParams = decode_payload(input.params)?;
        check_shape(input, params.give, params.get)?;
        let given = multi_amount(input.payload, input.maker(), input.counter_maker(), params.token_id)?;
        let received = fungible_amount(input.counter_payload, input.counter_maker(), input.maker())?;
        check_ratio(given, received, params.numerator, params.denominator)?;
        Ok(given)
    }

    fn fungible_for_multi(input: &PredicateInput<'_>) -> Result<u128, Revert> {
        let params: MultiTokenSwapParams = decode_payload(input.params)?;
        check_shape(input, params.give, params.get)?;
        let given = fungible_amount(input.payload, input.maker(), input.counter_maker())?;
        let received = multi_amount(
            input.counter_payload,
            input.counter_maker(),
            input.maker(),
            params.token_id,
        )?;
        check_ratio(given, received, params.numerator, params.denominator)?;
        Ok(given)
    }

    fn unique_for_fungible(input: &PredicateInput<'_>) -> Result<u128, Revert> {
        let params: UniqueSwapParams = decode_payload(input.params)?;
        check_shape(input, params.give, params.get)?;
        unique_transfer(input.payload, input.maker(), input.counter_maker(), params.token_id)?;
        let received = fungible_amount(input.counter_payload, input.counter_maker(), input.maker())?;
        require!(received == params.price, "price mismatch");
        Ok(1)
    }

    fn fungible_for_unique(input: &PredicateInput<'_>) -> Result<u128, Revert> {
        let params: UniqueSwapParams = decode_payload(input.params)?;
        check_shape(input, params.give, params.get)?;
        let given = fungible_amount(input.payload, input.maker(), input.counter_maker())?;
        require!(given == params.price, "price mismatch");
        unique_transfer(
            input.counter_payload,
            input.counter_maker(),
            input.maker(),
            params.token_id,
        )?;
        Ok(1)
    }
}

impl PredicateLibrary for MarketPredicates {
    fn evaluate(&self, selector: &Selector, input: &PredicateInput<'_>) -> Result<u128, Revert> {
        let Some(predicate) = MarketPredicate::from_selector(selector) else {
            return Err(Revert::new(format!("unknown predicate {selector}")));
        };
        let result = match predicate {
            MarketPredicate::AnyFungibleForFungible => Self::fungible_for_fungible(input),
            MarketPredicate::AnyMultiTokenForFungible => Self::multi_for_fungible(input),
            MarketPredicate::AnyFungibleForMultiToken => Self::fungible_for_multi(input),
            MarketPredicate::UniqueForFungible => Self::unique_for_fungible(input),
            MarketPredicate::FungibleForUnique => Self::fungible_for_unique(input),
        };
        if let Err(reason) = &result {
            tracing::debug!(predicate = predicate.name(), maker = %input.maker(), %reason, "Market predicate rejected");
        }
        result
    }
}

impl Contract for MarketPredicates {
    fn call(&mut self, _env: &mut dyn Env, _msg: &Message) -> Result<Vec<u8>, Revert> {
        Err(Revert::new("predicate library is not callable"))
    }

    fn predicates(&self) -> Option<&dyn PredicateLibrary> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
