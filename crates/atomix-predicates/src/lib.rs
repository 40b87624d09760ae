//! # atomix-predicates
//!
//! Validator contracts exposing predicate libraries.
//!
//! - [`GenericPredicates`]: shape-only predicates (`any`, `anyNoFill`,
//!   `exactCall`, `exactCounterCall`)
//! - [`MarketPredicates`]: ratio-priced swaps over the reference asset
//!   contracts
//!
//! Deploy either into the exchange host and point an order's `validator` at
//! it. The order's `predicate` is the entry point's
//! [`selector`](GenericPredicate::selector).

pub mod generic;
pub mod market;

pub use generic::{GenericPredicate, GenericPredicates};
pub use market::{MarketPredicate, MarketPredicates, MultiTokenSwapParams, SwapParams, UniqueSwapParams};
