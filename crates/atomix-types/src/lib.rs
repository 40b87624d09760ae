//! # atomix-types
//!
//! Shared types, errors, and configuration for the **Atomix** order-matching
//! protocol.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Address`], [`H256`], [`Selector`]
//! - **Order model**: [`Order`], [`Domain`] and their structured hashing
//! - **Signatures**: [`Signature`], [`SignatureScheme`], address recovery
//! - **Calls**: [`Call`], [`CallMode`] and the host payload enums
//! - **Execution interface**: [`Contract`], [`Env`], [`Message`], [`Revert`]
//! - **Predicate boundary**: [`PredicateLibrary`], [`PredicateInput`]
//! - **Events**: [`Event`]
//! - **Configuration**: [`ExchangeConfig`]
//! - **Errors**: [`AtomixError`] with `AX_ERR_` prefix codes

pub mod call;
pub mod config;
pub mod constants;
pub mod contract;
pub mod crypto;
pub mod error;
pub mod event;
pub mod ids;
pub mod order;
pub mod predicate;
pub mod signature;

#[cfg(any(test, feature = "test-helpers"))]
pub mod keys;

pub use call::*;
pub use config::*;
pub use contract::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use order::*;
pub use predicate::*;
pub use signature::*;

// Constants and hashing helpers are accessed via their modules
// (`atomix_types::constants::FOO`, `atomix_types::crypto::keccak256`).
