//! # atomix-assets
//!
//! Contracts that makers trade and route calls through:
//!
//! - [`FungibleToken`], [`UniqueToken`], [`MultiToken`]: reference asset
//!   ledgers with operator/allowance approval
//! - [`CallBundler`]: delegate-only library issuing several calls from a
//!   proxy in one leg
//! - [`SmartWallet`]: a contract maker validating signatures by its owner
//! - [`Recorder`]: a no-op target

pub mod bundler;
pub mod fungible;
pub mod multi;
pub mod recorder;
pub mod unique;
pub mod wallet;

#[cfg(test)]
mod mock;

pub use bundler::{BundleCall, BundledCall, CallBundler};
pub use fungible::{FungibleCall, FungibleToken};
pub use multi::{MultiToken, MultiTokenCall};
pub use recorder::Recorder;
pub use unique::{UniqueCall, UniqueToken};
pub use wallet::{SmartWallet, WalletCall};
