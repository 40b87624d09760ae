//! The executable-account interface.
//!
//! Everything a proxy can call, and every validator, is a [`Contract`]
//! living at an [`Address`] inside the host. The host resolves addresses to
//! contracts at call time; an address with nothing behind it is reported,
//! never a crash.

use std::any::Any;
use std::fmt;

use thiserror::Error;

use crate::predicate::PredicateLibrary;
use crate::{Address, H256};

/// A contract-level failure. Unwinds the enclosing top-level call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Revert(String);

impl Revert {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// Fail with `reason` unless `cond` holds.
#[macro_export]
macro_rules! require {
    ($cond:expr, $reason:expr) => {
        if !$cond {
            return Err($crate::contract::Revert::new($reason));
        }
    };
}

/// The inbound side of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Immediate caller.
    pub sender: Address,
    /// Native value transferred with the call.
    pub value: u128,
    pub payload: Vec<u8>,
}

/// What a running contract can see and do.
///
/// Calls made through the environment carry the currently executing
/// address as their sender.
pub trait Env {
    /// Address whose context is executing. Under a delegate call this is
    /// the caller's address, not the code's.
    fn this(&self) -> Address;

    /// Block time, fixed for the whole top-level call.
    fn timestamp(&self) -> u64;

    /// Call `target`, moving `value` from [`Env::this`].
    fn call(&mut self, target: Address, value: u128, payload: &[u8]) -> Result<Vec<u8>, Revert>;

    /// Whether anything executable lives at `address`.
    fn is_contract(&self, address: &Address) -> bool;

    /// Native balance of `address`.
    fn balance_of(&self, address: &Address) -> u128;
}

/// An executable account.
pub trait Contract: ContractClone + Send + Sync + fmt::Debug {
    /// Handle a direct call. State changes are kept only if the enclosing
    /// top-level call succeeds.
    fn call(&mut self, env: &mut dyn Env, msg: &Message) -> Result<Vec<u8>, Revert>;

    /// Run this contract's code in the caller's context.
    ///
    /// Only stateless libraries support this.
    fn delegate(&self, _env: &mut dyn Env, _msg: &Message) -> Result<Vec<u8>, Revert> {
        Err(Revert::new("delegate call not supported"))
    }

    /// Signature-validation callback for contract accounts acting as makers.
    fn is_valid_signature(&self, _hash: &H256, _signature: &[u8]) -> bool {
        false
    }

    /// Predicate entry points, if this contract is a validator.
    fn predicates(&self) -> Option<&dyn PredicateLibrary> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Object-safe cloning so the host can checkpoint its contract table.
pub trait ContractClone {
    fn clone_box(&self) -> Box<dyn Contract>;
}

impl<T> ContractClone for T
where
    T: Contract + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Contract> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
