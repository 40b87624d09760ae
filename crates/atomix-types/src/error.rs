//! Error types for the Atomix protocol.
//!
//! All errors use the `AX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by taxonomy:
//! - 1xx: Authorization errors
//! - 2xx: Parameter errors
//! - 3xx: Validation errors
//! - 4xx: Execution errors
//! - 5xx: State errors
//! - 6xx: Permission errors
//! - 9xx: General / internal errors

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Address, H256};

/// Which side of an atomic match an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    First,
    Second,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

/// Coarse taxonomy bucket of an [`AtomixError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Authorization,
    Parameter,
    Validation,
    Execution,
    State,
    Permission,
    Internal,
}

/// Central error enum for all Atomix operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomixError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    #[error("AX_ERR_100: First order failed authorization")]
    FirstAuthFailed,

    #[error("AX_ERR_101: Second order failed authorization")]
    SecondAuthFailed,

    /// Only the maker may approve its own order.
    #[error("AX_ERR_102: Sender is not the maker of the order: {caller}")]
    NotMaker { caller: Address },

    /// Fill-set attempted on an order the caller has not authorized.
    #[error("AX_ERR_103: Order {hash} is not authorized for {maker}")]
    NotAuthorized { hash: H256, maker: Address },

    #[error("AX_ERR_104: Malformed signature: {reason}")]
    MalformedSignature { reason: String },

    // =================================================================
    // Parameter Errors (2xx)
    // =================================================================
    #[error("AX_ERR_200: Self-matching orders is prohibited")]
    SelfMatch,

    #[error("AX_ERR_201: First order has invalid parameters: {reason}")]
    FirstParamsInvalid { reason: String },

    #[error("AX_ERR_202: Second order has invalid parameters: {reason}")]
    SecondParamsInvalid { reason: String },

    /// The predicate's fill increment would push the order past its cap.
    #[error("AX_ERR_203: {leg} order fill {fill} exceeds maximum {maximum}")]
    FillExceeded { leg: Leg, fill: u128, maximum: u128 },

    // =================================================================
    // Validation Errors (3xx)
    // =================================================================
    #[error("AX_ERR_300: Static call failed for {leg} order: {reason}")]
    ValidationFailed { leg: Leg, reason: String },

    /// The identifier does not resolve to anything executable.
    #[error("AX_ERR_301: Call target does not exist: {target}")]
    NoSuchTarget { target: Address },

    // =================================================================
    // Execution Errors (4xx)
    // =================================================================
    #[error("AX_ERR_400: First call failed: {reason}")]
    FirstCallFailed { reason: String },

    #[error("AX_ERR_401: Second call failed: {reason}")]
    SecondCallFailed { reason: String },

    /// A host-level call reverted outside of a match leg.
    #[error("AX_ERR_402: Call reverted: {reason}")]
    CallReverted { reason: String },

    #[error("AX_ERR_403: Delegate proxy does not exist for maker {maker}")]
    ProxyNotFound { maker: Address },

    #[error("AX_ERR_404: Incorrect delegate proxy implementation for {proxy}")]
    WrongImplementation { proxy: Address },

    #[error("AX_ERR_405: Insufficient value: need {needed}, have {available}")]
    InsufficientValue { needed: u128, available: u128 },

    // =================================================================
    // State Errors (5xx)
    // =================================================================
    #[error("AX_ERR_500: Order has already been approved")]
    AlreadyApproved,

    #[error("AX_ERR_501: Fill is already set to the desired value")]
    NoOpFill,

    #[error("AX_ERR_502: Account already has a proxy: {account}")]
    ProxyAlreadyExists { account: Address },

    #[error("AX_ERR_503: Caller is already authenticated or pending: {caller}")]
    DuplicatePending { caller: Address },

    #[error("AX_ERR_504: Grant is not ready for {caller}")]
    NotReady { caller: Address },

    #[error("AX_ERR_505: Initial authentication has already been granted")]
    AlreadyInitialized,

    #[error("AX_ERR_506: Proxy already uses this implementation")]
    SameImplementation,

    #[error("AX_ERR_507: Reentrant call rejected")]
    Reentrancy,

    #[error("AX_ERR_508: Unknown proxy: {proxy}")]
    UnknownProxy { proxy: Address },

    // =================================================================
    // Permission Errors (6xx)
    // =================================================================
    #[error("AX_ERR_600: Caller is not the owner: {caller}")]
    NotOwner { caller: Address },

    #[error("AX_ERR_601: Caller may not execute through this proxy: {caller}")]
    Unauthorized { caller: Address },

    // =================================================================
    // General / Internal Errors (9xx)
    // =================================================================
    #[error("AX_ERR_900: Serialization error: {0}")]
    Serialization(String),

    #[error("AX_ERR_901: Configuration error: {0}")]
    Configuration(String),

    #[error("AX_ERR_902: Internal error: {0}")]
    Internal(String),
}

impl AtomixError {
    /// Taxonomy bucket of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FirstAuthFailed
            | Self::SecondAuthFailed
            | Self::NotMaker { .. }
            | Self::NotAuthorized { .. }
            | Self::MalformedSignature { .. } => ErrorKind::Authorization,
            Self::SelfMatch
            | Self::FirstParamsInvalid { .. }
            | Self::SecondParamsInvalid { .. }
            | Self::FillExceeded { .. } => ErrorKind::Parameter,
            Self::ValidationFailed { .. } | Self::NoSuchTarget { .. } => ErrorKind::Validation,
            Self::FirstCallFailed { .. }
            | Self::SecondCallFailed { .. }
            | Self::CallReverted { .. }
            | Self::ProxyNotFound { .. }
            | Self::WrongImplementation { .. }
            | Self::InsufficientValue { .. } => ErrorKind::Execution,
            Self::AlreadyApproved
            | Self::NoOpFill
            | Self::ProxyAlreadyExists { .. }
            | Self::DuplicatePending { .. }
            | Self::NotReady { .. }
            | Self::AlreadyInitialized
            | Self::SameImplementation
            | Self::Reentrancy
            | Self::UnknownProxy { .. } => ErrorKind::State,
            Self::NotOwner { .. } | Self::Unauthorized { .. } => ErrorKind::Permission,
            Self::Serialization(_) | Self::Configuration(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// The `AX_ERR_nnn` code prefix of this error.
    #[must_use]
    pub fn code(&self) -> String {
        let rendered = self.to_string();
        rendered
            .split(':')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Parameter error for the given leg.
    #[must_use]
    pub fn params_invalid(leg: Leg, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        match leg {
            Leg::First => Self::FirstParamsInvalid { reason },
            Leg::Second => Self::SecondParamsInvalid { reason },
        }
    }

    /// Authorization error for the given leg.
    #[must_use]
    pub fn auth_failed(leg: Leg) -> Self {
        match leg {
            Leg::First => Self::FirstAuthFailed,
            Leg::Second => Self::SecondAuthFailed,
        }
    }

    /// Execution error for the given leg.
    #[must_use]
    pub fn call_failed(leg: Leg, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        match leg {
            Leg::First => Self::FirstCallFailed { reason },
            Leg::Second => Self::SecondCallFailed { reason },
        }
    }
}

impl From<serde_json::Error> for AtomixError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenience alias used throughout Atomix.
pub type Result<T> = std::result::Result<T, AtomixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_prefixed() {
        assert_eq!(AtomixError::SelfMatch.code(), "AX_ERR_200");
        assert_eq!(AtomixError::Reentrancy.code(), "AX_ERR_507");
        assert!(
            AtomixError::SelfMatch
                .to_string()
                .contains("Self-matching orders is prohibited")
        );
    }

    #[test]
    fn leg_helpers_pick_the_right_variant() {
        assert_eq!(AtomixError::auth_failed(Leg::Second), AtomixError::SecondAuthFailed);
        assert!(matches!(
            AtomixError::params_invalid(Leg::First, "expired"),
            AtomixError::FirstParamsInvalid { reason } if reason == "expired"
        ));
        assert!(matches!(
            AtomixError::call_failed(Leg::Second, "boom"),
            AtomixError::SecondCallFailed { .. }
        ));
    }

    #[test]
    fn taxonomy() {
        let a = Address::ZERO;
        assert_eq!(AtomixError::FirstAuthFailed.kind(), ErrorKind::Authorization);
        assert_eq!(AtomixError::SelfMatch.kind(), ErrorKind::Parameter);
        assert_eq!(
            AtomixError::FillExceeded { leg: Leg::First, fill: 2, maximum: 1 }.kind(),
            ErrorKind::Parameter
        );
        assert_eq!(AtomixError::NoSuchTarget { target: a }.kind(), ErrorKind::Validation);
        assert_eq!(
            AtomixError::SecondCallFailed { reason: String::new() }.kind(),
            ErrorKind::Execution
        );
        assert_eq!(AtomixError::NoOpFill.kind(), ErrorKind::State);
        assert_eq!(AtomixError::Unauthorized { caller: a }.kind(), ErrorKind::Permission);
        assert_eq!(AtomixError::Internal("x".into()).kind(), ErrorKind::Internal);
    }
}
