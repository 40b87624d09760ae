//! Proposed calls and the host-level call payloads.
//!
//! A [`Call`] is what a match drives through a maker's proxy. The remaining
//! enums are the payloads the protocol singletons (exchange, registry and
//! proxies) accept when they are reached through the host like any other
//! address, e.g. from a contract-account maker.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::contract::Revert;
use crate::error::Result;
use crate::order::hex_bytes;
use crate::{Address, H256, Order, Signature};

/// How a proxy forwards a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallMode {
    /// Ordinary call; the target sees the proxy as sender.
    #[default]
    Direct,
    /// Target code runs in the proxy's own context.
    Delegate,
}

impl From<CallMode> for u8 {
    fn from(value: CallMode) -> Self {
        match value {
            CallMode::Direct => 0,
            CallMode::Delegate => 1,
        }
    }
}

/// A call proposed for one leg of a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Call {
    pub target: Address,
    pub mode: CallMode,
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
}

impl Call {
    #[must_use]
    pub fn direct(target: Address, payload: Vec<u8>) -> Self {
        Self {
            target,
            mode: CallMode::Direct,
            payload,
        }
    }

    #[must_use]
    pub fn delegate(target: Address, payload: Vec<u8>) -> Self {
        Self {
            target,
            mode: CallMode::Delegate,
            payload,
        }
    }
}

/// One side of a proposed match: an order, its authorization, and the
/// call to drive through its maker's proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSide {
    pub order: Order,
    pub signature: Signature,
    pub call: Call,
}

impl MatchSide {
    #[must_use]
    pub fn new(order: Order, signature: Signature, call: Call) -> Self {
        Self {
            order,
            signature,
            call,
        }
    }
}

/// Payloads accepted at the exchange address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeCall {
    ApproveOrder {
        order: Order,
        inclusion: bool,
    },
    ApproveOrderHash {
        hash: H256,
    },
    SetFill {
        hash: H256,
        fill: u128,
    },
    AtomicMatch {
        first: MatchSide,
        second: MatchSide,
        metadata: H256,
    },
}

/// Payloads accepted at the registry address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryCall {
    RegisterProxy,
    RegisterProxyOverride,
    RegisterProxyFor { account: Address },
    StartGrant { caller: Address },
    EndGrant { caller: Address },
    Revoke { caller: Address },
    GrantInitial { caller: Address },
    TransferOwnership { new_owner: Address },
}

/// Payloads accepted at a proxy address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyCall {
    Execute { call: Call },
    SetRevoke { revoke: bool },
    TransferOwnership { new_owner: Address },
    UpgradeTo { implementation: Address },
}

/// Encode a host payload.
pub fn encode_payload<T: Serialize>(call: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(call)?)
}

/// Decode a host payload, reverting on garbage.
pub fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> std::result::Result<T, Revert> {
    serde_json::from_slice(payload).map_err(|e| Revert::new(format!("malformed payload: {e}")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registry_payload_roundtrip() {
        let call = RegistryCall::StartGrant {
            caller: Address([4; 20]),
        };
        let bytes = encode_payload(&call).unwrap();
        assert_eq!(decode_payload::<RegistryCall>(&bytes).unwrap(), call);
    }

    #[test]
    fn garbage_payload_reverts() {
        let err = decode_payload::<ProxyCall>(b"\x01\x02").unwrap_err();
        assert!(err.reason().starts_with("malformed payload"));
    }

    #[test]
    fn call_json_shape() {
        let call = Call::delegate(Address([1; 20]), vec![0xde, 0xad]);
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["mode"], "Delegate");
        assert_eq!(json["payload"], "0xdead");
        assert_eq!(u8::from(call.mode), 1);
    }
}
