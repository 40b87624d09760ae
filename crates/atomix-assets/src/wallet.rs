//! A contract account that can act as a maker.
//!
//! The wallet holds value and assets at its own address and accepts an
//! order signature when its owner's key produced it.

use std::any::Any;

use atomix_types::{
    Address, Contract, Env, H256, Message, Revert, Signature, SignatureScheme, decode_payload,
    hex_bytes, require,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletCall {
    /// Owner only. Issues a call from the wallet.
    Execute {
        target: Address,
        value: u128,
        #[serde(with = "hex_bytes")]
        payload: Vec<u8>,
    },
}

#[derive(Debug, Clone)]
pub struct SmartWallet {
    owner: Address,
}

impl SmartWallet {
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }
}

impl Contract for SmartWallet {
    fn call(&mut self, env: &mut dyn Env, msg: &Message) -> Result<Vec<u8>, Revert> {
        // plain deposit
        if msg.payload.is_empty() {
            return Ok(Vec::new());
        }
        match decode_payload(&msg.payload)? {
            WalletCall::Execute {
                target,
                value,
                payload,
            } => {
                require!(msg.sender == self.owner, "only the wallet owner may execute");
                env.call(target, value, &payload)
            }
        }
    }

    fn is_valid_signature(&self, hash: &H256, signature: &[u8]) -> bool {
        let Ok(signature) = Signature::from_bytes(signature) else {
            return false;
        };
        matches!(signature.scheme, SignatureScheme::Structured | SignatureScheme::Contract)
            && signature.recover(hash) == Some(self.owner)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
