//! Batches several calls into one delegate call.
//!
//! A proxy delegating into [`CallBundler`] issues every bundled call from
//! its own address, in order. One failing call fails the bundle.

use std::any::Any;

use atomix_types::{Address, Contract, Env, Message, Revert, decode_payload, hex_bytes};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundledCall {
    pub target: Address,
    pub value: u128,
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleCall {
    pub calls: Vec<BundledCall>,
}

/// Stateless bundling library.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallBundler;

impl Contract for CallBundler {
    fn call(&mut self, _env: &mut dyn Env, _msg: &Message) -> Result<Vec<u8>, Revert> {
        Err(Revert::new("bundler must be delegate-called"))
    }

    fn delegate(&self, env: &mut dyn Env, msg: &Message) -> Result<Vec<u8>, Revert> {
        let bundle: BundleCall = decode_payload(&msg.payload)?;
        let context = env.this();
        for (index, call) in bundle.calls.iter().enumerate() {
            env.call(call.target, call.value, &call.payload).map_err(|r| {
                tracing::debug!(context = %context, index, reason = %r, "Bundled call failed");
                Revert::new(format!("bundled call {index} failed: {r}"))
            })?;
        }
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
