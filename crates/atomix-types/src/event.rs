//! Events recorded by the protocol singletons.
//!
//! Events are appended to the host's log only when the top-level call that
//! produced them commits.

use serde::{Deserialize, Serialize};

use crate::{Address, H256, Order};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // --- exchange ---
    /// A maker pre-approved an order. The order is published only when the
    /// maker asked for orderbook inclusion.
    OrderApproved {
        hash: H256,
        maker: Address,
        order: Option<Order>,
        inclusion: bool,
    },
    OrderFillChanged {
        hash: H256,
        maker: Address,
        fill: u128,
    },
    OrdersMatched {
        first_hash: H256,
        second_hash: H256,
        first_maker: Address,
        second_maker: Address,
        first_fill: u128,
        second_fill: u128,
        /// Opaque correlation tag supplied by the matcher.
        metadata: H256,
    },

    // --- registry ---
    ProxyRegistered {
        account: Address,
        proxy: Address,
    },
    GrantStarted {
        caller: Address,
        since: u64,
    },
    GrantCompleted {
        caller: Address,
    },
    GrantRevoked {
        caller: Address,
    },
    RegistryOwnershipTransferred {
        previous: Address,
        new_owner: Address,
    },

    // --- proxy ---
    ProxyRevokeSet {
        proxy: Address,
        revoked: bool,
    },
    ProxyOwnershipTransferred {
        proxy: Address,
        previous: Address,
        new_owner: Address,
    },
    ProxyUpgraded {
        proxy: Address,
        implementation: Address,
    },
}
