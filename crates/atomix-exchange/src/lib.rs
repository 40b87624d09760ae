//! # atomix-exchange
//!
//! **Order authorization** and the **atomic match engine**, running inside
//! an in-process host ([`World`]) that owns every protocol table.
//!
//! ## Flow
//!
//! 1. Makers register proxies with the registry and sign orders
//!    off-protocol (or approve them on-protocol).
//! 2. A relayer submits two orders, their signatures and one call per order
//!    to [`World::atomic_match`].
//! 3. The engine authorizes and checks both orders, asks each order's
//!    predicate for its fill increment, updates fills, then drives both
//!    calls through the makers' proxies.
//! 4. Any failure leaves no trace: fills, approvals, balances, contract
//!    state and events are restored.

pub mod authority;
pub mod authorization;
pub mod host;
pub mod matcher;
pub mod shared;
pub mod state;

pub use authorization::Authorizer;
pub use host::World;
pub use matcher::MatchOutcome;
pub use shared::SharedWorld;
pub use state::ExchangeState;
