//! # atomix-registry
//!
//! The **authority registry** and the **delegate proxies** it creates.
//!
//! - [`AuthorityRegistry`]: one proxy per account, plus the timelocked set
//!   of callers allowed to act through every proxy.
//! - [`DelegateProxy`]: ownership-checked gateway state with a pure
//!   [`DelegateProxy::may_execute`] admission check.
//!
//! Every mutating operation takes the calling account explicitly and, where
//! time matters, the current time. Executing calls through a proxy needs a
//! host and lives in `atomix-exchange`.

pub mod proxy;
pub mod registry;

pub use proxy::{AuthorityView, DelegateProxy};
pub use registry::{AuthenticationStatus, AuthorityRegistry};
