//! Per-account delegate proxies.
//!
//! A proxy is the gateway through which a maker's assets move. It holds no
//! assets logic of its own: the host forwards calls on its behalf once
//! [`DelegateProxy::may_execute`] admits the caller.
//!
//! Admission rule: the owner always; anyone the registry has authenticated,
//! unless the owner has flipped the revoke switch.

use atomix_types::{Address, AtomixError, Result};
use serde::{Deserialize, Serialize};

/// Read-only view of who the registry has authenticated.
pub trait AuthorityView {
    fn is_authenticated(&self, caller: &Address) -> bool;
}

/// State of one delegate proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateProxy {
    address: Address,
    owner: Address,
    revoked: bool,
    implementation: Address,
}

impl DelegateProxy {
    #[must_use]
    pub fn new(address: Address, owner: Address, implementation: Address) -> Self {
        Self {
            address,
            owner,
            revoked: false,
            implementation,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn revoked(&self) -> bool {
        self.revoked
    }

    pub fn implementation(&self) -> Address {
        self.implementation
    }

    /// Whether `caller` may execute through this proxy.
    pub fn may_execute(&self, caller: &Address, registry: &dyn AuthorityView) -> bool {
        *caller == self.owner || (!self.revoked && registry.is_authenticated(caller))
    }

    /// Like [`Self::may_execute`], as an error.
    pub fn check_execute(&self, caller: &Address, registry: &dyn AuthorityView) -> Result<()> {
        if self.may_execute(caller, registry) {
            Ok(())
        } else {
            Err(AtomixError::Unauthorized { caller: *caller })
        }
    }

    /// Owner-only. Setting the current value again is not an error.
    pub fn set_revoke(&mut self, caller: &Address, revoke: bool) -> Result<()> {
        self.require_owner(caller)?;
        self.revoked = revoke;
        Ok(())
    }

    /// Owner-only. Refuses a no-op upgrade.
    pub fn upgrade_to(&mut self, caller: &Address, implementation: Address) -> Result<()> {
        self.require_owner(caller)?;
        if implementation == self.implementation {
            return Err(AtomixError::SameImplementation);
        }
        self.implementation = implementation;
        Ok(())
    }

    /// Owner-only. Callers that also maintain an account → proxy index go
    /// through the registry instead.
    pub(crate) fn set_owner(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.require_owner(caller)?;
        self.owner = new_owner;
        Ok(())
    }

    pub(crate) fn require_owner(&self, caller: &Address) -> Result<()> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(AtomixError::NotOwner { caller: *caller })
        }
    }
}
