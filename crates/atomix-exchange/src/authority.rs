//! Registry and proxy operations as top-level host calls.
//!
//! These wrap [`AuthorityRegistry`](atomix_registry::AuthorityRegistry)
//! with the host's clock and event log, and add the one proxy operation
//! the registry cannot do alone: executing a call.

use atomix_registry::AuthenticationStatus;
use atomix_types::{Address, AtomixError, Call, Result};

use crate::host::World;

impl World {
    pub fn register_proxy(&mut self, caller: Address) -> Result<Address> {
        let proxy = self.ledger.registry.register_proxy(&caller)?;
        self.collect_registry_events();
        Ok(proxy)
    }

    pub fn register_proxy_for(&mut self, account: Address) -> Result<Address> {
        let proxy = self.ledger.registry.register_proxy_for(account)?;
        self.collect_registry_events();
        Ok(proxy)
    }

    pub fn register_proxy_override(&mut self, caller: Address) -> Address {
        let proxy = self.ledger.registry.register_proxy_override(&caller);
        self.collect_registry_events();
        proxy
    }

    pub fn proxy_of(&self, account: &Address) -> Option<Address> {
        self.ledger.registry.proxy_of(account)
    }

    pub fn authentication_status(&self, caller: &Address) -> AuthenticationStatus {
        self.ledger.registry.authentication_status(caller)
    }

    pub fn pending_since(&self, caller: &Address) -> Option<u64> {
        self.ledger.registry.pending_since(caller)
    }

    pub fn start_grant(&mut self, sender: Address, caller: Address) -> Result<()> {
        let now = self.now();
        self.ledger.registry.start_grant(&sender, caller, now)?;
        self.collect_registry_events();
        Ok(())
    }

    pub fn end_grant(&mut self, sender: Address, caller: Address) -> Result<()> {
        let now = self.now();
        self.ledger.registry.end_grant(&sender, caller, now)?;
        self.collect_registry_events();
        Ok(())
    }

    pub fn grant_initial(&mut self, sender: Address, caller: Address) -> Result<()> {
        self.ledger.registry.grant_initial(&sender, caller)?;
        self.collect_registry_events();
        Ok(())
    }

    pub fn revoke(&mut self, sender: Address, caller: Address) -> Result<()> {
        self.ledger.registry.revoke(&sender, caller)?;
        self.collect_registry_events();
        Ok(())
    }

    pub fn transfer_registry_ownership(&mut self, sender: Address, new_owner: Address) -> Result<()> {
        self.ledger.registry.transfer_ownership(&sender, new_owner)?;
        self.collect_registry_events();
        Ok(())
    }

    // -----------------------------------------------------------------
    // Proxy
    // -----------------------------------------------------------------

    pub fn set_proxy_revoke(&mut self, sender: Address, proxy: Address, revoke: bool) -> Result<()> {
        self.ledger.registry.set_revoke(&sender, &proxy, revoke)?;
        self.collect_registry_events();
        Ok(())
    }

    pub fn transfer_proxy_ownership(&mut self, sender: Address, proxy: Address, new_owner: Address) -> Result<()> {
        self.ledger
            .registry
            .transfer_proxy_ownership(&sender, &proxy, new_owner)?;
        self.collect_registry_events();
        Ok(())
    }

    pub fn upgrade_proxy(&mut self, sender: Address, proxy: Address, implementation: Address) -> Result<()> {
        self.ledger
            .registry
            .upgrade_proxy(&sender, &proxy, implementation)?;
        self.collect_registry_events();
        Ok(())
    }

    /// Execute `call` through `proxy` as `caller`.
    ///
    /// Fails with `Unauthorized` unless the caller is the proxy's owner or
    /// an authenticated caller of a non-revoked proxy.
    pub fn proxy_execute(&mut self, caller: Address, proxy: Address, call: &Call) -> Result<Vec<u8>> {
        let registry = &self.ledger.registry;
        let state = registry
            .proxy(&proxy)
            .ok_or(AtomixError::UnknownProxy { proxy })?;
        if let Err(err) = state.check_execute(&caller, registry) {
            tracing::warn!(caller = %caller, proxy = %proxy, "Proxy execution refused");
            return Err(err);
        }
        self.transaction(|w| {
            w.execute_through_proxy(caller, proxy, call, 0)
                .map_err(|r| AtomixError::CallReverted {
                    reason: r.reason().to_string(),
                })
        })
    }
}
