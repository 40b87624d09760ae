//! The authority registry.
//!
//! Tracks one delegate proxy per account and which callers may act through
//! every proxy. Authentication is timelocked:
//!
//! ```text
//! Unauthenticated --start_grant--> Pending(since) --end_grant (delay elapsed)--> Authenticated
//!        ^                                                                            |
//!        +----------------------------------revoke-----------------------------------+
//! ```
//!
//! The single `grant_initial` bypasses the delay once, so a fresh
//! deployment can authenticate its exchange immediately.

use std::collections::BTreeMap;

use atomix_types::crypto::keccak256_concat;
use atomix_types::{Address, AtomixError, Event, Result};
use serde::{Deserialize, Serialize};

use crate::proxy::{AuthorityView, DelegateProxy};

/// Authentication state of one caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationStatus {
    #[default]
    Unauthenticated,
    /// Grant started at `since` (unix seconds).
    Pending { since: u64 },
    Authenticated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityRegistry {
    address: Address,
    owner: Address,
    grant_delay: u64,
    initial_granted: bool,
    status: BTreeMap<Address, AuthenticationStatus>,
    /// account → current proxy
    proxies: BTreeMap<Address, Address>,
    /// proxy → state, including proxies replaced by an override
    proxy_states: BTreeMap<Address, DelegateProxy>,
    /// Implementation new proxies start with and the exchange expects.
    implementation: Address,
    nonce: u64,
    #[serde(skip)]
    events: Vec<Event>,
}

impl AuthorityRegistry {
    #[must_use]
    pub fn new(address: Address, owner: Address, grant_delay: u64, implementation: Address) -> Self {
        Self {
            address,
            owner,
            grant_delay,
            initial_granted: false,
            status: BTreeMap::new(),
            proxies: BTreeMap::new(),
            proxy_states: BTreeMap::new(),
            implementation,
            nonce: 0,
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn grant_delay(&self) -> u64 {
        self.grant_delay
    }

    /// Current delegate-proxy implementation.
    pub fn implementation(&self) -> Address {
        self.implementation
    }

    /// Drain events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------

    pub fn authentication_status(&self, caller: &Address) -> AuthenticationStatus {
        self.status.get(caller).copied().unwrap_or_default()
    }

    pub fn pending_since(&self, caller: &Address) -> Option<u64> {
        match self.authentication_status(caller) {
            AuthenticationStatus::Pending { since } => Some(since),
            _ => None,
        }
    }

    /// Owner-only. Begin the timelocked grant for `caller`.
    pub fn start_grant(&mut self, sender: &Address, caller: Address, now: u64) -> Result<()> {
        self.require_owner(sender)?;
        if self.authentication_status(&caller) != AuthenticationStatus::Unauthenticated {
            return Err(AtomixError::DuplicatePending { caller });
        }
        self.status
            .insert(caller, AuthenticationStatus::Pending { since: now });
        self.events.push(Event::GrantStarted { caller, since: now });
        tracing::info!(caller = %caller, since = now, "Authentication grant started");
        Ok(())
    }

    /// Owner-only. Complete a pending grant once the delay has elapsed.
    pub fn end_grant(&mut self, sender: &Address, caller: Address, now: u64) -> Result<()> {
        self.require_owner(sender)?;
        let ready = match self.authentication_status(&caller) {
            AuthenticationStatus::Pending { since } => now.saturating_sub(since) >= self.grant_delay,
            _ => false,
        };
        if !ready {
            tracing::warn!(caller = %caller, now, "Authentication grant not ready");
            return Err(AtomixError::NotReady { caller });
        }
        self.status.insert(caller, AuthenticationStatus::Authenticated);
        self.events.push(Event::GrantCompleted { caller });
        tracing::info!(caller = %caller, "Authentication grant completed");
        Ok(())
    }

    /// Owner-only, once. Authenticate `caller` without the delay.
    pub fn grant_initial(&mut self, sender: &Address, caller: Address) -> Result<()> {
        self.require_owner(sender)?;
        if self.initial_granted {
            return Err(AtomixError::AlreadyInitialized);
        }
        self.initial_granted = true;
        self.status.insert(caller, AuthenticationStatus::Authenticated);
        self.events.push(Event::GrantCompleted { caller });
        tracing::info!(caller = %caller, "Initial authentication granted");
        Ok(())
    }

    /// Owner-only. Drop `caller` back to unauthenticated, pending or not.
    pub fn revoke(&mut self, sender: &Address, caller: Address) -> Result<()> {
        self.require_owner(sender)?;
        self.status.remove(&caller);
        self.events.push(Event::GrantRevoked { caller });
        tracing::info!(caller = %caller, "Authentication revoked");
        Ok(())
    }

    /// Owner-only. Hand the registry to `new_owner`.
    pub fn transfer_ownership(&mut self, sender: &Address, new_owner: Address) -> Result<()> {
        self.require_owner(sender)?;
        let previous = self.owner;
        self.owner = new_owner;
        self.events.push(Event::RegistryOwnershipTransferred {
            previous,
            new_owner,
        });
        Ok(())
    }

    // -----------------------------------------------------------------
    // Proxies
    // -----------------------------------------------------------------

    /// Current proxy of `account`.
    pub fn proxy_of(&self, account: &Address) -> Option<Address> {
        self.proxies.get(account).copied()
    }

    /// State of the proxy at `proxy`.
    pub fn proxy(&self, proxy: &Address) -> Option<&DelegateProxy> {
        self.proxy_states.get(proxy)
    }

    /// Whether `address` is any proxy this registry created.
    pub fn is_proxy(&self, address: &Address) -> bool {
        self.proxy_states.contains_key(address)
    }

    /// Create a proxy for the caller.
    pub fn register_proxy(&mut self, sender: &Address) -> Result<Address> {
        self.register_proxy_for(*sender)
    }

    /// Create a proxy for `account`. Anyone may do this; the proxy is owned
    /// by `account` regardless.
    pub fn register_proxy_for(&mut self, account: Address) -> Result<Address> {
        if self.proxies.contains_key(&account) {
            return Err(AtomixError::ProxyAlreadyExists { account });
        }
        Ok(self.create_proxy(account))
    }

    /// Create a proxy for the caller, replacing any existing mapping.
    pub fn register_proxy_override(&mut self, sender: &Address) -> Address {
        self.create_proxy(*sender)
    }

    fn create_proxy(&mut self, account: Address) -> Address {
        let proxy = Address::from_word(&keccak256_concat(&[
            &self.address.0,
            &account.0,
            &self.nonce.to_be_bytes(),
        ]));
        self.nonce += 1;
        self.proxy_states
            .insert(proxy, DelegateProxy::new(proxy, account, self.implementation));
        self.proxies.insert(account, proxy);
        self.events.push(Event::ProxyRegistered { account, proxy });
        tracing::info!(account = %account, proxy = %proxy, "Proxy registered");
        proxy
    }

    /// Proxy owner only. Flip the proxy's revoke switch.
    pub fn set_revoke(&mut self, sender: &Address, proxy: &Address, revoke: bool) -> Result<()> {
        self.proxy_mut(proxy)?.set_revoke(sender, revoke)?;
        self.events.push(Event::ProxyRevokeSet {
            proxy: *proxy,
            revoked: revoke,
        });
        tracing::info!(proxy = %proxy, revoked = revoke, "Proxy revoke set");
        Ok(())
    }

    /// Proxy owner only. Point the proxy at another implementation.
    pub fn upgrade_proxy(&mut self, sender: &Address, proxy: &Address, implementation: Address) -> Result<()> {
        self.proxy_mut(proxy)?.upgrade_to(sender, implementation)?;
        self.events.push(Event::ProxyUpgraded {
            proxy: *proxy,
            implementation,
        });
        Ok(())
    }

    /// Proxy owner only. Give the proxy to `new_owner`; the account index
    /// follows. Refused if `new_owner` already has a proxy.
    pub fn transfer_proxy_ownership(&mut self, sender: &Address, proxy: &Address, new_owner: Address) -> Result<()> {
        let state = self.proxy_mut(proxy)?;
        state.require_owner(sender)?;
        let previous = state.owner();
        if self.proxies.contains_key(&new_owner) {
            return Err(AtomixError::ProxyAlreadyExists { account: new_owner });
        }
        self.proxy_mut(proxy)?.set_owner(sender, new_owner)?;
        if self.proxies.get(&previous) == Some(proxy) {
            self.proxies.remove(&previous);
        }
        self.proxies.insert(new_owner, *proxy);
        self.events.push(Event::ProxyOwnershipTransferred {
            proxy: *proxy,
            previous,
            new_owner,
        });
        tracing::info!(proxy = %proxy, previous = %previous, new_owner = %new_owner, "Proxy ownership transferred");
        Ok(())
    }

    fn proxy_mut(&mut self, proxy: &Address) -> Result<&mut DelegateProxy> {
        self.proxy_states
            .get_mut(proxy)
            .ok_or(AtomixError::UnknownProxy { proxy: *proxy })
    }

    fn require_owner(&self, sender: &Address) -> Result<()> {
        if *sender == self.owner {
            Ok(())
        } else {
            tracing::warn!(sender = %sender, "Registry call from non-owner");
            Err(AtomixError::NotOwner { caller: *sender })
        }
    }
}

impl AuthorityView for AuthorityRegistry {
    fn is_authenticated(&self, caller: &Address) -> bool {
        self.authentication_status(caller) == AuthenticationStatus::Authenticated
    }
}
