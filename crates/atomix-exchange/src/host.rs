//! The in-process host every protocol operation runs against.
//!
//! [`World`] owns all state: the authority registry, the exchange tables,
//! deployed contracts, native balances and the event log. It resolves
//! addresses at call time:
//!
//! - the configured exchange address → [`ExchangeCall`] payloads
//! - the configured registry address → [`RegistryCall`] payloads
//! - any registered proxy → [`ProxyCall`] payloads
//! - any deployed contract → [`Contract::call`]
//! - anything else is a plain account that accepts value and ignores data
//!
//! Every routed call is its own checkpoint: a reverting call restores the
//! store to how it was before the call, including effects of nested calls.

use std::collections::{BTreeMap, BTreeSet};

use atomix_registry::AuthorityRegistry;
use atomix_types::constants::PROXY_IMPLEMENTATION_LABEL;
use atomix_types::{
    Address, AtomixError, Call, CallMode, Contract, Domain, Env, Event, ExchangeCall,
    ExchangeConfig, Message, ProxyCall, RegistryCall, Result, Revert, decode_payload,
    encode_payload,
};

use crate::state::ExchangeState;

/// Everything a failed call rolls back.
#[derive(Debug, Clone)]
pub(crate) struct Ledger {
    pub(crate) registry: AuthorityRegistry,
    pub(crate) exchange: ExchangeState,
    pub(crate) contracts: BTreeMap<Address, Box<dyn Contract>>,
    pub(crate) balances: BTreeMap<Address, u128>,
    pub(crate) events: Vec<Event>,
}

/// The protocol's state store and execution host.
#[derive(Debug)]
pub struct World {
    pub(crate) config: ExchangeConfig,
    pub(crate) domain: Domain,
    pub(crate) ledger: Ledger,
    /// Executing-context stack. Top is [`Env::this`].
    frames: Vec<Address>,
    /// Contracts taken out of the table while their code runs.
    executing: BTreeSet<Address>,
    now: u64,
    /// Set while an atomic match is in progress.
    pub(crate) matching: bool,
}

pub(crate) fn revert(err: &AtomixError) -> Revert {
    Revert::new(err.to_string())
}

impl World {
    /// Deploy an exchange and its registry, owned by `owner`.
    pub fn new(config: ExchangeConfig, owner: Address) -> Result<Self> {
        config.validate()?;
        let registry = AuthorityRegistry::new(
            config.registry,
            owner,
            config.grant_delay_secs,
            Address::derive(PROXY_IMPLEMENTATION_LABEL),
        );
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        tracing::info!(
            exchange = %config.exchange,
            registry = %config.registry,
            chain_id = config.chain_id,
            "Exchange deployed"
        );
        Ok(Self {
            domain: config.domain(),
            config,
            ledger: Ledger {
                registry,
                exchange: ExchangeState::new(),
                contracts: BTreeMap::new(),
                balances: BTreeMap::new(),
                events: Vec::new(),
            },
            frames: Vec::new(),
            executing: BTreeSet::new(),
            now,
            matching: false,
        })
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Signing domain of this exchange.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn exchange_address(&self) -> Address {
        self.config.exchange
    }

    pub fn registry(&self) -> &AuthorityRegistry {
        &self.ledger.registry
    }

    pub fn exchange_state(&self) -> &ExchangeState {
        &self.ledger.exchange
    }

    // -----------------------------------------------------------------
    // Clock
    // -----------------------------------------------------------------

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn set_time(&mut self, now: u64) {
        self.now = now;
    }

    pub fn advance_time(&mut self, secs: u64) {
        self.now = self.now.saturating_add(secs);
    }

    // -----------------------------------------------------------------
    // Accounts and contracts
    // -----------------------------------------------------------------

    /// Install `contract` at `address`.
    pub fn deploy(&mut self, address: Address, contract: Box<dyn Contract>) -> Result<()> {
        if address.is_zero() || self.is_contract(&address) {
            return Err(AtomixError::Configuration(format!(
                "address {address} is not free"
            )));
        }
        self.ledger.contracts.insert(address, contract);
        tracing::debug!(address = %address, "Contract deployed");
        Ok(())
    }

    /// Typed view of the contract at `address`.
    pub fn contract<T: 'static>(&self, address: &Address) -> Option<&T> {
        self.ledger
            .contracts
            .get(address)
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    /// Credit native value out of thin air. Test and genesis use.
    pub fn mint_value(&mut self, account: Address, amount: u128) {
        let balance = self.ledger.balances.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn events(&self) -> &[Event] {
        &self.ledger.events
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.ledger.events)
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.ledger.events.push(event);
    }

    /// Move registry events into the host log.
    pub(crate) fn collect_registry_events(&mut self) {
        let events = self.ledger.registry.take_events();
        self.ledger.events.extend(events);
    }

    pub(crate) fn move_value(&mut self, from: Address, to: Address, amount: u128) -> std::result::Result<(), Revert> {
        if amount == 0 || from == to {
            return Ok(());
        }
        let available = self.balance_of(&from);
        if available < amount {
            return Err(revert(&AtomixError::InsufficientValue {
                needed: amount,
                available,
            }));
        }
        self.ledger.balances.insert(from, available - amount);
        let credited = self.balance_of(&to).saturating_add(amount);
        self.ledger.balances.insert(to, credited);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------

    /// Run `f` as one unit: on error every mutation it made is undone.
    pub(crate) fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.ledger.clone();
        let result = f(self);
        if result.is_err() {
            self.ledger = checkpoint;
        }
        result
    }

    /// Top-level call from an external account.
    pub fn transact(&mut self, sender: Address, target: Address, value: u128, payload: &[u8]) -> Result<Vec<u8>> {
        let output = self
            .dispatch(sender, target, value, payload)
            .map_err(|r| AtomixError::CallReverted {
                reason: r.reason().to_string(),
            });
        if let Err(err) = &output {
            tracing::warn!(sender = %sender, target = %target, error = %err, "Transaction reverted");
        }
        output
    }

    /// Route one call, rolling back on revert.
    pub(crate) fn dispatch(&mut self, sender: Address, target: Address, value: u128, payload: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
        let checkpoint = self.ledger.clone();
        let result = self.route(sender, target, value, payload);
        if result.is_err() {
            self.ledger = checkpoint;
        }
        result
    }

    fn route(&mut self, sender: Address, target: Address, value: u128, payload: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
        self.move_value(sender, target, value)?;

        if target == self.config.exchange {
            return self.exchange_entry(sender, value, payload);
        }
        if target == self.config.registry {
            atomix_types::require!(value == 0, "registry does not accept value");
            return self.registry_entry(sender, payload);
        }
        if self.ledger.registry.is_proxy(&target) {
            return self.proxy_entry(sender, target, value, payload);
        }
        if self.executing.contains(&target) {
            return Err(Revert::new(format!("reentrant call into executing contract {target}")));
        }
        let Some(mut contract) = self.ledger.contracts.remove(&target) else {
            return Ok(Vec::new());
        };

        let msg = Message {
            sender,
            value,
            payload: payload.to_vec(),
        };
        self.executing.insert(target);
        self.frames.push(target);
        let result = contract.call(self, &msg);
        self.frames.pop();
        self.executing.remove(&target);
        self.ledger.contracts.insert(target, contract);
        result
    }

    fn exchange_entry(&mut self, sender: Address, value: u128, payload: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
        let call: ExchangeCall = decode_payload(payload)?;
        if !matches!(call, ExchangeCall::AtomicMatch { .. }) {
            atomix_types::require!(value == 0, "exchange only accepts value with a match");
        }
        let result = match call {
            ExchangeCall::ApproveOrder { order, inclusion } => self.approve_order_as(sender, &order, inclusion),
            ExchangeCall::ApproveOrderHash { hash } => self.approve_order_hash_as(sender, hash),
            ExchangeCall::SetFill { hash, fill } => self.set_fill_as(sender, hash, fill),
            ExchangeCall::AtomicMatch {
                first,
                second,
                metadata,
            } => self
                .guarded_match(sender, &first, &second, metadata, value)
                .map(|_| ()),
        };
        result.map(|()| Vec::new()).map_err(|e| revert(&e))
    }

    fn registry_entry(&mut self, sender: Address, payload: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
        let call: RegistryCall = decode_payload(payload)?;
        let now = self.now;
        let registry = &mut self.ledger.registry;
        let output = match call {
            RegistryCall::RegisterProxy => registry.register_proxy(&sender).map(Some),
            RegistryCall::RegisterProxyOverride => Ok(Some(registry.register_proxy_override(&sender))),
            RegistryCall::RegisterProxyFor { account } => registry.register_proxy_for(account).map(Some),
            RegistryCall::StartGrant { caller } => registry.start_grant(&sender, caller, now).map(|()| None),
            RegistryCall::EndGrant { caller } => registry.end_grant(&sender, caller, now).map(|()| None),
            RegistryCall::Revoke { caller } => registry.revoke(&sender, caller).map(|()| None),
            RegistryCall::GrantInitial { caller } => registry.grant_initial(&sender, caller).map(|()| None),
            RegistryCall::TransferOwnership { new_owner } => {
                registry.transfer_ownership(&sender, new_owner).map(|()| None)
            }
        }
        .map_err(|e| revert(&e))?;
        self.collect_registry_events();
        match output {
            Some(proxy) => encode_payload(&proxy).map_err(|e| revert(&e)),
            None => Ok(Vec::new()),
        }
    }

    fn proxy_entry(&mut self, sender: Address, proxy: Address, value: u128, payload: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
        let call: ProxyCall = decode_payload(payload)?;
        if let ProxyCall::Execute { call } = &call {
            return self.execute_through_proxy(sender, proxy, call, value);
        }
        let registry = &mut self.ledger.registry;
        let result = match call {
            ProxyCall::Execute { .. } => Ok(()),
            ProxyCall::SetRevoke { revoke } => registry.set_revoke(&sender, &proxy, revoke),
            ProxyCall::TransferOwnership { new_owner } => {
                registry.transfer_proxy_ownership(&sender, &proxy, new_owner)
            }
            ProxyCall::UpgradeTo { implementation } => {
                registry.upgrade_proxy(&sender, &proxy, implementation)
            }
        };
        result.map_err(|e| revert(&e))?;
        self.collect_registry_events();
        Ok(Vec::new())
    }

    /// Forward `call` from `proxy` on behalf of `caller`. `value` must
    /// already sit at the proxy.
    pub(crate) fn execute_through_proxy(&mut self, caller: Address, proxy: Address, call: &Call, value: u128) -> std::result::Result<Vec<u8>, Revert> {
        let registry = &self.ledger.registry;
        let state = registry
            .proxy(&proxy)
            .ok_or_else(|| revert(&AtomixError::UnknownProxy { proxy }))?;
        state
            .check_execute(&caller, registry)
            .map_err(|e| revert(&e))?;

        match call.mode {
            CallMode::Direct => self.dispatch(proxy, call.target, value, &call.payload),
            CallMode::Delegate => {
                let checkpoint = self.ledger.clone();
                let result = self.delegate_from(proxy, caller, call.target, value, &call.payload);
                if result.is_err() {
                    self.ledger = checkpoint;
                }
                result
            }
        }
    }

    /// Run the code at `target` in `context`.
    fn delegate_from(&mut self, context: Address, sender: Address, target: Address, value: u128, payload: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
        let Some(code) = self.ledger.contracts.get(&target).cloned() else {
            return Err(Revert::new(format!("delegate target {target} has no code")));
        };
        let msg = Message {
            sender,
            value,
            payload: payload.to_vec(),
        };
        self.frames.push(context);
        let result = code.delegate(self, &msg);
        self.frames.pop();
        result
    }
}

impl Env for World {
    fn this(&self) -> Address {
        self.frames.last().copied().unwrap_or_default()
    }

    fn timestamp(&self) -> u64 {
        self.now
    }

    fn call(&mut self, target: Address, value: u128, payload: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
        let sender = self.this();
        self.dispatch(sender, target, value, payload)
    }

    fn is_contract(&self, address: &Address) -> bool {
        *address == self.config.exchange
            || *address == self.config.registry
            || self.ledger.registry.is_proxy(address)
            || self.ledger.contracts.contains_key(address)
            || self.executing.contains(address)
    }

    fn balance_of(&self, address: &Address) -> u128 {
        self.ledger.balances.get(address).copied().unwrap_or(0)
    }
}
