//! Configuration of one exchange deployment.

use serde::{Deserialize, Serialize};

use crate::error::{AtomixError, Result};
use crate::{Address, Domain, constants};

/// Settings fixed at deployment time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Signing-domain name.
    pub domain_name: String,
    /// Signing-domain version.
    pub domain_version: String,
    /// Chain id bound into signatures.
    pub chain_id: u64,
    /// Address of the exchange. Also the domain's verifying contract.
    pub exchange: Address,
    /// Address of the authority registry orders must reference.
    pub registry: Address,
    /// Prefix used by personal-message signatures.
    pub personal_sign_prefix: String,
    /// Seconds between `start_grant` and a successful `end_grant`.
    pub grant_delay_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            domain_name: constants::DEFAULT_DOMAIN_NAME.to_string(),
            domain_version: constants::DEFAULT_DOMAIN_VERSION.to_string(),
            chain_id: constants::DEFAULT_CHAIN_ID,
            exchange: Address::derive(constants::EXCHANGE_ADDRESS_LABEL),
            registry: Address::derive(constants::REGISTRY_ADDRESS_LABEL),
            personal_sign_prefix: constants::DEFAULT_PERSONAL_SIGN_PREFIX.to_string(),
            grant_delay_secs: constants::DEFAULT_GRANT_DELAY_SECS,
        }
    }
}

impl ExchangeConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.exchange.is_zero() {
            return Err(AtomixError::Configuration("exchange address is zero".into()));
        }
        if self.registry.is_zero() {
            return Err(AtomixError::Configuration("registry address is zero".into()));
        }
        if self.exchange == self.registry {
            return Err(AtomixError::Configuration(
                "exchange and registry must be distinct".into(),
            ));
        }
        if self.domain_name.is_empty() {
            return Err(AtomixError::Configuration("domain name is empty".into()));
        }
        if self.personal_sign_prefix.is_empty() {
            return Err(AtomixError::Configuration(
                "personal sign prefix is empty".into(),
            ));
        }
        Ok(())
    }

    /// Signing domain of this deployment.
    #[must_use]
    pub fn domain(&self) -> Domain {
        Domain {
            name: self.domain_name.clone(),
            version: self.domain_version.clone(),
            chain_id: self.chain_id,
            verifying_contract: self.exchange,
        }
    }
}
