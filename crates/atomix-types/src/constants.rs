//! Protocol-wide constants and defaults.

/// Default signing-domain name.
pub const DEFAULT_DOMAIN_NAME: &str = "Atomix Exchange";

/// Default signing-domain version.
pub const DEFAULT_DOMAIN_VERSION: &str = "3.1";

/// Default chain id bound into signatures.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Default prefix for personal-message signatures.
pub const DEFAULT_PERSONAL_SIGN_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Default delay between starting and completing an authentication grant
/// (two weeks, in seconds).
pub const DEFAULT_GRANT_DELAY_SECS: u64 = 14 * 24 * 60 * 60;

/// Label the default exchange address is derived from.
pub const EXCHANGE_ADDRESS_LABEL: &[u8] = b"atomix.exchange";

/// Label the default registry address is derived from.
pub const REGISTRY_ADDRESS_LABEL: &[u8] = b"atomix.registry";

/// Label the initial delegate-proxy implementation id is derived from.
pub const PROXY_IMPLEMENTATION_LABEL: &[u8] = b"atomix.proxy.implementation.v1";
