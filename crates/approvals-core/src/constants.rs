//! Application-wide constants
//!
//! Centralized location for request types, alert ids and timing values
//! shared between the core and the terminal front-end.

use std::time::Duration;

/// Delay between dismissing a callout and purging its alert entry
pub const ALERT_REMOVAL_DELAY: Duration = Duration::from_millis(500);

/// Public registry of EVM chains used to vet add-network requests
pub const CHAIN_LIST_URL: &str = "https://chainid.network/chains.json";

/// How long a fetched chain list is served from cache (6 minutes)
pub const CHAIN_LIST_REFRESH: Duration = Duration::from_secs(360);

/// Decimals every recognized EVM native currency is expected to use
pub const NATIVE_CURRENCY_DECIMALS: u64 = 18;

// Request types handled by the template registry
pub mod message_type {
    /// Dapp asks to add a custom network
    pub const ADD_ETHEREUM_CHAIN: &str = "wallet_addEthereumChain";
}

// Alert ids produced by the add-ethereum-chain template
pub mod alert_id {
    pub const UNRECOGNIZED_CHAIN: &str = "UNRECOGNIZED_CHAIN";
    pub const INVALID_CHAIN: &str = "INVALID_CHAIN";
}

/// EIP-1193 provider error codes
pub mod provider_error {
    pub const USER_REJECTED_REQUEST: i64 = 4001;
}
