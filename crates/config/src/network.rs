//! Network configuration.
//!
//! Provides chain-specific parameters for the supported networks and the
//! block window used when scanning token event logs.

use serde::{Deserialize, Serialize};

/// Number of most recent blocks scanned for transfer and approval events.
pub const DEFAULT_HISTORY_WINDOW_BLOCKS: u64 = 10_000;

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// Complete network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Chain ID
    pub chain_id: u64,
    /// How many blocks back event queries reach
    pub history_window_blocks: u64,
}

impl NetworkConfig {
    /// Ethereum mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            chain_id: 1,
            history_window_blocks: DEFAULT_HISTORY_WINDOW_BLOCKS,
        }
    }

    /// Ethereum Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            chain_id: 11155111,
            history_window_blocks: DEFAULT_HISTORY_WINDOW_BLOCKS,
        }
    }

    /// First block of the history window ending at `latest`.
    pub const fn window_start(&self, latest: u64) -> u64 {
        latest.saturating_sub(self.history_window_blocks)
    }
}

/// Human-readable name for a chain id, as reported to the user on connect.
pub const fn network_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "mainnet",
        11155111 => "sepolia",
        _ => "unknown",
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub const fn mainnet() -> Self {
        Self {
            config: NetworkConfig::mainnet(),
        }
    }

    /// Start with testnet defaults.
    pub const fn testnet() -> Self {
        Self {
            config: NetworkConfig::sepolia(),
        }
    }

    /// Override the chain id (local devnets, forks).
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.config.chain_id = chain_id;
        self
    }

    /// Override the event history window.
    pub const fn history_window_blocks(mut self, blocks: u64) -> Self {
        self.config.history_window_blocks = blocks;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        self.config
    }
}
