use ::config::{NetworkConfig, NetworkConfigBuilder, NetworkType, SwapConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level token manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint url
    pub rpc_url: String,

    /// Network preset the endpoint is expected to serve
    #[serde(default = "default_network")]
    pub network: NetworkType,

    /// Override for the preset chain id
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Override for how many blocks back history and approval scans reach
    #[serde(default)]
    pub history_window_blocks: Option<u64>,

    /// Swap pane settings
    #[serde(default)]
    pub swap: SwapConfig,

    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

const fn default_network() -> NetworkType {
    NetworkType::Testnet
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Network preset with any overrides applied.
    pub fn network_config(&self) -> NetworkConfig {
        let mut builder = match self.network {
            NetworkType::Mainnet => NetworkConfigBuilder::mainnet(),
            NetworkType::Testnet => NetworkConfigBuilder::testnet(),
        };
        if let Some(chain_id) = self.chain_id {
            builder = builder.chain_id(chain_id);
        }
        if let Some(blocks) = self.history_window_blocks {
            builder = builder.history_window_blocks(blocks);
        }
        builder.build()
    }
}
