//! Configuration types for the token manager.
//!
//! This crate provides:
//! - Network presets (mainnet, testnet) and the event history window
//! - Swap pane defaults (base asset, placeholder exchange rate, slippage)

pub mod network;
pub mod swap;

pub use network::{network_name, NetworkConfig, NetworkConfigBuilder, NetworkType};
pub use swap::SwapConfig;
