//! Swap pane defaults.
//!
//! The exchange rate and price-impact factor are placeholders: there is no
//! DEX or oracle behind them. They live in configuration so they can be
//! replaced without touching the quote engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Symbol of the native asset the token is quoted against
    pub base_asset: String,
    /// Symbol shown for the token side before a token is loaded
    pub placeholder_symbol: String,
    /// Token units per one base asset
    pub exchange_rate: f64,
    /// Slippage tolerance applied until the user picks another, in percent
    pub default_slippage_percent: f64,
    /// Price impact (percent) per unit of input
    pub impact_factor: f64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            base_asset: "ETH".to_string(),
            placeholder_symbol: "TOKEN".to_string(),
            exchange_rate: 1000.0,
            default_slippage_percent: 1.0,
            impact_factor: 0.01,
        }
    }
}
