use config::SwapConfig;
use serde::{Deserialize, Serialize};
use units::{format_decimal, Precision};

/// Everything a quote depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub from_token: String,
    pub to_token: String,
    pub input_amount: f64,
    /// Token units per one base asset
    pub exchange_rate: f64,
    /// Not clamped: values outside [0, 100] are applied as given.
    pub slippage_percent: f64,
}

/// Source of swap prices.
pub trait PricingStrategy: Send + Sync {
    /// Amount of `to_token` received for the request's input.
    fn output_amount(&self, request: &QuoteRequest) -> f64;

    /// Estimated price impact of the trade, in percent.
    fn price_impact_percent(&self, request: &QuoteRequest) -> f64;

    /// One-line description of the current rate.
    fn rate_label(&self, request: &QuoteRequest) -> String;
}

/// Fixed exchange rate against the base asset with a linear impact estimate.
///
/// Stands in for a real liquidity source; the impact is `input * factor`
/// regardless of pool depth.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderPricing {
    base_asset: String,
    impact_factor: f64,
}

impl PlaceholderPricing {
    pub fn new(base_asset: impl Into<String>, impact_factor: f64) -> Self {
        Self {
            base_asset: base_asset.into(),
            impact_factor,
        }
    }

    pub fn from_config(config: &SwapConfig) -> Self {
        Self::new(config.base_asset.clone(), config.impact_factor)
    }

    pub fn base_asset(&self) -> &str {
        &self.base_asset
    }
}

impl Default for PlaceholderPricing {
    fn default() -> Self {
        Self::from_config(&SwapConfig::default())
    }
}

impl PricingStrategy for PlaceholderPricing {
    fn output_amount(&self, request: &QuoteRequest) -> f64 {
        if request.from_token == self.base_asset {
            request.input_amount * request.exchange_rate
        } else {
            request.input_amount / request.exchange_rate
        }
    }

    fn price_impact_percent(&self, request: &QuoteRequest) -> f64 {
        request.input_amount * self.impact_factor
    }

    fn rate_label(&self, request: &QuoteRequest) -> String {
        if request.from_token == self.base_asset {
            format!(
                "1 {} = {} {}",
                self.base_asset, request.exchange_rate, request.to_token
            )
        } else {
            format!(
                "1 {} = {} {}",
                request.from_token,
                format_decimal(1.0 / request.exchange_rate, Precision::InverseRate),
                self.base_asset
            )
        }
    }
}
