//! Swap quoting for the swap pane.
//!
//! Nothing here moves funds. A quote is a pure function of a [`QuoteRequest`]
//! and a [`PricingStrategy`]; "executing" a swap only produces a
//! [`SwapSimulation`] describing what would have been traded.

pub mod engine;
pub mod pricing;
pub mod state;

pub use engine::{ImpactLevel, Quote, SwapQuoteEngine, SwapSimulation};
pub use pricing::{PlaceholderPricing, PricingStrategy, QuoteRequest};
pub use state::SwapState;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwapError {
    #[error("Cannot swap {0} for itself")]
    SameAsset(String),

    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(f64),

    #[error("Slippage must be between 0 and 100 percent, got {0}")]
    InvalidSlippage(f64),

    #[error("Please enter a valid amount")]
    InvalidAmount,
}
