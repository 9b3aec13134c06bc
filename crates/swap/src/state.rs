use crate::{pricing::QuoteRequest, SwapError};
use config::SwapConfig;
use serde::Serialize;

/// Direction, slippage tolerance and rate of the swap pane.
///
/// `from_token` and `to_token` always differ; every mutator preserves that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapState {
    from_token: String,
    to_token: String,
    slippage_percent: f64,
    exchange_rate: f64,
}

impl SwapState {
    pub fn new(
        from_token: impl Into<String>,
        to_token: impl Into<String>,
        slippage_percent: f64,
        exchange_rate: f64,
    ) -> Result<Self, SwapError> {
        let from_token = from_token.into();
        let to_token = to_token.into();

        if from_token == to_token {
            return Err(SwapError::SameAsset(from_token));
        }
        if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
            return Err(SwapError::InvalidRate(exchange_rate));
        }
        validate_slippage(slippage_percent)?;

        Ok(Self {
            from_token,
            to_token,
            slippage_percent,
            exchange_rate,
        })
    }

    /// Initial state: base asset in, placeholder token out.
    pub fn from_config(config: &SwapConfig) -> Result<Self, SwapError> {
        Self::new(
            config.base_asset.clone(),
            config.placeholder_symbol.clone(),
            config.default_slippage_percent,
            config.exchange_rate,
        )
    }

    pub fn from_token(&self) -> &str {
        &self.from_token
    }

    pub fn to_token(&self) -> &str {
        &self.to_token
    }

    pub const fn slippage_percent(&self) -> f64 {
        self.slippage_percent
    }

    pub const fn exchange_rate(&self) -> f64 {
        self.exchange_rate
    }

    /// Swap the input and output sides.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.from_token, &mut self.to_token);
    }

    /// Select a slippage tolerance (preset or custom).
    pub fn set_slippage(&mut self, slippage_percent: f64) -> Result<(), SwapError> {
        validate_slippage(slippage_percent)?;
        self.slippage_percent = slippage_percent;
        Ok(())
    }

    /// Replace the non-base side with a newly loaded token's symbol,
    /// keeping the current direction.
    pub fn set_token_symbol(&mut self, base_asset: &str, symbol: &str) -> Result<(), SwapError> {
        if symbol == base_asset {
            return Err(SwapError::SameAsset(symbol.to_string()));
        }

        if self.from_token == base_asset {
            self.to_token = symbol.to_string();
        } else {
            self.from_token = symbol.to_string();
        }
        Ok(())
    }

    /// Build the engine input for `input_amount` of the current from-side.
    pub fn request(&self, input_amount: f64) -> QuoteRequest {
        QuoteRequest {
            from_token: self.from_token.clone(),
            to_token: self.to_token.clone(),
            input_amount,
            exchange_rate: self.exchange_rate,
            slippage_percent: self.slippage_percent,
        }
    }
}

fn validate_slippage(slippage_percent: f64) -> Result<(), SwapError> {
    if !(0.0..=100.0).contains(&slippage_percent) {
        return Err(SwapError::InvalidSlippage(slippage_percent));
    }
    Ok(())
}
