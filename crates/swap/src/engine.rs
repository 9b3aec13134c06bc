use crate::{
    pricing::{PlaceholderPricing, PricingStrategy, QuoteRequest},
    state::SwapState,
    SwapError,
};
use serde::Serialize;

/// Display bucket for a price impact percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    /// Below 0.01%
    Negligible,
    /// [0.01%, 1%)
    Low,
    /// [1%, 3%)
    Medium,
    /// 3% and above
    High,
}

impl ImpactLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 0.01 {
            Self::Negligible
        } else if percent < 1.0 {
            Self::Low
        } else if percent < 3.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Label shown next to the percentage.
    pub const fn severity(self) -> &'static str {
        match self {
            Self::Negligible | Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn format_percent(self, percent: f64) -> String {
        match self {
            Self::Negligible => "< 0.01%".to_string(),
            _ => format!("{percent:.2}%"),
        }
    }
}

/// Result of quoting a swap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub input_amount: f64,
    pub output_amount: f64,
    pub minimum_received: f64,
    pub price_impact_percent: f64,
    pub impact: ImpactLevel,
}

impl Quote {
    /// Quote for a missing, zero or negative input.
    pub const fn empty() -> Self {
        Self {
            input_amount: 0.0,
            output_amount: 0.0,
            minimum_received: 0.0,
            price_impact_percent: 0.0,
            impact: ImpactLevel::Negligible,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.input_amount <= 0.0
    }
}

/// What a swap would have done. No transaction is ever built from this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapSimulation {
    pub from_token: String,
    pub to_token: String,
    pub quote: Quote,
}

/// Stateless quote calculator over a pluggable pricing strategy.
#[derive(Debug, Clone, Default)]
pub struct SwapQuoteEngine<S = PlaceholderPricing> {
    strategy: S,
}

impl<S: PricingStrategy> SwapQuoteEngine<S> {
    pub const fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Quote a request. Inputs that are not positive finite numbers yield
    /// [`Quote::empty`].
    pub fn quote(&self, request: &QuoteRequest) -> Quote {
        let input = request.input_amount;
        if !input.is_finite() || input <= 0.0 {
            return Quote::empty();
        }

        let output_amount = self.strategy.output_amount(request);
        let minimum_received = output_amount * (1.0 - request.slippage_percent / 100.0);
        let price_impact_percent = self.strategy.price_impact_percent(request);

        Quote {
            input_amount: input,
            output_amount,
            minimum_received,
            price_impact_percent,
            impact: ImpactLevel::from_percent(price_impact_percent),
        }
    }

    /// Quote raw text typed into the amount field. Unparseable text is
    /// treated like an empty field.
    pub fn quote_input(&self, state: &SwapState, input: &str) -> Quote {
        let amount = input.trim().parse::<f64>().unwrap_or(0.0);
        self.quote(&state.request(amount))
    }

    pub fn rate_label(&self, state: &SwapState) -> String {
        self.strategy.rate_label(&state.request(1.0))
    }

    /// Describe the swap that would be executed for `input`.
    pub fn simulate(&self, state: &SwapState, input: f64) -> Result<SwapSimulation, SwapError> {
        if !input.is_finite() || input <= 0.0 {
            return Err(SwapError::InvalidAmount);
        }

        Ok(SwapSimulation {
            from_token: state.from_token().to_string(),
            to_token: state.to_token().to_string(),
            quote: self.quote(&state.request(input)),
        })
    }
}
