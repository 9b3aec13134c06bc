//! Session state machine.
//!
//! A session moves through three phases:
//!
//! ```text
//! Disconnected --connect--> Connected --load_token--> TokenLoaded
//!       ^                       |                         |
//!       +------- disconnect / account change / chain change
//! ```
//!
//! Loading another token while `TokenLoaded` replaces the active token in
//! place. Every transition goes through a method on [`Session`]; readers get
//! a shared reference to the current [`SessionState`].

use alloy_primitives::Address;
use client::{NetworkInfo, WalletEvent};
use config::SwapConfig;
use serde::Serialize;
use swap::{SwapError, SwapState};
use thiserror::Error;
use token::Token;
use tracing::{debug, info, warn};

/// Connection phase, ordered from least to most capable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Phase {
    Disconnected,
    Connected,
    TokenLoaded,
}

/// User-initiated operations that are subject to a phase guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadToken,
    RefreshBalance,
    Transfer,
    Approve,
    CheckAllowances,
    RefreshHistory,
    QuoteSwap,
    ExecuteSwap,
}

impl Operation {
    /// Minimum phase the operation needs.
    pub const fn required_phase(self) -> Phase {
        match self {
            Self::QuoteSwap => Phase::Disconnected,
            Self::LoadToken => Phase::Connected,
            Self::RefreshBalance
            | Self::Transfer
            | Self::Approve
            | Self::CheckAllowances
            | Self::RefreshHistory
            | Self::ExecuteSwap => Phase::TokenLoaded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("Please connect wallet and load token first")]
    TokenNotLoaded,

    #[error("Please load a token contract first")]
    NoTokenForSwap,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Swap(#[from] SwapError),
}

/// Snapshot of who is connected and which token is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub user: Option<Address>,
    pub network: Option<NetworkInfo>,
    pub token: Option<Token>,
}

impl SessionState {
    pub const fn phase(&self) -> Phase {
        match (&self.user, &self.token) {
            (None, _) => Phase::Disconnected,
            (Some(_), None) => Phase::Connected,
            (Some(_), Some(_)) => Phase::TokenLoaded,
        }
    }

    pub const fn is_connected(&self) -> bool {
        self.user.is_some()
    }
}

/// Connected account plus active token, handed out by a passing guard.
#[derive(Debug, Clone, Copy)]
pub struct Loaded<'a> {
    pub user: Address,
    pub token: &'a Token,
}

/// Owner of the session state and the swap pane.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    swap: SwapState,
    base_asset: String,
    placeholder_symbol: String,
}

impl Session {
    pub fn new(
        swap: SwapState,
        base_asset: impl Into<String>,
        placeholder_symbol: impl Into<String>,
    ) -> Self {
        Self {
            state: SessionState::default(),
            swap,
            base_asset: base_asset.into(),
            placeholder_symbol: placeholder_symbol.into(),
        }
    }

    pub fn from_config(config: &SwapConfig) -> Result<Self, SwapError> {
        Ok(Self::new(
            SwapState::from_config(config)?,
            config.base_asset.clone(),
            config.placeholder_symbol.clone(),
        ))
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub const fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub const fn swap(&self) -> &SwapState {
        &self.swap
    }

    /// Swap pane controls (direction, slippage) work in every phase.
    pub const fn swap_mut(&mut self) -> &mut SwapState {
        &mut self.swap
    }

    pub fn base_asset(&self) -> &str {
        &self.base_asset
    }

    /// Enter `Connected` as `user`. Any previous session is discarded.
    pub fn connect(&mut self, user: Address, network: NetworkInfo) {
        info!(user = %user, network = %network.name, chain_id = network.chain_id, "Session connected");
        self.state = SessionState {
            user: Some(user),
            network: Some(network),
            token: None,
        };
    }

    /// Make `token` the active token.
    ///
    /// The swap pane's token side takes the new symbol. A token named like
    /// the base asset still loads, but the swap pane shows the placeholder
    /// symbol for it.
    pub fn load_token(&mut self, token: Token) -> Result<(), SessionError> {
        self.check(Operation::LoadToken)?;

        let symbol = if token.symbol == self.base_asset {
            warn!(
                token = %token.address,
                symbol = %token.symbol,
                "Token symbol matches the base asset, swap pane keeps the placeholder"
            );
            &self.placeholder_symbol
        } else {
            &token.symbol
        };
        let mut swap = self.swap.clone();
        swap.set_token_symbol(&self.base_asset, symbol)?;

        debug!(token = %token.address, symbol = %token.symbol, "Active token replaced");
        self.swap = swap;
        self.state.token = Some(token);
        Ok(())
    }

    /// Return to `Disconnected`. The swap pane keeps its settings.
    pub fn disconnect(&mut self) {
        info!("Session disconnected");
        self.state = SessionState::default();
    }

    /// Apply a wallet notification.
    ///
    /// Both account and chain changes invalidate cached balances and
    /// contract handles, so either one resets the session.
    pub fn handle_wallet_event(&mut self, event: &WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                debug!(accounts = accounts.len(), "Accounts changed");
            }
            WalletEvent::ChainChanged(chain_id) => {
                debug!(chain_id, "Chain changed");
            }
        }
        self.disconnect();
    }

    /// Check that `operation` may run in the current phase.
    pub fn check(&self, operation: Operation) -> Result<(), PreconditionError> {
        if self.phase() >= operation.required_phase() {
            return Ok(());
        }

        Err(match operation {
            Operation::QuoteSwap | Operation::LoadToken => PreconditionError::NotConnected,
            Operation::ExecuteSwap if !self.state.is_connected() => {
                PreconditionError::NotConnected
            }
            Operation::ExecuteSwap => PreconditionError::NoTokenForSwap,
            Operation::RefreshBalance
            | Operation::Transfer
            | Operation::Approve
            | Operation::CheckAllowances
            | Operation::RefreshHistory => PreconditionError::TokenNotLoaded,
        })
    }

    /// Guard for operations that act on the active token.
    pub fn loaded(&self, operation: Operation) -> Result<Loaded<'_>, PreconditionError> {
        self.check(operation)?;
        match (self.state.user, self.state.token.as_ref()) {
            (Some(user), Some(token)) => Ok(Loaded { user, token }),
            _ => Err(PreconditionError::TokenNotLoaded),
        }
    }

    /// Guard for operations that only need a connected account.
    pub fn connected(&self, operation: Operation) -> Result<Address, PreconditionError> {
        self.check(operation)?;
        self.state.user.ok_or(PreconditionError::NotConnected)
    }
}
