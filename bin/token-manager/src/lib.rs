//! Token manager service.
//!
//! [`TokenManager`] drives one wallet session: it owns the session state
//! machine and the active token handle, and routes each user operation
//! through input validation, the phase guard and finally the wallet or
//! contract. Nothing here renders; see [`render`] for text output.

pub mod config;
pub mod error;
pub mod metrics;
pub mod render;

pub use error::{Error, ErrorKind};

use crate::metrics::Metrics;
use ::config::{NetworkConfig, SwapConfig};
use action::{Action, Approval, ApproveAction, InFlight, Transfer, TransferAction};
use allowance::AllowanceOutcome;
use alloy_primitives::{Address, U256};
use client::{NetworkInfo, WalletConnector, WalletEvent};
use history::HistoryEntry;
use serde::Serialize;
use session::{Loaded, Operation, PreconditionError, Session, SessionState};
use std::time::Instant;
use swap::{PlaceholderPricing, Quote, SwapError, SwapQuoteEngine, SwapSimulation, SwapState};
use token::{EventLogSource, Receipt, Token, TokenBinder, TokenContract};
use tracing::{debug, info, warn};
use units::{parse_address, to_base_units, to_human_units, Precision};

/// Decimals of the native asset.
pub const NATIVE_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub user: Address,
    pub network: NetworkInfo,
}

/// Active token metadata plus the connected account's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub token: Token,
    pub balance: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    pub receipt: Receipt,
    pub recipient: Address,
    pub amount: U256,
    /// Sender balance read after the receipt. `None` when that read failed;
    /// the transfer itself is confirmed either way.
    pub balance: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalOutcome {
    pub receipt: Receipt,
    pub spender: Address,
    pub amount: U256,
}

/// Swap pane contents for one input amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapQuote {
    pub from_token: String,
    pub to_token: String,
    pub slippage_percent: f64,
    pub rate_label: String,
    pub quote: Quote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetBalance {
    pub symbol: String,
    pub amount: U256,
    pub decimals: u8,
}

/// Balances of both swap sides, in swap direction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapBalances {
    pub from: AssetBalance,
    pub to: AssetBalance,
}

/// One wallet session over one token at a time.
pub struct TokenManager<W, B>
where
    B: TokenBinder,
{
    wallet: W,
    binder: B,
    network: NetworkConfig,
    engine: SwapQuoteEngine,
    session: Session,
    contract: Option<B::Token>,
    in_flight: InFlight,
    metrics: Metrics,
}

impl<W, B> TokenManager<W, B>
where
    W: WalletConnector,
    B: TokenBinder,
{
    pub fn new(
        wallet: W,
        binder: B,
        network: NetworkConfig,
        swap: &SwapConfig,
    ) -> Result<Self, Error> {
        let session = Session::from_config(swap)?;

        Ok(Self {
            wallet,
            binder,
            network,
            engine: SwapQuoteEngine::new(PlaceholderPricing::from_config(swap)),
            session,
            contract: None,
            in_flight: InFlight::new(),
            metrics: Metrics::new(),
        })
    }

    pub const fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub const fn swap_state(&self) -> &SwapState {
        self.session.swap()
    }

    pub const fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Whether a transfer or approval is waiting for its receipt.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    fn observe<T>(&self, operation: &'static str, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(error) = &result {
            warn!(operation, kind = error.kind().as_str(), %error, "Operation failed");
        }
        self.metrics
            .record_operation(operation, result.as_ref().err().map(Error::kind));
        result
    }

    fn loaded(&self, operation: Operation) -> Result<(Loaded<'_>, &B::Token), Error> {
        let loaded = self.session.loaded(operation)?;
        let contract = self
            .contract
            .as_ref()
            .ok_or(PreconditionError::TokenNotLoaded)?;
        Ok((loaded, contract))
    }

    fn record_balance(&self, token: &Token, balance: U256) {
        let display = to_human_units(balance, token.decimals, Precision::Balance);
        self.metrics
            .set_token_balance(&token.symbol, display.parse().unwrap_or_default());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────────

    /// Request wallet access and enter the connected phase.
    pub async fn connect(&mut self) -> Result<Connection, Error> {
        let result = self.try_connect().await;
        self.observe("connect", result)
    }

    async fn try_connect(&mut self) -> Result<Connection, Error> {
        let accounts = self.wallet.request_accounts().await?;
        let user = accounts.first().copied().ok_or(Error::NoAccounts)?;
        let network = self.wallet.current_network().await?;

        if network.chain_id != self.network.chain_id {
            warn!(
                expected = self.network.chain_id,
                actual = network.chain_id,
                "Wallet is on an unexpected chain"
            );
        }

        self.contract = None;
        self.session.connect(user, network.clone());
        Ok(Connection { user, network })
    }

    pub fn disconnect(&mut self) {
        self.contract = None;
        self.session.disconnect();
    }

    /// React to an account or chain change reported by the wallet.
    pub fn handle_wallet_event(&mut self, event: &WalletEvent) {
        self.contract = None;
        self.session.handle_wallet_event(event);
    }

    /// Bind the contract at `address` and make it the active token.
    pub async fn load_token(&mut self, address: &str) -> Result<TokenInfo, Error> {
        let result = self.try_load_token(address).await;
        self.observe("load_token", result)
    }

    async fn try_load_token(&mut self, address: &str) -> Result<TokenInfo, Error> {
        let address = parse_address(address).map_err(|e| Error::address("token", e))?;
        let user = self.session.connected(Operation::LoadToken)?;

        let contract = self.binder.bind(address);
        let token = contract.metadata().await?;
        let balance = contract.balance_of(user).await?;

        self.session.load_token(token.clone())?;
        self.contract = Some(contract);
        self.record_balance(&token, balance);

        info!(
            token = %token.address,
            name = %token.name,
            symbol = %token.symbol,
            decimals = token.decimals,
            "Token loaded"
        );
        Ok(TokenInfo { token, balance })
    }

    /// Re-read the active token's balance.
    pub async fn token_info(&self) -> Result<TokenInfo, Error> {
        let result = self.try_token_info().await;
        self.observe("token_info", result)
    }

    async fn try_token_info(&self) -> Result<TokenInfo, Error> {
        let (loaded, contract) = self.loaded(Operation::RefreshBalance)?;
        let balance = contract.balance_of(loaded.user).await?;
        self.record_balance(loaded.token, balance);

        Ok(TokenInfo {
            token: loaded.token.clone(),
            balance,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Send `amount` (display units) of the active token to `recipient`.
    ///
    /// The returned balance is read only after the receipt arrives.
    pub async fn transfer(&self, recipient: &str, amount: &str) -> Result<TransferOutcome, Error> {
        let result = self.try_transfer(recipient, amount).await;
        self.observe("transfer", result)
    }

    async fn try_transfer(&self, recipient: &str, amount: &str) -> Result<TransferOutcome, Error> {
        let recipient = parse_address(recipient).map_err(|e| Error::address("recipient", e))?;
        let (loaded, contract) = self.loaded(Operation::Transfer)?;
        let amount = to_base_units(amount, loaded.token.decimals)?;

        let action = TransferAction::new(contract, Transfer { recipient, amount });
        action.validate()?;

        let _ticket = self.in_flight.try_acquire()?;
        info!(action = %action.description(), "Submitting");

        let started = Instant::now();
        let receipt = action.execute().await?;
        self.metrics
            .record_confirmation("transfer", started.elapsed());

        let balance = match contract.balance_of(loaded.user).await {
            Ok(balance) => {
                self.record_balance(loaded.token, balance);
                Some(balance)
            }
            Err(error) => {
                warn!(
                    tx_hash = %receipt.tx_hash,
                    %error,
                    "Transfer confirmed but balance refresh failed"
                );
                None
            }
        };

        Ok(TransferOutcome {
            receipt,
            recipient,
            amount,
            balance,
        })
    }

    /// Set `spender`'s allowance to `amount` (display units). Zero revokes.
    pub async fn approve(&self, spender: &str, amount: &str) -> Result<ApprovalOutcome, Error> {
        let result = self.try_approve(spender, amount).await;
        self.observe("approve", result)
    }

    async fn try_approve(&self, spender: &str, amount: &str) -> Result<ApprovalOutcome, Error> {
        let spender = parse_address(spender).map_err(|e| Error::address("spender", e))?;
        let (loaded, contract) = self.loaded(Operation::Approve)?;
        let amount = to_base_units(amount, loaded.token.decimals)?;

        let action = ApproveAction::new(contract, Approval { spender, amount });
        action.validate()?;

        let _ticket = self.in_flight.try_acquire()?;
        info!(action = %action.description(), "Submitting");

        let started = Instant::now();
        let receipt = action.execute().await?;
        self.metrics.record_confirmation("approve", started.elapsed());

        Ok(ApprovalOutcome {
            receipt,
            spender,
            amount,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Event scans
    // ─────────────────────────────────────────────────────────────────────────────

    /// List spenders that still hold an allowance over the connected account.
    pub async fn check_allowances(&self) -> Result<AllowanceOutcome, Error> {
        let result = self.try_check_allowances().await;
        self.observe("check_allowances", result)
    }

    async fn try_check_allowances(&self) -> Result<AllowanceOutcome, Error> {
        let (loaded, contract) = self.loaded(Operation::CheckAllowances)?;

        let (from_block, to_block) = self.scan_window(contract).await?;
        let outcome =
            allowance::scan_allowances(contract, loaded.user, from_block, to_block).await?;

        debug!(active = outcome.records().len(), "Allowance check complete");
        Ok(outcome)
    }

    /// Sent and received transfers over the history window, newest first.
    pub async fn refresh_history(&self) -> Result<Vec<HistoryEntry>, Error> {
        let result = self.try_refresh_history().await;
        self.observe("refresh_history", result)
    }

    async fn try_refresh_history(&self) -> Result<Vec<HistoryEntry>, Error> {
        let (loaded, contract) = self.loaded(Operation::RefreshHistory)?;
        let (from_block, to_block) = self.scan_window(contract).await?;
        let entries = history::fetch_history(contract, loaded.user, from_block, to_block).await?;
        Ok(entries)
    }

    /// Inclusive block range covered by event scans, ending at the current
    /// head.
    async fn scan_window(&self, source: &B::Token) -> Result<(u64, u64), Error> {
        let latest = source.latest_block().await?;
        Ok((self.network.window_start(latest), latest))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Swap pane
    // ─────────────────────────────────────────────────────────────────────────────

    /// Quote the text typed into the swap amount field. Available in every
    /// phase.
    pub fn quote_swap(&self, input: &str) -> SwapQuote {
        let state = self.session.swap();

        SwapQuote {
            from_token: state.from_token().to_string(),
            to_token: state.to_token().to_string(),
            slippage_percent: state.slippage_percent(),
            rate_label: self.engine.rate_label(state),
            quote: self.engine.quote_input(state, input),
        }
    }

    pub fn flip_swap_direction(&mut self) -> &SwapState {
        self.session.swap_mut().flip();
        self.session.swap()
    }

    pub fn set_slippage(&mut self, slippage_percent: f64) -> Result<(), Error> {
        self.session.swap_mut().set_slippage(slippage_percent)?;
        Ok(())
    }

    /// Native and token balances of the connected account, ordered like the
    /// swap pane. Before a token is loaded the token side reads zero.
    pub async fn swap_balances(&self) -> Result<SwapBalances, Error> {
        let result = self.try_swap_balances().await;
        self.observe("swap_balances", result)
    }

    async fn try_swap_balances(&self) -> Result<SwapBalances, Error> {
        let user = self
            .session
            .state()
            .user
            .ok_or(PreconditionError::NotConnected)?;
        let swap = self.session.swap();
        let base_asset = self.session.base_asset();

        let native = AssetBalance {
            symbol: base_asset.to_string(),
            amount: self.wallet.native_balance(user).await?,
            decimals: NATIVE_DECIMALS,
        };

        let symbol = if swap.from_token() == base_asset {
            swap.to_token()
        } else {
            swap.from_token()
        };
        let token = match (self.contract.as_ref(), self.session.state().token.as_ref()) {
            (Some(contract), Some(token)) => AssetBalance {
                symbol: symbol.to_string(),
                amount: contract.balance_of(user).await?,
                decimals: token.decimals,
            },
            _ => AssetBalance {
                symbol: symbol.to_string(),
                amount: U256::ZERO,
                decimals: NATIVE_DECIMALS,
            },
        };

        if swap.from_token() == base_asset {
            Ok(SwapBalances {
                from: native,
                to: token,
            })
        } else {
            Ok(SwapBalances {
                from: token,
                to: native,
            })
        }
    }

    /// Describe the swap that would run for `input`. No transaction is sent.
    pub fn execute_swap(&self, input: &str) -> Result<SwapSimulation, Error> {
        let result = self.try_execute_swap(input);
        self.observe("execute_swap", result)
    }

    fn try_execute_swap(&self, input: &str) -> Result<SwapSimulation, Error> {
        let amount = input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or(SwapError::InvalidAmount)?;
        self.session.check(Operation::ExecuteSwap)?;

        let simulation = self.engine.simulate(self.session.swap(), amount)?;
        info!(
            from = %simulation.from_token,
            to = %simulation.to_token,
            input = amount,
            output = simulation.quote.output_amount,
            "Swap simulated, nothing submitted"
        );
        Ok(simulation)
    }
}
