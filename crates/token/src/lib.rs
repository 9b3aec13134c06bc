//! Token contract access.
//!
//! This crate defines the narrow interfaces the rest of the workspace uses to
//! talk to an ERC20 contract, and provides the alloy-backed implementation:
//! - [`TokenContract`]: metadata, balance and allowance reads, transfer and approve writes
//! - [`EventLogSource`]: `Transfer` and `Approval` event queries over a block range
//! - [`erc20::Erc20Token`]: both of the above over an alloy provider

pub mod erc20;
pub mod logs;

use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Metadata of a loaded token contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Contract address
    pub address: Address,
    pub name: String,
    pub symbol: String,
    /// Decimal places between base units and display units
    pub decimals: u8,
    /// Total supply in base units
    pub total_supply: U256,
}

/// A `Transfer` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    /// Amount in base units
    pub value: U256,
    pub block_number: u64,
    pub tx_hash: TxHash,
    pub log_index: u64,
}

/// An `Approval` event. The approved value is deliberately not kept: the
/// current allowance is always read live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub owner: Address,
    pub spender: Address,
    pub block_number: u64,
}

/// Indexed-argument filter for `Transfer` queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferFilter {
    pub from: Option<Address>,
    pub to: Option<Address>,
}

impl TransferFilter {
    /// Transfers sent by `address`.
    pub const fn sent_by(address: Address) -> Self {
        Self {
            from: Some(address),
            to: None,
        }
    }

    /// Transfers received by `address`.
    pub const fn received_by(address: Address) -> Self {
        Self {
            from: None,
            to: Some(address),
        }
    }
}

/// Confirmation of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: Option<u64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The signer declined the request
    #[error("User rejected the request")]
    UserRejected,

    /// The transaction was mined but failed
    #[error("Transaction reverted: {tx_hash}")]
    Reverted { tx_hash: TxHash },

    /// RPC or contract call failure
    #[error("Contract call failed: {0}")]
    Call(String),
}

impl TokenError {
    /// Classify a provider or contract error message.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("user rejected") || lower.contains("user denied") || lower.contains("4001")
        {
            Self::UserRejected
        } else {
            Self::Call(message)
        }
    }
}

/// A submitted but not yet confirmed transaction.
pub trait PendingTransaction: Send {
    fn tx_hash(&self) -> TxHash;

    /// Wait until the transaction is mined.
    ///
    /// There is no local timeout: this resolves only when the node reports
    /// a receipt or an error.
    fn wait(self) -> impl Future<Output = Result<Receipt, TokenError>> + Send;
}

/// Read and write access to one ERC20 contract.
pub trait TokenContract: Send + Sync {
    type Pending: PendingTransaction;

    /// Contract address.
    fn address(&self) -> Address;

    /// Read name, symbol, decimals and total supply.
    fn metadata(&self) -> impl Future<Output = Result<Token, TokenError>> + Send;

    fn balance_of(&self, holder: Address) -> impl Future<Output = Result<U256, TokenError>> + Send;

    fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = Result<U256, TokenError>> + Send;

    /// Submit `transfer(recipient, amount)`.
    fn transfer(
        &self,
        recipient: Address,
        amount: U256,
    ) -> impl Future<Output = Result<Self::Pending, TokenError>> + Send;

    /// Submit `approve(spender, amount)`.
    fn approve(
        &self,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = Result<Self::Pending, TokenError>> + Send;
}

/// Event log queries for one token contract.
pub trait EventLogSource: Send + Sync {
    /// Current chain head.
    fn latest_block(&self) -> impl Future<Output = Result<u64, TokenError>> + Send;

    /// `Transfer` events matching `filter` in `[from_block, to_block]`.
    fn transfers(
        &self,
        filter: TransferFilter,
        from_block: u64,
        to_block: u64,
    ) -> impl Future<Output = Result<Vec<TransferEvent>, TokenError>> + Send;

    /// `Approval` events emitted by `owner` in `[from_block, to_block]`.
    fn approvals(
        &self,
        owner: Address,
        from_block: u64,
        to_block: u64,
    ) -> impl Future<Output = Result<Vec<ApprovalEvent>, TokenError>> + Send;
}

/// Binds contract addresses to token handles.
pub trait TokenBinder: Send + Sync {
    type Token: TokenContract + EventLogSource;

    fn bind(&self, address: Address) -> Self::Token;
}
