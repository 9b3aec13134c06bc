pub mod approve;
pub mod guard;
pub mod transfer;

pub use approve::{Approval, ApproveAction};
pub use guard::{InFlight, Ticket};
pub use transfer::{Transfer, TransferAction};

use std::future::Future;
use thiserror::Error;
use token::{Receipt, TokenError};

/// Trait for state-changing token operations.
pub trait Action: Send + Sync {
    /// Check the inputs without touching the chain.
    fn validate(&self) -> Result<(), ActionError>;

    /// Validate, submit and wait for the receipt.
    ///
    /// Success is only reported once the transaction is mined with a
    /// successful status.
    fn execute(&self) -> impl Future<Output = Result<Receipt, ActionError>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Recipient must not be the zero address")]
    ZeroRecipient,

    #[error("Spender must not be the zero address")]
    ZeroSpender,

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Another write is still waiting for its receipt
    #[error("Another transaction is still pending")]
    Busy,

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl ActionError {
    /// Whether the error was raised before any external call.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::ZeroRecipient | Self::ZeroSpender | Self::ZeroAmount)
    }
}
