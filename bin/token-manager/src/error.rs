use action::ActionError;
use client::ClientError;
use serde::Serialize;
use session::{PreconditionError, SessionError};
use swap::SwapError;
use thiserror::Error;
use token::TokenError;
use units::{AddressError, ParseError};

/// Broad class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad user input, rejected before any external call.
    Validation,
    /// The operation is not allowed in the current session phase.
    Precondition,
    /// The wallet, node or contract failed or refused.
    ExternalCall,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Precondition => "precondition",
            Self::ExternalCall => "external_call",
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid {field} address: {source}")]
    Address {
        field: &'static str,
        #[source]
        source: AddressError,
    },

    #[error(transparent)]
    Amount(#[from] ParseError),

    #[error(transparent)]
    Swap(#[from] SwapError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Wallet(#[from] ClientError),

    #[error("Wallet returned no accounts")]
    NoAccounts,
}

impl Error {
    pub const fn address(field: &'static str, source: AddressError) -> Self {
        Self::Address { field, source }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Address { .. } | Self::Amount(_) | Self::Swap(_) => ErrorKind::Validation,
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::Action(ActionError::Busy) => ErrorKind::Precondition,
            Self::Action(error) if error.is_validation() => ErrorKind::Validation,
            Self::Action(_) | Self::Token(_) | Self::Wallet(_) | Self::NoAccounts => {
                ErrorKind::ExternalCall
            }
        }
    }
}

impl From<SessionError> for Error {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Precondition(error) => Self::Precondition(error),
            SessionError::Swap(error) => Self::Swap(error),
        }
    }
}
