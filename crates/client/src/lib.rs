//! Wallet and provider construction.
//!
//! The rest of the workspace only sees the [`WalletConnector`] interface;
//! [`LocalWallet`] implements it with a locally held private key.

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// No signing key is available
    #[error("No wallet configured: provide a private key to connect")]
    NotInstalled,

    /// The wallet declined the connection request
    #[error("Connection request rejected")]
    UserRejected,
}

impl ClientError {
    /// Classify a provider error message. Wallet-backed endpoints report a
    /// declined request as EIP-1193 code 4001.
    pub fn from_rpc(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("user rejected") || lower.contains("user denied") || lower.contains("4001")
        {
            Self::UserRejected
        } else {
            Self::Connection(message)
        }
    }
}

/// Network the wallet is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: u64,
}

impl NetworkInfo {
    pub fn from_chain_id(chain_id: u64) -> Self {
        Self {
            name: config::network_name(chain_id).to_string(),
            chain_id,
        }
    }
}

/// Notifications a wallet emits outside of any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The exposed accounts changed. An empty list means the wallet locked
    /// or revoked access.
    AccountsChanged(Vec<Address>),
    /// The wallet switched to another chain.
    ChainChanged(u64),
}

/// Account access and chain information provided by a wallet.
pub trait WalletConnector: Send + Sync {
    /// Ask the wallet for its accounts. The first one is the active account.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, ClientError>> + Send;

    fn current_network(&self) -> impl Future<Output = Result<NetworkInfo, ClientError>> + Send;

    /// Native asset balance of `address`.
    fn native_balance(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<U256, ClientError>> + Send;
}

/// Wallet backed by a local private key, or a read-only provider when no
/// key is available.
#[derive(Debug, Clone)]
pub struct LocalWallet<P> {
    provider: P,
    account: Option<Address>,
}

impl<P> LocalWallet<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, account: Option<Address>) -> Self {
        Self { provider, account }
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    pub const fn account(&self) -> Option<Address> {
        self.account
    }
}

impl<P> WalletConnector for LocalWallet<P>
where
    P: Provider + Clone,
{
    async fn request_accounts(&self) -> Result<Vec<Address>, ClientError> {
        let account = self.account.ok_or(ClientError::NotInstalled)?;
        debug!(account = %account, "Exposing local account");
        Ok(vec![account])
    }

    async fn current_network(&self) -> Result<NetworkInfo, ClientError> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| ClientError::from_rpc(e.to_string()))?;
        Ok(NetworkInfo::from_chain_id(chain_id))
    }

    async fn native_balance(&self, address: Address) -> Result<U256, ClientError> {
        debug!(address = %address, "Querying native balance");
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ClientError::from_rpc(e.to_string()))
    }
}

/// Convenience function to create an ethereum rpc provider from url.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Create a wallet whose provider signs with `private_key`.
pub fn create_local_wallet(
    rpc_url: &str,
    private_key: &str,
) -> Result<LocalWallet<impl Provider + Clone>, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))?;
    let account = signer.address();

    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok(LocalWallet::new(provider, Some(account)))
}

/// Create a wallet that can read but exposes no account.
pub fn create_read_only_wallet(
    rpc_url: &str,
) -> Result<LocalWallet<impl Provider + Clone>, ClientError> {
    Ok(LocalWallet::new(create_provider(rpc_url)?, None))
}
