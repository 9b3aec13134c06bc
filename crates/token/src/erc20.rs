use crate::{
    logs::{block_chunks, CHUNK_SIZE},
    ApprovalEvent, EventLogSource, PendingTransaction, Receipt, Token, TokenBinder,
    TokenContract, TokenError, TransferEvent, TransferFilter,
};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{network::Ethereum, PendingTransactionBuilder, Provider};
use binding::IERC20;
use tracing::debug;

fn call_error(error: impl std::fmt::Display) -> TokenError {
    TokenError::from_message(error.to_string())
}

/// ERC20 contract handle over an alloy provider.
///
/// Writes require a provider built with a wallet.
#[derive(Debug, Clone)]
pub struct Erc20Token<P> {
    address: Address,
    provider: P,
}

impl<P> Erc20Token<P>
where
    P: Provider + Clone,
{
    pub const fn new(address: Address, provider: P) -> Self {
        Self { address, provider }
    }

    /// Scan one chunk of blocks for `Transfer` events.
    async fn transfer_chunk(
        &self,
        filter: TransferFilter,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TransferEvent>, TokenError> {
        let contract = IERC20::new(self.address, &self.provider);

        let mut query = contract
            .Transfer_filter()
            .from_block(from_block)
            .to_block(to_block);
        if let Some(from) = filter.from {
            query = query.topic1(from.into_word()); // from (indexed)
        }
        if let Some(to) = filter.to {
            query = query.topic2(to.into_word()); // to (indexed)
        }

        let events = query.query().await.map_err(call_error)?;

        Ok(events
            .into_iter()
            .map(|(event, log)| TransferEvent {
                from: event.from,
                to: event.to,
                value: event.value,
                block_number: log.block_number.unwrap_or_default(),
                tx_hash: log.transaction_hash.unwrap_or_default(),
                log_index: log.log_index.unwrap_or_default(),
            })
            .collect())
    }

    /// Scan one chunk of blocks for `Approval` events.
    async fn approval_chunk(
        &self,
        owner: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ApprovalEvent>, TokenError> {
        let contract = IERC20::new(self.address, &self.provider);

        let events = contract
            .Approval_filter()
            .topic1(owner.into_word()) // owner (indexed)
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await
            .map_err(call_error)?;

        Ok(events
            .into_iter()
            .map(|(event, log)| ApprovalEvent {
                owner: event.owner,
                spender: event.spender,
                block_number: log.block_number.unwrap_or_default(),
            })
            .collect())
    }
}

impl<P> TokenContract for Erc20Token<P>
where
    P: Provider + Clone,
{
    type Pending = Erc20Pending;

    fn address(&self) -> Address {
        self.address
    }

    async fn metadata(&self) -> Result<Token, TokenError> {
        debug!(token = %self.address, "Reading token metadata");

        let contract = IERC20::new(self.address, &self.provider);
        let name = contract.name().call().await.map_err(call_error)?;
        let symbol = contract.symbol().call().await.map_err(call_error)?;
        let decimals = contract.decimals().call().await.map_err(call_error)?;
        let total_supply = contract.totalSupply().call().await.map_err(call_error)?;

        Ok(Token {
            address: self.address,
            name,
            symbol,
            decimals,
            total_supply,
        })
    }

    async fn balance_of(&self, holder: Address) -> Result<U256, TokenError> {
        debug!(token = %self.address, holder = %holder, "Querying token balance");

        let contract = IERC20::new(self.address, &self.provider);
        contract.balanceOf(holder).call().await.map_err(call_error)
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, TokenError> {
        debug!(token = %self.address, owner = %owner, spender = %spender, "Querying allowance");

        let contract = IERC20::new(self.address, &self.provider);
        contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(call_error)
    }

    async fn transfer(&self, recipient: Address, amount: U256) -> Result<Erc20Pending, TokenError> {
        let contract = IERC20::new(self.address, &self.provider);
        let pending = contract
            .transfer(recipient, amount)
            .send()
            .await
            .map_err(call_error)?;

        debug!(tx_hash = %pending.tx_hash(), "Transfer submitted");
        Ok(Erc20Pending { inner: pending })
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<Erc20Pending, TokenError> {
        let contract = IERC20::new(self.address, &self.provider);
        let pending = contract
            .approve(spender, amount)
            .send()
            .await
            .map_err(call_error)?;

        debug!(tx_hash = %pending.tx_hash(), "Approval submitted");
        Ok(Erc20Pending { inner: pending })
    }
}

impl<P> EventLogSource for Erc20Token<P>
where
    P: Provider + Clone,
{
    async fn latest_block(&self) -> Result<u64, TokenError> {
        self.provider.get_block_number().await.map_err(call_error)
    }

    async fn transfers(
        &self,
        filter: TransferFilter,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TransferEvent>, TokenError> {
        let mut all_events = Vec::new();

        for (start, end) in block_chunks(from_block, to_block, CHUNK_SIZE) {
            debug!(from = start, to = end, ?filter, "Scanning chunk for transfers");
            all_events.extend(self.transfer_chunk(filter, start, end).await?);
        }

        Ok(all_events)
    }

    async fn approvals(
        &self,
        owner: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ApprovalEvent>, TokenError> {
        let mut all_events = Vec::new();

        for (start, end) in block_chunks(from_block, to_block, CHUNK_SIZE) {
            debug!(from = start, to = end, owner = %owner, "Scanning chunk for approvals");
            all_events.extend(self.approval_chunk(owner, start, end).await?);
        }

        Ok(all_events)
    }
}

/// Pending ERC20 write.
pub struct Erc20Pending {
    inner: PendingTransactionBuilder<Ethereum>,
}

impl PendingTransaction for Erc20Pending {
    fn tx_hash(&self) -> TxHash {
        *self.inner.tx_hash()
    }

    async fn wait(self) -> Result<Receipt, TokenError> {
        let tx_hash = *self.inner.tx_hash();
        let receipt = self.inner.get_receipt().await.map_err(call_error)?;
        if !receipt.status() {
            return Err(TokenError::Reverted { tx_hash });
        }

        Ok(Receipt {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: Some(receipt.gas_used),
        })
    }
}

/// Binds addresses to [`Erc20Token`] handles sharing one provider.
#[derive(Debug, Clone)]
pub struct ProviderBinder<P> {
    provider: P,
}

impl<P> ProviderBinder<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P> TokenBinder for ProviderBinder<P>
where
    P: Provider + Clone,
{
    type Token = Erc20Token<P>;

    fn bind(&self, address: Address) -> Erc20Token<P> {
        Erc20Token::new(address, self.provider.clone())
    }
}
