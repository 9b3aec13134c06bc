//! Mock wallet and token collaborators shared across integration tests.
#![allow(dead_code)] // not every test file uses every helper

use alloy_primitives::{Address, TxHash, U256};
use client::{ClientError, NetworkInfo, WalletConnector};
use config::{NetworkConfigBuilder, SwapConfig};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};
use token::{
    ApprovalEvent, EventLogSource, PendingTransaction, Receipt, Token, TokenBinder,
    TokenContract, TokenError, TransferEvent, TransferFilter,
};
use token_manager::TokenManager;

pub const DECIMALS: u8 = 18;
pub const HEAD: u64 = 50_000;
pub const WINDOW: u64 = 10_000;
pub const CHAIN_ID: u64 = 11155111;

pub fn user() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn token_address() -> Address {
    Address::repeat_byte(0x70)
}

/// Display units to base units at [`DECIMALS`].
pub fn base(amount: &str) -> U256 {
    units::to_base_units(amount, DECIMALS).unwrap()
}

/// Chain state behind the mock wallet and token, plus a log of every
/// external call made against it.
pub struct Ledger {
    pub symbol: String,
    pub accounts: Mutex<Vec<Address>>,
    pub native: U256,
    pub balances: Mutex<HashMap<Address, U256>>,
    pub allowances: Mutex<HashMap<Address, U256>>,
    pub transfers: Mutex<Vec<TransferEvent>>,
    pub approvals: Mutex<Vec<ApprovalEvent>>,
    pub ranges: Mutex<Vec<(u64, u64)>>,
    pub reverts: AtomicBool,
    pub rejects: AtomicBool,
    pub balance_reads_fail: AtomicBool,
    pub log: Mutex<Vec<&'static str>>,
}

impl Ledger {
    pub fn new(symbol: &str) -> Arc<Self> {
        Arc::new(Self {
            symbol: symbol.to_string(),
            accounts: Mutex::new(vec![user()]),
            native: base("2.5"),
            balances: Mutex::new(HashMap::from([(user(), base("100"))])),
            allowances: Mutex::new(HashMap::new()),
            transfers: Mutex::new(vec![]),
            approvals: Mutex::new(vec![]),
            ranges: Mutex::new(vec![]),
            reverts: AtomicBool::new(false),
            rejects: AtomicBool::new(false),
            balance_reads_fail: AtomicBool::new(false),
            log: Mutex::new(vec![]),
        })
    }

    fn record(&self, call: &'static str) {
        self.log.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn balance(&self, holder: Address) -> U256 {
        self.balances
            .lock()
            .unwrap()
            .get(&holder)
            .copied()
            .unwrap_or_default()
    }
}

pub struct MockWallet {
    ledger: Arc<Ledger>,
}

impl WalletConnector for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ClientError> {
        self.ledger.record("request_accounts");
        Ok(self.ledger.accounts.lock().unwrap().clone())
    }

    async fn current_network(&self) -> Result<NetworkInfo, ClientError> {
        self.ledger.record("current_network");
        Ok(NetworkInfo::from_chain_id(CHAIN_ID))
    }

    async fn native_balance(&self, _address: Address) -> Result<U256, ClientError> {
        self.ledger.record("native_balance");
        Ok(self.ledger.native)
    }
}

pub struct MockBinder {
    ledger: Arc<Ledger>,
}

impl TokenBinder for MockBinder {
    type Token = MockToken;

    fn bind(&self, address: Address) -> MockToken {
        MockToken {
            address,
            ledger: self.ledger.clone(),
        }
    }
}

pub struct MockToken {
    address: Address,
    ledger: Arc<Ledger>,
}

#[derive(Debug, Clone, Copy)]
enum Write {
    Transfer(Address, U256),
    Approve(Address, U256),
}

pub struct MockPending {
    ledger: Arc<Ledger>,
    write: Write,
}

impl MockToken {
    fn submit(&self, call: &'static str, write: Write) -> Result<MockPending, TokenError> {
        self.ledger.record(call);
        if self.ledger.rejects.load(Ordering::SeqCst) {
            return Err(TokenError::UserRejected);
        }
        Ok(MockPending {
            ledger: self.ledger.clone(),
            write,
        })
    }
}

impl PendingTransaction for MockPending {
    fn tx_hash(&self) -> TxHash {
        TxHash::repeat_byte(0xab)
    }

    async fn wait(self) -> Result<Receipt, TokenError> {
        // Let other tasks run while "mining".
        tokio::task::yield_now().await;
        self.ledger.record("wait");

        let tx_hash = self.tx_hash();
        if self.ledger.reverts.load(Ordering::SeqCst) {
            return Err(TokenError::Reverted { tx_hash });
        }

        match self.write {
            Write::Transfer(recipient, amount) => {
                let mut balances = self.ledger.balances.lock().unwrap();
                let sender = balances.entry(user()).or_default();
                *sender = sender.saturating_sub(amount);
                *balances.entry(recipient).or_default() += amount;
            }
            Write::Approve(spender, amount) => {
                self.ledger.allowances.lock().unwrap().insert(spender, amount);
            }
        }

        Ok(Receipt {
            tx_hash,
            block_number: Some(HEAD + 1),
            gas_used: Some(51_000),
        })
    }
}

impl TokenContract for MockToken {
    type Pending = MockPending;

    fn address(&self) -> Address {
        self.address
    }

    async fn metadata(&self) -> Result<Token, TokenError> {
        self.ledger.record("metadata");
        Ok(Token {
            address: self.address,
            name: format!("{} Token", self.ledger.symbol),
            symbol: self.ledger.symbol.clone(),
            decimals: DECIMALS,
            total_supply: base("1000000"),
        })
    }

    async fn balance_of(&self, holder: Address) -> Result<U256, TokenError> {
        self.ledger.record("balance_of");
        if self.ledger.balance_reads_fail.load(Ordering::SeqCst) {
            return Err(TokenError::Call("rpc timeout".to_string()));
        }
        Ok(self.ledger.balance(holder))
    }

    async fn allowance(&self, _owner: Address, spender: Address) -> Result<U256, TokenError> {
        self.ledger.record("allowance");
        Ok(self
            .ledger
            .allowances
            .lock()
            .unwrap()
            .get(&spender)
            .copied()
            .unwrap_or_default())
    }

    async fn transfer(&self, recipient: Address, amount: U256) -> Result<MockPending, TokenError> {
        self.submit("transfer", Write::Transfer(recipient, amount))
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<MockPending, TokenError> {
        self.submit("approve", Write::Approve(spender, amount))
    }
}

impl EventLogSource for MockToken {
    async fn latest_block(&self) -> Result<u64, TokenError> {
        self.ledger.record("latest_block");
        Ok(HEAD)
    }

    async fn transfers(
        &self,
        filter: TransferFilter,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TransferEvent>, TokenError> {
        self.ledger.record("transfers");
        self.ledger.ranges.lock().unwrap().push((from_block, to_block));
        Ok(self
            .ledger
            .transfers
            .lock()
            .unwrap()
            .iter()
            .filter(|t| filter.from.is_none_or(|from| t.from == from))
            .filter(|t| filter.to.is_none_or(|to| t.to == to))
            .filter(|t| (from_block..=to_block).contains(&t.block_number))
            .cloned()
            .collect())
    }

    async fn approvals(
        &self,
        owner: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ApprovalEvent>, TokenError> {
        self.ledger.record("approvals");
        self.ledger.ranges.lock().unwrap().push((from_block, to_block));
        Ok(self
            .ledger
            .approvals
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.owner == owner)
            .filter(|a| (from_block..=to_block).contains(&a.block_number))
            .cloned()
            .collect())
    }
}

pub type Manager = TokenManager<MockWallet, MockBinder>;

/// A disconnected manager over `ledger`.
pub fn manager(ledger: &Arc<Ledger>) -> Manager {
    let network = NetworkConfigBuilder::testnet()
        .history_window_blocks(WINDOW)
        .build();

    TokenManager::new(
        MockWallet {
            ledger: ledger.clone(),
        },
        MockBinder {
            ledger: ledger.clone(),
        },
        network,
        &SwapConfig::default(),
    )
    .expect("default swap config is valid")
}

/// A manager connected as [`user`] with the token at [`token_address`]
/// loaded. The call log is cleared afterwards.
pub async fn loaded_manager(ledger: &Arc<Ledger>) -> Manager {
    let mut manager = manager(ledger);
    manager.connect().await.expect("connect");
    manager
        .load_token(&token_address().to_string())
        .await
        .expect("load token");
    ledger.clear_calls();
    manager
}

pub fn transfer_event(from: Address, to: Address, amount: &str, block_number: u64) -> TransferEvent {
    TransferEvent {
        from,
        to,
        value: base(amount),
        block_number,
        tx_hash: TxHash::with_last_byte(block_number as u8),
        log_index: 0,
    }
}

pub fn approval_event(spender: Address, block_number: u64) -> ApprovalEvent {
    ApprovalEvent {
        owner: user(),
        spender,
        block_number,
    }
}
