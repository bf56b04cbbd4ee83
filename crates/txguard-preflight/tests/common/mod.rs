#![allow(dead_code)]

use async_trait::async_trait;
use ethereum_types::{Address, H256, U256};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use txguard_core::{
    error::{Error, Result},
    traits::{ChainQueryProvider, WalletConnector},
    utils, CallOutcome, TransactionHash, TransferCall,
};

pub const RECIPIENT: &str = "0x2222222222222222222222222222222222222222";

pub fn sender() -> Address {
    Address::repeat_byte(0x11)
}

/// Valor nativo legível (18 casas) para wei
pub fn eth(amount: &str) -> U256 {
    utils::parse_units(amount, 18).unwrap()
}

/// Valor de USDC legível para unidades base
pub fn usdc(amount: &str) -> U256 {
    utils::parse_units(amount, 6).unwrap()
}

#[derive(Default)]
pub struct CallCounts {
    pub balance: AtomicUsize,
    pub token: AtomicUsize,
    pub call: AtomicUsize,
    pub estimate: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.balance.load(Ordering::SeqCst)
            + self.token.load(Ordering::SeqCst)
            + self.call.load(Ordering::SeqCst)
            + self.estimate.load(Ordering::SeqCst)
    }
}

/// Provider com respostas fixas que conta cada chamada
#[derive(Clone)]
pub struct StubChain {
    pub native: Result<U256>,
    pub token: Result<U256>,
    pub call: Result<CallOutcome>,
    pub estimate: Result<U256>,
    /// Latência de get_balance, token_balance_of, call e estimate_gas
    pub delays: [Duration; 4],
    pub counts: Arc<CallCounts>,
}

impl StubChain {
    /// Cenário saudável: 0.0002 ETH, 100 USDC, simulação ok, 21000 de gas
    pub fn healthy() -> Self {
        Self {
            native: Ok(eth("0.0002")),
            token: Ok(usdc("100")),
            call: Ok(CallOutcome::Success(vec![0u8; 32])),
            estimate: Ok(U256::from(21_000u64)),
            delays: [Duration::ZERO; 4],
            counts: Arc::new(CallCounts::default()),
        }
    }

    pub fn with_native(mut self, native: Result<U256>) -> Self {
        self.native = native;
        self
    }

    pub fn with_token(mut self, token: Result<U256>) -> Self {
        self.token = token;
        self
    }

    pub fn with_call(mut self, call: Result<CallOutcome>) -> Self {
        self.call = call;
        self
    }

    pub fn with_estimate(mut self, estimate: Result<U256>) -> Self {
        self.estimate = estimate;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delays = [delay; 4];
        self
    }

    /// Latências em ms, na ordem das verificações
    pub fn with_delays(mut self, native: u64, token: u64, call: u64, estimate: u64) -> Self {
        self.delays = [native, token, call, estimate].map(Duration::from_millis);
        self
    }

    async fn wait(&self, step: usize) {
        let delay = self.delays[step];
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ChainQueryProvider for StubChain {
    async fn get_balance(&self, _address: Address) -> Result<U256> {
        self.counts.balance.fetch_add(1, Ordering::SeqCst);
        self.wait(0).await;
        self.native.clone()
    }

    async fn token_balance_of(&self, _token: Address, _owner: Address) -> Result<U256> {
        self.counts.token.fetch_add(1, Ordering::SeqCst);
        self.wait(1).await;
        self.token.clone()
    }

    async fn call(&self, _call: &TransferCall) -> Result<CallOutcome> {
        self.counts.call.fetch_add(1, Ordering::SeqCst);
        self.wait(2).await;
        self.call.clone()
    }

    async fn estimate_gas(&self, _call: &TransferCall) -> Result<U256> {
        self.counts.estimate.fetch_add(1, Ordering::SeqCst);
        self.wait(3).await;
        self.estimate.clone()
    }
}

pub fn rpc_down() -> Error {
    Error::RpcError("connection refused".into())
}

/// Carteira que registra os payloads recebidos
#[derive(Default)]
pub struct RecordingWallet {
    pub sent: Mutex<Vec<TransferCall>>,
    pub fail: bool,
}

#[async_trait]
impl WalletConnector for RecordingWallet {
    fn sender(&self) -> Address {
        sender()
    }

    async fn send_transaction(&self, call: &TransferCall) -> Result<TransactionHash> {
        if self.fail {
            return Err(Error::Other("usuário rejeitou".into()));
        }
        self.sent.lock().push(call.clone());
        Ok(H256::repeat_byte(0xab))
    }
}
