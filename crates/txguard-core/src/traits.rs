/*!
 * TxGuard Traits
 *
 * Interfaces dos colaboradores consumidos pelo preflight
 */

use async_trait::async_trait;
use ethereum_types::{Address, U256};
use std::sync::Arc;

use crate::error::Result;
use crate::types::{CallOutcome, GuardStats, TransactionHash, TransferCall};

/// Consultas somente leitura à chain.
///
/// Implementações podem falhar de forma transitória; o avaliador converte
/// essas falhas em problemas, nunca as propaga.
#[async_trait]
pub trait ChainQueryProvider: Send + Sync {
    /// Saldo da moeda nativa, em wei
    async fn get_balance(&self, address: Address) -> Result<U256>;

    /// Saldo do token via `balanceOf`, em unidades base
    async fn token_balance_of(&self, token: Address, owner: Address) -> Result<U256>;

    /// Executa a chamada sem alterar estado
    async fn call(&self, call: &TransferCall) -> Result<CallOutcome>;

    /// Estimativa de gas para a chamada
    async fn estimate_gas(&self, call: &TransferCall) -> Result<U256>;
}

/// Carteira capaz de enviar uma transação já aprovada
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Endereço que assina as transações
    fn sender(&self) -> Address;

    /// Assina e transmite a transação
    async fn send_transaction(&self, call: &TransferCall) -> Result<TransactionHash>;
}

/// Resolve nomes legíveis (ex.: ENS) para endereços
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Retorna `None` quando o nome não está registrado
    async fn resolve(&self, name: &str) -> Result<Option<Address>>;
}

/// Armazenamento dos contadores de uso
pub trait CounterStore: Send + Sync {
    fn read(&self) -> GuardStats;

    fn increment_prevented(&self) -> GuardStats;

    fn increment_successful(&self) -> GuardStats;
}

#[async_trait]
impl<T: ChainQueryProvider + ?Sized> ChainQueryProvider for Arc<T> {
    async fn get_balance(&self, address: Address) -> Result<U256> {
        (**self).get_balance(address).await
    }

    async fn token_balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        (**self).token_balance_of(token, owner).await
    }

    async fn call(&self, call: &TransferCall) -> Result<CallOutcome> {
        (**self).call(call).await
    }

    async fn estimate_gas(&self, call: &TransferCall) -> Result<U256> {
        (**self).estimate_gas(call).await
    }
}

#[async_trait]
impl<T: AddressResolver + ?Sized> AddressResolver for Arc<T> {
    async fn resolve(&self, name: &str) -> Result<Option<Address>> {
        (**self).resolve(name).await
    }
}
