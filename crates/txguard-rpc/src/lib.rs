/*!
 * TxGuard RPC
 *
 * Cliente JSON-RPC e carteira para o preflight de transferências
 */

mod wallet;

pub use wallet::SignerWallet;

use async_trait::async_trait;
use ethereum_types::{Address, U256};
use ethers::providers::{Http, Middleware, Provider, ProviderError, RpcError};
use ethers::types::{transaction::eip2718::TypedTransaction, TransactionRequest};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use txguard_core::{
    error::{Error, Result},
    traits::{AddressResolver, ChainQueryProvider},
    utils, CallOutcome, TransferCall, BASE_CHAIN_ID,
};

/// Endpoint público da Base mainnet
pub const DEFAULT_ENDPOINT: &str = "https://mainnet.base.org";

/// Configuração do cliente RPC
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: String,
    /// Limite de tempo de cada consulta
    pub timeout: Duration,
    /// Chain esperada; `None` aceita qualquer rede
    pub chain_id: Option<u64>,
    pub poll_interval: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            chain_id: Some(BASE_CHAIN_ID),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl RpcConfig {
    /// Lê `TXGUARD_RPC_URL`, `TXGUARD_RPC_TIMEOUT_MS` e `TXGUARD_CHAIN_ID`,
    /// usando os valores padrão para o que estiver ausente ou inválido.
    ///
    /// `TXGUARD_CHAIN_ID=any` desliga a verificação de rede.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let endpoint = std::env::var("TXGUARD_RPC_URL").unwrap_or(defaults.endpoint);
        let timeout = std::env::var("TXGUARD_RPC_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);
        let chain_id = match std::env::var("TXGUARD_CHAIN_ID") {
            Ok(v) if v.trim().eq_ignore_ascii_case("any") => {
                warn!("TXGUARD_CHAIN_ID=any: verificação de rede desativada");
                None
            }
            Ok(v) => match v.trim().parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(value = %v, "TXGUARD_CHAIN_ID inválido, usando o padrão");
                    defaults.chain_id
                }
            },
            Err(_) => defaults.chain_id,
        };
        Self {
            endpoint,
            timeout,
            chain_id,
            poll_interval: defaults.poll_interval,
        }
    }
}

/// Cliente RPC que implementa as consultas do preflight
pub struct TxGuardRpcClient {
    provider: Provider<Http>,
    config: RpcConfig,
}

impl TxGuardRpcClient {
    /// Cria um novo cliente HTTP e verifica a rede do node
    pub async fn new(config: RpcConfig) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.endpoint.as_str())
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via HTTP: {}", e)))?
            .interval(config.poll_interval);

        let client = Self { provider, config };

        // Verifica a conexão
        let chain_id = client
            .query("conectar ao node", client.provider.get_chainid())
            .await?;

        if let Some(expected) = client.config.chain_id {
            if chain_id != U256::from(expected) {
                return Err(Error::ValidationError(format!(
                    "node na chain {}, esperado {}",
                    chain_id, expected
                )));
            }
        }
        debug!(endpoint = %client.config.endpoint, %chain_id, "cliente RPC conectado");
        Ok(client)
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Aplica o timeout configurado sem interpretar o erro do provider
    async fn bounded<T, F>(&self, what: &str, fut: F) -> Result<std::result::Result<T, ProviderError>>
    where
        F: Future<Output = std::result::Result<T, ProviderError>>,
    {
        tokio::time::timeout(self.config.timeout, fut)
            .await
            .map_err(|_| Error::TimeoutError(format!("{} excedeu {:?}", what, self.config.timeout)))
    }

    async fn query<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, ProviderError>>,
    {
        self.bounded(what, fut)
            .await?
            .map_err(|e| Error::RpcError(format!("Falha ao {}: {}", what, e)))
    }

    fn to_typed(call: &TransferCall) -> TypedTransaction {
        TransactionRequest::new()
            .from(call.from)
            .to(call.to)
            .data(call.data.clone())
            .value(call.value)
            .into()
    }
}

/// Identifica respostas de revert e extrai o motivo.
///
/// Retorna `None` quando o erro não é um revert (falha de transporte etc.).
fn revert_reason(err: &ProviderError) -> Option<Option<String>> {
    let response = err.as_error_response()?;
    let message = response.message.to_lowercase();
    if response.code != 3 && !message.contains("revert") {
        return None;
    }
    let decoded = response
        .data
        .as_ref()
        .and_then(|d| d.as_str())
        .and_then(|s| hex::decode(s.trim_start_matches("0x")).ok())
        .and_then(|bytes| utils::decode_revert_reason(&bytes));
    Some(decoded.or_else(|| Some(response.message.clone())))
}

#[async_trait]
impl ChainQueryProvider for TxGuardRpcClient {
    async fn get_balance(&self, address: Address) -> Result<U256> {
        self.query("obter saldo", self.provider.get_balance(address, None)).await
    }

    async fn token_balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let tx: TypedTransaction = TransactionRequest::new()
            .to(token)
            .data(utils::encode_balance_of(&owner))
            .into();
        let out = self.query("consultar balanceOf", self.provider.call(&tx, None)).await?;
        utils::decode_u256(&out)
    }

    async fn call(&self, call: &TransferCall) -> Result<CallOutcome> {
        let tx = Self::to_typed(call);
        match self.bounded("simular chamada", self.provider.call(&tx, None)).await? {
            Ok(out) => Ok(CallOutcome::Success(out.to_vec())),
            Err(e) => match revert_reason(&e) {
                Some(reason) => {
                    debug!(?reason, "simulação revertida");
                    Ok(CallOutcome::Reverted { reason })
                }
                None => {
                    warn!(error = %e, "falha na chamada de simulação");
                    Err(Error::RpcError(format!("Falha na chamada RPC: {}", e)))
                }
            },
        }
    }

    async fn estimate_gas(&self, call: &TransferCall) -> Result<U256> {
        let tx = Self::to_typed(call);
        self.query("estimar gas", self.provider.estimate_gas(&tx, None)).await
    }
}

/// Resolução via ENS (`resolve_name`), que consulta o registro ENS da L1.
///
/// Exige um endpoint com ENS; em um node da Base os nomes tendem a voltar
/// como não encontrados.
#[async_trait]
impl AddressResolver for TxGuardRpcClient {
    async fn resolve(&self, name: &str) -> Result<Option<Address>> {
        match self.bounded("resolver nome", self.provider.resolve_name(name)).await? {
            Ok(address) => Ok(Some(address)),
            Err(ProviderError::EnsError(_)) | Err(ProviderError::EnsNotOwned(_)) => Ok(None),
            Err(e) => Err(Error::RpcError(format!("Falha ao resolver {}: {}", name, e))),
        }
    }
}
