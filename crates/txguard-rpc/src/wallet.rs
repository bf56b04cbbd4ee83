use async_trait::async_trait;
use ethereum_types::Address;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{transaction::eip2718::TypedTransaction, TransactionRequest};
use tracing::info;
use txguard_core::{
    error::{Error, Result},
    traits::WalletConnector,
    utils, TransactionHash, TransferCall, BASE_CHAIN_ID,
};

use crate::RpcConfig;

/// Carteira local que assina e transmite transferências aprovadas
pub struct SignerWallet {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
    config: RpcConfig,
}

impl SignerWallet {
    /// Cria a carteira a partir de uma chave privada em hexadecimal
    pub fn new(config: RpcConfig, private_key: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.endpoint.as_str())
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via HTTP: {}", e)))?
            .interval(config.poll_interval);
        let chain_id = config.chain_id.unwrap_or(BASE_CHAIN_ID);
        let wallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| Error::ValidationError(format!("chave privada inválida: {}", e)))?
            .with_chain_id(chain_id);
        Ok(Self {
            client: SignerMiddleware::new(provider, wallet),
            config,
        })
    }
}

#[async_trait]
impl WalletConnector for SignerWallet {
    fn sender(&self) -> Address {
        self.client.address()
    }

    async fn send_transaction(&self, call: &TransferCall) -> Result<TransactionHash> {
        if call.from != self.sender() {
            return Err(Error::ValidationError(format!(
                "transação de {} não pode ser assinada por {}",
                utils::format_address(&call.from),
                utils::format_address(&self.sender())
            )));
        }
        let tx: TypedTransaction = TransactionRequest::new()
            .from(call.from)
            .to(call.to)
            .data(call.data.clone())
            .value(call.value)
            .into();

        let send = self.client.send_transaction(tx, None);
        let pending = tokio::time::timeout(self.config.timeout, send)
            .await
            .map_err(|_| Error::TimeoutError(format!("envio excedeu {:?}", self.config.timeout)))?
            .map_err(|e| Error::RpcError(format!("Falha ao enviar transação: {}", e)))?;

        let hash = pending.tx_hash();
        info!(tx_hash = ?hash, "transação transmitida");
        Ok(hash)
    }
}
