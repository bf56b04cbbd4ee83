use thiserror::Error;

/// Erros comuns da biblioteca TxGuard
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Erro de comunicação com o node
    #[error("Erro de RPC: {0}")]
    RpcError(String),

    /// Erro de decodificação de dados
    #[error("Erro de decodificação: {0}")]
    DecodeError(String),

    /// Erro de validação
    #[error("Erro de validação: {0}")]
    ValidationError(String),

    /// Erro de timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Valor de transferência que não converte para unidades base
    #[error("Valor inválido: {0}")]
    InvalidAmount(String),

    /// Erro genérico
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Indica falhas de infraestrutura (rede, timeout) e não condições on-chain
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::RpcError(_) | Error::TimeoutError(_))
    }
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;
