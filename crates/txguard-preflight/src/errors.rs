use thiserror::Error;

/// Erros do orquestrador de preflight.
///
/// Condições da chain nunca aparecem aqui; viram problemas no veredito.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Pedido que viola a pré-condição (ex.: valor não convertível)
    #[error("pedido inválido: {0}")]
    InvalidRequest(#[from] txguard_core::Error),

    /// Verificação repetida para os mesmos dados enquanto a anterior roda
    #[error("verificação já em andamento para estes dados")]
    CheckInProgress,

    /// Não existe veredito atual para enviar
    #[error("nenhum veredito disponível para enviar")]
    NothingToSend,

    /// O veredito atual tem problemas bloqueantes
    #[error("o veredito atual contém problemas bloqueantes")]
    VerdictBlocked,

    /// Falha ao assinar ou transmitir
    #[error("falha na carteira: {0}")]
    Wallet(txguard_core::Error),

    #[error("configuração inválida: {0}")]
    Config(String),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

/// Resultado padrão da crate
pub type Result<T> = std::result::Result<T, GuardError>;
