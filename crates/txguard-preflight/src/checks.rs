//! Verificações individuais do preflight.
//!
//! Cada função consulta a chain e converte o resultado em no máximo um
//! problema. Falhas do provider nas leituras de saldo viram avisos.

use ethereum_types::{Address, U256};
use tracing::{debug, warn};
use txguard_core::{
    traits::ChainQueryProvider,
    utils::format_token_amount,
    CallOutcome, Issue, IssueKind, TransferCall, TransferRequest, NATIVE_DECIMALS,
};

use crate::config::PreflightConfig;

/// Saldo nativo para pagar gas
pub(crate) async fn gas_balance<P>(chain: &P, config: &PreflightConfig, sender: Address) -> Option<Issue>
where
    P: ChainQueryProvider + ?Sized,
{
    let balance = match chain.get_balance(sender).await {
        Ok(balance) => balance,
        Err(e) => {
            warn!(error = %e, transient = e.is_transient(), "saldo nativo não verificado");
            return Some(Issue::warning(
                IssueKind::Unverified,
                format!("Não foi possível verificar o saldo de {}", config.native_symbol),
            ));
        }
    };
    debug!(%balance, "saldo nativo");

    if balance < config.blocking_gas_floor {
        Some(Issue::blocking(
            IssueKind::GasInsufficient,
            format!(
                "{} insuficiente para gas (necessário > {} {})",
                config.native_symbol,
                format_token_amount(&config.blocking_gas_floor, NATIVE_DECIMALS),
                config.native_symbol
            ),
        ))
    } else if balance < config.warning_gas_floor {
        Some(Issue::warning(
            IssueKind::GasInsufficient,
            format!(
                "Saldo de {} baixo, a transação pode falhar se o gas subir",
                config.native_symbol
            ),
        ))
    } else {
        None
    }
}

/// Saldo do token contra o valor pedido
pub(crate) async fn token_balance<P>(
    chain: &P,
    config: &PreflightConfig,
    request: &TransferRequest,
) -> Option<Issue>
where
    P: ChainQueryProvider + ?Sized,
{
    let balance = match chain.token_balance_of(request.token(), request.sender()).await {
        Ok(balance) => balance,
        Err(e) => {
            warn!(error = %e, transient = e.is_transient(), "saldo do token não verificado");
            return Some(Issue::warning(
                IssueKind::Unverified,
                format!("Não foi possível verificar o saldo de {}", config.token_symbol),
            ));
        }
    };
    debug!(%balance, requested = %request.amount_units(), "saldo do token");

    if balance < request.amount_units() {
        Some(Issue::blocking(
            IssueKind::BalanceInsufficient,
            format!(
                "Saldo de {} insuficiente. Possui {}, necessário {}",
                config.token_symbol,
                format_token_amount(&balance, request.decimals()),
                format_token_amount(&request.amount_units(), request.decimals())
            ),
        ))
    } else {
        None
    }
}

/// Dry-run do payload exato
pub(crate) async fn simulation<P>(chain: &P, call: &TransferCall) -> Option<Issue>
where
    P: ChainQueryProvider + ?Sized,
{
    let reason = match chain.call(call).await {
        Ok(CallOutcome::Success(_)) => return None,
        Ok(CallOutcome::Reverted { reason }) => {
            reason.unwrap_or_else(|| "transação revertida na simulação".to_string())
        }
        Err(e) => e.to_string(),
    };
    debug!(%reason, "simulação falhou");
    Some(Issue::blocking(
        IssueKind::SimulationRevert,
        format!("Simulação falhou: {}", reason),
    ))
}

/// Estimativa de gas já com a margem de segurança
pub(crate) async fn gas_estimate<P>(
    chain: &P,
    config: &PreflightConfig,
    call: &TransferCall,
) -> std::result::Result<U256, String>
where
    P: ChainQueryProvider + ?Sized,
{
    match chain.estimate_gas(call).await {
        Ok(raw) => {
            let buffered = config.buffered_gas(raw);
            debug!(%raw, %buffered, "gas estimado");
            Ok(buffered)
        }
        Err(e) => {
            debug!(error = %e, "estimativa de gas rejeitada");
            Err(e.to_string())
        }
    }
}
