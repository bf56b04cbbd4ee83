use tracing::{debug, info};
use txguard_core::{
    traits::ChainQueryProvider, Issue, IssueKind, PreflightVerdict, TransferRequest,
};

use crate::{checks, config::PreflightConfig, errors::Result};

/// Avaliador de preflight de uma transferência
pub struct PreflightEvaluator<P> {
    chain: P,
    config: PreflightConfig,
}

impl<P: ChainQueryProvider> PreflightEvaluator<P> {
    /// Cria um avaliador com a configuração padrão
    pub fn new(chain: P) -> Self {
        Self {
            chain,
            config: PreflightConfig::default(),
        }
    }

    /// Cria um avaliador com configuração própria, validando-a
    pub fn with_config(chain: P, config: PreflightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { chain, config })
    }

    pub fn config(&self) -> &PreflightConfig {
        &self.config
    }

    /// Executa todas as verificações e agrega o veredito
    pub async fn evaluate(&self, request: &TransferRequest) -> PreflightVerdict {
        evaluate(request, &self.chain, &self.config).await
    }
}

/// Executa o preflight de `request` contra `chain`.
///
/// Somente o destinatário inválido interrompe a avaliação. As demais
/// verificações sempre rodam para que todos os problemas apareçam de uma vez;
/// a ordem dos problemas segue a ordem das verificações.
pub async fn evaluate<P>(request: &TransferRequest, chain: &P, config: &PreflightConfig) -> PreflightVerdict
where
    P: ChainQueryProvider + ?Sized,
{
    let Some(recipient) = request.recipient_address() else {
        info!(recipient = %request.recipient(), "destinatário inválido");
        return PreflightVerdict::address_invalid("Endereço de destinatário inválido");
    };

    let call = request.to_call(recipient);
    debug!(%call, "payload do preflight");

    let gas = checks::gas_balance(chain, config, request.sender());
    let token = checks::token_balance(chain, config, request);
    let simulation = checks::simulation(chain, &call);
    let estimate = checks::gas_estimate(chain, config, &call);

    // nenhuma verificação depende do resultado de outra
    let (gas, token, simulation, estimate) = if config.parallel_checks {
        futures::join!(gas, token, simulation, estimate)
    } else {
        (gas.await, token.await, simulation.await, estimate.await)
    };

    let mut issues = Vec::with_capacity(4);
    issues.extend(gas);
    issues.extend(token);
    let reverted = simulation.is_some();
    issues.extend(simulation);

    let estimated_gas_units = match estimate {
        Ok(units) => Some(units),
        Err(_) if reverted => None,
        Err(_) => {
            issues.push(Issue::blocking(
                IssueKind::GasInsufficient,
                "Falha na estimativa de gas (a transação provavelmente vai reverter)",
            ));
            None
        }
    };

    let verdict = PreflightVerdict::aggregate(issues, estimated_gas_units, config.success_confidence);
    info!(
        will_succeed = verdict.will_succeed,
        issues = verdict.issues.len(),
        confidence = verdict.confidence,
        "preflight concluído"
    );
    verdict
}
