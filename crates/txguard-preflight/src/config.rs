use ethereum_types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::path::Path;
use txguard_core::{utils, USDC_BASE, USDC_DECIMALS};

use crate::errors::{GuardError, Result};

/// Configuração do preflight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightConfig {
    /// Abaixo deste saldo nativo (wei) a transferência é bloqueada
    pub blocking_gas_floor: U256,
    /// Abaixo deste saldo nativo (wei) é emitido um aviso
    pub warning_gas_floor: U256,
    /// Margem aplicada sobre a estimativa de gas, em percentual
    pub gas_buffer_percent: u64,
    /// Confiança reportada quando não há problema bloqueante
    pub success_confidence: u8,
    /// Executa as verificações 2 a 5 concorrentemente
    pub parallel_checks: bool,
    /// Contrato do token transferido
    pub token: Address,
    pub token_decimals: u8,
    pub token_symbol: String,
    pub native_symbol: String,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            blocking_gas_floor: U256::from(10_000_000_000_000u64), // 0.00001 ETH
            warning_gas_floor: U256::from(50_000_000_000_000u64),  // 0.00005 ETH
            gas_buffer_percent: 120,
            success_confidence: 95,
            parallel_checks: true,
            token: USDC_BASE,
            token_decimals: USDC_DECIMALS,
            token_symbol: "USDC".to_string(),
            native_symbol: "ETH".to_string(),
        }
    }
}

impl PreflightConfig {
    pub fn validate(&self) -> Result<()> {
        if self.blocking_gas_floor >= self.warning_gas_floor {
            return Err(GuardError::Config(format!(
                "blocking_gas_floor ({}) deve ser menor que warning_gas_floor ({})",
                self.blocking_gas_floor, self.warning_gas_floor
            )));
        }
        if self.gas_buffer_percent < 100 {
            return Err(GuardError::Config(format!(
                "gas_buffer_percent ({}) não pode reduzir a estimativa",
                self.gas_buffer_percent
            )));
        }
        if self.token_decimals > utils::MAX_DECIMALS {
            return Err(GuardError::Config(format!(
                "token_decimals ({}) acima do máximo de {}",
                self.token_decimals,
                utils::MAX_DECIMALS
            )));
        }
        if self.success_confidence > 100 {
            return Err(GuardError::Config(format!(
                "success_confidence ({}) acima de 100",
                self.success_confidence
            )));
        }
        Ok(())
    }

    /// Carrega a configuração de um arquivo JSON; campos ausentes usam o padrão
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| GuardError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Aplica a margem de segurança, arredondando para baixo
    pub fn buffered_gas(&self, raw_estimate: U256) -> U256 {
        raw_estimate.saturating_mul(U256::from(self.gas_buffer_percent)) / U256::from(100u64)
    }
}
