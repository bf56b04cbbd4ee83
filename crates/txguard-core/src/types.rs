/*!
 * TxGuard Types
 *
 * Tipos comuns usados em toda a workspace TxGuard
 */

use ethereum_types::{Address, H160, H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::utils;

/// Alias para hash de transação
pub type TransactionHash = H256;

/// Contrato do USDC nativo na Base mainnet
pub const USDC_BASE: Address = H160([
    0x83, 0x35, 0x89, 0xfc, 0xd6, 0xed, 0xb6, 0xe0, 0x8f, 0x4c, 0x7c, 0x32, 0xd4, 0xf7, 0x1b, 0x54,
    0xbd, 0xa0, 0x29, 0x13,
]);

/// Casas decimais do USDC
pub const USDC_DECIMALS: u8 = 6;

/// Casas decimais da moeda nativa (wei)
pub const NATIVE_DECIMALS: u8 = 18;

/// Chain id da Base mainnet
pub const BASE_CHAIN_ID: u64 = 8453;

/// Pedido de transferência construído a cada verificação.
///
/// O valor é convertido para unidades base na construção; um pedido com
/// valor inválido nunca chega ao avaliador. O destinatário é mantido como
/// digitado e validado pelo primeiro passo do preflight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    sender: Address,
    recipient: String,
    amount: String,
    amount_units: U256,
    token: Address,
    decimals: u8,
}

impl TransferRequest {
    /// Cria um novo pedido, falhando se o valor não for convertível
    pub fn new(
        sender: Address,
        recipient: impl Into<String>,
        amount: impl Into<String>,
        token: Address,
        decimals: u8,
    ) -> Result<Self> {
        let amount = amount.into();
        let amount_units = utils::parse_units(&amount, decimals)?;
        Ok(Self {
            sender,
            recipient: recipient.into().trim().to_string(),
            amount,
            amount_units,
            token,
            decimals,
        })
    }

    /// Pedido de transferência de USDC na Base
    pub fn usdc(sender: Address, recipient: impl Into<String>, amount: impl Into<String>) -> Result<Self> {
        Self::new(sender, recipient, amount, USDC_BASE, USDC_DECIMALS)
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Valor como digitado pelo usuário
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Valor em unidades base do token
    pub fn amount_units(&self) -> U256 {
        self.amount_units
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Endereço do destinatário, se sintaticamente válido
    pub fn recipient_address(&self) -> Option<Address> {
        if utils::is_valid_address(&self.recipient) {
            utils::hex_to_address(&self.recipient)
        } else {
            None
        }
    }

    /// Monta o payload `transfer(address,uint256)` usado na simulação,
    /// na estimativa de gas e no envio real.
    pub fn to_call(&self, recipient: Address) -> TransferCall {
        TransferCall {
            from: self.sender,
            to: self.token,
            data: utils::encode_transfer(&recipient, &self.amount_units),
            value: U256::zero(),
        }
    }
}

/// Payload codificado de uma transferência
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCall {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    pub value: U256,
}

impl fmt::Display for TransferCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} value={} data=0x{}",
            utils::format_address(&self.from),
            utils::format_address(&self.to),
            self.value,
            hex::encode(&self.data)
        )
    }
}

/// Resultado de uma chamada simulada (eth_call)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// Execução concluída, com o retorno bruto
    Success(Vec<u8>),
    /// Execução revertida, com o motivo quando o node o fornece
    Reverted { reason: Option<String> },
}

/// Categoria de problema encontrado no preflight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    AddressInvalid,
    GasInsufficient,
    BalanceInsufficient,
    SimulationRevert,
    /// Leitura de saldo que falhou no provider; nunca bloqueante
    Unverified,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::AddressInvalid => write!(f, "address_invalid"),
            IssueKind::GasInsufficient => write!(f, "gas_insufficient"),
            IssueKind::BalanceInsufficient => write!(f, "balance_insufficient"),
            IssueKind::SimulationRevert => write!(f, "simulation_revert"),
            IssueKind::Unverified => write!(f, "unverified"),
        }
    }
}

/// Severidade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Blocking,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "aviso"),
            Severity::Blocking => write!(f, "bloqueante"),
        }
    }
}

/// Problema encontrado por uma das verificações
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn blocking(kind: IssueKind, message: impl Into<String>) -> Self {
        Self { kind, severity: Severity::Blocking, message: message.into() }
    }

    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self { kind, severity: Severity::Warning, message: message.into() }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Veredito final do preflight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreflightVerdict {
    pub will_succeed: bool,
    pub issues: Vec<Issue>,
    pub estimated_gas_units: Option<U256>,
    pub confidence: u8,
}

impl PreflightVerdict {
    /// Agrega os problemas de todas as verificações.
    ///
    /// A estimativa de gas só é anexada quando não há problema bloqueante.
    pub fn aggregate(issues: Vec<Issue>, estimated_gas_units: Option<U256>, success_confidence: u8) -> Self {
        let will_succeed = !issues.iter().any(Issue::is_blocking);
        Self {
            will_succeed,
            estimated_gas_units: if will_succeed { estimated_gas_units } else { None },
            confidence: if will_succeed { success_confidence } else { 0 },
            issues,
        }
    }

    /// Veredito de destinatário inválido; nenhuma outra verificação roda
    pub fn address_invalid(message: impl Into<String>) -> Self {
        Self {
            will_succeed: false,
            issues: vec![Issue::blocking(IssueKind::AddressInvalid, message)],
            estimated_gas_units: None,
            confidence: 0,
        }
    }

    pub fn blocking_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.is_blocking())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| !i.is_blocking())
    }

    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

impl fmt::Display for PreflightVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.will_succeed {
            write!(f, "Pronto para enviar ({}% seguro)", self.confidence)?;
            if let Some(gas) = self.estimated_gas_units {
                write!(f, ", gas estimado: {} (inclui margem)", gas)?;
            }
        } else {
            write!(f, "Verificações falharam")?;
        }
        for issue in &self.issues {
            write!(f, "\n  {}", issue)?;
        }
        Ok(())
    }
}

/// Contadores de uso persistidos fora do núcleo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardStats {
    pub prevented: u64,
    pub successful: u64,
}
