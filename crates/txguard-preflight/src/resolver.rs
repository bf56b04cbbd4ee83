use ethereum_types::Address;
use tracing::debug;
use txguard_core::{traits::AddressResolver, utils};

use crate::sequencer::RequestSequencer;

/// Resultado da resolução do destinatário
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Address),
    /// Nome não registrado ou entrada que não é nome nem endereço
    NotFound,
    Failed(String),
    /// Uma entrada mais nova chegou antes da resposta
    Stale,
}

impl Resolution {
    pub fn address(&self) -> Option<Address> {
        match self {
            Resolution::Resolved(address) => Some(*address),
            _ => None,
        }
    }
}

/// Resolve o destinatário digitado aplicando apenas a resposta mais recente
pub struct RecipientResolver<R> {
    resolver: R,
    sequencer: RequestSequencer,
}

impl<R: AddressResolver> RecipientResolver<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Endereços hexadecimais passam direto; nomes (com `.`) vão ao resolver
    pub async fn resolve(&self, input: &str) -> Resolution {
        let input = input.trim();
        let ticket = self.sequencer.issue();

        if utils::is_valid_address(input) {
            return match utils::hex_to_address(input) {
                Some(address) => Resolution::Resolved(address),
                None => Resolution::NotFound,
            };
        }
        if !input.contains('.') {
            return Resolution::NotFound;
        }

        let result = self.resolver.resolve(input).await;
        if !self.sequencer.is_current(ticket) {
            debug!(name = %input, "resolução obsoleta descartada");
            return Resolution::Stale;
        }
        match result {
            Ok(Some(address)) => Resolution::Resolved(address),
            Ok(None) => Resolution::NotFound,
            Err(e) => Resolution::Failed(e.to_string()),
        }
    }

    /// Chamado quando a entrada é editada
    pub fn invalidate(&self) {
        self.sequencer.invalidate();
    }
}
