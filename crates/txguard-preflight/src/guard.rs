use chrono::{DateTime, Utc};
use ethereum_types::Address;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use txguard_core::{
    traits::{ChainQueryProvider, CounterStore, WalletConnector},
    GuardStats, PreflightVerdict, TransactionHash, TransferRequest,
};

use crate::{
    errors::{GuardError, Result},
    evaluator::PreflightEvaluator,
    sequencer::{RequestSequencer, Ticket},
};

/// Resultado de uma verificação disparada pelo usuário
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Veredito aplicado como atual
    Applied(PreflightVerdict),
    /// A entrada mudou durante a avaliação; o veredito foi descartado
    Stale,
}

/// Veredito atual junto com o pedido que o produziu
#[derive(Debug, Clone)]
pub struct CheckedTransfer {
    pub request: TransferRequest,
    pub verdict: PreflightVerdict,
    pub checked_at: DateTime<Utc>,
    ticket: Ticket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InputKey {
    sender: Address,
    recipient: String,
    amount: String,
}

impl From<&TransferRequest> for InputKey {
    fn from(request: &TransferRequest) -> Self {
        Self {
            sender: request.sender(),
            recipient: request.recipient().to_string(),
            amount: request.amount().trim().to_string(),
        }
    }
}

/// Libera o slot de verificação pendente mesmo se o future for descartado
struct PendingSlot<'a> {
    slot: &'a Mutex<Option<InputKey>>,
    key: InputKey,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        let mut pending = self.slot.lock();
        if pending.as_ref() == Some(&self.key) {
            *pending = None;
        }
    }
}

/// Orquestra verificação, contadores e envio de uma transferência.
///
/// Só um veredito é mantido; ele é substituído a cada verificação e
/// descartado quando a entrada muda.
pub struct TransferGuard<P> {
    evaluator: PreflightEvaluator<P>,
    stats: Arc<dyn CounterStore>,
    sequencer: RequestSequencer,
    pending: Mutex<Option<InputKey>>,
    current: Mutex<Option<CheckedTransfer>>,
}

impl<P: ChainQueryProvider> TransferGuard<P> {
    pub fn new(evaluator: PreflightEvaluator<P>, stats: Arc<dyn CounterStore>) -> Self {
        Self {
            evaluator,
            stats,
            sequencer: RequestSequencer::new(),
            pending: Mutex::new(None),
            current: Mutex::new(None),
        }
    }

    /// Verifica a transferência e aplica o veredito se ainda for atual
    pub async fn check(&self, sender: Address, recipient: &str, amount: &str) -> Result<CheckOutcome> {
        let config = self.evaluator.config();
        let request = TransferRequest::new(sender, recipient, amount, config.token, config.token_decimals)?;

        let key = InputKey::from(&request);
        let _slot = {
            let mut pending = self.pending.lock();
            if pending.as_ref() == Some(&key) {
                return Err(GuardError::CheckInProgress);
            }
            *pending = Some(key.clone());
            PendingSlot { slot: &self.pending, key }
        };

        let ticket = self.sequencer.issue();
        self.current.lock().take();

        let verdict = self.evaluator.evaluate(&request).await;

        {
            let mut current = self.current.lock();
            if !self.sequencer.is_current(ticket) {
                debug!(ticket = ticket.sequence(), "veredito obsoleto descartado");
                return Ok(CheckOutcome::Stale);
            }
            *current = Some(CheckedTransfer {
                request,
                verdict: verdict.clone(),
                checked_at: Utc::now(),
                ticket,
            });
        }

        if !verdict.will_succeed {
            let stats = self.stats.increment_prevented();
            info!(prevented = stats.prevented, "transferência com problemas bloqueantes");
        }
        Ok(CheckOutcome::Applied(verdict))
    }

    /// Descarta o veredito atual e qualquer verificação em andamento
    pub fn invalidate(&self) {
        self.sequencer.invalidate();
        self.current.lock().take();
    }

    pub fn current(&self) -> Option<CheckedTransfer> {
        self.current.lock().clone()
    }

    pub fn current_verdict(&self) -> Option<PreflightVerdict> {
        self.current.lock().as_ref().map(|c| c.verdict.clone())
    }

    pub fn stats(&self) -> GuardStats {
        self.stats.read()
    }

    /// Envia o payload do veredito aprovado, após confirmação do usuário
    pub async fn send_approved<W>(&self, wallet: &W) -> Result<TransactionHash>
    where
        W: WalletConnector + ?Sized,
    {
        let checked = self.current.lock().take().ok_or(GuardError::NothingToSend)?;
        let recipient = match checked.request.recipient_address() {
            Some(recipient) if checked.verdict.will_succeed => recipient,
            _ => {
                self.restore(checked);
                return Err(GuardError::VerdictBlocked);
            }
        };
        let call = checked.request.to_call(recipient);

        match wallet.send_transaction(&call).await {
            Ok(hash) => {
                let stats = self.stats.increment_successful();
                info!(tx_hash = ?hash, successful = stats.successful, "transferência enviada");
                Ok(hash)
            }
            Err(e) => {
                warn!(error = %e, "envio falhou");
                self.restore(checked);
                Err(GuardError::Wallet(e))
            }
        }
    }

    /// Devolve o veredito se nada mais novo o substituiu
    fn restore(&self, checked: CheckedTransfer) {
        let mut current = self.current.lock();
        if current.is_none() && self.sequencer.is_current(checked.ticket) {
            *current = Some(checked);
        }
    }
}
