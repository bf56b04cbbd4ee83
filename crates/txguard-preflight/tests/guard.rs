mod common;

use common::*;
use ethereum_types::U256;
use std::sync::Arc;
use std::time::Duration;
use txguard_core::{GuardStats, IssueKind, TransferRequest};
use txguard_preflight::{
    CheckOutcome, GuardError, MemoryCounterStore, PreflightConfig, PreflightEvaluator,
    TransferGuard,
};

fn guard(chain: StubChain) -> TransferGuard<StubChain> {
    TransferGuard::new(PreflightEvaluator::new(chain), Arc::new(MemoryCounterStore::new()))
}

fn slow() -> StubChain {
    StubChain::healthy().with_delay(Duration::from_millis(100))
}

#[tokio::test]
async fn passing_check_is_applied_without_counting() {
    let guard = guard(StubChain::healthy());
    let outcome = guard.check(sender(), RECIPIENT, "50").await.unwrap();

    let CheckOutcome::Applied(verdict) = outcome else {
        panic!("esperado veredito aplicado");
    };
    assert!(verdict.will_succeed);
    assert_eq!(guard.current_verdict(), Some(verdict));
    assert_eq!(guard.current().unwrap().request.amount(), "50");
    assert_eq!(guard.stats(), GuardStats::default());
}

#[tokio::test]
async fn failing_check_counts_as_prevented() {
    let guard = guard(StubChain::healthy());
    guard.check(sender(), "0xabc", "50").await.unwrap();
    guard.check(sender(), RECIPIENT, "500").await.unwrap();

    let verdict = guard.current_verdict().unwrap();
    assert!(verdict.has_issue(IssueKind::BalanceInsufficient));
    assert_eq!(guard.stats().prevented, 2);
    assert_eq!(guard.stats().successful, 0);
}

#[tokio::test]
async fn edit_during_check_discards_the_verdict() {
    let guard = guard(slow().with_native(Err(rpc_down())).with_estimate(Err(rpc_down())));

    let (outcome, _) = tokio::join!(guard.check(sender(), RECIPIENT, "50"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        guard.invalidate();
    });

    assert_eq!(outcome.unwrap(), CheckOutcome::Stale);
    assert!(guard.current_verdict().is_none());
    // veredito bloqueante descartado não conta como prevenido
    assert_eq!(guard.stats().prevented, 0);
}

#[tokio::test]
async fn newer_input_wins() {
    let guard = guard(slow());

    let (first, second) = tokio::join!(guard.check(sender(), RECIPIENT, "10"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        guard.check(sender(), RECIPIENT, "20").await
    });

    assert_eq!(first.unwrap(), CheckOutcome::Stale);
    assert!(matches!(second.unwrap(), CheckOutcome::Applied(_)));
    assert_eq!(guard.current().unwrap().request.amount(), "20");
}

#[tokio::test]
async fn identical_check_while_pending_is_rejected() {
    let chain = slow();
    let counts = chain.counts.clone();
    let guard = guard(chain);

    let (first, second) = tokio::join!(guard.check(sender(), RECIPIENT, "10"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        guard.check(sender(), RECIPIENT, " 10 ").await
    });

    assert!(matches!(first.unwrap(), CheckOutcome::Applied(_)));
    assert!(matches!(second, Err(GuardError::CheckInProgress)));
    assert_eq!(counts.total(), 4);

    // terminada a primeira, a mesma entrada pode ser verificada de novo
    assert!(guard.check(sender(), RECIPIENT, "10").await.is_ok());
}

#[tokio::test]
async fn unparseable_amount_is_rejected_before_any_query() {
    let chain = StubChain::healthy();
    let counts = chain.counts.clone();
    let guard = guard(chain);

    for amount in ["abc", "1.2.3", "0.0000001", "-5", ""] {
        let result = guard.check(sender(), RECIPIENT, amount).await;
        assert!(matches!(result, Err(GuardError::InvalidRequest(_))), "{amount}");
    }
    assert_eq!(counts.total(), 0);
    assert!(guard.current_verdict().is_none());
}

#[tokio::test]
async fn approved_transfer_sends_the_simulated_payload() {
    let guard = guard(StubChain::healthy());
    let wallet = RecordingWallet::default();
    guard.check(sender(), RECIPIENT, "12.5").await.unwrap();

    let hash = guard.send_approved(&wallet).await.unwrap();
    assert_eq!(hash, ethereum_types::H256::repeat_byte(0xab));

    let request = TransferRequest::usdc(sender(), RECIPIENT, "12.5").unwrap();
    let expected = request.to_call(request.recipient_address().unwrap());
    assert_eq!(wallet.sent.lock().as_slice(), &[expected]);
    assert_eq!(guard.stats().successful, 1);

    // o veredito é consumido pelo envio
    assert!(matches!(guard.send_approved(&wallet).await, Err(GuardError::NothingToSend)));
    assert_eq!(wallet.sent.lock().len(), 1);
}

#[tokio::test]
async fn send_without_check_is_rejected() {
    let guard = guard(StubChain::healthy());
    let wallet = RecordingWallet::default();
    assert!(matches!(guard.send_approved(&wallet).await, Err(GuardError::NothingToSend)));
}

#[tokio::test]
async fn blocked_verdict_is_not_sent() {
    let guard = guard(StubChain::healthy().with_native(Ok(eth("0.000001"))));
    let wallet = RecordingWallet::default();
    guard.check(sender(), RECIPIENT, "1").await.unwrap();

    assert!(matches!(guard.send_approved(&wallet).await, Err(GuardError::VerdictBlocked)));
    assert!(wallet.sent.lock().is_empty());
    assert!(guard.current_verdict().is_some());
    assert_eq!(guard.stats(), GuardStats { prevented: 1, successful: 0 });
}

#[tokio::test]
async fn wallet_failure_keeps_the_verdict() {
    let guard = guard(StubChain::healthy());
    let wallet = RecordingWallet { fail: true, ..Default::default() };
    guard.check(sender(), RECIPIENT, "1").await.unwrap();

    let result = guard.send_approved(&wallet).await;
    assert!(matches!(result, Err(GuardError::Wallet(_))));
    assert!(guard.current_verdict().unwrap().will_succeed);
    assert_eq!(guard.stats().successful, 0);

    let retry = RecordingWallet::default();
    assert!(guard.send_approved(&retry).await.is_ok());
    assert_eq!(guard.stats().successful, 1);
}

#[tokio::test]
async fn maximum_token_precision_is_reported_without_overflow() {
    let config = PreflightConfig { token_decimals: 77, ..Default::default() };
    let chain = StubChain::healthy().with_token(Ok(U256::zero()));
    let evaluator = PreflightEvaluator::with_config(chain, config).unwrap();
    let guard = TransferGuard::new(evaluator, Arc::new(MemoryCounterStore::new()));

    let amount = format!("0.{}1", "0".repeat(76));
    let CheckOutcome::Applied(verdict) = guard.check(sender(), RECIPIENT, &amount).await.unwrap() else {
        panic!("esperado veredito aplicado");
    };
    let issue = &verdict.issues[0];
    assert_eq!(issue.kind, IssueKind::BalanceInsufficient);
    assert!(issue.message.contains("Possui 0"), "{}", issue.message);
    assert!(issue.message.contains(&amount), "{}", issue.message);
}
