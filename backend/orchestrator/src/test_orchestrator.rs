use alloy_primitives::U256;
use tokio::sync::broadcast;

use crate::amount;
use crate::bridge::BridgeStatus;
use crate::calls::CallDescription;
use crate::chains;
use crate::errors::OrchestratorError;
use crate::intent::ActionKind;
use crate::orchestrator::{OrchestratorEvent, OrchestratorStatus, SubmitOutcome};
use crate::test_utils::{harness, BRIDGE, SETTLEMENT};
use crate::tokens;

fn drain(rx: &mut broadcast::Receiver<OrchestratorEvent>) -> Vec<OrchestratorEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn statuses(events: &[OrchestratorEvent]) -> Vec<OrchestratorStatus> {
    events
        .iter()
        .filter_map(|e| match e {
            OrchestratorEvent::Status(s) => Some(*s),
            _ => None,
        })
        .collect()
}

fn bridge_statuses(events: &[OrchestratorEvent]) -> Vec<BridgeStatus> {
    events
        .iter()
        .filter_map(|e| match e {
            OrchestratorEvent::Bridge(s) => Some(*s),
            _ => None,
        })
        .collect()
}

fn notification_count(events: &[OrchestratorEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, OrchestratorEvent::Notification(_)))
        .count()
}

// ─────────────────────────────────────────────────────────
// Approval derivation
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn native_tokens_never_need_approval() {
    let h = harness();
    for chain in chains::all() {
        let native = tokens::tokens_for(chain.id)
            .iter()
            .find(|t| t.is_native)
            .unwrap();
        h.orchestrator.set_source_chain(chain.id).await.unwrap();
        h.orchestrator.set_token(native.symbol).await.unwrap();
        for text in ["0", "1", "1000000"] {
            h.orchestrator.set_amount(text).await.unwrap();
            assert!(!h.orchestrator.needs_approval().await, "{} {text}", chain.name);
        }
    }
}

#[tokio::test]
async fn erc20_needs_approval_when_allowance_is_short() {
    let h = harness();
    assert!(!h.orchestrator.needs_approval().await, "zero amount");

    h.orchestrator.set_amount("100").await.unwrap();
    assert!(h.orchestrator.needs_approval().await);

    h.chain.set_allowance(SETTLEMENT, U256::from(99_999_999u64));
    h.orchestrator.refresh_reads().await;
    assert!(h.orchestrator.needs_approval().await);

    h.chain.set_allowance(SETTLEMENT, U256::from(100_000_000u64));
    h.orchestrator.refresh_reads().await;
    assert!(!h.orchestrator.needs_approval().await);
}

#[tokio::test]
async fn switching_to_a_bridged_chain_checks_the_bridge_allowance() {
    let h = harness();
    h.chain.set_allowance(SETTLEMENT, U256::MAX);
    h.orchestrator.refresh_reads().await;
    h.orchestrator.set_amount("100").await.unwrap();
    assert!(!h.orchestrator.needs_approval().await);

    h.orchestrator.set_source_chain(1).await.unwrap();
    h.orchestrator.set_amount("100").await.unwrap();
    assert!(h.orchestrator.needs_approval().await);

    h.chain.set_allowance(BRIDGE, U256::MAX);
    h.orchestrator.refresh_reads().await;
    assert!(!h.orchestrator.needs_approval().await);
}

// ─────────────────────────────────────────────────────────
// Refusals
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_without_account_does_nothing() {
    let h = harness();
    h.orchestrator.set_amount("5").await.unwrap();
    h.wallet.disconnect();
    let mut rx = h.orchestrator.subscribe();

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::NotConnected));
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
    assert!(h.executor.calls().is_empty());
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn submit_with_zero_amount_is_refused() {
    let h = harness();
    h.orchestrator.set_amount("abc").await.unwrap();
    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidAmount));
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
}

#[tokio::test]
async fn wormhole_route_never_reaches_the_executor() {
    let h = harness();
    h.orchestrator.set_source_chain(43114).await.unwrap();
    h.orchestrator.set_amount("10").await.unwrap();
    assert_eq!(h.orchestrator.intent().await.token.symbol, "USDC");

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::UnsupportedBridgePath { .. }));
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Error);
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Idle);
    assert!(h.executor.calls().is_empty());
}

// ─────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn native_donate_on_the_settlement_chain() {
    let h = harness();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1.5").await.unwrap();
    assert!(!h.orchestrator.needs_approval().await);
    let mut rx = h.orchestrator.subscribe();

    let outcome = h.orchestrator.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Confirmed(_)));

    let events = drain(&mut rx);
    assert_eq!(
        statuses(&events),
        vec![OrchestratorStatus::Pending, OrchestratorStatus::Success]
    );
    assert!(bridge_statuses(&events).is_empty());
    assert_eq!(notification_count(&events), 1);

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 1);
    let (chain_id, request) = &calls[0];
    assert_eq!(*chain_id, chains::SETTLEMENT_CHAIN_ID);
    assert_eq!(request.to, SETTLEMENT);
    assert_eq!(request.value, amount::to_smallest_units("1.5", 18));
    assert_eq!(
        request.call,
        CallDescription::DonateNative {
            campaign_id: U256::from(7u8)
        }
    );
    assert!(h.orchestrator.intent().await.raw_amount_text.is_empty());
}

#[tokio::test]
async fn erc20_wealth_build_approves_max_then_executes() {
    let h = harness();
    h.orchestrator.set_action(ActionKind::WealthBuild).await.unwrap();
    h.orchestrator.set_token("DAI").await.unwrap();
    h.orchestrator.set_amount("100").await.unwrap();
    assert!(h.orchestrator.needs_approval().await);
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.submit().await.unwrap();

    assert_eq!(
        statuses(&drain(&mut rx)),
        vec![
            OrchestratorStatus::Approving,
            OrchestratorStatus::Approved,
            OrchestratorStatus::Pending,
            OrchestratorStatus::Success,
        ]
    );

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 2);
    let dai = tokens::get(8453, "DAI").unwrap();
    assert_eq!(
        calls[0].1.call,
        CallDescription::Approve {
            token: dai.address.unwrap(),
            spender: SETTLEMENT,
            amount: U256::MAX,
        }
    );
    assert_eq!(
        calls[1].1.call,
        CallDescription::WealthBuildErc20 {
            campaign_id: U256::from(7u8),
            token: dai.address.unwrap(),
            amount: amount::to_smallest_units("100", 18),
        }
    );
}

#[tokio::test]
async fn bridged_native_donate_tracks_the_bridge_in_lockstep() {
    let h = harness();
    h.orchestrator.set_source_chain(1).await.unwrap();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("2").await.unwrap();
    let mut rx = h.orchestrator.subscribe();

    h.orchestrator.submit().await.unwrap();

    let events = drain(&mut rx);
    let transitions: Vec<_> = events
        .iter()
        .filter(|e| !matches!(e, OrchestratorEvent::Notification(_)))
        .cloned()
        .map(|e| format!("{e:?}"))
        .collect();
    assert_eq!(
        transitions,
        vec![
            "Status(Pending)",
            "Bridge(Bridging)",
            "Status(Success)",
            "Bridge(Complete)"
        ]
    );

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 1);
    let (chain_id, request) = &calls[0];
    assert_eq!(*chain_id, 1);
    assert_eq!(request.to, BRIDGE);
    let fee = chains::get(1).unwrap().estimated_bridge_fee;
    assert_eq!(request.value, amount::to_smallest_units("2", 18) + fee);
    assert!(matches!(
        request.call,
        CallDescription::CrossChainAction { endpoint_id: 30101, action_code: 0, token: None, .. }
    ));
}

#[tokio::test]
async fn bridged_erc20_approves_the_bridge_contract() {
    let h = harness();
    h.orchestrator.set_source_chain(42161).await.unwrap();
    h.orchestrator.set_action(ActionKind::Stake).await.unwrap();
    h.orchestrator.set_amount("25").await.unwrap();

    h.orchestrator.submit().await.unwrap();

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        calls[0].1.call,
        CallDescription::Approve { spender, amount, .. } if spender == BRIDGE && amount == U256::MAX
    ));
    assert!(matches!(
        calls[1].1.call,
        CallDescription::CrossChainAction { endpoint_id: 30110, action_code: 2, token: Some(_), .. }
    ));
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Complete);
}

// ─────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn wallet_rejection_is_an_error_state() {
    let h = harness();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    h.executor.reject_next_submit();

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::UserRejected));
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Error);
    assert_eq!(h.orchestrator.intent().await.raw_amount_text, "1");
    assert!(h.orchestrator.view().await.last_error.is_some());
}

#[tokio::test]
async fn failed_bridged_receipt_fails_the_bridge() {
    let h = harness();
    h.orchestrator.set_source_chain(1).await.unwrap();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    h.executor.script_receipts(&[false]);

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::ReceiptFailed { .. }));
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Error);
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Failed);
}

#[tokio::test]
async fn failed_approval_stops_before_execution() {
    let h = harness();
    h.orchestrator.set_amount("10").await.unwrap();
    h.executor.script_receipts(&[false]);

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::ReceiptFailed { .. }));
    assert_eq!(h.executor.calls().len(), 1);
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Error);
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Idle);
}

#[tokio::test]
async fn submission_failure_on_bridged_path() {
    let h = harness();
    h.orchestrator.set_source_chain(10).await.unwrap();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();

    // Optimism has an endpoint but no bridge contract in the test deployment.
    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::UnsupportedBridgePath { .. }));

    h.orchestrator.set_source_chain(1).await.unwrap();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    h.executor.fail_next_submit();
    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::SubmissionFailed(_)));
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Failed);
}

// ─────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn second_submit_while_pending_is_refused() {
    let h = harness();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    let release = h.executor.hold_receipts();
    let mut rx = h.orchestrator.subscribe();

    let orchestrator = h.orchestrator.clone();
    let first = tokio::spawn(async move { orchestrator.submit().await });
    while !matches!(rx.recv().await.unwrap(), OrchestratorEvent::Status(OrchestratorStatus::Pending)) {}

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Busy));

    release.notify_one();
    assert!(matches!(first.await.unwrap().unwrap(), SubmitOutcome::Confirmed(_)));
    assert_eq!(h.executor.calls().len(), 1);
}

#[tokio::test]
async fn success_clears_the_amount_and_editing_returns_to_idle() {
    let h = harness();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    h.orchestrator.submit().await.unwrap();
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Success);

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidAmount));

    h.orchestrator.set_amount("2").await.unwrap();
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
    h.orchestrator.submit().await.unwrap();
    assert_eq!(h.executor.calls().len(), 2);
}

#[tokio::test]
async fn onramp_funds_switch_to_the_settlement_currency() {
    let h = harness();
    h.orchestrator.set_source_chain(137).await.unwrap();
    h.orchestrator.set_token("POL").await.unwrap();

    let intent = h.orchestrator.use_onramp_funds().await.unwrap();
    assert_eq!(intent.source_chain.id, chains::SETTLEMENT_CHAIN_ID);
    assert!(intent.token.is_settlement_currency);
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
}
