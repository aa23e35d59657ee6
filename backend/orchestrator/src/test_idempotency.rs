use std::time::Duration;

use tokio::sync::broadcast;

use crate::bridge::BridgeStatus;
use crate::calls::CallDescription;
use crate::collaborators::Receipt;
use crate::intent::ActionKind;
use crate::orchestrator::{NotificationKind, OrchestratorEvent, OrchestratorStatus, SubmitOutcome};
use crate::test_utils::{hash, harness};

fn notifications(rx: &mut broadcast::Receiver<OrchestratorEvent>) -> Vec<NotificationKind> {
    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let OrchestratorEvent::Notification(n) = event {
            kinds.push(n.kind);
        }
    }
    kinds
}

async fn wait_for(rx: &mut broadcast::Receiver<OrchestratorEvent>, status: OrchestratorStatus) {
    loop {
        if let OrchestratorEvent::Status(s) = rx.recv().await.unwrap() {
            if s == status {
                return;
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn repeated_confirmation_runs_side_effects_once() {
    let h = harness();
    h.orchestrator.set_action(ActionKind::Stake).await.unwrap();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    let reads_before = h.chain.counts();
    let mut rx = h.orchestrator.subscribe();

    let SubmitOutcome::Confirmed(tx) = h.orchestrator.submit().await.unwrap() else {
        panic!("expected confirmation");
    };

    // The executor keeps reporting the same settled receipt.
    for _ in 0..3 {
        let applied = h
            .orchestrator
            .on_execution_settled(tx, Receipt { confirmed: true })
            .await;
        assert!(!applied);
    }
    assert_eq!(notifications(&mut rx), vec![NotificationKind::Confirmed]);
    assert_eq!(h.chain.counts().staking - reads_before.staking, 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    let after = h.chain.counts();
    assert_eq!(after.staking - reads_before.staking, 2);
    assert_eq!(after.balance - reads_before.balance, 2);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.chain.counts().staking - reads_before.staking, 2);
}

#[tokio::test]
async fn repeated_failure_is_reported_once() {
    let h = harness();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    h.executor.script_receipts(&[false]);
    let mut rx = h.orchestrator.subscribe();

    assert!(h.orchestrator.submit().await.is_err());
    let tx = hash(1);
    assert!(
        !h.orchestrator
            .on_execution_settled(tx, Receipt { confirmed: false })
            .await
    );
    assert_eq!(notifications(&mut rx), vec![NotificationKind::Failed]);
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Error);
}

#[tokio::test]
async fn unknown_hashes_are_ignored() {
    let h = harness();
    let mut rx = h.orchestrator.subscribe();
    assert!(
        !h.orchestrator
            .on_execution_settled(hash(99), Receipt { confirmed: true })
            .await
    );
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
    assert!(notifications(&mut rx).is_empty());
}

#[tokio::test]
async fn reset_while_pending_discards_the_stale_result() {
    let h = harness();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    let release = h.executor.hold_receipts();
    let mut rx = h.orchestrator.subscribe();

    let orchestrator = h.orchestrator.clone();
    let in_flight = tokio::spawn(async move { orchestrator.submit().await });
    wait_for(&mut rx, OrchestratorStatus::Pending).await;

    h.orchestrator.set_action(ActionKind::Stake).await.unwrap();
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Idle);
    assert!(h.orchestrator.intent().await.raw_amount_text.is_empty());

    release.notify_one();
    let outcome = in_flight.await.unwrap().unwrap();
    assert_eq!(outcome, SubmitOutcome::Superseded);
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
    assert!(notifications(&mut rx).is_empty());

    // A late re-delivery of the stale confirmation changes nothing either.
    assert!(
        !h.orchestrator
            .on_execution_settled(hash(1), Receipt { confirmed: true })
            .await
    );
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
}

#[tokio::test]
async fn reset_while_bridging_keeps_the_bridge_idle() {
    let h = harness();
    h.orchestrator.set_source_chain(1).await.unwrap();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    h.executor.script_receipts(&[false]);
    let release = h.executor.hold_receipts();
    let mut rx = h.orchestrator.subscribe();

    let orchestrator = h.orchestrator.clone();
    let in_flight = tokio::spawn(async move { orchestrator.submit().await });
    wait_for(&mut rx, OrchestratorStatus::Pending).await;
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Bridging);

    h.orchestrator.set_source_chain(8453).await.unwrap();
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Idle);

    release.notify_one();
    assert_eq!(in_flight.await.unwrap().unwrap(), SubmitOutcome::Superseded);
    assert_eq!(h.orchestrator.bridge_status(), BridgeStatus::Idle);
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
}

#[tokio::test]
async fn early_settlement_report_still_confirms_the_submission() {
    let h = harness();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    let release = h.executor.hold_receipts();
    let mut rx = h.orchestrator.subscribe();

    let orchestrator = h.orchestrator.clone();
    let in_flight = tokio::spawn(async move { orchestrator.submit().await });
    wait_for(&mut rx, OrchestratorStatus::Pending).await;

    // The settlement report overtakes the submitter's own receipt wait.
    assert!(
        h.orchestrator
            .on_execution_settled(hash(1), Receipt { confirmed: true })
            .await
    );
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Success);

    release.notify_one();
    assert_eq!(
        in_flight.await.unwrap().unwrap(),
        SubmitOutcome::Confirmed(hash(1))
    );
    assert_eq!(notifications(&mut rx), vec![NotificationKind::Confirmed]);
}

#[tokio::test]
async fn reset_while_approving_skips_execution() {
    let h = harness();
    h.orchestrator.set_amount("10").await.unwrap();
    assert!(h.orchestrator.needs_approval().await);
    let release = h.executor.hold_receipts();
    let mut rx = h.orchestrator.subscribe();

    let orchestrator = h.orchestrator.clone();
    let in_flight = tokio::spawn(async move { orchestrator.submit().await });
    wait_for(&mut rx, OrchestratorStatus::Approving).await;

    h.orchestrator.set_action(ActionKind::Stake).await.unwrap();
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);

    release.notify_one();
    assert_eq!(in_flight.await.unwrap().unwrap(), SubmitOutcome::Superseded);
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);

    let calls = h.executor.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0].1.call, CallDescription::Approve { .. }));
    assert!(notifications(&mut rx).is_empty());
}

#[tokio::test]
async fn token_change_while_pending_discards_the_stale_result() {
    let h = harness();
    h.orchestrator.set_token("ETH").await.unwrap();
    h.orchestrator.set_amount("1").await.unwrap();
    let release = h.executor.hold_receipts();
    let mut rx = h.orchestrator.subscribe();

    let orchestrator = h.orchestrator.clone();
    let in_flight = tokio::spawn(async move { orchestrator.submit().await });
    wait_for(&mut rx, OrchestratorStatus::Pending).await;

    let intent = h.orchestrator.set_token("USDC").await.unwrap();
    assert_eq!(intent.token.symbol, "USDC");
    assert!(intent.raw_amount_text.is_empty());
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);

    release.notify_one();
    assert_eq!(in_flight.await.unwrap().unwrap(), SubmitOutcome::Superseded);
    assert_eq!(h.orchestrator.status().await, OrchestratorStatus::Idle);
    assert!(notifications(&mut rx).is_empty());
}
