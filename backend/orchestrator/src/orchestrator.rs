//! # Transaction orchestrator
//!
//! Turns the current [`PendingIntent`] into on-chain transactions and tracks
//! them to a terminal status exactly once.
//!
//! ```text
//!          ┌──────────── needs approval ────────────┐
//!          │                                        ▼
//! Idle ────┤                                   Approving ──► Approved ──┐
//!          │                                        │                   │
//!          └──────────── no approval ───────────────┼───────────────────┴──► Pending ──► Success
//!                                                   ▼                              │
//!                                                 Error ◄──────────────────────────┘
//! ```
//!
//! Any change of action, token or source chain returns to `Idle` and bumps
//! the intent epoch; continuations of calls issued under an older epoch
//! finish without touching status, bridge status or notifications.
//!
//! The executor's "confirmed" outcome never resets, so one-time success
//! effects are gated on the processed-hash table rather than on
//! the outcome itself.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::amount::{self, FeeSchedule, SettlementRates};
use crate::bridge::{BridgeStatus, BridgeStatusTracker};
use crate::calls::{self, CallRequest, Contracts, ExecutionPlan};
use crate::chains;
use crate::collaborators::{ChainReader, Executor, Receipt, Wallet};
use crate::errors::{OrchestratorError, Result};
use crate::intent::{ActionKind, IntentUpdate, PendingIntent};
use crate::positions::{EndowmentPosition, StakingPosition};
use crate::reader::BalanceAndAllowanceReader;
use crate::refresher::{PositionRefresher, RefreshTarget};
use crate::tokens;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorStatus {
    Idle,
    Approving,
    /// Approval mined; execution is about to be submitted.
    Approved,
    Pending,
    Success,
    Error,
}

impl OrchestratorStatus {
    /// States during which a new submission is refused.
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Approving | Self::Approved | Self::Pending)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub campaign_id: U256,
    pub contracts: Contracts,
    pub rates: SettlementRates,
    pub fees: FeeSchedule,
    /// Delay before the second post-success refresh pass.
    pub settle_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub tx_hash: Option<TxHash>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OrchestratorEvent {
    Status(OrchestratorStatus),
    Bridge(BridgeStatus),
    Notification(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The execution call was mined successfully.
    Confirmed(TxHash),
    /// The intent moved on (edited, or resumed elsewhere) before this
    /// submission observed an outcome; nothing was applied on its behalf.
    /// A confirmation already applied through
    /// [`Orchestrator::on_execution_settled`] is still `Confirmed`.
    Superseded,
}

/// Fee split preview rendered in the intent's token.
#[derive(Debug, Clone, Serialize)]
pub struct FeeSplitView {
    pub cause: String,
    pub principal: String,
    pub platform_fee: String,
}

/// Everything the UI renders from.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorView {
    pub intent: PendingIntent,
    pub status: OrchestratorStatus,
    pub bridge_status: BridgeStatus,
    pub bridge_message: &'static str,
    pub needs_approval: bool,
    pub connected: bool,
    pub balance: String,
    pub settlement_estimate: String,
    pub fee_split: Option<FeeSplitView>,
    pub last_error: Option<String>,
    pub staking: Option<StakingPosition>,
    pub endowment: Option<EndowmentPosition>,
}

struct InFlight {
    hash: TxHash,
    bridged: bool,
    amount_text: String,
    target: RefreshTarget,
}

struct State {
    intent: PendingIntent,
    status: OrchestratorStatus,
    /// Bumped on every reset and submission.
    epoch: u64,
    in_flight: Option<InFlight>,
    /// Terminal confirmed hashes, mapped to whether their success effects
    /// ran (`false` for hashes of superseded intents).
    processed: HashMap<TxHash, bool>,
    last_error: Option<String>,
}

enum Settled {
    Confirmed,
    AlreadyConfirmed,
    Failed(OrchestratorError),
    Ignored,
}

pub struct Orchestrator {
    settings: OrchestratorSettings,
    wallet: Arc<dyn Wallet>,
    executor: Arc<dyn Executor>,
    reader: Arc<BalanceAndAllowanceReader>,
    refresher: PositionRefresher,
    bridge: BridgeStatusTracker,
    state: Mutex<State>,
    events: broadcast::Sender<OrchestratorEvent>,
    shutdown: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        settings: OrchestratorSettings,
        wallet: Arc<dyn Wallet>,
        chain: Arc<dyn ChainReader>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let reader = Arc::new(BalanceAndAllowanceReader::new(chain));
        let shutdown = CancellationToken::new();
        let refresher =
            PositionRefresher::new(reader.clone(), settings.settle_delay, shutdown.child_token());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            settings,
            wallet,
            executor,
            reader,
            refresher,
            bridge: BridgeStatusTracker::new(),
            state: Mutex::new(State {
                intent: PendingIntent::settlement_default(),
                status: OrchestratorStatus::Idle,
                epoch: 0,
                in_flight: None,
                processed: HashMap::new(),
                last_error: None,
            }),
            events,
            shutdown,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events.subscribe()
    }

    pub fn reader(&self) -> &Arc<BalanceAndAllowanceReader> {
        &self.reader
    }

    pub fn account(&self) -> Option<Address> {
        self.wallet.current_account()
    }

    /// Cancel scheduled refresh passes.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn bridge_status(&self) -> BridgeStatus {
        self.bridge.status()
    }

    pub async fn status(&self) -> OrchestratorStatus {
        self.state.lock().await.status
    }

    pub async fn intent(&self) -> PendingIntent {
        self.state.lock().await.intent.clone()
    }

    pub async fn needs_approval(&self) -> bool {
        let state = self.state.lock().await;
        self.needs_approval_for(&state.intent, self.wallet.current_account())
    }

    // ─────────────────────────────────────────────────────────
    // Intent edits
    // ─────────────────────────────────────────────────────────

    /// Apply a partial edit.
    ///
    /// Changing action, token or source chain resets the orchestrator to
    /// `Idle`, clears the amount and re-reads the allowance for the new
    /// `(token, spender)` pair. Editing only the amount after a terminal
    /// status returns to `Idle` as well.
    pub async fn update_intent(&self, update: IntentUpdate) -> Result<PendingIntent> {
        let (intent, reset) = {
            let mut state = self.state.lock().await;
            let current_chain = state.intent.source_chain;
            let current_token = state.intent.token;

            let chain = match update.chain_id {
                Some(id) => chains::get(id)?,
                None => current_chain,
            };
            let token = match update.token.as_deref() {
                Some(symbol) => tokens::get(chain.id, symbol)?,
                None if chain.id != current_chain.id => {
                    tokens::carry_over(chain.id, current_token.symbol).ok_or_else(|| {
                        OrchestratorError::UnknownToken {
                            symbol: current_token.symbol.to_string(),
                            chain_id: chain.id,
                        }
                    })?
                }
                None => current_token,
            };
            let action = update.action.unwrap_or(state.intent.action);

            let reset = action != state.intent.action
                || chain.id != current_chain.id
                || token != current_token;
            if reset {
                self.reset_locked(&mut state, PendingIntent::new(action, chain, token));
            }

            if let Some(text) = update.amount.as_deref() {
                state.intent.set_amount_text(text);
                if state.status.is_terminal() {
                    state.last_error = None;
                    self.transition(&mut state, OrchestratorStatus::Idle);
                }
            }
            (state.intent.clone(), reset)
        };

        if reset {
            self.refresh_reads_for(&intent).await;
        }
        Ok(intent)
    }

    pub async fn set_action(&self, action: ActionKind) -> Result<PendingIntent> {
        self.update_intent(IntentUpdate {
            action: Some(action),
            ..Default::default()
        })
        .await
    }

    pub async fn set_source_chain(&self, chain_id: u64) -> Result<PendingIntent> {
        self.update_intent(IntentUpdate {
            chain_id: Some(chain_id),
            ..Default::default()
        })
        .await
    }

    pub async fn set_token(&self, symbol: &str) -> Result<PendingIntent> {
        self.update_intent(IntentUpdate {
            token: Some(symbol.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn set_amount(&self, text: &str) -> Result<PendingIntent> {
        self.update_intent(IntentUpdate {
            amount: Some(text.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Card funding landed: donate from the settlement-currency balance on
    /// the settlement chain, like any other pre-funded ERC-20.
    pub async fn use_onramp_funds(&self) -> Result<PendingIntent> {
        let chain = chains::settlement();
        let token = tokens::settlement_currency(chain.id).ok_or_else(|| {
            OrchestratorError::Config("settlement chain lists no settlement currency".to_string())
        })?;
        self.update_intent(IntentUpdate {
            chain_id: Some(chain.id),
            token: Some(token.symbol.to_string()),
            ..Default::default()
        })
        .await
    }

    fn reset_locked(&self, state: &mut State, intent: PendingIntent) {
        if let Some(flight) = state.in_flight.take() {
            info!("Intent changed; results of tx {} will be ignored", flight.hash);
        }
        debug!(
            "Resetting intent: {:?} {} on {}",
            intent.action, intent.token.symbol, intent.source_chain.name
        );
        state.intent = intent;
        state.epoch += 1;
        state.last_error = None;
        self.transition(state, OrchestratorStatus::Idle);
        self.set_bridge(BridgeStatus::Idle);
    }

    // ─────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────

    /// Re-read balance and allowance for the current intent.
    pub async fn refresh_reads(&self) {
        let intent = self.intent().await;
        self.refresh_reads_for(&intent).await;
    }

    async fn refresh_reads_for(&self, intent: &PendingIntent) {
        let Some(owner) = self.wallet.current_account() else {
            return;
        };
        let chain_id = intent.source_chain.id;
        if let Err(e) = self.reader.refresh_balance(chain_id, intent.token, owner).await {
            warn!("Balance read failed: {e}");
        }
        if let Some(spender) = self.spender(intent) {
            if let Err(e) = self
                .reader
                .refresh_allowance(chain_id, intent.token, owner, spender)
                .await
            {
                warn!("Allowance read failed: {e}");
            }
        }
    }

    fn spender(&self, intent: &PendingIntent) -> Option<Address> {
        self.settings.contracts.spender_for(intent.source_chain)
    }

    fn needs_approval_for(&self, intent: &PendingIntent, account: Option<Address>) -> bool {
        if intent.token.is_native || intent.parsed_amount.is_zero() {
            return false;
        }
        let Some(spender) = self.spender(intent) else {
            return false;
        };
        let allowance = account
            .map(|owner| {
                self.reader
                    .allowance(intent.source_chain.id, intent.token, owner, spender)
            })
            .unwrap_or(U256::ZERO);
        allowance < intent.parsed_amount
    }

    pub async fn view(&self) -> OrchestratorView {
        let account = self.wallet.current_account();
        let state = self.state.lock().await;
        let intent = state.intent.clone();
        let token = intent.token;

        let balance = account
            .map(|owner| self.reader.balance(intent.source_chain.id, token, owner))
            .unwrap_or(U256::ZERO);
        let estimate =
            amount::estimate_settlement_value(token, intent.parsed_amount, &self.settings.rates);
        let fee_split = (intent.action == ActionKind::WealthBuild).then(|| {
            let split = self.settings.fees.split(intent.parsed_amount);
            FeeSplitView {
                cause: amount::format_units(split.cause, token.decimals),
                principal: amount::format_units(split.principal, token.decimals),
                platform_fee: amount::format_units(split.platform_fee, token.decimals),
            }
        });
        let campaign_id = self.settings.campaign_id;
        let bridge_status = self.bridge.status();

        OrchestratorView {
            needs_approval: self.needs_approval_for(&intent, account),
            status: state.status,
            bridge_status,
            bridge_message: bridge_status.describe(),
            connected: account.is_some(),
            balance: amount::format_units(balance, token.decimals),
            settlement_estimate: amount::format_units(estimate, amount::SETTLEMENT_DECIMALS),
            fee_split,
            last_error: state.last_error.clone(),
            staking: account.and_then(|a| self.reader.staking_position(a, campaign_id)),
            endowment: account.and_then(|a| self.reader.endowment_position(a, campaign_id)),
            intent,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────

    /// Submit the current intent: approve if needed, then execute.
    ///
    /// Failures of the attempted transaction are reflected in the status
    /// before being returned; refusals (`NotConnected`, `InvalidAmount`,
    /// `Busy`) leave all state untouched.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let account = self
            .wallet
            .current_account()
            .ok_or(OrchestratorError::NotConnected)?;

        let (epoch, intent, plan, approval) = {
            let mut state = self.state.lock().await;
            if state.status.is_in_progress() {
                return Err(OrchestratorError::Busy);
            }
            if state.intent.parsed_amount.is_zero() {
                return Err(OrchestratorError::InvalidAmount);
            }

            state.epoch += 1;
            state.last_error = None;
            self.set_bridge(BridgeStatus::Idle);
            let intent = state.intent.clone();

            let plan = match calls::plan_execution(
                &intent,
                self.settings.campaign_id,
                &self.settings.contracts,
            ) {
                Ok(plan) => plan,
                Err(e) => {
                    warn!("Cannot submit from {}: {e}", intent.source_chain.name);
                    state.last_error = Some(e.to_string());
                    self.transition(&mut state, OrchestratorStatus::Error);
                    return Err(e);
                }
            };

            let approval = if self.needs_approval_for(&intent, Some(account)) {
                self.spender(&intent)
                    .and_then(|spender| calls::approve_request(intent.token, spender))
            } else {
                None
            };
            if approval.is_some() {
                self.transition(&mut state, OrchestratorStatus::Approving);
            } else {
                self.begin_execution(&mut state, &plan);
            }
            (state.epoch, intent, plan, approval)
        };

        if let Some(request) = approval {
            return self
                .approve_then_execute(epoch, account, intent, plan, request)
                .await;
        }
        self.dispatch(epoch, account, intent, plan).await
    }

    async fn approve_then_execute(
        &self,
        epoch: u64,
        account: Address,
        intent: PendingIntent,
        plan: ExecutionPlan,
        request: CallRequest,
    ) -> Result<SubmitOutcome> {
        let chain_id = intent.source_chain.id;
        info!(
            "Requesting unlimited {} allowance for {}",
            intent.token.symbol, plan.request.to
        );
        if let Err(e) = self.run_to_receipt(chain_id, &request).await {
            return self.fail(epoch, e, false).await;
        }

        {
            let mut state = self.state.lock().await;
            if state.epoch != epoch {
                debug!("Approval confirmed for a superseded intent");
                return Ok(SubmitOutcome::Superseded);
            }
            self.transition(&mut state, OrchestratorStatus::Approved);
        }

        // Max approval is assumed to have landed; the re-read only feeds
        // the display and the recovery guard.
        let reader = self.reader.clone();
        let token = intent.token;
        if let Some(spender) = self.spender(&intent) {
            tokio::spawn(async move {
                if let Err(e) = reader.refresh_allowance(chain_id, token, account, spender).await {
                    warn!("Allowance read after approval failed: {e}");
                }
            });
        }

        {
            let mut state = self.state.lock().await;
            if state.epoch != epoch || state.status != OrchestratorStatus::Approved {
                debug!("Execution already resumed by the recovery guard");
                return Ok(SubmitOutcome::Superseded);
            }
            self.begin_execution(&mut state, &plan);
        }
        self.dispatch(epoch, account, intent, plan).await
    }

    /// Recovery guard for an approval whose continuation never ran.
    ///
    /// Resumes execution only while the status is still `Approved`, the
    /// allowance now covers the amount and the amount is non-zero. Claiming
    /// the transition to `Pending` under the state lock makes this and the
    /// regular continuation mutually exclusive.
    pub async fn tick(&self) -> Result<Option<SubmitOutcome>> {
        let Some(account) = self.wallet.current_account() else {
            return Ok(None);
        };
        let (epoch, intent, plan) = {
            let mut state = self.state.lock().await;
            if state.status != OrchestratorStatus::Approved
                || state.in_flight.is_some()
                || state.intent.parsed_amount.is_zero()
                || self.needs_approval_for(&state.intent, Some(account))
            {
                return Ok(None);
            }
            let plan = calls::plan_execution(
                &state.intent,
                self.settings.campaign_id,
                &self.settings.contracts,
            )?;
            info!("Resuming execution after approval");
            self.begin_execution(&mut state, &plan);
            (state.epoch, state.intent.clone(), plan)
        };
        self.dispatch(epoch, account, intent, plan).await.map(Some)
    }

    fn begin_execution(&self, state: &mut State, plan: &ExecutionPlan) {
        self.transition(state, OrchestratorStatus::Pending);
        if plan.bridged {
            self.set_bridge(BridgeStatus::Bridging);
        }
    }

    async fn run_to_receipt(&self, chain_id: u64, request: &CallRequest) -> Result<TxHash> {
        let hash = self.executor.submit_call(chain_id, request).await?;
        debug!("Submitted {} as {hash}", request.call.signature());
        let receipt = self.executor.wait_for_receipt(chain_id, hash).await?;
        if !receipt.confirmed {
            return Err(OrchestratorError::ReceiptFailed {
                hash: hash.to_string(),
            });
        }
        Ok(hash)
    }

    async fn dispatch(
        &self,
        epoch: u64,
        account: Address,
        intent: PendingIntent,
        plan: ExecutionPlan,
    ) -> Result<SubmitOutcome> {
        let chain_id = intent.source_chain.id;
        info!(
            "Submitting {} to {} on {} (value {})",
            plan.request.call.signature(),
            plan.request.to,
            intent.source_chain.name,
            plan.request.value
        );

        let hash = match self.executor.submit_call(chain_id, &plan.request).await {
            Ok(hash) => hash,
            Err(e) => return self.fail(epoch, e, plan.bridged).await,
        };

        {
            let mut state = self.state.lock().await;
            if state.epoch == epoch {
                state.in_flight = Some(InFlight {
                    hash,
                    bridged: plan.bridged,
                    amount_text: intent.raw_amount_text.clone(),
                    target: RefreshTarget {
                        chain_id,
                        token: intent.token,
                        owner: account,
                        spender: self.spender(&intent),
                        action: intent.action,
                        campaign_id: self.settings.campaign_id,
                    },
                });
            } else {
                debug!("Tx {hash} was submitted for a superseded intent");
            }
        }

        let receipt = self.executor.wait_for_receipt(chain_id, hash).await;
        match self.settle(hash, receipt).await {
            Settled::Confirmed | Settled::AlreadyConfirmed => Ok(SubmitOutcome::Confirmed(hash)),
            Settled::Failed(e) => Err(e),
            Settled::Ignored => Ok(SubmitOutcome::Superseded),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Apply an execution receipt.
    ///
    /// Safe to call any number of times for the same hash: the one-time
    /// effects run only for the first confirmed observation of the hash
    /// that belongs to the current intent. Returns whether anything was
    /// applied.
    pub async fn on_execution_settled(&self, hash: TxHash, receipt: Receipt) -> bool {
        matches!(
            self.settle(hash, Ok(receipt)).await,
            Settled::Confirmed | Settled::Failed(_)
        )
    }

    async fn settle(&self, hash: TxHash, outcome: Result<Receipt>) -> Settled {
        let confirmed = matches!(outcome, Ok(Receipt { confirmed: true }));
        let (flight, result) = {
            let mut state = self.state.lock().await;
            if let Some(&applied) = state.processed.get(&hash) {
                debug!("Tx {hash} already processed");
                return if applied {
                    Settled::AlreadyConfirmed
                } else {
                    Settled::Ignored
                };
            }
            let flight = match state.in_flight.take() {
                Some(flight) if flight.hash == hash => flight,
                other => {
                    state.in_flight = other;
                    if confirmed {
                        state.processed.insert(hash, false);
                    }
                    debug!("Ignoring outcome of superseded tx {hash}");
                    return Settled::Ignored;
                }
            };

            if confirmed {
                state.processed.insert(hash, true);
                state.intent.clear_amount();
                self.transition(&mut state, OrchestratorStatus::Success);
                if flight.bridged {
                    self.set_bridge(BridgeStatus::Complete);
                }
                (flight, Ok(()))
            } else {
                let err = match outcome {
                    Err(e) => e,
                    Ok(_) => OrchestratorError::ReceiptFailed {
                        hash: hash.to_string(),
                    },
                };
                state.last_error = Some(err.to_string());
                self.transition(&mut state, OrchestratorStatus::Error);
                if flight.bridged {
                    self.set_bridge(BridgeStatus::Failed);
                }
                (flight, Err(err))
            }
        };

        match result {
            Ok(()) => {
                let message = confirmed_message(&flight);
                info!("{message} ({hash})");
                self.notify(NotificationKind::Confirmed, message, Some(hash));
                self.refresher.on_success(flight.target).await;
                Settled::Confirmed
            }
            Err(e) => {
                warn!("Tx {hash} failed: {e}");
                self.notify(NotificationKind::Failed, failure_message(&e), Some(hash));
                Settled::Failed(e)
            }
        }
    }

    async fn fail(&self, epoch: u64, err: OrchestratorError, bridged: bool) -> Result<SubmitOutcome> {
        {
            let mut state = self.state.lock().await;
            if state.epoch != epoch {
                debug!("Dropping failure of a superseded intent: {err}");
                return Ok(SubmitOutcome::Superseded);
            }
            warn!("Transaction failed: {err}");
            state.last_error = Some(err.to_string());
            self.transition(&mut state, OrchestratorStatus::Error);
            if bridged {
                self.set_bridge(BridgeStatus::Failed);
            }
        }
        self.notify(NotificationKind::Failed, failure_message(&err), None);
        Err(err)
    }

    // ─────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────

    fn transition(&self, state: &mut State, status: OrchestratorStatus) {
        if state.status == status {
            return;
        }
        info!("Status {:?} → {:?}", state.status, status);
        state.status = status;
        self.emit(OrchestratorEvent::Status(status));
    }

    fn set_bridge(&self, status: BridgeStatus) {
        if self.bridge.set(status) {
            info!("Bridge status → {status:?}");
            self.emit(OrchestratorEvent::Bridge(status));
        }
    }

    fn notify(&self, kind: NotificationKind, message: String, tx_hash: Option<TxHash>) {
        self.emit(OrchestratorEvent::Notification(Notification {
            kind,
            message,
            tx_hash,
            at: Utc::now(),
        }));
    }

    fn emit(&self, event: OrchestratorEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn action_noun(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Donate => "Donation",
        ActionKind::WealthBuild => "Wealth-build deposit",
        ActionKind::Stake => "Stake",
    }
}

fn confirmed_message(flight: &InFlight) -> String {
    let target = &flight.target;
    let what = format!(
        "{} of {} {}",
        action_noun(target.action),
        flight.amount_text,
        target.token.symbol
    );
    if !flight.bridged {
        return format!("{what} confirmed");
    }
    let chain = chains::find(target.chain_id);
    let name = chain.map(|c| c.name).unwrap_or("the source chain");
    let minutes = chain
        .map(|c| c.estimated_bridge_secs.div_ceil(60))
        .unwrap_or(1);
    format!(
        "{what} sent from {name}; it reaches {} in about {minutes} min",
        chains::settlement().name
    )
}

fn failure_message(err: &OrchestratorError) -> String {
    match err {
        OrchestratorError::UserRejected => "Transaction rejected in wallet".to_string(),
        other => format!("Transaction failed: {other}"),
    }
}
