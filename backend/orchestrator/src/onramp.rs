//! Card on-ramp funding watch.
//!
//! A card purchase lands as settlement currency on the settlement chain. We
//! take the balance when the purchase starts and poll until it grows; the
//! intent is then switched to spend that balance like any pre-funded token.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::chains;
use crate::errors::{OrchestratorError, Result};
use crate::orchestrator::Orchestrator;
use crate::reader::BalanceAndAllowanceReader;
use crate::tokens;

/// Poll the settlement-currency balance of `owner` until it rises above
/// its starting value. Returns the increase, or `None` if cancelled.
pub async fn await_funding(
    reader: &BalanceAndAllowanceReader,
    owner: Address,
    interval: Duration,
    cancel: &CancellationToken,
) -> Result<Option<U256>> {
    let chain = chains::settlement();
    let token = tokens::settlement_currency(chain.id).ok_or_else(|| {
        OrchestratorError::Config("settlement chain lists no settlement currency".to_string())
    })?;

    let baseline = reader.refresh_balance(chain.id, token, owner).await?;
    info!("Watching for on-ramp funding of {owner} above {baseline}");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("On-ramp watch cancelled");
                return Ok(None);
            }
            _ = tokio::time::sleep(interval) => {}
        }
        match reader.refresh_balance(chain.id, token, owner).await {
            Ok(balance) if balance > baseline => {
                let received = balance - baseline;
                info!("On-ramp funding arrived: {received}");
                return Ok(Some(received));
            }
            Ok(_) => {}
            Err(e) => warn!("On-ramp balance read failed: {e}"),
        }
    }
}

/// At most one funding watch at a time, owned by the API layer.
#[derive(Default)]
pub struct OnrampSession {
    current: Mutex<Option<CancellationToken>>,
}

impl OnrampSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching in the background, replacing any earlier watch. When
    /// funds arrive the intent switches to the settlement currency.
    pub async fn start(&self, orchestrator: Arc<Orchestrator>, interval: Duration) -> Result<()> {
        let owner = orchestrator.account().ok_or(OrchestratorError::NotConnected)?;
        let cancel = CancellationToken::new();
        if let Some(previous) = self.current.lock().await.replace(cancel.clone()) {
            previous.cancel();
        }

        tokio::spawn(async move {
            match await_funding(orchestrator.reader(), owner, interval, &cancel).await {
                Ok(Some(_)) => {
                    if let Err(e) = orchestrator.use_onramp_funds().await {
                        warn!("Could not switch to on-ramp funds: {e}");
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("On-ramp watch failed: {e}"),
            }
        });
        Ok(())
    }

    /// Stop the running watch. Returns whether one was running.
    pub async fn cancel(&self) -> bool {
        match self.current.lock().await.take() {
            Some(token) => {
                let running = !token.is_cancelled();
                token.cancel();
                running
            }
            None => false,
        }
    }
}
