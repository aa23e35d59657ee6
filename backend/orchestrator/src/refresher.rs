//! Re-reads of state that a successful transaction invalidates.
//!
//! A pass runs right away and once more after `settle_delay`, because the
//! read node can lag a block behind the one the transaction was mined in.
//! Passes overwrite cached values, so running two is harmless.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::intent::ActionKind;
use crate::reader::BalanceAndAllowanceReader;
use crate::tokens::Token;

/// What to re-read after a success.
#[derive(Debug, Clone)]
pub struct RefreshTarget {
    pub chain_id: u64,
    pub token: &'static Token,
    pub owner: Address,
    pub spender: Option<Address>,
    pub action: ActionKind,
    pub campaign_id: U256,
}

pub struct PositionRefresher {
    reader: Arc<BalanceAndAllowanceReader>,
    settle_delay: Duration,
    cancel: CancellationToken,
}

impl PositionRefresher {
    pub fn new(
        reader: Arc<BalanceAndAllowanceReader>,
        settle_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            reader,
            settle_delay,
            cancel,
        }
    }

    /// Refresh now, then schedule the delayed second pass.
    pub async fn on_success(&self, target: RefreshTarget) {
        refresh_pass(&self.reader, &target).await;

        let reader = self.reader.clone();
        let delay = self.settle_delay;
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Delayed refresh cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    refresh_pass(&reader, &target).await;
                }
            }
        });
    }
}

async fn refresh_pass(reader: &BalanceAndAllowanceReader, target: &RefreshTarget) {
    debug!(
        "Refreshing {} balance and {:?} position for {}",
        target.token.symbol, target.action, target.owner
    );

    if let Err(e) = reader
        .refresh_balance(target.chain_id, target.token, target.owner)
        .await
    {
        warn!("Balance refresh failed: {e}");
    }

    if let Some(spender) = target.spender {
        if let Err(e) = reader
            .refresh_allowance(target.chain_id, target.token, target.owner, spender)
            .await
        {
            warn!("Allowance refresh failed: {e}");
        }
    }

    let position = match target.action {
        ActionKind::Donate => Ok(()),
        ActionKind::Stake => reader
            .refresh_staking(target.owner, target.campaign_id)
            .await
            .map(drop),
        ActionKind::WealthBuild => reader
            .refresh_endowment(target.owner, target.campaign_id)
            .await
            .map(drop),
    };
    if let Err(e) = position {
        warn!("Position refresh failed: {e}");
    }
}
