//! Long-running background task that keeps the read snapshot fresh and
//! resumes executions whose post-approval continuation was lost.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::orchestrator::{Orchestrator, SubmitOutcome};

/// Run the poll loop until `cancel` fires.
pub async fn run(orchestrator: Arc<Orchestrator>, interval: Duration, cancel: CancellationToken) {
    info!("Watcher starting, polling every {}s", interval.as_secs());

    loop {
        poll_once(&orchestrator).await;

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Watcher stopped");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

async fn poll_once(orchestrator: &Orchestrator) {
    orchestrator.refresh_reads().await;

    match orchestrator.tick().await {
        Ok(Some(SubmitOutcome::Confirmed(hash))) => info!("Recovered execution confirmed: {hash}"),
        Ok(_) => {}
        Err(e) => error!("Recovered execution failed: {e}"),
    }
}
