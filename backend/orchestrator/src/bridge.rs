//! Bridge status, observable separately from the orchestrator status so the
//! UI can word a cross-chain relay differently from a settlement-chain
//! confirmation.
//!
//! The tracker never transitions on its own; only the orchestrator sets it.

use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeStatus {
    Idle,
    Bridging,
    /// Reserved for relays that report destination-chain confirmation.
    Confirming,
    /// Reserved for relays that report a destination-chain swap.
    Swapping,
    Complete,
    Failed,
}

impl BridgeStatus {
    /// User-facing progress line.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Bridging => "Bridging funds to the settlement chain…",
            Self::Confirming => "Confirming on the settlement chain…",
            Self::Swapping => "Converting to the settlement currency…",
            Self::Complete => "Bridge complete",
            Self::Failed => "Bridge failed",
        }
    }

    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Bridging | Self::Confirming | Self::Swapping)
    }
}

pub struct BridgeStatusTracker {
    tx: watch::Sender<BridgeStatus>,
}

impl Default for BridgeStatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeStatusTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(BridgeStatus::Idle);
        Self { tx }
    }

    pub fn status(&self) -> BridgeStatus {
        *self.tx.borrow()
    }

    /// Returns `true` when the status actually changed.
    pub(crate) fn set(&self, status: BridgeStatus) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        })
    }
}
