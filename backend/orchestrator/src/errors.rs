//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// No connected account identity is available.
    #[error("No wallet account connected")]
    NotConnected,

    /// The selected source chain has no executable bridge route.
    #[error("Bridging from {chain} is not available yet")]
    UnsupportedBridgePath { chain: String },

    #[error("Transaction was rejected in the wallet")]
    UserRejected,

    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Transaction {hash} was not mined successfully")]
    ReceiptFailed { hash: String },

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// A previous intent is still approving or pending.
    #[error("Another transaction is already in progress")]
    Busy,

    #[error("Unknown chain: {0}")]
    UnknownChain(u64),

    #[error("Unknown token {symbol} on chain {chain_id}")]
    UnknownToken { symbol: String, chain_id: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error: {0}")]
    Rpc(String),
}

impl OrchestratorError {
    /// Errors the user is expected to resolve before trying again, as
    /// opposed to failures of an attempted transaction.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::InvalidAmount
                | Self::Busy
                | Self::UnknownChain(_)
                | Self::UnknownToken { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
