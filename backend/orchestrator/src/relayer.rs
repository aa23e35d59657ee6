//! HTTP relayer: the execution collaborator.
//!
//! The relayer service holds the signer. We hand it a call description and
//! get a transaction hash back; mining is then observed through the chain's
//! own RPC so that the relayer never has to be trusted with outcomes.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calls::{CallDescription, CallRequest};
use crate::collaborators::{Executor, Receipt};
use crate::errors::{OrchestratorError, Result};
use crate::rpc::JsonRpcClient;

const USER_REJECTED: &str = "user_rejected";

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    chain_id: u64,
    to: Address,
    value: U256,
    call: &'a CallDescription,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    hash: TxHash,
}

#[derive(Debug, Default, Deserialize)]
struct RelayerErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct RelayerExecutor {
    client: Client,
    base_url: String,
    rpc: Arc<JsonRpcClient>,
    receipt_poll: Duration,
    receipt_timeout: Duration,
}

impl RelayerExecutor {
    pub fn new(
        client: Client,
        base_url: &str,
        rpc: Arc<JsonRpcClient>,
        receipt_poll: Duration,
        receipt_timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rpc,
            receipt_poll,
            receipt_timeout,
        }
    }
}

#[async_trait]
impl Executor for RelayerExecutor {
    async fn submit_call(&self, chain_id: u64, call: &CallRequest) -> Result<TxHash> {
        let url = format!("{}/calls", self.base_url);
        debug!("Relaying {} to {} on chain {chain_id}", call.call.signature(), call.to);

        let resp = self
            .client
            .post(&url)
            .json(&SubmitBody {
                chain_id,
                to: call.to,
                value: call.value,
                call: &call.call,
            })
            .send()
            .await
            .map_err(|e| OrchestratorError::SubmissionFailed(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            let body: SubmitResponse = resp
                .json()
                .await
                .map_err(|e| OrchestratorError::SubmissionFailed(e.to_string()))?;
            info!("Relayer accepted call; tx {}", body.hash);
            return Ok(body.hash);
        }

        let text = resp.text().await.unwrap_or_default();
        Err(classify_failure(status, &text))
    }

    async fn wait_for_receipt(&self, chain_id: u64, hash: TxHash) -> Result<Receipt> {
        let deadline = tokio::time::Instant::now() + self.receipt_timeout;
        loop {
            match self.rpc.transaction_receipt(chain_id, hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => {}
                Err(e) => warn!("Receipt lookup for {hash} failed: {e}"),
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(OrchestratorError::ReceiptFailed {
                    hash: hash.to_string(),
                });
            }
            tokio::time::sleep(self.receipt_poll).await;
        }
    }
}

fn classify_failure(status: StatusCode, body: &str) -> OrchestratorError {
    let parsed: RelayerErrorBody = serde_json::from_str(body).unwrap_or_default();
    if status.is_client_error() && parsed.code.as_deref() == Some(USER_REJECTED) {
        return OrchestratorError::UserRejected;
    }
    let detail = parsed
        .message
        .or(parsed.code)
        .unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        OrchestratorError::SubmissionFailed(format!("relayer returned {status}"))
    } else {
        OrchestratorError::SubmissionFailed(format!("relayer returned {status}: {detail}"))
    }
}
