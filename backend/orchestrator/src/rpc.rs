//! EVM JSON-RPC client, the chain-read collaborator.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns a soft error or a
//!   rate-limit response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried too,
//!   but only [`MAX_ATTEMPTS`] times: reads feed an interactive flow and a
//!   stale snapshot beats a stuck one.

use std::collections::HashMap;
use std::time::Duration;

use alloy_primitives::{keccak256, Address, TxHash, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::collaborators::{ChainReader, Receipt};
use crate::errors::{OrchestratorError, Result};
use crate::positions::{EndowmentPosition, StakingPosition};
use crate::tokens::Token;

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;
const MAX_ATTEMPTS: u32 = 5;

const BALANCE_OF: &str = "balanceOf(address)";
const ALLOWANCE: &str = "allowance(address,address)";
const STAKING_POSITION: &str = "stakingPosition(address,uint256)";
const ENDOWMENT_POSITION: &str = "endowmentPosition(address,uint256)";

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct RawReceipt {
    status: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────

pub struct JsonRpcClient {
    client: Client,
    urls: HashMap<u64, String>,
    /// Settlement-chain donation contract, which also serves position reads.
    settlement_contract: Address,
    settlement_chain_id: u64,
}

impl JsonRpcClient {
    pub fn new(
        client: Client,
        urls: HashMap<u64, String>,
        settlement_contract: Address,
        settlement_chain_id: u64,
    ) -> Self {
        Self {
            client,
            urls,
            settlement_contract,
            settlement_chain_id,
        }
    }

    fn url(&self, chain_id: u64) -> Result<&str> {
        self.urls
            .get(&chain_id)
            .map(String::as_str)
            .ok_or_else(|| OrchestratorError::Config(format!("No RPC URL for chain {chain_id}")))
    }

    /// Perform one JSON-RPC call, retrying transient failures.
    pub async fn request(&self, chain_id: u64, method: &str, params: Value) -> Result<Value> {
        let url = self.url(chain_id)?;
        let mut backoff = INITIAL_BACKOFF_SECS;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let response = self
                .client
                .post(url)
                .json(&json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": method,
                    "params": params,
                }))
                .send()
                .await;

            let retry_reason = match response {
                Err(e) if attempt < MAX_ATTEMPTS => format!("request failed: {e}"),
                Err(e) => return Err(e.into()),
                Ok(resp) if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    "rate-limited".to_string()
                }
                Ok(resp) => {
                    let body: RpcResponse = resp.json().await?;
                    match body.error {
                        None => {
                            debug!("{method} on chain {chain_id} succeeded");
                            return Ok(body.result.unwrap_or(Value::Null));
                        }
                        // Invalid request / unknown method will not get better.
                        Some(err) if err.code == -32600 || err.code == -32601 => {
                            return Err(OrchestratorError::Rpc(format!(
                                "RPC hard error {}: {}",
                                err.code, err.message
                            )));
                        }
                        // Reverted calls are answers, not outages.
                        Some(err) if err.code == 3 || err.message.contains("revert") => {
                            return Err(OrchestratorError::Rpc(format!(
                                "{method} reverted: {}",
                                err.message
                            )));
                        }
                        Some(err) => format!("soft error {} {}", err.code, err.message),
                    }
                }
            };

            if attempt >= MAX_ATTEMPTS {
                return Err(OrchestratorError::Rpc(format!(
                    "{method} on chain {chain_id} gave up after {attempt} attempts: {retry_reason}"
                )));
            }
            warn!("RPC {method} {retry_reason} (will retry in {backoff}s)");
            tokio::time::sleep(Duration::from_secs(backoff)).await;
            backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
        }
    }

    async fn eth_call(&self, chain_id: u64, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let result = self
            .request(
                chain_id,
                "eth_call",
                json!([{ "to": to, "data": format!("0x{}", hex::encode(data)) }, "latest"]),
            )
            .await?;
        let text = result
            .as_str()
            .ok_or_else(|| OrchestratorError::Rpc("eth_call returned no data".to_string()))?;
        hex::decode(text.trim_start_matches("0x"))
            .map_err(|e| OrchestratorError::Rpc(format!("eth_call returned bad hex: {e}")))
    }

    /// `None` while the transaction is not mined yet.
    pub async fn transaction_receipt(&self, chain_id: u64, hash: TxHash) -> Result<Option<Receipt>> {
        let result = self
            .request(chain_id, "eth_getTransactionReceipt", json!([hash]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let raw: RawReceipt = serde_json::from_value(result)?;
        Ok(Some(Receipt {
            confirmed: raw.status.as_deref().map(parse_quantity) == Some(Some(U256::from(1u8))),
        }))
    }
}

#[async_trait]
impl ChainReader for JsonRpcClient {
    async fn read_balance(&self, chain_id: u64, token: &Token, owner: Address) -> Result<U256> {
        match token.address {
            None => {
                let result = self
                    .request(chain_id, "eth_getBalance", json!([owner, "latest"]))
                    .await?;
                result.as_str().and_then(parse_quantity).ok_or_else(|| {
                    OrchestratorError::Rpc(format!("eth_getBalance returned {result}"))
                })
            }
            Some(contract) => {
                let data = encode_call(BALANCE_OF, &[owner.into_word().0]);
                let words = decode_words(&self.eth_call(chain_id, contract, data).await?);
                first_word(&words, BALANCE_OF)
            }
        }
    }

    async fn read_allowance(
        &self,
        chain_id: u64,
        token: &Token,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        let Some(contract) = token.address else {
            return Ok(U256::MAX);
        };
        let data = encode_call(ALLOWANCE, &[owner.into_word().0, spender.into_word().0]);
        let words = decode_words(&self.eth_call(chain_id, contract, data).await?);
        first_word(&words, ALLOWANCE)
    }

    async fn read_staking_position(
        &self,
        owner: Address,
        campaign_id: U256,
    ) -> Result<StakingPosition> {
        let words = self.position_words(STAKING_POSITION, owner, campaign_id).await?;
        Ok(StakingPosition {
            principal: words[0],
            earned: words[1],
            claimable: words[2],
            cause_share: words[3].saturating_to(),
            donor_share: words[4].saturating_to(),
        })
    }

    async fn read_endowment_position(
        &self,
        owner: Address,
        campaign_id: U256,
    ) -> Result<EndowmentPosition> {
        let words = self
            .position_words(ENDOWMENT_POSITION, owner, campaign_id)
            .await?;
        Ok(EndowmentPosition {
            principal: words[0],
            lifetime_yield: words[1],
            pending_yield: words[2],
            cause_share: words[3].saturating_to(),
            donor_share: words[4].saturating_to(),
        })
    }
}

impl JsonRpcClient {
    async fn position_words(
        &self,
        signature: &str,
        owner: Address,
        campaign_id: U256,
    ) -> Result<Vec<U256>> {
        let data = encode_call(signature, &[owner.into_word().0, campaign_id.to_be_bytes::<32>()]);
        let words = decode_words(
            &self
                .eth_call(self.settlement_chain_id, self.settlement_contract, data)
                .await?,
        );
        if words.len() < 5 {
            return Err(OrchestratorError::Rpc(format!(
                "{signature} returned {} words, expected 5",
                words.len()
            )));
        }
        Ok(words)
    }
}

// ─────────────────────────────────────────────────────────
// ABI helpers
// ─────────────────────────────────────────────────────────

fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Calldata for a function whose arguments are all static 32-byte words.
fn encode_call(signature: &str, args: &[[u8; 32]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32 * args.len());
    data.extend_from_slice(&selector(signature));
    for word in args {
        data.extend_from_slice(word);
    }
    data
}

fn decode_words(data: &[u8]) -> Vec<U256> {
    data.chunks_exact(32).map(U256::from_be_slice).collect()
}

fn first_word(words: &[U256], signature: &str) -> Result<U256> {
    words
        .first()
        .copied()
        .ok_or_else(|| OrchestratorError::Rpc(format!("{signature} returned no data")))
}

/// Parse a `0x`-prefixed hex quantity.
fn parse_quantity(raw: &str) -> Option<U256> {
    let digits = raw.strip_prefix("0x")?;
    if digits.is_empty() {
        return Some(U256::ZERO);
    }
    U256::from_str_radix(digits, 16).ok()
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
