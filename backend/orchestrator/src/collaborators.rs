//! Contracts of the external collaborators the orchestrator is driven by.
//!
//! None of these are implemented here beyond thin adapters: the wallet owns
//! account discovery, the chain reader owns on-chain reads, the executor
//! owns signing, submission and mining. They are injected as trait objects
//! so the state machine can be built and tested without any of them.

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::calls::CallRequest;
use crate::errors::Result;
use crate::positions::{EndowmentPosition, StakingPosition};
use crate::tokens::Token;

/// Account discovery.
pub trait Wallet: Send + Sync {
    fn current_account(&self) -> Option<Address>;
}

/// On-chain reads. Every call is a fresh fetch; nothing is cached here.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn read_balance(&self, chain_id: u64, token: &Token, owner: Address) -> Result<U256>;

    async fn read_allowance(
        &self,
        chain_id: u64,
        token: &Token,
        owner: Address,
        spender: Address,
    ) -> Result<U256>;

    async fn read_staking_position(
        &self,
        owner: Address,
        campaign_id: U256,
    ) -> Result<StakingPosition>;

    async fn read_endowment_position(
        &self,
        owner: Address,
        campaign_id: U256,
    ) -> Result<EndowmentPosition>;
}

/// Outcome of a mined (or dropped) transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub confirmed: bool,
}

/// Signing, submission and receipt tracking.
///
/// Once a receipt settles it never changes: asking again for the same hash
/// keeps returning the same outcome.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Submit a call from the connected account; resolves once the wallet
    /// has signed and the node accepted it.
    async fn submit_call(&self, chain_id: u64, call: &CallRequest) -> Result<TxHash>;

    /// Resolve once `hash` is mined or dropped.
    async fn wait_for_receipt(&self, chain_id: u64, hash: TxHash) -> Result<Receipt>;
}
