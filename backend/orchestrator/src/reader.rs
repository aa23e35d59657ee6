//! Cached view over the chain-read collaborator.
//!
//! Balances, allowances and positions are eventually-consistent snapshots:
//! the accessors answer from the last successful read (zero / `None` when
//! nothing was read yet) and the `refresh_*` methods re-fetch and replace.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use dashmap::DashMap;
use tracing::debug;

use crate::collaborators::ChainReader;
use crate::errors::Result;
use crate::positions::{EndowmentPosition, StakingPosition};
use crate::tokens::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BalanceKey {
    chain_id: u64,
    /// `None` for the native asset.
    token: Option<Address>,
    owner: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AllowanceKey {
    balance: BalanceKey,
    spender: Address,
}

type PositionKey = (Address, U256);

pub struct BalanceAndAllowanceReader {
    chain: Arc<dyn ChainReader>,
    balances: DashMap<BalanceKey, U256>,
    allowances: DashMap<AllowanceKey, U256>,
    staking: DashMap<PositionKey, StakingPosition>,
    endowments: DashMap<PositionKey, EndowmentPosition>,
}

impl BalanceAndAllowanceReader {
    pub fn new(chain: Arc<dyn ChainReader>) -> Self {
        Self {
            chain,
            balances: DashMap::new(),
            allowances: DashMap::new(),
            staking: DashMap::new(),
            endowments: DashMap::new(),
        }
    }

    pub fn balance(&self, chain_id: u64, token: &Token, owner: Address) -> U256 {
        let key = BalanceKey {
            chain_id,
            token: token.address,
            owner,
        };
        self.balances.get(&key).map(|v| *v).unwrap_or(U256::ZERO)
    }

    /// Cached allowance; native assets never need one.
    pub fn allowance(&self, chain_id: u64, token: &Token, owner: Address, spender: Address) -> U256 {
        if token.is_native {
            return U256::MAX;
        }
        let key = AllowanceKey {
            balance: BalanceKey {
                chain_id,
                token: token.address,
                owner,
            },
            spender,
        };
        self.allowances.get(&key).map(|v| *v).unwrap_or(U256::ZERO)
    }

    /// Non-empty staking position, if one was read.
    pub fn staking_position(&self, owner: Address, campaign_id: U256) -> Option<StakingPosition> {
        self.staking
            .get(&(owner, campaign_id))
            .map(|p| *p)
            .filter(StakingPosition::exists)
    }

    pub fn endowment_position(&self, owner: Address, campaign_id: U256) -> Option<EndowmentPosition> {
        self.endowments
            .get(&(owner, campaign_id))
            .map(|p| *p)
            .filter(EndowmentPosition::exists)
    }

    pub async fn refresh_balance(&self, chain_id: u64, token: &Token, owner: Address) -> Result<U256> {
        let value = self.chain.read_balance(chain_id, token, owner).await?;
        debug!("Balance of {owner} in {} on chain {chain_id}: {value}", token.symbol);
        self.balances.insert(
            BalanceKey {
                chain_id,
                token: token.address,
                owner,
            },
            value,
        );
        Ok(value)
    }

    pub async fn refresh_allowance(
        &self,
        chain_id: u64,
        token: &Token,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        if token.is_native {
            return Ok(U256::MAX);
        }
        let value = self
            .chain
            .read_allowance(chain_id, token, owner, spender)
            .await?;
        debug!("Allowance of {spender} over {owner}'s {}: {value}", token.symbol);
        self.allowances.insert(
            AllowanceKey {
                balance: BalanceKey {
                    chain_id,
                    token: token.address,
                    owner,
                },
                spender,
            },
            value,
        );
        Ok(value)
    }

    pub async fn refresh_staking(&self, owner: Address, campaign_id: U256) -> Result<StakingPosition> {
        let position = self.chain.read_staking_position(owner, campaign_id).await?;
        self.staking.insert((owner, campaign_id), position);
        Ok(position)
    }

    pub async fn refresh_endowment(
        &self,
        owner: Address,
        campaign_id: U256,
    ) -> Result<EndowmentPosition> {
        let position = self.chain.read_endowment_position(owner, campaign_id).await?;
        self.endowments.insert((owner, campaign_id), position);
        Ok(position)
    }
}
