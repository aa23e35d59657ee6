//! # Call shapes
//!
//! The closed set of calls the orchestrator can ask the executor to make,
//! and the decision table that picks one for an intent.
//!
//! | Source chain          | Action       | Token shape          | Call                    |
//! |-----------------------|--------------|----------------------|-------------------------|
//! | bridged, LayerZero    | any          | any                  | `CrossChainAction`      |
//! | bridged, Wormhole     | any          | any                  | unsupported             |
//! | settlement            | Donate       | native               | `DonateNative`          |
//! | settlement            | Donate       | ERC-20               | `DonateErc20`           |
//! | settlement            | WealthBuild  | native               | `WealthBuildNative`     |
//! | settlement            | WealthBuild  | settlement currency  | `WealthBuildSettlement` |
//! | settlement            | WealthBuild  | other ERC-20         | `WealthBuildErc20`      |
//! | settlement            | Stake        | native               | `StakeNative`           |
//! | settlement            | Stake        | ERC-20               | `StakeErc20`            |
//!
//! Rows are evaluated top to bottom. There is no shared fallback: every row
//! is a fixed entry point on either the bridge or the settlement contract.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::chains::{BridgeProtocol, Chain};
use crate::errors::{OrchestratorError, Result};
use crate::intent::{ActionKind, PendingIntent};
use crate::tokens::Token;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "function", rename_all = "snake_case")]
pub enum CallDescription {
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    DonateNative {
        campaign_id: U256,
    },
    DonateErc20 {
        campaign_id: U256,
        token: Address,
        amount: U256,
    },
    WealthBuildNative {
        campaign_id: U256,
    },
    WealthBuildSettlement {
        campaign_id: U256,
        amount: U256,
    },
    WealthBuildErc20 {
        campaign_id: U256,
        token: Address,
        amount: U256,
    },
    StakeNative {
        campaign_id: U256,
    },
    StakeErc20 {
        campaign_id: U256,
        token: Address,
        amount: U256,
    },
    CrossChainAction {
        endpoint_id: u32,
        campaign_id: U256,
        action_code: u8,
        /// `None` when the native asset is being sent.
        token: Option<Address>,
        amount: U256,
    },
}

impl CallDescription {
    /// Solidity signature of the entry point, for logs and relayers.
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve(address,uint256)",
            Self::DonateNative { .. } => "donateETH(uint256)",
            Self::DonateErc20 { .. } => "donate(uint256,address,uint256)",
            Self::WealthBuildNative { .. } => "wealthBuildETH(uint256)",
            Self::WealthBuildSettlement { .. } => "wealthBuild(uint256,uint256)",
            Self::WealthBuildErc20 { .. } => "wealthBuildWithToken(uint256,address,uint256)",
            Self::StakeNative { .. } => "stakeETH(uint256)",
            Self::StakeErc20 { .. } => "stake(uint256,address,uint256)",
            Self::CrossChainAction { token: None, .. } => {
                "crossChainActionETH(uint32,uint256,uint8,uint256)"
            }
            Self::CrossChainAction { token: Some(_), .. } => {
                "crossChainAction(uint32,uint256,uint8,address,uint256)"
            }
        }
    }
}

/// A call plus where it goes and what native value it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRequest {
    pub to: Address,
    pub value: U256,
    pub call: CallDescription,
}

/// Deployed contract addresses the calls target.
#[derive(Debug, Clone, Default)]
pub struct Contracts {
    /// Donation contract on the settlement chain.
    pub settlement: Address,
    /// Bridge contract per bridged source chain.
    pub bridges: HashMap<u64, Address>,
}

impl Contracts {
    /// Who must be allowed to pull ERC-20s for an intent on `chain`.
    pub fn spender_for(&self, chain: &Chain) -> Option<Address> {
        if chain.is_bridged() {
            self.bridges.get(&chain.id).copied()
        } else {
            Some(self.settlement)
        }
    }
}

/// The execution call selected for an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub request: CallRequest,
    pub bridged: bool,
}

/// One-time max approval of `spender` over `token`.
pub fn approve_request(token: &Token, spender: Address) -> Option<CallRequest> {
    let address = token.address?;
    Some(CallRequest {
        to: address,
        value: U256::ZERO,
        call: CallDescription::Approve {
            token: address,
            spender,
            amount: U256::MAX,
        },
    })
}

/// Pick the execution call for `intent` from the decision table.
pub fn plan_execution(
    intent: &PendingIntent,
    campaign_id: U256,
    contracts: &Contracts,
) -> Result<ExecutionPlan> {
    if intent.is_bridged() {
        return plan_bridged(intent, campaign_id, contracts).map(|request| ExecutionPlan {
            request,
            bridged: true,
        });
    }
    Ok(ExecutionPlan {
        request: plan_settlement(intent, campaign_id, contracts.settlement)?,
        bridged: false,
    })
}

fn plan_bridged(
    intent: &PendingIntent,
    campaign_id: U256,
    contracts: &Contracts,
) -> Result<CallRequest> {
    let chain = intent.source_chain;
    let unsupported = || OrchestratorError::UnsupportedBridgePath {
        chain: chain.name.to_string(),
    };
    match (chain.bridge_protocol, chain.endpoint_id) {
        (BridgeProtocol::LayerZero, Some(endpoint_id)) => {
            let bridge = contracts.bridges.get(&chain.id).copied().ok_or_else(unsupported)?;
            let token = intent.token;
            let value = if token.is_native {
                intent
                    .parsed_amount
                    .checked_add(chain.estimated_bridge_fee)
                    .ok_or(OrchestratorError::InvalidAmount)?
            } else {
                chain.estimated_bridge_fee
            };
            Ok(CallRequest {
                to: bridge,
                value,
                call: CallDescription::CrossChainAction {
                    endpoint_id,
                    campaign_id,
                    action_code: intent.action.code(),
                    token: token.address,
                    amount: intent.parsed_amount,
                },
            })
        }
        _ => Err(unsupported()),
    }
}

fn plan_settlement(
    intent: &PendingIntent,
    campaign_id: U256,
    settlement: Address,
) -> Result<CallRequest> {
    let token = intent.token;
    let amount = intent.parsed_amount;
    let erc20 = || {
        token.address.ok_or_else(|| OrchestratorError::UnknownToken {
            symbol: token.symbol.to_string(),
            chain_id: intent.source_chain.id,
        })
    };

    let (value, call) = match (intent.action, token.is_native, token.is_settlement_currency) {
        (ActionKind::Donate, true, _) => (amount, CallDescription::DonateNative { campaign_id }),
        (ActionKind::Donate, false, _) => (
            U256::ZERO,
            CallDescription::DonateErc20 {
                campaign_id,
                token: erc20()?,
                amount,
            },
        ),
        (ActionKind::WealthBuild, true, _) => {
            (amount, CallDescription::WealthBuildNative { campaign_id })
        }
        (ActionKind::WealthBuild, false, true) => (
            U256::ZERO,
            CallDescription::WealthBuildSettlement {
                campaign_id,
                amount,
            },
        ),
        (ActionKind::WealthBuild, false, false) => (
            U256::ZERO,
            CallDescription::WealthBuildErc20 {
                campaign_id,
                token: erc20()?,
                amount,
            },
        ),
        (ActionKind::Stake, true, _) => (amount, CallDescription::StakeNative { campaign_id }),
        (ActionKind::Stake, false, _) => (
            U256::ZERO,
            CallDescription::StakeErc20 {
                campaign_id,
                token: erc20()?,
                amount,
            },
        ),
    };

    Ok(CallRequest {
        to: settlement,
        value,
        call,
    })
}
