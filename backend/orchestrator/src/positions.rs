//! Read-only projections of a donor's staking and endowment positions in a
//! campaign. Owned by the chain, refreshed after successful transactions.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPosition {
    pub principal: U256,
    pub earned: U256,
    pub claimable: U256,
    /// Share of yield routed to the cause, in basis points.
    pub cause_share: u16,
    /// Share of yield kept by the donor, in basis points.
    pub donor_share: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndowmentPosition {
    pub principal: U256,
    pub lifetime_yield: U256,
    pub pending_yield: U256,
    pub cause_share: u16,
    pub donor_share: u16,
}

impl StakingPosition {
    /// A zero-principal position is displayed as no position at all.
    pub fn exists(&self) -> bool {
        !self.principal.is_zero()
    }
}

impl EndowmentPosition {
    pub fn exists(&self) -> bool {
        !self.principal.is_zero()
    }
}
