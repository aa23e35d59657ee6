//! The user's unsubmitted request.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::amount;
use crate::chains::{self, Chain};
use crate::tokens::{self, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Donate,
    WealthBuild,
    Stake,
}

impl ActionKind {
    /// Code understood by the bridge contract's cross-chain entry point.
    pub fn code(self) -> u8 {
        match self {
            Self::Donate => 0,
            Self::WealthBuild => 1,
            Self::Stake => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingIntent {
    pub action: ActionKind,
    pub token: &'static Token,
    pub source_chain: &'static Chain,
    pub raw_amount_text: String,
    /// `raw_amount_text` in the token's smallest unit; zero when unparsable.
    pub parsed_amount: U256,
}

impl PendingIntent {
    pub fn new(action: ActionKind, source_chain: &'static Chain, token: &'static Token) -> Self {
        Self {
            action,
            token,
            source_chain,
            raw_amount_text: String::new(),
            parsed_amount: U256::ZERO,
        }
    }

    /// Donate the settlement currency on the settlement chain.
    pub fn settlement_default() -> Self {
        let chain = chains::settlement();
        let token = tokens::settlement_currency(chain.id)
            .unwrap_or(&tokens::tokens_for(chain.id)[0]);
        Self::new(ActionKind::Donate, chain, token)
    }

    pub fn set_amount_text(&mut self, text: &str) {
        self.raw_amount_text = text.to_string();
        self.parsed_amount = amount::to_smallest_units(text, self.token.decimals);
    }

    pub fn clear_amount(&mut self) {
        self.raw_amount_text.clear();
        self.parsed_amount = U256::ZERO;
    }

    pub fn is_bridged(&self) -> bool {
        self.source_chain.is_bridged()
    }
}

/// Partial edit of an intent; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentUpdate {
    pub action: Option<ActionKind>,
    pub chain_id: Option<u64>,
    pub token: Option<String>,
    pub amount: Option<String>,
}
