//! # Chain registry
//!
//! Static catalog of the chains a donation can originate from.
//!
//! | Chain     | Id     | Route      | Endpoint |
//! |-----------|--------|------------|----------|
//! | Base      | 8453   | settlement | —        |
//! | Ethereum  | 1      | LayerZero  | 30101    |
//! | Arbitrum  | 42161  | LayerZero  | 30110    |
//! | Optimism  | 10     | LayerZero  | 30111    |
//! | Polygon   | 137    | LayerZero  | 30109    |
//! | Linea     | 59144  | LayerZero  | —        |
//! | Avalanche | 43114  | Wormhole   | —        |
//!
//! Exactly one entry is the settlement chain. Value donated from any other
//! chain is relayed to it by the listed bridge protocol.

use alloy_primitives::U256;
use serde::Serialize;

use crate::errors::{OrchestratorError, Result};

/// Cross-chain relay protocol used to reach the settlement chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeProtocol {
    /// The chain is the settlement chain itself.
    None,
    /// LayerZero messaging (executable when an endpoint id is configured).
    LayerZero,
    /// Wormhole messaging (selectable, not executable yet).
    Wormhole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chain {
    pub id: u64,
    pub name: &'static str,
    pub native_symbol: &'static str,
    pub bridge_protocol: BridgeProtocol,
    /// Protocol endpoint id of this chain, if the route is configured.
    pub endpoint_id: Option<u32>,
    /// Rough relay time, shown next to the chain picker.
    pub estimated_bridge_secs: u64,
    /// Protocol fee estimate in the chain's native smallest unit.
    pub estimated_bridge_fee: U256,
    pub is_settlement_chain: bool,
}

impl Chain {
    pub fn is_bridged(&self) -> bool {
        self.bridge_protocol != BridgeProtocol::None
    }
}

const fn wei(milli_ether: u64) -> U256 {
    // 1 milli-unit = 10^15 smallest units for 18-decimal natives.
    U256::from_limbs([milli_ether * 1_000_000_000_000_000, 0, 0, 0])
}

pub const SETTLEMENT_CHAIN_ID: u64 = 8453;

static CHAINS: [Chain; 7] = [
    Chain {
        id: SETTLEMENT_CHAIN_ID,
        name: "Base",
        native_symbol: "ETH",
        bridge_protocol: BridgeProtocol::None,
        endpoint_id: None,
        estimated_bridge_secs: 0,
        estimated_bridge_fee: U256::ZERO,
        is_settlement_chain: true,
    },
    Chain {
        id: 1,
        name: "Ethereum",
        native_symbol: "ETH",
        bridge_protocol: BridgeProtocol::LayerZero,
        endpoint_id: Some(30101),
        estimated_bridge_secs: 180,
        estimated_bridge_fee: wei(2),
        is_settlement_chain: false,
    },
    Chain {
        id: 42161,
        name: "Arbitrum",
        native_symbol: "ETH",
        bridge_protocol: BridgeProtocol::LayerZero,
        endpoint_id: Some(30110),
        estimated_bridge_secs: 60,
        estimated_bridge_fee: wei(1),
        is_settlement_chain: false,
    },
    Chain {
        id: 10,
        name: "Optimism",
        native_symbol: "ETH",
        bridge_protocol: BridgeProtocol::LayerZero,
        endpoint_id: Some(30111),
        estimated_bridge_secs: 60,
        estimated_bridge_fee: wei(1),
        is_settlement_chain: false,
    },
    Chain {
        id: 137,
        name: "Polygon",
        native_symbol: "POL",
        bridge_protocol: BridgeProtocol::LayerZero,
        endpoint_id: Some(30109),
        estimated_bridge_secs: 240,
        estimated_bridge_fee: wei(500),
        is_settlement_chain: false,
    },
    Chain {
        id: 59144,
        name: "Linea",
        native_symbol: "ETH",
        bridge_protocol: BridgeProtocol::LayerZero,
        endpoint_id: None,
        estimated_bridge_secs: 120,
        estimated_bridge_fee: wei(1),
        is_settlement_chain: false,
    },
    Chain {
        id: 43114,
        name: "Avalanche",
        native_symbol: "AVAX",
        bridge_protocol: BridgeProtocol::Wormhole,
        endpoint_id: None,
        estimated_bridge_secs: 900,
        estimated_bridge_fee: wei(20),
        is_settlement_chain: false,
    },
];

/// Every supported chain, settlement chain first.
pub fn all() -> &'static [Chain] {
    &CHAINS
}

pub fn find(id: u64) -> Option<&'static Chain> {
    CHAINS.iter().find(|c| c.id == id)
}

pub fn get(id: u64) -> Result<&'static Chain> {
    find(id).ok_or(OrchestratorError::UnknownChain(id))
}

pub fn settlement() -> &'static Chain {
    &CHAINS[0]
}
