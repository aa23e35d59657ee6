//! Token registry: supported tokens per chain.
//!
//! Each chain lists its native asset first, then the settlement currency
//! (USDC), then any other ERC-20s accepted for donations.

use alloy_primitives::{address, Address};
use serde::Serialize;

use crate::chains::SETTLEMENT_CHAIN_ID;
use crate::errors::{OrchestratorError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub symbol: &'static str,
    /// Contract address; `None` for the chain's native asset.
    pub address: Option<Address>,
    pub decimals: u8,
    pub is_native: bool,
    pub is_settlement_currency: bool,
}

const fn native(symbol: &'static str) -> Token {
    Token {
        symbol,
        address: None,
        decimals: 18,
        is_native: true,
        is_settlement_currency: false,
    }
}

const fn usdc(addr: Address) -> Token {
    Token {
        symbol: "USDC",
        address: Some(addr),
        decimals: 6,
        is_native: false,
        is_settlement_currency: true,
    }
}

const fn erc20(symbol: &'static str, addr: Address, decimals: u8) -> Token {
    Token {
        symbol,
        address: Some(addr),
        decimals,
        is_native: false,
        is_settlement_currency: false,
    }
}

static BASE: [Token; 4] = [
    native("ETH"),
    usdc(address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913")),
    erc20("WETH", address!("4200000000000000000000000000000000000006"), 18),
    erc20("DAI", address!("50c5725949a6f0c72e6c4a641f24049a917db0cb"), 18),
];

static ETHEREUM: [Token; 3] = [
    native("ETH"),
    usdc(address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")),
    erc20("DAI", address!("6b175474e89094c44da98b954eedeac495271d0f"), 18),
];

static ARBITRUM: [Token; 2] = [
    native("ETH"),
    usdc(address!("af88d065e77c8cc2239327c5edb3a432268e5831")),
];

static OPTIMISM: [Token; 2] = [
    native("ETH"),
    usdc(address!("0b2c639c533813f4aa9d7837caf62653d097ff85")),
];

static POLYGON: [Token; 2] = [
    native("POL"),
    usdc(address!("3c499c542cef5e3811e1192ce70d8cc03d5c3359")),
];

static LINEA: [Token; 2] = [
    native("ETH"),
    usdc(address!("176211869ca2b568f2a7d4ee941e073a821ee1ff")),
];

static AVALANCHE: [Token; 2] = [
    native("AVAX"),
    usdc(address!("b97ef9ef8734c71904d8002f8b6bc66dd9c48a6e")),
];

/// Tokens accepted on `chain_id`; empty for unknown chains.
pub fn tokens_for(chain_id: u64) -> &'static [Token] {
    match chain_id {
        SETTLEMENT_CHAIN_ID => &BASE,
        1 => &ETHEREUM,
        42161 => &ARBITRUM,
        10 => &OPTIMISM,
        137 => &POLYGON,
        59144 => &LINEA,
        43114 => &AVALANCHE,
        _ => &[],
    }
}

pub fn find(chain_id: u64, symbol: &str) -> Option<&'static Token> {
    tokens_for(chain_id)
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}

pub fn get(chain_id: u64, symbol: &str) -> Result<&'static Token> {
    find(chain_id, symbol).ok_or_else(|| OrchestratorError::UnknownToken {
        symbol: symbol.to_string(),
        chain_id,
    })
}

/// The settlement currency as listed on `chain_id`.
pub fn settlement_currency(chain_id: u64) -> Option<&'static Token> {
    tokens_for(chain_id)
        .iter()
        .find(|t| t.is_settlement_currency)
}

/// The token a freshly selected chain starts with: the same symbol when the
/// chain lists it, otherwise the chain's settlement currency.
pub fn carry_over(chain_id: u64, symbol: &str) -> Option<&'static Token> {
    find(chain_id, symbol)
        .or_else(|| settlement_currency(chain_id))
        .or_else(|| tokens_for(chain_id).first())
}
