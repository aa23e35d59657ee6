//! Amount conversion between user-entered decimal text and on-chain integers.
//!
//! Conversion runs on every keystroke, so parsing never fails loudly:
//! anything that is not a well-formed, representable amount becomes zero.

use std::collections::HashMap;

use alloy_primitives::U256;
use serde::Serialize;

use crate::tokens::Token;

/// Decimals of the settlement currency (USDC).
pub const SETTLEMENT_DECIMALS: u8 = 6;

const BPS_DENOMINATOR: u64 = 10_000;

/// Parse `text` as a decimal amount of a token with `decimals` places.
///
/// Returns zero for empty, non-numeric, over-precise or overflowing input.
pub fn to_smallest_units(text: &str, decimals: u8) -> U256 {
    parse_units(text.trim(), decimals).unwrap_or(U256::ZERO)
}

fn parse_units(text: &str, decimals: u8) -> Option<U256> {
    if text.is_empty() {
        return None;
    }
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > decimals as usize {
        return None;
    }
    let ten = U256::from(10u8);
    let mut value = U256::ZERO;
    for ch in whole.chars().chain(fraction.chars()) {
        let digit = ch.to_digit(10)?;
        value = value.checked_mul(ten)?.checked_add(U256::from(digit))?;
    }
    let padding = decimals as usize - fraction.len();
    value.checked_mul(ten.checked_pow(U256::from(padding))?)
}

/// Render an integer amount as a trimmed decimal string, e.g. `1.5`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Settlement-currency value of one whole unit of each token, keyed by
/// upper-case symbol and expressed in settlement smallest units.
#[derive(Debug, Clone, Default)]
pub struct SettlementRates {
    rates: HashMap<String, U256>,
}

impl SettlementRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rate given as decimal text, e.g. `("ETH", "3150.25")`.
    pub fn with_rate(mut self, symbol: &str, per_unit: &str) -> Self {
        self.rates.insert(
            symbol.to_ascii_uppercase(),
            to_smallest_units(per_unit, SETTLEMENT_DECIMALS),
        );
        self
    }

    pub fn rate(&self, symbol: &str) -> Option<U256> {
        self.rates.get(&symbol.to_ascii_uppercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Advisory settlement-currency equivalent of `amount` of `token`.
///
/// Display only: the amount sent on chain is always the original-token
/// integer. Tokens without a configured rate estimate to zero.
pub fn estimate_settlement_value(token: &Token, amount: U256, rates: &SettlementRates) -> U256 {
    if token.is_settlement_currency {
        return amount;
    }
    let Some(rate) = rates.rate(token.symbol) else {
        return U256::ZERO;
    };
    let scale = U256::from(10u8).pow(U256::from(token.decimals));
    amount
        .checked_mul(rate)
        .map(|v| v / scale)
        .unwrap_or(U256::ZERO)
}

/// How a wealth-build amount divides between the cause, the yield-bearing
/// principal and the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WealthBuildSplit {
    pub cause: U256,
    pub principal: U256,
    pub platform_fee: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub cause_bps: u16,
    pub platform_fee_bps: u16,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            cause_bps: 7_800,
            platform_fee_bps: 200,
        }
    }
}

impl FeeSchedule {
    /// Preview the split; the principal absorbs rounding dust.
    pub fn split(&self, amount: U256) -> WealthBuildSplit {
        let cause = bps_share(amount, self.cause_bps);
        let platform_fee = bps_share(amount, self.platform_fee_bps);
        WealthBuildSplit {
            cause,
            principal: amount.saturating_sub(cause).saturating_sub(platform_fee),
            platform_fee,
        }
    }

    pub fn is_valid(&self) -> bool {
        u64::from(self.cause_bps) + u64::from(self.platform_fee_bps) <= BPS_DENOMINATOR
    }
}

/// `floor(amount * bps / 10_000)` without the intermediate product, so
/// amounts near `U256::MAX` cannot wrap.
fn bps_share(amount: U256, bps: u16) -> U256 {
    let denom = U256::from(BPS_DENOMINATOR);
    let bps = U256::from(bps);
    let whole = (amount / denom).saturating_mul(bps);
    let rest = (amount % denom) * bps / denom;
    whole.saturating_add(rest)
}
