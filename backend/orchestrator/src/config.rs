//! Application configuration loaded from environment variables.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, U256};

use crate::amount::{self, FeeSchedule, SettlementRates};
use crate::calls::Contracts;
use crate::chains;
use crate::errors::{OrchestratorError, Result};
use crate::orchestrator::OrchestratorSettings;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint per chain id (`RPC_URLS=8453=https://...,1=https://...`)
    pub rpc_urls: HashMap<u64, String>,
    /// Base URL of the signing relayer
    pub relayer_url: String,
    /// Account the relayer signs for; unset means no wallet is connected
    pub account: Option<Address>,
    /// Campaign every action is directed at
    pub campaign_id: U256,
    /// Donation contract on the settlement chain
    pub settlement_contract: Address,
    /// Bridge contract per bridged source chain
    pub bridge_contracts: HashMap<u64, Address>,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to refresh reads and run the recovery tick
    pub poll_interval_secs: u64,
    /// Delay (in seconds) before the second post-success refresh pass
    pub refresh_settle_secs: u64,
    /// Receipt polling interval in milliseconds
    pub receipt_poll_ms: u64,
    /// Give up on an unmined transaction after this many seconds
    pub receipt_timeout_secs: u64,
    /// Settlement value per whole token, as decimal text
    pub settlement_rates: Vec<(String, String)>,
    pub wealth_build_cause_bps: u16,
    pub platform_fee_bps: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_var = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| OrchestratorError::Config(format!("Missing env var: {key}")))
        };
        let or_default = |key: &str, default: &str| env_var(key).unwrap_or_else(|_| default.to_string());

        let rpc_urls = pairs("RPC_URLS", &env_var("RPC_URLS")?)?
            .into_iter()
            .map(|(k, v)| Ok((parse_chain_id("RPC_URLS", k)?, v.to_string())))
            .collect::<Result<HashMap<_, _>>>()?;

        let bridge_contracts = pairs("BRIDGE_CONTRACTS", &or_default("BRIDGE_CONTRACTS", ""))?
            .into_iter()
            .map(|(k, v)| {
                Ok((
                    parse_chain_id("BRIDGE_CONTRACTS", k)?,
                    parse("BRIDGE_CONTRACTS", v)?,
                ))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        let settlement_rates = pairs("SETTLEMENT_RATES", &or_default("SETTLEMENT_RATES", ""))?
            .into_iter()
            .map(|(symbol, rate)| {
                if amount::to_smallest_units(rate, amount::SETTLEMENT_DECIMALS).is_zero() {
                    return Err(OrchestratorError::Config(format!(
                        "Invalid SETTLEMENT_RATES entry: {symbol}={rate}"
                    )));
                }
                Ok((symbol.to_string(), rate.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let config = Config {
            rpc_urls,
            relayer_url: env_var("RELAYER_URL")?,
            account: env_var("ACCOUNT")
                .ok()
                .map(|v| parse("ACCOUNT", &v))
                .transpose()?,
            campaign_id: parse("CAMPAIGN_ID", &or_default("CAMPAIGN_ID", "0"))?,
            settlement_contract: parse("SETTLEMENT_CONTRACT", &env_var("SETTLEMENT_CONTRACT")?)?,
            bridge_contracts,
            api_port: parse("API_PORT", &or_default("API_PORT", "3002"))?,
            poll_interval_secs: parse("POLL_INTERVAL_SECS", &or_default("POLL_INTERVAL_SECS", "5"))?,
            refresh_settle_secs: parse(
                "REFRESH_SETTLE_SECS",
                &or_default("REFRESH_SETTLE_SECS", "4"),
            )?,
            receipt_poll_ms: parse("RECEIPT_POLL_MS", &or_default("RECEIPT_POLL_MS", "1500"))?,
            receipt_timeout_secs: parse(
                "RECEIPT_TIMEOUT_SECS",
                &or_default("RECEIPT_TIMEOUT_SECS", "600"),
            )?,
            settlement_rates,
            wealth_build_cause_bps: parse(
                "WEALTH_BUILD_CAUSE_BPS",
                &or_default("WEALTH_BUILD_CAUSE_BPS", "7800"),
            )?,
            platform_fee_bps: parse("PLATFORM_FEE_BPS", &or_default("PLATFORM_FEE_BPS", "200"))?,
        };

        if !config.fees().is_valid() {
            return Err(OrchestratorError::Config(
                "WEALTH_BUILD_CAUSE_BPS + PLATFORM_FEE_BPS exceeds 10000".to_string(),
            ));
        }
        if !config.rpc_urls.contains_key(&chains::SETTLEMENT_CHAIN_ID) {
            return Err(OrchestratorError::Config(format!(
                "RPC_URLS has no entry for the settlement chain {}",
                chains::SETTLEMENT_CHAIN_ID
            )));
        }
        Ok(config)
    }

    pub fn fees(&self) -> FeeSchedule {
        FeeSchedule {
            cause_bps: self.wealth_build_cause_bps,
            platform_fee_bps: self.platform_fee_bps,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn receipt_poll(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_ms)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn settings(&self) -> OrchestratorSettings {
        let rates = self
            .settlement_rates
            .iter()
            .fold(SettlementRates::new(), |rates, (symbol, rate)| {
                rates.with_rate(symbol, rate)
            });
        OrchestratorSettings {
            campaign_id: self.campaign_id,
            contracts: Contracts {
                settlement: self.settlement_contract,
                bridges: self.bridge_contracts.clone(),
            },
            rates,
            fees: self.fees(),
            settle_delay: Duration::from_secs(self.refresh_settle_secs),
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| OrchestratorError::Config(format!("Invalid {key}: {raw}")))
}

fn parse_chain_id(key: &str, raw: &str) -> Result<u64> {
    let id: u64 = parse(key, raw)?;
    chains::get(id).map_err(|_| OrchestratorError::Config(format!("{key}: unsupported chain {id}")))?;
    Ok(id)
}

/// Split a `key=value,key=value` list. Empty input yields no pairs.
fn pairs<'a>(key: &str, raw: &'a str) -> Result<Vec<(&'a str, &'a str)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .ok_or_else(|| OrchestratorError::Config(format!("Invalid {key} entry: {entry}")))
        })
        .collect()
}
