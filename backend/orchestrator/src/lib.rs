//! Donation transaction orchestrator.
//!
//! Turns a donor's intent (donate, wealth-build or stake, from any supported
//! chain and token) into approval and execution calls, tracks them to a
//! terminal state and keeps balances, allowances and positions in sync.

pub mod amount;
pub mod api;
pub mod bridge;
pub mod calls;
pub mod chains;
pub mod collaborators;
pub mod config;
pub mod errors;
pub mod intent;
pub mod onramp;
pub mod orchestrator;
pub mod positions;
pub mod reader;
pub mod refresher;
pub mod relayer;
pub mod rpc;
pub mod tokens;
pub mod wallet;
pub mod watcher;

#[cfg(test)]
mod test_idempotency;
#[cfg(test)]
mod test_orchestrator;
