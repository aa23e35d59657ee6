//! Donation orchestrator service: entry point.
//!
//! Starts a background watcher that keeps balances and allowances fresh and
//! resumes stalled executions, and exposes the orchestrator to the UI over
//! a small Axum REST API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use orchestrator::api::{self, ApiState};
use orchestrator::chains;
use orchestrator::config::Config;
use orchestrator::onramp::OnrampSession;
use orchestrator::orchestrator::Orchestrator;
use orchestrator::relayer::RelayerExecutor;
use orchestrator::rpc::JsonRpcClient;
use orchestrator::wallet::StaticWallet;
use orchestrator::watcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    if config.settings().rates.is_empty() {
        warn!("SETTLEMENT_RATES is empty; only the settlement currency will show an estimate");
    }
    if config.account.is_none() {
        warn!("ACCOUNT is not set; submissions will be refused until one is configured");
    }

    // HTTP client shared by the RPC reader and the relayer.
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

    let rpc = Arc::new(JsonRpcClient::new(
        client.clone(),
        config.rpc_urls.clone(),
        config.settlement_contract,
        chains::SETTLEMENT_CHAIN_ID,
    ));
    let executor = Arc::new(RelayerExecutor::new(
        client,
        &config.relayer_url,
        rpc.clone(),
        config.receipt_poll(),
        config.receipt_timeout(),
    ));
    let wallet = Arc::new(StaticWallet::new(config.account));

    let orchestrator = Arc::new(Orchestrator::new(config.settings(), wallet, rpc, executor));

    // ─── Background watcher ───────────────────────────────
    let cancel = CancellationToken::new();
    tokio::spawn(watcher::run(
        orchestrator.clone(),
        config.poll_interval(),
        cancel.clone(),
    ));

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(ApiState {
        orchestrator: orchestrator.clone(),
        onramp: OnrampSession::new(),
        onramp_poll: config.poll_interval(),
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/chains", get(api::list_chains))
        .route("/chains/:id/tokens", get(api::chain_tokens))
        .route("/state", get(api::get_state))
        .route("/intent", put(api::put_intent))
        .route("/submit", post(api::submit))
        .route("/onramp/watch", post(api::watch_onramp))
        .route("/onramp/cancel", post(api::cancel_onramp))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    cancel.cancel();
    orchestrator.shutdown();
    info!("Shut down");
    Ok(())
}
