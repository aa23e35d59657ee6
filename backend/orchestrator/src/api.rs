//! Axum REST API handlers.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::TxHash;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::chains::{self, Chain};
use crate::errors::OrchestratorError;
use crate::intent::IntentUpdate;
use crate::onramp::OnrampSession;
use crate::orchestrator::{Orchestrator, SubmitOutcome};
use crate::tokens::{self, Token};

pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
    pub onramp: OnrampSession,
    pub onramp_poll: Duration,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ChainsResponse {
    pub count: usize,
    pub chains: &'static [Chain],
}

#[derive(Serialize)]
pub struct TokensResponse {
    pub chain_id: u64,
    pub count: usize,
    pub tokens: &'static [Token],
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub outcome: &'static str,
    pub tx_hash: Option<TxHash>,
}

#[derive(Serialize)]
pub struct OnrampResponse {
    pub watching: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(e: &OrchestratorError) -> Response {
    let status = match e {
        OrchestratorError::NotConnected => StatusCode::UNAUTHORIZED,
        OrchestratorError::UnknownChain(_) => StatusCode::NOT_FOUND,
        OrchestratorError::UnknownToken { .. } => StatusCode::BAD_REQUEST,
        OrchestratorError::InvalidAmount | OrchestratorError::UnsupportedBridgePath { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        OrchestratorError::Busy => StatusCode::CONFLICT,
        OrchestratorError::UserRejected => StatusCode::FORBIDDEN,
        OrchestratorError::SubmissionFailed(_)
        | OrchestratorError::ReceiptFailed { .. }
        | OrchestratorError::Http(_)
        | OrchestratorError::Rpc(_) => StatusCode::BAD_GATEWAY,
        OrchestratorError::Config(_) | OrchestratorError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if e.is_user_input() {
        debug!("Request refused: {e}");
    } else {
        warn!("Request failed: {e}");
    }
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /chains`
pub async fn list_chains() -> impl IntoResponse {
    let chains = chains::all();
    Json(ChainsResponse {
        count: chains.len(),
        chains,
    })
}

/// `GET /chains/:id/tokens`
pub async fn chain_tokens(Path(chain_id): Path<u64>) -> Response {
    if let Err(e) = chains::get(chain_id) {
        return error_response(&e);
    }
    let tokens = tokens::tokens_for(chain_id);
    Json(TokensResponse {
        chain_id,
        count: tokens.len(),
        tokens,
    })
    .into_response()
}

/// `GET /state`
///
/// Everything the UI renders: intent, status, bridge progress, approval
/// requirement, balance, estimates and positions.
pub async fn get_state(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(state.orchestrator.view().await)
}

/// `PUT /intent`
///
/// Partial update; changing action, token or chain resets the flow.
pub async fn put_intent(
    State(state): State<Arc<ApiState>>,
    Json(update): Json<IntentUpdate>,
) -> Response {
    match state.orchestrator.update_intent(update).await {
        Ok(_) => Json(state.orchestrator.view().await).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /submit`
///
/// Resolves once the execution call is mined or has failed. Progress is
/// visible meanwhile through `GET /state`.
pub async fn submit(State(state): State<Arc<ApiState>>) -> Response {
    match state.orchestrator.submit().await {
        Ok(SubmitOutcome::Confirmed(hash)) => Json(SubmitResponse {
            outcome: "confirmed",
            tx_hash: Some(hash),
        })
        .into_response(),
        Ok(SubmitOutcome::Superseded) => Json(SubmitResponse {
            outcome: "superseded",
            tx_hash: None,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /onramp/watch`
pub async fn watch_onramp(State(state): State<Arc<ApiState>>) -> Response {
    match state
        .onramp
        .start(state.orchestrator.clone(), state.onramp_poll)
        .await
    {
        Ok(()) => (StatusCode::ACCEPTED, Json(OnrampResponse { watching: true })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /onramp/cancel`
pub async fn cancel_onramp(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    state.onramp.cancel().await;
    Json(OnrampResponse { watching: false })
}
