// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Route handlers for the webhook API.
//!
//! Solver outcomes are folded into the response payload; only routing and
//! decoding problems surface as HTTP errors.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::challenge::{ChallengeAction, ChallengePayload, ChallengeRequest, ChallengeResponse};
use crate::constants::{CHALLENGE_API_VERSION, CHALLENGE_PAYLOAD_KIND, WEBHOOK_API_VERSION};
use crate::metrics;
use crate::solver::ChallengeSolver;
use crate::webhook::api_error::ApiError;
use crate::webhook::server::AppState;

#[allow(clippy::unused_async)]
pub(super) async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub(super) async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let text = metrics::gather_metrics()?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], text))
}

pub(super) async fn discovery(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<Value>, ApiError> {
    ensure_group(&state, &group)?;
    let solver = state.solver.name();
    Ok(Json(json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": format!("{group}/{WEBHOOK_API_VERSION}"),
        "resources": [{
            "name": solver,
            "singularName": solver,
            "namespaced": false,
            "kind": CHALLENGE_PAYLOAD_KIND,
            "verbs": ["create"],
        }],
    })))
}

pub(super) async fn solve(
    State(state): State<AppState>,
    Path((group, resource)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<ChallengePayload>, ApiError> {
    ensure_group(&state, &group)?;
    if resource != state.solver.name() {
        return Err(ApiError::UnknownSolver(resource));
    }

    let payload: ChallengePayload =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
    if payload.api_version != CHALLENGE_API_VERSION {
        debug!(api_version = %payload.api_version, "Unexpected ChallengePayload apiVersion");
    }
    let request = payload
        .request
        .ok_or_else(|| ApiError::InvalidPayload("missing request".to_string()))?;

    let response = dispatch(state.solver.as_ref(), &request).await;
    Ok(Json(ChallengePayload::with_response(response)))
}

/// Run the requested action and fold its outcome into a response.
pub(super) async fn dispatch(
    solver: &dyn ChallengeSolver,
    request: &ChallengeRequest,
) -> ChallengeResponse {
    info!(
        uid = %request.uid,
        action = ?request.action,
        fqdn = %request.resolved_fqdn,
        namespace = %request.resource_namespace,
        "Received challenge request"
    );

    let result = match request.action {
        ChallengeAction::Present => solver.present(request).await,
        ChallengeAction::CleanUp => solver.cleanup(request).await,
        ChallengeAction::Unknown => {
            return ChallengeResponse::failure(
                &request.uid,
                "UnsupportedAction",
                "unsupported challenge action, expected Present or CleanUp".to_string(),
            );
        }
    };

    match result {
        Ok(()) => ChallengeResponse::success(&request.uid),
        Err(e) => ChallengeResponse::from_error(&request.uid, &e),
    }
}

fn ensure_group(state: &AppState, group: &str) -> Result<(), ApiError> {
    if group == &*state.group_name {
        Ok(())
    } else {
        Err(ApiError::UnknownGroup(group.to_string()))
    }
}
