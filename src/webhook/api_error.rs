// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP-level errors returned before a request reaches the solver.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors answered at the HTTP layer, before a solver is involved.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("unknown API group '{0}'")]
    UnknownGroup(String),

    #[error("unknown solver '{0}'")]
    UnknownSolver(String),

    #[error("invalid ChallengePayload: {0}")]
    InvalidPayload(String),

    #[error("failed to encode metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnknownGroup(_) | Self::UnknownSolver(_) => StatusCode::NOT_FOUND,
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
