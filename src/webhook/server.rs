// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Router construction and server lifecycle.

use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::solver::ChallengeSolver;
use crate::webhook::routes;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    /// API group the webhook answers for
    pub group_name: Arc<str>,
    /// Solver that handles Present / `CleanUp`
    pub solver: Arc<dyn ChallengeSolver>,
}

impl AppState {
    /// State answering for `group_name` and dispatching to `solver`.
    #[must_use]
    pub fn new(group_name: &str, solver: Arc<dyn ChallengeSolver>) -> Self {
        Self {
            group_name: Arc::from(group_name),
            solver,
        }
    }
}

/// Build the webhook router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::health_check))
        .route("/metrics", get(routes::metrics))
        .route("/apis/{group}/v1alpha1", get(routes::discovery))
        .route("/apis/{group}/v1alpha1/{resource}", post(routes::solve))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the webhook on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns the underlying I/O error if the server fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, group = %state.group_name, solver = state.solver.name(), "Webhook listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod server_tests;
