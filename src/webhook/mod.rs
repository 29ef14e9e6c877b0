// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP surface speaking cert-manager's webhook solver protocol.
//!
//! # Endpoints
//!
//! ## `/apis/{group}/v1alpha1/{solver}` (POST)
//!
//!   Accepts a `ChallengePayload` and dispatches `request.action` to the solver.
//!   Solver failures are reported inside the payload (`success: false`) with HTTP 200;
//!   an unknown group or solver name is a 404 and an unparseable body a 400.
//!
//! ## `/apis/{group}/v1alpha1` (GET)
//!
//!   `APIResourceList` discovery document naming the solver resource.
//!
//! ## `/healthz` (GET)
//!
//!   Returns `{"status":"ok"}`.
//!
//! ## `/metrics` (GET)
//!
//!   Prometheus text exposition.

mod api_error;
mod routes;
pub mod server;

pub use server::{router, serve, AppState};
