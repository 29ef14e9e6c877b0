// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the dns.services webhook.
//!
//! This module provides metrics collection with the namespace prefix
//! `dns_services_webhook_`.
//!
//! # Metrics Categories
//!
//! - **Challenge Metrics** - Present / `CleanUp` outcomes and durations
//! - **Provider Metrics** - HTTP calls to the dns.services API by method and status
//! - **Error Metrics** - Failures by reason
//!
//! # Example
//!
//! ```rust,no_run
//! use dns_services_webhook::metrics::{gather_metrics, record_challenge_success};
//!
//! record_challenge_success("Present", std::time::Duration::from_millis(250));
//! let text = gather_metrics().unwrap();
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all webhook metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "dns_services_webhook";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Challenge Metrics
// ============================================================================

/// Total number of challenge actions by action and status
///
/// Labels:
/// - `action`: `Present` or `CleanUp`
/// - `status`: Outcome (`success`, `error`)
pub static CHALLENGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_challenges_total"),
        "Total number of challenge actions by action and status",
    );
    let counter = CounterVec::new(opts, &["action", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of challenge actions in seconds
///
/// Labels:
/// - `action`: `Present` or `CleanUp`
pub static CHALLENGE_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_challenge_duration_seconds"),
        "Duration of challenge actions in seconds by action",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Provider Metrics
// ============================================================================

/// Total number of dns.services API requests
///
/// Labels:
/// - `method`: HTTP method
/// - `status`: HTTP status code, or `transport_error`
pub static PROVIDER_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_provider_requests_total"),
        "Total number of dns.services API requests by method and status",
    );
    let counter = CounterVec::new(opts, &["method", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of failed challenge actions by reason
///
/// Labels:
/// - `reason`: Error reason (e.g., `ZoneNotFound`, `AuthMissing`)
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of failed challenge actions by reason",
    );
    let counter = CounterVec::new(opts, &["reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful challenge action
///
/// # Arguments
/// * `action` - `Present` or `CleanUp`
/// * `duration` - Duration of the action
pub fn record_challenge_success(action: &str, duration: Duration) {
    CHALLENGES_TOTAL.with_label_values(&[action, "success"]).inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[action])
        .observe(duration.as_secs_f64());
}

/// Record a failed challenge action
///
/// # Arguments
/// * `action` - `Present` or `CleanUp`
/// * `reason` - Error reason
/// * `duration` - Duration of the action before failure
pub fn record_challenge_error(action: &str, reason: &str, duration: Duration) {
    CHALLENGES_TOTAL.with_label_values(&[action, "error"]).inc();
    ERRORS_TOTAL.with_label_values(&[reason]).inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[action])
        .observe(duration.as_secs_f64());
}

/// Record a dns.services API request
pub fn record_provider_request(method: &str, status: &str) {
    PROVIDER_REQUESTS_TOTAL
        .with_label_values(&[method, status])
        .inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Returns
/// Prometheus-formatted metrics as a String
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
