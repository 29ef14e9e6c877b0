// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the dns.services webhook.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Webhook API Constants
// ============================================================================

/// Name under which the solver is registered with cert-manager.
///
/// This is the `solverName` referenced from an Issuer's `webhook` stanza and the
/// resource name served under `/apis/{group}/v1alpha1/`.
pub const SOLVER_NAME: &str = "dns.services.cert-manager.io";

/// API version of the cert-manager webhook payload
pub const CHALLENGE_API_VERSION: &str = "acme.cert-manager.io/v1alpha1";

/// Kind of the cert-manager webhook payload
pub const CHALLENGE_PAYLOAD_KIND: &str = "ChallengePayload";

/// Version segment of the served API group
pub const WEBHOOK_API_VERSION: &str = "v1alpha1";

/// Default listen address for the webhook HTTP server
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8443";

// ============================================================================
// dns.services Provider Constants
// ============================================================================

/// Well-known base URL of the dns.services REST API
pub const DEFAULT_PROVIDER_HOST: &str = "https://dns.services/api";

/// TTL for challenge TXT records (seconds)
pub const DEFAULT_TXT_RECORD_TTL_SECS: u32 = 10;

/// Record type for ACME DNS-01 challenges
pub const TXT_RECORD_TYPE: &str = "TXT";

/// Per-request timeout for provider HTTP calls
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Challenge Actions
// ============================================================================

/// Label value for Present operations
pub const ACTION_PRESENT: &str = "Present";

/// Label value for `CleanUp` operations
pub const ACTION_CLEANUP: &str = "CleanUp";
