// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the dns.services webhook solver.
//!
//! Every failure inside Present or `CleanUp` is converted into a [`SolverError`]
//! and returned to the webhook dispatcher. Nothing in this crate terminates the
//! hosting process because a single challenge failed; the caller (cert-manager)
//! owns the retry policy.
//!
//! A record that is already gone during cleanup is not an error and therefore has
//! no variant here.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while solving a DNS-01 challenge.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The challenge's solver configuration could not be decoded.
    #[error("Error decoding solver config: {reason}")]
    Config {
        /// Explanation of what is wrong with the config
        reason: String,
    },

    /// Process-level configuration is invalid (e.g. empty group name).
    #[error("Invalid webhook configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is invalid
        reason: String,
    },

    /// Username or password resolved to an empty string.
    #[error("No {field} provided or found; check the referenced Secret or solver config")]
    AuthMissing {
        /// Which credential field was empty (`username` or `password`)
        field: &'static str,
    },

    /// The referenced Secret does not exist.
    #[error("Secret '{name}' not found in namespace '{namespace}'")]
    SecretNotFound {
        /// The Kubernetes secret name
        name: String,
        /// The namespace that was searched
        namespace: String,
    },

    /// The referenced Secret exists but lacks the requested key.
    #[error("Key '{key}' not found in secret '{namespace}/{name}'")]
    SecretKeyNotFound {
        /// The Kubernetes secret name
        name: String,
        /// The namespace of the secret
        namespace: String,
        /// The missing data key
        key: String,
    },

    /// Kubernetes API failure while reading a Secret.
    #[error("Kubernetes API error reading secret '{namespace}/{name}': {source}")]
    Kube {
        /// The Kubernetes secret name
        name: String,
        /// The namespace of the secret
        namespace: String,
        /// Underlying client error
        #[source]
        source: kube::Error,
    },

    /// Transport-level failure talking to the provider (connect, TLS, timeout).
    #[error("Failed to send HTTP request to {url}: {source}")]
    Network {
        /// The URL that was requested
        url: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with an unexpected HTTP status.
    #[error("Unexpected HTTP response from {url}: {status} {body}")]
    ProviderStatus {
        /// The URL that was requested
        url: String,
        /// HTTP status code
        status: StatusCode,
        /// Response body
        body: String,
    },

    /// The provider response body could not be decoded.
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        /// The URL that was requested
        url: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// No zone in the account matches the FQDN.
    #[error("No zone found in the dns.services account for '{fqdn}'")]
    ZoneNotFound {
        /// The FQDN (without trailing dot) that was searched
        fqdn: String,
    },

    /// The provider did not confirm the TXT record creation.
    #[error("The TXT record '{fqdn}' was not created in zone '{zone}'")]
    RecordNotCreated {
        /// The record name
        fqdn: String,
        /// The zone the record was created in
        zone: String,
    },

    /// The provider rejected a record deletion.
    #[error("Failed to delete TXT record {record_id} for '{fqdn}': HTTP {status}")]
    DeleteFailed {
        /// The record name
        fqdn: String,
        /// The provider record id
        record_id: String,
        /// HTTP status code returned by the provider
        status: StatusCode,
    },
}

impl SolverError {
    /// Returns true if retrying the same challenge later may succeed.
    ///
    /// Network failures, Kubernetes API failures, rate limiting (429) and provider
    /// server errors (5xx) are transient. Configuration and credential problems are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Kube { .. } => true,
            Self::ProviderStatus { status, .. } | Self::DeleteFailed { status, .. } => {
                is_retryable_http_status(*status)
            }
            _ => false,
        }
    }

    /// Short CamelCase reason used in webhook responses and metrics labels.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ConfigError",
            Self::InvalidConfig { .. } => "InvalidConfig",
            Self::AuthMissing { .. } => "AuthMissing",
            Self::SecretNotFound { .. } => "SecretNotFound",
            Self::SecretKeyNotFound { .. } => "SecretKeyNotFound",
            Self::Kube { .. } => "KubernetesApiError",
            Self::Network { .. } => "NetworkError",
            Self::ProviderStatus { .. } => "ProviderError",
            Self::Decode { .. } => "DecodeError",
            Self::ZoneNotFound { .. } => "ZoneNotFound",
            Self::RecordNotCreated { .. } => "RecordNotCreated",
            Self::DeleteFailed { .. } => "DeleteFailed",
        }
    }
}

/// Check if an HTTP status code should be considered transient.
///
/// - 429 Too Many Requests
/// - 5xx server errors
#[must_use]
pub fn is_retryable_http_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
