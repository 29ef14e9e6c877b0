// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! cert-manager webhook payload types.
//!
//! cert-manager calls a DNS-01 webhook solver by POSTing a `ChallengePayload`
//! whose `request` describes the challenge. The solver answers with the same
//! kind carrying a `response`.
//!
//! # Example
//!
//! ```rust
//! use dns_services_webhook::challenge::{ChallengeAction, ChallengePayload};
//!
//! let body = r#"{
//!     "apiVersion": "acme.cert-manager.io/v1alpha1",
//!     "kind": "ChallengePayload",
//!     "request": {
//!         "uid": "6c4a",
//!         "action": "Present",
//!         "type": "dns-01",
//!         "dnsName": "example.com",
//!         "key": "challenge-key",
//!         "resourceNamespace": "cert-manager",
//!         "resolvedFQDN": "_acme-challenge.example.com.",
//!         "resolvedZone": "example.com."
//!     }
//! }"#;
//!
//! let payload: ChallengePayload = serde_json::from_str(body).unwrap();
//! let request = payload.request.unwrap();
//! assert_eq!(request.action, ChallengeAction::Present);
//! assert_eq!(request.resolved_fqdn, "_acme-challenge.example.com.");
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{CHALLENGE_API_VERSION, CHALLENGE_PAYLOAD_KIND};
use crate::errors::SolverError;

/// Action requested by cert-manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    /// Publish the TXT record
    Present,
    /// Remove the TXT record
    CleanUp,
    /// Anything else cert-manager may send in the future
    #[default]
    #[serde(other)]
    Unknown,
}

/// A single DNS-01 challenge as delivered by cert-manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Unique id of this webhook call, echoed in the response
    #[serde(default)]
    pub uid: String,

    /// Present or `CleanUp`
    #[serde(default)]
    pub action: ChallengeAction,

    /// Challenge type, always `dns-01` for this solver
    #[serde(default, rename = "type")]
    pub challenge_type: String,

    /// The domain the certificate is requested for
    #[serde(default)]
    pub dns_name: String,

    /// TXT record content to publish
    #[serde(default)]
    pub key: String,

    /// Namespace Secret references are resolved in
    #[serde(default)]
    pub resource_namespace: String,

    /// Dot-terminated name of the TXT record, e.g. `_acme-challenge.example.com.`
    #[serde(default, rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Dot-terminated zone cert-manager resolved via SOA lookup
    #[serde(default)]
    pub resolved_zone: String,

    /// Whether ambient credentials may be used (unused by this solver)
    #[serde(default)]
    pub allow_ambient_credentials: bool,

    /// Opaque solver configuration from the Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl ChallengeRequest {
    /// The resolved FQDN with the trailing root-zone dot removed.
    ///
    /// This is the record name the provider stores.
    #[must_use]
    pub fn record_name(&self) -> &str {
        trim_root_dot(&self.resolved_fqdn)
    }
}

/// Strip a single trailing root-zone dot, if present.
#[must_use]
pub fn trim_root_dot(fqdn: &str) -> &str {
    fqdn.strip_suffix('.').unwrap_or(fqdn)
}

/// Status detail attached to a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Always `Failure` for error responses
    pub status: String,
    /// Human-readable error message
    pub message: String,
    /// Machine-readable reason
    pub reason: String,
}

/// Result of a challenge action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// The uid of the request this answers
    pub uid: String,
    /// Whether the action succeeded
    pub success: bool,
    /// Failure detail, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

impl ChallengeResponse {
    /// Successful response for `uid`.
    #[must_use]
    pub fn success(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            success: true,
            status: None,
        }
    }

    /// Failed response for `uid` with an explicit reason.
    #[must_use]
    pub fn failure(uid: &str, reason: &str, message: String) -> Self {
        Self {
            uid: uid.to_string(),
            success: false,
            status: Some(ResponseStatus {
                status: "Failure".to_string(),
                message,
                reason: reason.to_string(),
            }),
        }
    }

    /// Failed response for `uid` built from a solver error.
    #[must_use]
    pub fn from_error(uid: &str, error: &SolverError) -> Self {
        Self::failure(uid, error.status_reason(), error.to_string())
    }
}

/// Envelope exchanged with cert-manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// `acme.cert-manager.io/v1alpha1`
    #[serde(default)]
    pub api_version: String,
    /// `ChallengePayload`
    #[serde(default)]
    pub kind: String,
    /// Set on requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,
    /// Set on responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

impl ChallengePayload {
    /// Wrap a response in a payload envelope.
    #[must_use]
    pub fn with_response(response: ChallengeResponse) -> Self {
        Self {
            api_version: CHALLENGE_API_VERSION.to_string(),
            kind: CHALLENGE_PAYLOAD_KIND.to_string(),
            request: None,
            response: Some(response),
        }
    }
}

#[cfg(test)]
#[path = "challenge_tests.rs"]
mod challenge_tests;
