// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-challenge solver configuration.
//!
//! The Issuer's `webhook.config` block is passed through cert-manager as opaque JSON.
//! Two shapes are accepted:
//!
//! ```json
//! {
//!   "usernameSecretRef": { "name": "dns-services", "key": "username" },
//!   "passwordSecretRef": { "name": "dns-services", "key": "password" }
//! }
//! ```
//!
//! ```json
//! { "email": "ops@example.com", "password": "...", "host": "https://dns.services/api" }
//! ```
//!
//! Both may carry an optional `host` (defaults to the public dns.services API) and
//! an optional `ttl` for the challenge record.

use serde::Deserialize;
use std::fmt;
use url::Url;

use crate::constants::{DEFAULT_PROVIDER_HOST, DEFAULT_TXT_RECORD_TTL_SECS};
use crate::errors::SolverError;
use crate::provider::build_api_url;

/// Reference to a single key inside a Kubernetes Secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretKeySelector {
    /// Name of the Secret in the challenge's resource namespace
    pub name: String,
    /// Key within the Secret's data
    pub key: String,
}

/// Credentials read from Kubernetes Secrets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRefConfig {
    /// Where to find the username / email
    pub username_secret_ref: SecretKeySelector,
    /// Where to find the password
    pub password_secret_ref: SecretKeySelector,
    /// Provider base URL override
    #[serde(default)]
    pub host: Option<String>,
    /// Record TTL override
    #[serde(default)]
    pub ttl: Option<u32>,
}

/// Credentials given inline in the Issuer.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct InlineConfig {
    /// Account email used as the Basic Auth username
    #[serde(alias = "username")]
    pub email: String,
    /// Account password
    pub password: String,
    /// Provider base URL override
    #[serde(default)]
    pub host: Option<String>,
    /// Record TTL override
    #[serde(default)]
    pub ttl: Option<u32>,
}

impl fmt::Debug for InlineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineConfig")
            .field("email", &self.email)
            .field("password", &"*******")
            .field("host", &self.host)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Solver configuration, one of the two accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SolverConfig {
    /// Credentials come from Secrets
    SecretRef(SecretRefConfig),
    /// Credentials are inline
    Inline(InlineConfig),
}

impl SolverConfig {
    /// Decode the opaque JSON configuration of a challenge.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Config`] when no configuration was provided, when it
    /// matches neither accepted shape, or when `host` is not an http(s) URL.
    pub fn from_json(config: Option<&serde_json::Value>) -> Result<Self, SolverError> {
        let value = match config {
            None | Some(serde_json::Value::Null) => {
                return Err(SolverError::Config {
                    reason: "no solver config provided; expected usernameSecretRef/passwordSecretRef or email/password".to_string(),
                })
            }
            Some(value) => value,
        };

        let config = Self::deserialize(value).map_err(|_| SolverError::Config {
            reason: "expected either usernameSecretRef and passwordSecretRef, or email and password"
                .to_string(),
        })?;

        if let Some(host) = config.host_override() {
            validate_host(host)?;
        }

        Ok(config)
    }

    fn host_override(&self) -> Option<&str> {
        match self {
            Self::SecretRef(c) => c.host.as_deref(),
            Self::Inline(c) => c.host.as_deref(),
        }
        .filter(|h| !h.trim().is_empty())
    }

    /// Base URL of the provider API, without a trailing slash.
    #[must_use]
    pub fn host(&self) -> String {
        build_api_url(self.host_override().unwrap_or(DEFAULT_PROVIDER_HOST))
    }

    /// TTL for the challenge record.
    #[must_use]
    pub fn ttl(&self) -> u32 {
        match self {
            Self::SecretRef(c) => c.ttl,
            Self::Inline(c) => c.ttl,
        }
        .unwrap_or(DEFAULT_TXT_RECORD_TTL_SECS)
    }
}

fn validate_host(host: &str) -> Result<(), SolverError> {
    let url = Url::parse(&build_api_url(host)).map_err(|e| SolverError::Config {
        reason: format!("invalid host '{host}': {e}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(SolverError::Config {
            reason: format!("invalid host '{host}': unsupported scheme '{scheme}'"),
        }),
    }
}

#[cfg(test)]
#[path = "solver_config_tests.rs"]
mod solver_config_tests;
