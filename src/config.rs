// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Process configuration for the webhook server.
//!
//! All process-wide settings are parsed once at startup from command-line flags or
//! their environment variables and then passed explicitly to the components that
//! need them.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use crate::constants::{DEFAULT_LISTEN_ADDR, DEFAULT_PROVIDER_TIMEOUT_SECS};
use crate::errors::SolverError;

/// Command-line / environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dns-services-webhook",
    version,
    about = "cert-manager DNS-01 webhook solver for dns.services"
)]
pub struct WebhookConfig {
    /// API group the webhook is registered under (e.g. `acme.example.com`)
    #[arg(long, env = "GROUP_NAME")]
    pub group_name: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Timeout for each dns.services API request, in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value_t = DEFAULT_PROVIDER_TIMEOUT_SECS)]
    pub provider_timeout_secs: u64,

    /// Fixed DNS name used in place of the request's, for conformance testing
    #[arg(long, env = "TEST_ZONE_NAME")]
    pub test_zone_name: Option<String>,
}

impl WebhookConfig {
    /// Check settings that clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] for an empty group name or a zero timeout.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.group_name.trim().is_empty() {
            return Err(SolverError::InvalidConfig {
                reason: "GROUP_NAME must be specified".to_string(),
            });
        }
        if self.provider_timeout_secs == 0 {
            return Err(SolverError::InvalidConfig {
                reason: "provider timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Per-request timeout for provider calls.
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// The test zone override, if set and non-empty.
    #[must_use]
    pub fn test_zone_name(&self) -> Option<String> {
        self.test_zone_name.clone().filter(|z| !z.is_empty())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
