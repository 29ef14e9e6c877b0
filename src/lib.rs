// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # dns-services-webhook - cert-manager DNS-01 solver for dns.services
//!
//! A cert-manager webhook solver that proves domain control for ACME DNS-01
//! challenges by publishing TXT records through the dns.services REST API.
//!
//! ## Overview
//!
//! For each challenge the solver:
//!
//! - Reads the provider username and password from Kubernetes Secrets
//! - Finds the dns.services zone whose name occurs in the challenge FQDN
//! - Creates the TXT record (Present) or deletes the matching one (`CleanUp`)
//!
//! ## Modules
//!
//! - [`challenge`] - cert-manager `ChallengePayload` wire types
//! - [`solver_config`] - Per-issuer solver configuration
//! - [`credentials`] - Credential resolution from Kubernetes Secrets
//! - [`provider`] - dns.services API client (zones and records)
//! - [`solver`] - Present / `CleanUp` orchestration
//! - [`webhook`] - HTTP surface speaking the webhook protocol
//! - [`config`] - Process configuration
//! - [`metrics`] - Prometheus metrics
//! - [`errors`] - Error taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use dns_services_webhook::provider::zones::select_zone;
//! use dns_services_webhook::provider::ZoneEntry;
//!
//! let zones = vec![ZoneEntry {
//!     domain_id: "42".to_string(),
//!     name: "example.com".to_string(),
//!     service_id: "7".to_string(),
//! }];
//!
//! let zone = select_zone(&zones, "_acme-challenge.example.com.").unwrap();
//! assert_eq!(zone.domain_id, "42");
//! ```

pub mod challenge;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod errors;
pub mod metrics;
pub mod provider;
pub mod solver;
pub mod solver_config;
pub mod webhook;
