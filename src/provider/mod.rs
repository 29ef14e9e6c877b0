// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! dns.services REST API client.
//!
//! This module talks to the dns.services hosting API over HTTPS with Basic Auth.
//! It handles:
//!
//! - Locating the zone that hosts a challenge FQDN ([`zones`])
//! - Creating, listing and deleting TXT records in that zone ([`records`])
//!
//! # Architecture
//!
//! A [`DnsServicesClient`] is built per challenge from the shared `reqwest` client,
//! the configured base URL and the credentials resolved for that challenge. It keeps
//! no state between calls. There is no retry logic here; a failed call is returned
//! to cert-manager, which owns the retry policy.
//!
//! # Example
//!
//! ```rust,no_run
//! use dns_services_webhook::credentials::ProviderCredentials;
//! use dns_services_webhook::provider::{http_client, DnsServicesClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = ProviderCredentials::new("ops@example.com".into(), "secret".into())?;
//! let client = DnsServicesClient::new(
//!     http_client(Duration::from_secs(30))?,
//!     "https://dns.services/api",
//!     credentials,
//! );
//!
//! if let Some(zone) = client.find_zone("_acme-challenge.example.com.").await? {
//!     println!("zone {} lives in service {}", zone.name, zone.service_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod records;
pub mod types;
pub mod zones;

pub use types::{
    CreateRecordResponse, DeleteOutcome, RecordList, TxtRecordEntry, TxtRecordRequest, ZoneEntry,
    ZoneInfo, ZoneList,
};

use reqwest::header::ACCEPT;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use crate::credentials::ProviderCredentials;
use crate::errors::SolverError;
use crate::metrics;

/// Build the shared HTTP client with a per-request timeout.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> reqwest::Result<HttpClient> {
    HttpClient::builder().timeout(timeout).build()
}

/// Normalise a provider host into a base URL.
///
/// Adds `https://` when no scheme is given and strips trailing slashes:
/// `dns.services/api/` becomes `https://dns.services/api`.
#[must_use]
pub fn build_api_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Raw provider response: status plus body text.
#[derive(Debug, Clone)]
pub(crate) struct ProviderResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ProviderResponse {
    /// Fail with [`SolverError::ProviderStatus`] unless the status is 2xx.
    pub fn ensure_success(self, url: &str) -> Result<Self, SolverError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            error!(url = %url, status = %self.status, body = %self.body, "dns.services request failed");
            Err(SolverError::ProviderStatus {
                url: url.to_string(),
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Decode the JSON body.
    pub fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SolverError> {
        serde_json::from_str(&self.body).map_err(|source| SolverError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Client for one challenge against the dns.services API.
#[derive(Debug, Clone)]
pub struct DnsServicesClient {
    http: HttpClient,
    base_url: String,
    credentials: ProviderCredentials,
}

impl DnsServicesClient {
    /// Create a client for `base_url` authenticating as `credentials`.
    #[must_use]
    pub fn new(http: HttpClient, base_url: &str, credentials: ProviderCredentials) -> Self {
        Self {
            http,
            base_url: build_api_url(base_url),
            credentials,
        }
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> String {
        let fallback = || format!("{}/{}", self.base_url, segments.join("/"));

        let Ok(mut url) = Url::parse(&self.base_url) else {
            return fallback();
        };
        let appended = url.path_segments_mut().map(|mut path| {
            path.pop_if_empty().extend(segments);
        });
        if appended.is_err() {
            return fallback();
        }
        url.to_string()
    }

    pub(crate) fn zones_url(&self) -> String {
        self.endpoint(&["dns"])
    }

    pub(crate) fn zone_url(&self, zone: &ZoneInfo) -> String {
        self.endpoint(&["service", &zone.service_id, "dns", &zone.domain_id])
    }

    pub(crate) fn records_url(&self, zone: &ZoneInfo) -> String {
        self.endpoint(&["service", &zone.service_id, "dns", &zone.domain_id, "records"])
    }

    pub(crate) fn record_url(&self, zone: &ZoneInfo, record_id: &str) -> String {
        self.endpoint(&[
            "service",
            &zone.service_id,
            "dns",
            &zone.domain_id,
            "records",
            record_id,
        ])
    }

    /// Issue one authenticated request.
    ///
    /// The status is not checked here; callers decide which statuses are acceptable.
    pub(crate) async fn request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&T>,
    ) -> Result<ProviderResponse, SolverError> {
        info!(method = %method, url = %url, "HTTP API request to dns.services");
        debug!(username = %self.credentials.username, "Authenticating to dns.services");

        let mut request = self
            .http
            .request(method.clone(), url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(ACCEPT, "application/json");

        if let Some(body_data) = body {
            request = request.json(body_data);
        }

        let response = request.send().await.map_err(|source| {
            error!(method = %method, url = %url, error = %source, "dns.services request could not be sent");
            metrics::record_provider_request(method.as_str(), "transport_error");
            SolverError::Network {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        metrics::record_provider_request(method.as_str(), status.as_str());

        let body = response
            .text()
            .await
            .map_err(|source| SolverError::Network {
                url: url.to_string(),
                source,
            })?;

        debug!(
            method = %method,
            url = %url,
            status = %status,
            response_len = body.len(),
            "HTTP API response from dns.services"
        );

        Ok(ProviderResponse { status, body })
    }
}
