// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS-01 solver for the dns.services API.
//!
//! [`DnsServicesSolver`] implements the two cert-manager lifecycle operations:
//!
//! - **Present**: resolve credentials, locate the zone, create the TXT record
//! - **`CleanUp`**: resolve credentials, locate the zone, find the TXT record with
//!   the challenge key and delete it
//!
//! Each call is independent. Credentials, zone info and the per-call API client are
//! dropped when the call returns; the solver itself only holds immutable shared
//! state, so concurrent calls need no locking.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::challenge::ChallengeRequest;
use crate::constants::{ACTION_CLEANUP, ACTION_PRESENT, SOLVER_NAME};
use crate::credentials::{resolve_credentials, SecretSource};
use crate::errors::SolverError;
use crate::metrics;
use crate::provider::{DeleteOutcome, DnsServicesClient, TxtRecordRequest, ZoneInfo};
use crate::solver_config::SolverConfig;

/// A cert-manager DNS-01 webhook solver.
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Name the solver is registered under.
    fn name(&self) -> &str;

    /// Publish the challenge TXT record.
    async fn present(&self, request: &ChallengeRequest) -> Result<(), SolverError>;

    /// Remove the challenge TXT record.
    async fn cleanup(&self, request: &ChallengeRequest) -> Result<(), SolverError>;
}

/// Solver backed by the dns.services REST API.
#[derive(Clone)]
pub struct DnsServicesSolver {
    secrets: Arc<dyn SecretSource>,
    http: HttpClient,
    test_zone_name: Option<String>,
}

impl DnsServicesSolver {
    /// Create a solver reading Secrets from `secrets` and calling the provider with `http`.
    #[must_use]
    pub fn new(secrets: Arc<dyn SecretSource>, http: HttpClient) -> Self {
        Self {
            secrets,
            http,
            test_zone_name: None,
        }
    }

    /// Override the request's DNS name with a fixed test zone.
    #[must_use]
    pub fn with_test_zone_name(mut self, zone: Option<String>) -> Self {
        self.test_zone_name = zone.filter(|z| !z.is_empty());
        self
    }

    fn effective_request<'a>(&self, request: &'a ChallengeRequest) -> Cow<'a, ChallengeRequest> {
        match &self.test_zone_name {
            Some(zone) => {
                let mut request = request.clone();
                request.dns_name.clone_from(zone);
                Cow::Owned(request)
            }
            None => Cow::Borrowed(request),
        }
    }

    /// Decode config, resolve credentials and locate the zone for `request`.
    async fn prepare(
        &self,
        request: &ChallengeRequest,
    ) -> Result<(SolverConfig, DnsServicesClient, ZoneInfo), SolverError> {
        let config = SolverConfig::from_json(request.config.as_ref())?;
        let credentials =
            resolve_credentials(self.secrets.as_ref(), &request.resource_namespace, &config)
                .await?;

        let client = DnsServicesClient::new(self.http.clone(), &config.host(), credentials);

        info!(
            dns_name = %request.dns_name,
            fqdn = %request.resolved_fqdn,
            url = %client.base_url(),
            "Searching for zone in dns.services"
        );

        let zone = client
            .find_zone(&request.resolved_fqdn)
            .await?
            .ok_or_else(|| SolverError::ZoneNotFound {
                fqdn: request.record_name().to_string(),
            })?;

        Ok((config, client, zone))
    }

    async fn present_inner(&self, request: &ChallengeRequest) -> Result<(), SolverError> {
        let (config, client, zone) = self.prepare(request).await?;
        let fqdn = request.record_name();

        let record = TxtRecordRequest::new(fqdn, &request.key, config.ttl());
        let created = client.create_txt_record(&zone, &record).await?;

        if !created.is_created() {
            warn!(fqdn = %fqdn, zone = %zone.name, "The TXT record was not created");
            return Err(SolverError::RecordNotCreated {
                fqdn: fqdn.to_string(),
                zone: zone.name,
            });
        }

        info!(
            "The TXT record '{}' has been created with content '{}'",
            fqdn, request.key
        );
        Ok(())
    }

    async fn cleanup_inner(&self, request: &ChallengeRequest) -> Result<(), SolverError> {
        info!(fqdn = %request.resolved_fqdn, "Delete TXT record");
        let (_, client, zone) = self.prepare(request).await?;
        let fqdn = request.record_name();

        let Some(record_id) = client.find_txt_record(&zone, fqdn, &request.key).await? else {
            info!(
                fqdn = %fqdn,
                "Didn't find a matching TXT record, nothing to delete"
            );
            return Ok(());
        };

        info!(fqdn = %fqdn, record_id = %record_id, "Record ID to delete");

        match client.delete_record(&zone, fqdn, &record_id).await? {
            DeleteOutcome::Deleted => {
                info!("{} TXT record with ID {} has been deleted", fqdn, record_id);
            }
            DeleteOutcome::AlreadyAbsent => {
                info!("{} TXT record with ID {} was already deleted", fqdn, record_id);
            }
        }
        Ok(())
    }
}

/// Record the outcome of a challenge action.
fn observe(action: &str, started: Instant, result: &Result<(), SolverError>) {
    match result {
        Ok(()) => metrics::record_challenge_success(action, started.elapsed()),
        Err(e) => {
            warn!(action = %action, reason = e.status_reason(), error = %e, "Challenge action failed");
            metrics::record_challenge_error(action, e.status_reason(), started.elapsed());
        }
    }
}

#[async_trait]
impl ChallengeSolver for DnsServicesSolver {
    fn name(&self) -> &str {
        SOLVER_NAME
    }

    async fn present(&self, request: &ChallengeRequest) -> Result<(), SolverError> {
        let started = Instant::now();
        let request = self.effective_request(request);
        let result = self.present_inner(&request).await;
        observe(ACTION_PRESENT, started, &result);
        result
    }

    async fn cleanup(&self, request: &ChallengeRequest) -> Result<(), SolverError> {
        let started = Instant::now();
        let request = self.effective_request(request);
        let result = self.cleanup_inner(&request).await;
        observe(ACTION_CLEANUP, started, &result);
        result
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod solver_tests;
