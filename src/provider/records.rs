// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TXT record management.

use reqwest::{Method, StatusCode};
use tracing::{info, warn};

use super::types::{
    CreateRecordResponse, DeleteOutcome, RecordList, TxtRecordEntry, TxtRecordRequest, ZoneInfo,
};
use super::DnsServicesClient;
use crate::errors::SolverError;

/// Find the id of the TXT record `name` with content `key`.
///
/// When several records match, the last one in list order wins. Entries without
/// an id cannot be deleted and are skipped.
#[must_use]
pub fn find_txt_record_id(records: &[TxtRecordEntry], name: &str, key: &str) -> Option<String> {
    records
        .iter()
        .rev()
        .find(|record| !record.id.is_empty() && record.matches(name, key))
        .map(|record| record.id.clone())
}

impl DnsServicesClient {
    /// Create a TXT record in `zone`.
    ///
    /// Not idempotent: calling twice creates two records.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status or a body that is
    /// not JSON.
    pub async fn create_txt_record(
        &self,
        zone: &ZoneInfo,
        record: &TxtRecordRequest,
    ) -> Result<CreateRecordResponse, SolverError> {
        let url = self.records_url(zone);
        let response = self
            .request(Method::POST, &url, Some(record))
            .await?
            .ensure_success(&url)?;

        let created: CreateRecordResponse = response.json(&url)?;
        info!(
            zone = %zone.name,
            name = %record.name,
            success = created.success,
            echoed_name = %created.record.name,
            "dns.services create record response"
        );

        Ok(created)
    }

    /// List all records in `zone`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status or a body that is
    /// not JSON.
    pub async fn list_records(&self, zone: &ZoneInfo) -> Result<RecordList, SolverError> {
        let url = self.zone_url(zone);
        let response = self
            .request::<()>(Method::GET, &url, None)
            .await?
            .ensure_success(&url)?;

        response.json(&url)
    }

    /// Look up the id of the TXT record `name` carrying `key` in `zone`.
    ///
    /// # Errors
    ///
    /// See [`DnsServicesClient::list_records`].
    pub async fn find_txt_record(
        &self,
        zone: &ZoneInfo,
        name: &str,
        key: &str,
    ) -> Result<Option<String>, SolverError> {
        let list = self.list_records(zone).await?;
        Ok(find_txt_record_id(&list.records, name, key))
    }

    /// Delete record `record_id` from `zone`.
    ///
    /// A 404 means the record is already gone and is reported as
    /// [`DeleteOutcome::AlreadyAbsent`].
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Network`] on transport failure and
    /// [`SolverError::DeleteFailed`] for any other non-2xx status.
    pub async fn delete_record(
        &self,
        zone: &ZoneInfo,
        name: &str,
        record_id: &str,
    ) -> Result<DeleteOutcome, SolverError> {
        let url = self.record_url(zone, record_id);
        let response = self.request::<()>(Method::DELETE, &url, None).await?;

        match response.status {
            status if status.is_success() => Ok(DeleteOutcome::Deleted),
            StatusCode::NOT_FOUND => {
                warn!(
                    name = %name,
                    record_id = %record_id,
                    "TXT record already absent at dns.services"
                );
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            status => {
                warn!(
                    name = %name,
                    record_id = %record_id,
                    status = %status,
                    body = %response.body,
                    "dns.services rejected record deletion"
                );
                Err(SolverError::DeleteFailed {
                    fqdn: name.to_string(),
                    record_id: record_id.to_string(),
                    status,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod records_tests;
