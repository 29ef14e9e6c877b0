// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone lookup.
//!
//! The zone for a challenge is the first zone, in the provider's list order, whose
//! name occurs as a substring of the FQDN. There is no longest-suffix
//! preference: with zones `["com", "example.com"]` the FQDN
//! `_acme-challenge.example.com.` resolves to `com`. Callers relying on nested
//! zones must order them accordingly at the provider.

use reqwest::Method;
use tracing::{debug, info};

use super::types::{ZoneEntry, ZoneInfo, ZoneList};
use super::DnsServicesClient;
use crate::challenge::trim_root_dot;
use crate::errors::SolverError;

/// Pick the zone for `fqdn` from a zone list.
///
/// The trailing root-zone dot of `fqdn` is ignored. Zones with an empty name never
/// match.
#[must_use]
pub fn select_zone(zones: &[ZoneEntry], fqdn: &str) -> Option<ZoneInfo> {
    let fqdn = trim_root_dot(fqdn);

    zones
        .iter()
        .enumerate()
        .find(|(_, zone)| !zone.name.is_empty() && fqdn.contains(zone.name.as_str()))
        .map(|(index, zone)| ZoneInfo::from_entry(index, zone))
}

impl DnsServicesClient {
    /// Fetch the account's zones.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status or a body that is
    /// not JSON.
    pub async fn list_zones(&self) -> Result<ZoneList, SolverError> {
        let url = self.zones_url();
        let response = self
            .request::<()>(Method::GET, &url, None)
            .await?
            .ensure_success(&url)?;

        response.json(&url)
    }

    /// Find the zone hosting `fqdn`.
    ///
    /// Returns `Ok(None)` when no zone matches.
    ///
    /// # Errors
    ///
    /// See [`DnsServicesClient::list_zones`].
    pub async fn find_zone(&self, fqdn: &str) -> Result<Option<ZoneInfo>, SolverError> {
        let zone_list = self.list_zones().await?;
        debug!(
            fqdn = %fqdn,
            zone_count = zone_list.zones.len(),
            "Searching dns.services zones"
        );

        let zone = select_zone(&zone_list.zones, fqdn);
        match &zone {
            Some(zone) => info!(
                fqdn = %fqdn,
                zone = %zone.name,
                domain_id = %zone.domain_id,
                service_id = %zone.service_id,
                "Found zone for challenge"
            ),
            None => info!(fqdn = %fqdn, "No dns.services zone matches challenge FQDN"),
        }

        Ok(zone)
    }
}

#[cfg(test)]
#[path = "zones_tests.rs"]
mod zones_tests;
