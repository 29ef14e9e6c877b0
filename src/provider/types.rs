// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Request and response types for the dns.services REST API.
//!
//! Response types decode leniently: missing or `null` fields take their default
//! value, and ids / numeric fields are accepted both as JSON numbers and as strings because
//! the API is not consistent about it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, PickFirst};

use crate::constants::TXT_RECORD_TYPE;

/// Accept a JSON string, number or null as a `String`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text,
        Some(Raw::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// Strip the double quotes some TXT values are stored with.
fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

// ============================================================================
// Zones
// ============================================================================

/// Response of `GET /dns`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneList {
    /// Zones hosted in the account, in provider order
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub zones: Vec<ZoneEntry>,
}

/// One zone as listed by the provider.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ZoneEntry {
    /// Provider domain id
    #[serde(default, deserialize_with = "string_or_number")]
    pub domain_id: String,
    /// Zone name, e.g. `example.com`
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    /// Provider service id owning the zone
    #[serde(default, deserialize_with = "string_or_number")]
    pub service_id: String,
}

/// The zone selected for a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    /// Position of the zone in the provider's list
    pub zone_list_index: usize,
    /// Provider domain id
    pub domain_id: String,
    /// Zone name
    pub name: String,
    /// Provider service id
    pub service_id: String,
}

impl ZoneInfo {
    /// Build from a zone list entry and its position.
    #[must_use]
    pub fn from_entry(index: usize, entry: &ZoneEntry) -> Self {
        Self {
            zone_list_index: index,
            domain_id: entry.domain_id.clone(),
            name: entry.name.clone(),
            service_id: entry.service_id.clone(),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Body of `POST /service/{service}/dns/{domain}/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxtRecordRequest {
    /// FQDN without trailing dot
    pub name: String,
    /// Always `TXT`
    #[serde(rename = "type")]
    pub record_type: String,
    /// Challenge key
    pub content: String,
    /// TTL in seconds
    pub ttl: u32,
    /// Optional priority, omitted when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl TxtRecordRequest {
    /// A TXT record request for `name` with `content`.
    #[must_use]
    pub fn new(name: &str, content: &str, ttl: u32) -> Self {
        Self {
            name: name.to_string(),
            record_type: TXT_RECORD_TYPE.to_string(),
            content: content.to_string(),
            ttl,
            priority: None,
        }
    }
}

/// The record echoed back by a create call.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedRecord {
    /// Record name
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    /// Record type
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, rename = "type")]
    pub record_type: String,
    /// TTL in seconds
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub ttl: Option<u32>,
    /// Priority
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub priority: Option<u32>,
    /// Record content
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub content: String,
}

/// Response of a create call.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRecordResponse {
    /// Provider success flag
    #[serde(default)]
    pub success: bool,
    /// The stored record
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub record: CreatedRecord,
    /// Free-form info messages
    #[serde(default)]
    pub info: serde_json::Value,
}

impl CreateRecordResponse {
    /// Whether the provider confirmed the record.
    ///
    /// Either the success flag or a non-empty echoed record counts as confirmation.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.success || !self.record.name.is_empty()
    }
}

/// Response of `GET /service/{service}/dns/{domain}`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordList {
    /// Service id the zone belongs to
    #[serde(default, deserialize_with = "string_or_number")]
    pub service_id: String,
    /// Zone name
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    /// All records in the zone
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub records: Vec<TxtRecordEntry>,
}

/// A record as listed by the provider.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TxtRecordEntry {
    /// Provider record id
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Record name
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    /// TTL in seconds
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub ttl: Option<u32>,
    /// Priority
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub priority: Option<u32>,
    /// Record content, possibly quoted
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub content: String,
    /// Record type, possibly quoted
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, rename = "type")]
    pub record_type: String,
}

impl TxtRecordEntry {
    /// True if this is the TXT record `name` carrying `key`.
    #[must_use]
    pub fn matches(&self, name: &str, key: &str) -> bool {
        self.name == name
            && unquote(&self.record_type) == TXT_RECORD_TYPE
            && unquote(&self.content) == key
    }
}

/// Result of a delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The provider removed the record
    Deleted,
    /// The provider reported the record as already gone (404)
    AlreadyAbsent,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
