// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use dns_services_webhook::credentials::{SecretData, SecretSource};
use dns_services_webhook::errors::SolverError;
use kube::{
    api::{Api, DeleteParams, PostParams},
    client::Client,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Service id of the fake account
pub const SERVICE_ID: &str = "7";
/// Domain id of `example.com` in the fake account
pub const DOMAIN_ID: &str = "42";

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Create a test namespace
pub async fn create_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<k8s_openapi::api::core::v1::Namespace> = Api::all(client.clone());

    let ns = serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "labels": {
                "test": "integration",
                "managed-by": "dns-services-webhook-test"
            }
        }
    }))?;

    match namespaces.create(&PostParams::default(), &ns).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(ae)) if ae.code == 409 => Ok(()),
        Err(e) => Err(Box::new(e)),
    }
}

/// Cleanup test namespace
pub async fn cleanup_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<k8s_openapi::api::core::v1::Namespace> = Api::all(client.clone());

    match namespaces.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(()),
        Err(e) => Err(Box::new(e)),
    }
}

/// Create an Opaque Secret holding `data` as string values
pub async fn create_secret(
    client: &Client,
    namespace: &str,
    name: &str,
    data: &[(&str, &str)],
) -> Result<(), Box<dyn std::error::Error>> {
    let secrets: Api<k8s_openapi::api::core::v1::Secret> =
        Api::namespaced(client.clone(), namespace);

    let string_data: HashMap<&str, &str> = data.iter().copied().collect();
    let secret = serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {"name": name, "namespace": namespace},
        "type": "Opaque",
        "stringData": string_data
    }))?;

    secrets.create(&PostParams::default(), &secret).await?;
    Ok(())
}

/// In-memory Secret store keyed by `namespace/name`
#[derive(Default)]
pub struct MemorySecrets {
    secrets: HashMap<String, SecretData>,
}

impl MemorySecrets {
    pub fn with_secret(mut self, namespace: &str, name: &str, data: &[(&str, &str)]) -> Self {
        let data = data
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.as_bytes().to_vec()))
            .collect();
        self.secrets.insert(format!("{namespace}/{name}"), data);
        self
    }
}

#[async_trait]
impl SecretSource for MemorySecrets {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<SecretData>, SolverError> {
        Ok(self.secrets.get(&format!("{namespace}/{name}")).cloned())
    }
}

#[derive(Default)]
struct FakeAccount {
    records: Vec<Value>,
    next_id: u64,
}

/// Stateful stand-in for the dns.services records API of a single zone
#[derive(Clone)]
pub struct FakeDnsServices {
    authorization: String,
    account: Arc<Mutex<FakeAccount>>,
}

impl FakeDnsServices {
    /// `authorization` is the exact `Authorization` header the fake accepts
    pub fn new(authorization: &str) -> Self {
        Self {
            authorization: authorization.to_string(),
            account: Arc::new(Mutex::new(FakeAccount {
                records: Vec::new(),
                next_id: 100,
            })),
        }
    }

    /// Mount the zone list and record endpoints on `server`
    pub async fn mount(&self, server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/dns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "service_ids": [SERVICE_ID],
                "zones": [
                    {"domain_id": "41", "name": "example.org", "service_id": SERVICE_ID},
                    {"domain_id": DOMAIN_ID, "name": "example.com", "service_id": SERVICE_ID}
                ]
            })))
            .mount(server)
            .await;

        Mock::given(path_regex(r"^/service/7/dns/42(/records(/[^/]+)?)?$"))
            .respond_with(self.clone())
            .mount(server)
            .await;
    }

    /// Snapshot of the records currently stored
    pub fn records(&self) -> Vec<Value> {
        self.account.lock().unwrap().records.clone()
    }
}

impl Respond for FakeDnsServices {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let authorized = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == self.authorization);
        if !authorized {
            return ResponseTemplate::new(401).set_body_json(json!({"error": "unauthorized"}));
        }

        let mut account = self.account.lock().unwrap();
        let records_path = format!("/service/{SERVICE_ID}/dns/{DOMAIN_ID}/records");

        match (request.method.as_str(), request.url.path()) {
            ("POST", p) if p == records_path => {
                let Ok(mut record) = serde_json::from_slice::<Value>(&request.body) else {
                    return ResponseTemplate::new(400);
                };
                account.next_id += 1;
                record["id"] = json!(account.next_id.to_string());
                account.records.push(record.clone());
                ResponseTemplate::new(200).set_body_json(json!({
                    "success": true,
                    "record": record
                }))
            }
            ("GET", p) if p == format!("/service/{SERVICE_ID}/dns/{DOMAIN_ID}") => {
                ResponseTemplate::new(200).set_body_json(json!({
                    "service_id": SERVICE_ID.parse::<u64>().unwrap(),
                    "name": "example.com",
                    "records": account.records
                }))
            }
            ("DELETE", p) if p.starts_with(&records_path) => {
                let id = p.rsplit('/').next().unwrap_or_default().to_string();
                let before = account.records.len();
                account.records.retain(|r| r["id"].as_str() != Some(id.as_str()));
                if account.records.len() < before {
                    ResponseTemplate::new(200).set_body_json(json!({"success": true}))
                } else {
                    ResponseTemplate::new(404)
                }
            }
            _ => ResponseTemplate::new(404),
        }
    }
}
