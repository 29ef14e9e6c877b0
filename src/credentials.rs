// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Credential resolution for the dns.services API.
//!
//! Credentials are resolved once per Present / `CleanUp` call and dropped when the
//! call returns. They are read either from Kubernetes Secrets in the challenge's
//! resource namespace or straight from the inline solver config.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::errors::SolverError;
use crate::solver_config::{SecretKeySelector, SolverConfig};

/// Username / password pair for HTTP Basic Auth.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    /// Account email or username
    pub username: String,
    /// Account password
    pub password: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("username", &self.username)
            .field("password", &"*******")
            .finish()
    }
}

impl ProviderCredentials {
    /// Build credentials, rejecting empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::AuthMissing`] if either field is empty.
    pub fn new(username: String, password: String) -> Result<Self, SolverError> {
        if username.is_empty() {
            return Err(SolverError::AuthMissing { field: "username" });
        }
        if password.is_empty() {
            return Err(SolverError::AuthMissing { field: "password" });
        }
        Ok(Self { username, password })
    }
}

/// Raw Secret data, key to decoded bytes.
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Read access to Kubernetes Secrets.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch the data of a Secret, or `None` if it does not exist.
    async fn get_secret(&self, namespace: &str, name: &str)
        -> Result<Option<SecretData>, SolverError>;
}

/// [`SecretSource`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeSecretSource {
    client: Client,
}

impl KubeSecretSource {
    /// Create a source that reads Secrets with `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretSource for KubeSecretSource {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<SecretData>, SolverError> {
        let secret_api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let secret = secret_api
            .get_opt(name)
            .await
            .map_err(|source| SolverError::Kube {
                name: name.to_string(),
                namespace: namespace.to_string(),
                source,
            })?;

        Ok(secret.map(|secret| {
            secret
                .data
                .unwrap_or_default()
                .into_iter()
                .map(|(key, value)| (key, value.0))
                .collect()
        }))
    }
}

/// Resolve the credentials for one challenge.
///
/// For the Secret-reference variant each selector's Secret is read from
/// `namespace`; a Secret shared by both selectors is fetched once.
///
/// # Errors
///
/// - [`SolverError::SecretNotFound`] if a referenced Secret does not exist
/// - [`SolverError::SecretKeyNotFound`] if a referenced key is absent
/// - [`SolverError::AuthMissing`] if the username or password is empty
/// - [`SolverError::Kube`] if the Kubernetes API call fails
pub async fn resolve_credentials(
    secrets: &dyn SecretSource,
    namespace: &str,
    config: &SolverConfig,
) -> Result<ProviderCredentials, SolverError> {
    match config {
        SolverConfig::Inline(inline) => {
            debug!(username = %inline.email, "Using inline dns.services credentials");
            ProviderCredentials::new(
                inline.email.trim().to_string(),
                inline.password.trim().to_string(),
            )
        }
        SolverConfig::SecretRef(refs) => {
            let username_data =
                fetch_secret(secrets, namespace, &refs.username_secret_ref.name).await?;
            let password_data = if refs.password_secret_ref.name == refs.username_secret_ref.name {
                username_data.clone()
            } else {
                fetch_secret(secrets, namespace, &refs.password_secret_ref.name).await?
            };

            let username = read_key(&username_data, namespace, &refs.username_secret_ref)?;
            let password = read_key(&password_data, namespace, &refs.password_secret_ref)?;

            debug!(
                namespace = %namespace,
                username_secret = %refs.username_secret_ref.name,
                password_secret = %refs.password_secret_ref.name,
                username = %username,
                "Resolved dns.services credentials from secrets"
            );

            ProviderCredentials::new(username, password)
        }
    }
}

async fn fetch_secret(
    secrets: &dyn SecretSource,
    namespace: &str,
    name: &str,
) -> Result<SecretData, SolverError> {
    secrets
        .get_secret(namespace, name)
        .await?
        .ok_or_else(|| SolverError::SecretNotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        })
}

fn read_key(
    data: &SecretData,
    namespace: &str,
    selector: &SecretKeySelector,
) -> Result<String, SolverError> {
    let bytes = data
        .get(&selector.key)
        .ok_or_else(|| SolverError::SecretKeyNotFound {
            name: selector.name.clone(),
            namespace: namespace.to_string(),
            key: selector.key.clone(),
        })?;

    Ok(String::from_utf8_lossy(bytes).trim().to_string())
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod credentials_tests;
