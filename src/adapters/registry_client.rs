// src/adapters/registry_client.rs
//! Credential registry client.
//!
//! Read-only client for the authoritative, blockchain-anchored credential
//! registry. The pipeline fetches a record by the credential ID decoded from
//! an artifact (or by blockchain hash) and treats the returned snapshot as
//! the source of truth for matching.

use crate::error::PipelineError;
use crate::models::record::CredentialRecord;

/// Client for the external credential registry.
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Creates a new registry client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the registry service, without trailing slash
    pub fn new(base_url: &str) -> Self {
        RegistryClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the authoritative record for a credential ID.
    ///
    /// # Errors
    /// Any failure (unknown credential, unreachable registry, bad payload)
    /// maps to `PipelineError::RegistryLookup`.
    pub async fn fetch_by_id(
        &self,
        credential_id: &str,
        bearer: &str,
    ) -> Result<CredentialRecord, PipelineError> {
        self.fetch(format!("{}/credentials/{}", self.base_url, credential_id), bearer)
            .await
    }

    /// Fetches the authoritative record by blockchain hash.
    ///
    /// # Errors
    /// Same mapping as [`RegistryClient::fetch_by_id`].
    pub async fn fetch_by_hash(
        &self,
        credential_hash: &str,
        bearer: &str,
    ) -> Result<CredentialRecord, PipelineError> {
        self.fetch(
            format!("{}/credentials/hash/{}", self.base_url, credential_hash),
            bearer,
        )
        .await
    }

    async fn fetch(&self, url: String, bearer: &str) -> Result<CredentialRecord, PipelineError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| PipelineError::RegistryLookup {
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PipelineError::RegistryLookup {
                detail: format!("registry returned {}", response.status()),
            });
        }

        response
            .json::<CredentialRecord>()
            .await
            .map_err(|e| PipelineError::RegistryLookup {
                detail: format!("unparseable registry response: {}", e),
            })
    }
}
