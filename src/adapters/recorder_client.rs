// src/adapters/recorder_client.rs
//! Verified-credential recorder client.
//!
//! Best-effort write path: after a document verifies, the registry's
//! canonical fields are posted to the recorder so the learner's verified
//! wallet stays current. Failures here are logged and swallowed by the
//! pipeline; the verdict already stands.

use crate::error::PipelineError;
use crate::models::record::CredentialRecord;
use serde_json::json;

/// Client for the verified-credential recorder service.
#[derive(Clone)]
pub struct RecorderClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecorderClient {
    /// Creates a new recorder client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the recorder service, without trailing slash
    pub fn new(base_url: &str) -> Self {
        RecorderClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Records a verified credential from the registry's canonical fields.
    ///
    /// # Arguments
    /// * `record` - The registry snapshot that verified
    /// * `bearer` - Bearer credential supplied by the caller
    ///
    /// # Errors
    /// All failures map to `PipelineError::Recorder`. The item verifier
    /// never propagates this variant past the log line.
    pub async fn record(
        &self,
        record: &CredentialRecord,
        bearer: &str,
    ) -> Result<(), PipelineError> {
        let body = json!({
            "credentialId": record.credential_id,
            "learnerId": record.learner_id,
            "learnerName": record.learner_name,
            "credentialTitle": record.credential_title,
            "issuerName": record.issuer_name,
            "issuedDate": record.issued_date,
            "expiryDate": record.expiry_date,
            "skillTags": record.skill_tags,
            "nsqfLevel": record.nsqf_level,
            "credentialHash": record.credential_hash,
        });

        let response = self
            .http
            .post(format!("{}/verified-credentials", self.base_url))
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Recorder {
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PipelineError::Recorder {
                detail: format!("recorder returned {}", response.status()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::CredentialStatus;
    use mockito::Matcher;

    fn record_fixture() -> CredentialRecord {
        CredentialRecord {
            credential_id: "CRED-42".into(),
            learner_id: Some("L1".into()),
            learner_name: "Asha Verma".into(),
            credential_title: "Welding Level 4".into(),
            issuer_name: "NSDC".into(),
            issued_date: "2024-03-11".into(),
            expiry_date: None,
            skill_tags: vec!["arc welding".into()],
            nsqf_level: Some(4),
            credential_hash: "0xabc".into(),
            status: CredentialStatus::Confirmed,
        }
    }

    #[tokio::test]
    async fn record_posts_canonical_fields() {
        let m = mockito::mock("POST", "/verified-credentials")
            .match_body(Matcher::PartialJsonString(
                r#"{"credentialId":"CRED-42","learnerId":"L1"}"#.to_string(),
            ))
            .with_status(201)
            .create();

        let client = RecorderClient::new(&mockito::server_url());
        client.record(&record_fixture(), "token").await.unwrap();
        m.assert();
    }
}
