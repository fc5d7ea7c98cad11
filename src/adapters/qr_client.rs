// src/adapters/qr_client.rs
//! QR-code decode adapter client.
//!
//! Client for the external decode service that scans a certificate document
//! for a visible QR code and returns its payload. A document with no code at
//! all is a distinguished condition (`DecodeNotFound`) carrying the service's
//! human-readable reason, and must not be confused with a broken decode call.

use crate::error::PipelineError;
use crate::models::artifact::CertificateArtifact;
use crate::models::payload::QrPayload;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

/// Error body the decode service returns alongside a 404.
#[derive(Deserialize)]
struct NotFoundBody {
    detail: String,
}

/// Client for the QR decode service.
#[derive(Clone)]
pub struct QrClient {
    http: reqwest::Client,
    base_url: String,
}

impl QrClient {
    /// Creates a new QR decode client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the decode service, without trailing slash
    pub fn new(base_url: &str) -> Self {
        QrClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Decodes the QR code embedded in a certificate document.
    ///
    /// # Arguments
    /// * `artifact` - The document to scan
    /// * `bearer` - Bearer credential supplied by the caller
    ///
    /// # Errors
    /// - `DecodeNotFound` when the service answers 404; the reason string is
    ///   taken from the service's `detail` field (falling back to the raw
    ///   body) and propagated verbatim
    /// - `Decode` for any other failure, with a generic message
    pub async fn decode(
        &self,
        artifact: &CertificateArtifact,
        bearer: &str,
    ) -> Result<QrPayload, PipelineError> {
        let body = json!({
            "fileName": artifact.name,
            "contentBase64": base64::encode(&artifact.data),
        });

        let response = self
            .http
            .post(format!("{}/qr/decode", self.base_url))
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Decode {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let raw = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<NotFoundBody>(&raw)
                .map(|b| b.detail)
                .unwrap_or(raw);
            return Err(PipelineError::DecodeNotFound { reason });
        }
        if !status.is_success() {
            return Err(PipelineError::Decode {
                detail: format!("decode service returned {}", status),
            });
        }

        response
            .json::<QrPayload>()
            .await
            .map_err(|e| PipelineError::Decode {
                detail: format!("unparseable decode response: {}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact::Modality;
    use mockito::Matcher;

    fn pdf_artifact(name: &str) -> CertificateArtifact {
        CertificateArtifact::new(
            name,
            "application/pdf",
            Modality::Document,
            b"%PDF-1.4".to_vec(),
        )
    }

    fn mock_decode_for(file_name: &str) -> mockito::Mock {
        mockito::mock("POST", "/qr/decode").match_body(Matcher::PartialJsonString(
            format!(r#"{{"fileName":"{}"}}"#, file_name),
        ))
    }

    #[tokio::test]
    async fn decode_parses_payload() {
        let _m = mock_decode_for("with-code.pdf")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"credentialId":"CRED-42","learnerId":"L1"}"#)
            .create();

        let client = QrClient::new(&mockito::server_url());
        let payload = client
            .decode(&pdf_artifact("with-code.pdf"), "token")
            .await
            .unwrap();
        assert_eq!(payload.credential_id, "CRED-42");
        assert_eq!(payload.learner_id.as_deref(), Some("L1"));
    }

    #[tokio::test]
    async fn not_found_carries_service_reason() {
        let _m = mock_decode_for("blank.pdf")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"No QR codes found in PDF"}"#)
            .create();

        let client = QrClient::new(&mockito::server_url());
        let err = client
            .decode(&pdf_artifact("blank.pdf"), "token")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::DecodeNotFound { .. }));
        assert_eq!(err.to_string(), "No QR codes found in PDF");
    }

    #[tokio::test]
    async fn other_failures_map_to_generic_decode_error() {
        let _m = mock_decode_for("broken.pdf").with_status(502).create();

        let client = QrClient::new(&mockito::server_url());
        let err = client
            .decode(&pdf_artifact("broken.pdf"), "token")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }
}
