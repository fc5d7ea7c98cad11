// src/adapters/stego_client.rs
//! Steganography auto-verify adapter client.
//!
//! One call does the whole image evaluation server-side: OCR-based issuer
//! identification, embedding-secret lookup, payload extraction and bit-level
//! similarity scoring against the registry's credential hash. The pipeline
//! only interprets the returned scores; it never touches pixels.

use crate::error::PipelineError;
use crate::models::artifact::CertificateArtifact;
use crate::models::payload::SteganographyResult;
use serde_json::json;

/// Client for the steganography auto-verify service.
#[derive(Clone)]
pub struct StegoClient {
    http: reqwest::Client,
    base_url: String,
}

impl StegoClient {
    /// Creates a new auto-verify client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the service, without trailing slash
    pub fn new(base_url: &str) -> Self {
        StegoClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Runs the combined auto-verify evaluation on one image.
    ///
    /// # Arguments
    /// * `artifact` - The image to evaluate
    /// * `bearer` - Bearer credential supplied by the caller
    ///
    /// # Errors
    /// Transport and parse failures surface as `PipelineError::Transport`;
    /// the caller turns them into an `error` final status.
    pub async fn auto_verify(
        &self,
        artifact: &CertificateArtifact,
        bearer: &str,
    ) -> Result<SteganographyResult, PipelineError> {
        let body = json!({
            "fileName": artifact.name,
            "contentBase64": base64::encode(&artifact.data),
        });

        let response = self
            .http
            .post(format!("{}/stego/auto-verify", self.base_url))
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<SteganographyResult>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact::Modality;
    use mockito::Matcher;

    #[tokio::test]
    async fn auto_verify_parses_result() {
        let _m = mockito::mock("POST", "/stego/auto-verify")
            .match_body(Matcher::PartialJsonString(
                r#"{"fileName":"cert.png"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "extractionSuccess": true,
                    "bitErrorRate": 0.01,
                    "blocksRead": 64,
                    "signatureValid": true,
                    "anchorVerified": true,
                    "similarityScore": 99.0,
                    "revocationStatus": "active",
                    "credentialId": "CRED-9"
                }"#,
            )
            .create();

        let artifact = CertificateArtifact::new(
            "cert.png",
            "image/png",
            Modality::SteganographicImage,
            vec![0x89, 0x50, 0x4e, 0x47],
        );
        let client = StegoClient::new(&mockito::server_url());
        let result = client.auto_verify(&artifact, "token").await.unwrap();
        assert!(result.signature_valid);
        assert_eq!(result.blocks_read, 64);
        assert_eq!(result.credential_id.as_deref(), Some("CRED-9"));
    }
}
