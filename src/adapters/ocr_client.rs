// src/adapters/ocr_client.rs
//! OCR extraction adapter client.
//!
//! Thin HTTP client for the external OCR service that turns a certificate
//! document into structured `ExtractedClaims`. The pipeline never performs
//! OCR itself; this client is the only way claims enter the system.

use crate::error::PipelineError;
use crate::models::artifact::CertificateArtifact;
use crate::models::claims::ExtractedClaims;
use serde_json::json;

/// Client for the OCR extraction service.
///
/// Holds a pooled `reqwest::Client`; cloning shares the connection pool.
#[derive(Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    base_url: String,
}

impl OcrClient {
    /// Creates a new OCR client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the OCR service, without trailing slash
    pub fn new(base_url: &str) -> Self {
        OcrClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Extracts structured claims from a certificate document.
    ///
    /// The document travels as raw base64 (no data-URI prefix) inside the
    /// JSON body.
    ///
    /// # Arguments
    /// * `artifact` - The document to extract from
    /// * `bearer` - Bearer credential supplied by the caller
    ///
    /// # Errors
    /// Every failure mode (transport, non-2xx status, unparseable body) maps
    /// to `PipelineError::Extraction`; callers surface the fixed
    /// "OCR extraction failed" message and the detail goes to logs.
    pub async fn extract(
        &self,
        artifact: &CertificateArtifact,
        bearer: &str,
    ) -> Result<ExtractedClaims, PipelineError> {
        let body = json!({
            "fileName": artifact.name,
            "contentBase64": base64::encode(&artifact.data),
        });

        let response = self
            .http
            .post(format!("{}/ocr/extract", self.base_url))
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Extraction {
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PipelineError::Extraction {
                detail: format!("OCR service returned {}", response.status()),
            });
        }

        response
            .json::<ExtractedClaims>()
            .await
            .map_err(|e| PipelineError::Extraction {
                detail: format!("unparseable OCR response: {}", e),
            })
    }
}
