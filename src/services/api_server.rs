// src/services/api_server.rs
//! API Server for the Credential Verification Pipeline
//!
//! This module provides the REST API interface the dashboard calls to verify
//! uploaded certificates. The API is built using Axum and includes endpoints
//! for:
//! - Single certificate document verification (OCR + QR modality)
//! - Batch document verification
//! - Steganographic image auto-verification
//! - Auditable JSON report generation
//!
//! Authentication is not managed here: every request must carry a bearer
//! credential issued by the external identity layer, and the pipeline passes
//! it through to the downstream services unchanged. Uploaded files arrive as
//! raw base64 (no data-URI prefix) inside JSON bodies.

use crate::models::artifact::{CertificateArtifact, Modality};
use crate::models::outcome::{BatchSummary, FinalStatus, VerificationOutcome};
use crate::pipeline::batch::BatchOrchestrator;
use crate::pipeline::item_verifier::ItemVerifier;
use crate::pipeline::report;
use crate::pipeline::validator::ArtifactValidator;
use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// API request and response structures

/// One uploaded artifact as it crosses the HTTP boundary.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyArtifactRequest {
    file_name: String,
    /// Raw base64 file contents, no data-URI prefix
    content_base64: String,
    mime_type: Option<String>,
}

/// Request payload for batch verification.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyBatchRequest {
    artifacts: Vec<VerifyArtifactRequest>,
}

/// Request payload for report building: either a single outcome or a whole
/// batch summary, exactly as a verification endpoint returned it.
#[derive(Deserialize)]
#[serde(untagged)]
enum BuildReportRequest {
    Batch(BatchSummary),
    Item(VerificationOutcome),
}

/// Response carrying a built report and its deterministic download name.
/// `content` is the canonical UTF-8 rendering, byte-for-byte what the client
/// should save under `file_name`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildReportResponse {
    file_name: String,
    content: String,
}

/// API server state containing the pipeline components.
pub struct ApiServer {
    /// Single-item verifier shared by both modalities
    verifier: Arc<ItemVerifier>,

    /// Batch orchestrator for document batches
    orchestrator: Arc<BatchOrchestrator>,

    /// Validator applied before any pipeline entry
    validator: ArtifactValidator,
}

impl ApiServer {
    /// Creates a new instance of the API server.
    ///
    /// # Arguments
    /// * `verifier` - Single-item verifier
    /// * `orchestrator` - Batch orchestrator
    /// * `validator` - Artifact validator
    pub fn new(
        verifier: ItemVerifier,
        orchestrator: BatchOrchestrator,
        validator: ArtifactValidator,
    ) -> Self {
        ApiServer {
            verifier: Arc::new(verifier),
            orchestrator: Arc::new(orchestrator),
            validator,
        }
    }

    /// Builds the application router with all routes configured.
    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/verify-certificate", post(Self::verify_certificate_handler))
            .route("/verify-batch", post(Self::verify_batch_handler))
            .route("/auto-verify-image", post(Self::auto_verify_image_handler))
            .route("/build-report", post(Self::build_report_handler))
            .route("/health", get(Self::health_handler))
            .layer(CorsLayer::permissive())
            .with_state(self)
    }

    /// Starts the API server and begins listening for requests.
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    pub async fn run(self: Arc<Self>, addr: SocketAddr) {
        let app = Arc::clone(&self).router();
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, app).await.unwrap();
    }

    // =====================
    // Verification Handlers
    // =====================

    /// Verifies a single certificate document.
    ///
    /// # Endpoint
    /// POST /verify-certificate
    ///
    /// # Responses
    /// - 200 OK: Terminal outcome, `verified` or `unverified`
    /// - 400 Bad Request: Artifact rejected before pipeline entry
    /// - 401 Unauthorized: Missing bearer credential
    /// - 502 Bad Gateway: Pipeline error; a broken pipeline is not an
    ///   `unverified` verdict, so the outcome with its error detail comes
    ///   back under an error status
    async fn verify_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        Json(payload): Json<VerifyArtifactRequest>,
    ) -> impl IntoResponse {
        let bearer = match bearer_token(&headers) {
            Some(token) => token,
            None => return unauthorized(),
        };

        let artifact = match decode_artifact(&payload, Modality::Document) {
            Ok(artifact) => artifact,
            Err(reason) => return bad_request(reason),
        };
        if let Err(err) = state.validator.validate(&artifact) {
            return bad_request(err.to_string());
        }

        let outcome = state.verifier.verify_document(&artifact, &bearer).await;
        let status = if outcome.final_status == FinalStatus::Error {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::OK
        };
        (status, Json(json!(outcome))).into_response()
    }

    /// Verifies a batch of certificate documents.
    ///
    /// # Endpoint
    /// POST /verify-batch
    ///
    /// # Responses
    /// - 200 OK: Batch summary; per-item failures live inside the summary,
    ///   never as an HTTP error
    /// - 400 Bad Request: Undecodable request body
    /// - 401 Unauthorized: Missing bearer credential
    async fn verify_batch_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        Json(payload): Json<VerifyBatchRequest>,
    ) -> impl IntoResponse {
        let bearer = match bearer_token(&headers) {
            Some(token) => token,
            None => return unauthorized(),
        };

        let mut artifacts = Vec::with_capacity(payload.artifacts.len());
        for item in &payload.artifacts {
            match decode_artifact(item, Modality::Document) {
                Ok(artifact) => artifacts.push(artifact),
                Err(reason) => return bad_request(reason),
            }
        }

        let summary = state.orchestrator.run_batch(&artifacts, &bearer).await;
        (StatusCode::OK, Json(json!(summary))).into_response()
    }

    /// Auto-verifies a steganographed certificate image.
    ///
    /// # Endpoint
    /// POST /auto-verify-image
    ///
    /// # Responses
    /// Same contract as `/verify-certificate`, for the image modality.
    async fn auto_verify_image_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        Json(payload): Json<VerifyArtifactRequest>,
    ) -> impl IntoResponse {
        let bearer = match bearer_token(&headers) {
            Some(token) => token,
            None => return unauthorized(),
        };

        let artifact = match decode_artifact(&payload, Modality::SteganographicImage) {
            Ok(artifact) => artifact,
            Err(reason) => return bad_request(reason),
        };
        if let Err(err) = state.validator.validate(&artifact) {
            return bad_request(err.to_string());
        }

        let outcome = state.verifier.verify_image(&artifact, &bearer).await;
        let status = if outcome.final_status == FinalStatus::Error {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::OK
        };
        (status, Json(json!(outcome))).into_response()
    }

    // =====================
    // Report Handler
    // =====================

    /// Builds a downloadable JSON report from a previously returned outcome
    /// or batch summary.
    ///
    /// # Endpoint
    /// POST /build-report
    ///
    /// # Responses
    /// - 200 OK: Report document plus its deterministic file name
    async fn build_report_handler(
        Json(payload): Json<BuildReportRequest>,
    ) -> impl IntoResponse {
        let (file_name, document) = match &payload {
            BuildReportRequest::Batch(summary) => (
                report::batch_report_file_name(summary),
                report::batch_report(summary),
            ),
            BuildReportRequest::Item(outcome) => (
                report::item_report_file_name(outcome),
                report::item_report(outcome),
            ),
        };

        (
            StatusCode::OK,
            Json(BuildReportResponse {
                file_name,
                content: report::to_canonical_json(&document),
            }),
        )
    }

    // =====================
    // Health
    // =====================

    /// Liveness probe.
    ///
    /// # Endpoint
    /// GET /health
    async fn health_handler() -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        )
    }
}

/// Extracts the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Decodes an uploaded artifact from its transport representation.
fn decode_artifact(
    payload: &VerifyArtifactRequest,
    modality: Modality,
) -> Result<CertificateArtifact, String> {
    let data = base64::decode(&payload.content_base64)
        .map_err(|e| format!("{}: invalid base64 content: {}", payload.file_name, e))?;
    let mime = payload.mime_type.clone().unwrap_or_else(|| match modality {
        Modality::Document => "application/pdf".to_string(),
        Modality::SteganographicImage => "image/png".to_string(),
    });
    Ok(CertificateArtifact::new(
        payload.file_name.clone(),
        mime,
        modality,
        data,
    ))
}

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "missing bearer credential" })),
    )
        .into_response()
}

fn bad_request(reason: String) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ocr_client::OcrClient;
    use crate::adapters::qr_client::QrClient;
    use crate::adapters::recorder_client::RecorderClient;
    use crate::adapters::registry_client::RegistryClient;
    use crate::adapters::stego_client::StegoClient;
    use crate::pipeline::match_engine::{LearnerIdPolicy, StegoDecisionPolicy};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn server() -> Arc<ApiServer> {
        let url = mockito::server_url();
        let verifier = ItemVerifier::new(
            OcrClient::new(&url),
            QrClient::new(&url),
            StegoClient::new(&url),
            RegistryClient::new(&url),
            RecorderClient::new(&url),
            Arc::new(LearnerIdPolicy),
            StegoDecisionPolicy {
                similarity_threshold: 85.0,
                check_revocation: true,
            },
        );
        let orchestrator = BatchOrchestrator::new(verifier.clone(), ArtifactValidator::default());
        Arc::new(ApiServer::new(
            verifier,
            orchestrator,
            ArtifactValidator::default(),
        ))
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let app = server().router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_bearer_is_unauthorized() {
        let app = server().router();
        let body = json!({
            "fileName": "cert.pdf",
            "contentBase64": base64::encode(b"%PDF"),
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/verify-certificate")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_artifact_is_bad_request() {
        let app = server().router();
        let body = json!({
            "fileName": "cert.exe",
            "contentBase64": base64::encode(b"MZ"),
            "mimeType": "application/octet-stream",
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/verify-certificate")
                    .header("content-type", "application/json")
                    .header("authorization", "Bearer token")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn build_report_round_trips_an_outcome() {
        let app = server().router();
        let mut outcome = VerificationOutcome::document("cert.pdf");
        outcome.finish(FinalStatus::Unverified);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/build-report")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&outcome).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["fileName"], "verification-report-cert-pdf.json");
        let document: serde_json::Value =
            serde_json::from_str(parsed["content"].as_str().unwrap()).unwrap();
        assert_eq!(document["reportType"], "verification-outcome");
    }
}
