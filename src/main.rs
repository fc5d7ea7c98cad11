// src/main.rs

//! # Credential Verification Pipeline - Main Entry Point
//!
//! This module serves as the main entry point for the credential verification
//! backend. It wires the adapter clients to the pipeline components and
//! starts the API server.
//!
//! ## Architecture Overview
//! 1. **Adapter Layer**: HTTP clients for OCR, QR decoding, steganographic
//!    auto-verification, the credential registry and the verified-credential
//!    recorder
//! 2. **Pipeline Layer**: validator, match engine, single-item verifier,
//!    batch orchestrator, report builder
//! 3. **Service Layer**: Axum REST API consumed by the dashboard
//!
//! ## Environment Variables
//! - `OCR_SERVICE_URL`: Base URL of the OCR extraction service
//! - `QR_SERVICE_URL`: Base URL of the QR decode service
//! - `STEGO_SERVICE_URL`: Base URL of the steganography auto-verify service
//! - `REGISTRY_URL`: Base URL of the credential registry
//! - `RECORDER_URL`: Base URL of the verified-credential recorder
//! - `SIMILARITY_THRESHOLD`: (Optional) Steganography verification threshold,
//!   0-100 (default: 85)
//! - `CHECK_REVOCATION`: (Optional) Fail revoked credentials (default: true)
//! - `MAX_ARTIFACT_BYTES`: (Optional) Artifact size ceiling (default: 10 MiB)
//! - `BIND_ADDR`: (Optional) Listen address (default: 127.0.0.1:3000)

use crate::adapters::ocr_client::OcrClient;
use crate::adapters::qr_client::QrClient;
use crate::adapters::recorder_client::RecorderClient;
use crate::adapters::registry_client::RegistryClient;
use crate::adapters::stego_client::StegoClient;
use crate::pipeline::batch::BatchOrchestrator;
use crate::pipeline::item_verifier::ItemVerifier;
use crate::pipeline::match_engine::{LearnerIdPolicy, StegoDecisionPolicy};
use crate::pipeline::validator::{ArtifactValidator, DEFAULT_MAX_ARTIFACT_BYTES};
use crate::services::api_server::ApiServer;
use anyhow::Context;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;

// Module declarations (organized by functional domain)
mod adapters;  // HTTP clients for the external collaborators
mod error;     // Pipeline error taxonomy
mod models;    // Data structures
mod pipeline;  // Core verification logic
mod services;  // REST API

/// Reads an optional environment variable, parsed into `T`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Main application entry point.
///
/// # Initialization Sequence
/// 1. Load environment configuration
/// 2. Construct adapter clients
/// 3. Wire pipeline components
/// 4. Start API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::init();

    // Downstream service endpoints
    let ocr_url = std::env::var("OCR_SERVICE_URL").context("OCR_SERVICE_URL must be set")?;
    let qr_url = std::env::var("QR_SERVICE_URL").context("QR_SERVICE_URL must be set")?;
    let stego_url = std::env::var("STEGO_SERVICE_URL").context("STEGO_SERVICE_URL must be set")?;
    let registry_url = std::env::var("REGISTRY_URL").context("REGISTRY_URL must be set")?;
    let recorder_url = std::env::var("RECORDER_URL").context("RECORDER_URL must be set")?;

    // Decision knobs
    let similarity_threshold: f64 = env_or("SIMILARITY_THRESHOLD", 85.0)?;
    let check_revocation: bool = env_or("CHECK_REVOCATION", true)?;
    let max_artifact_bytes: u64 = env_or("MAX_ARTIFACT_BYTES", DEFAULT_MAX_ARTIFACT_BYTES)?;
    let bind_addr: SocketAddr = env_or("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?;

    // Wire pipeline components
    let verifier = ItemVerifier::new(
        OcrClient::new(&ocr_url),
        QrClient::new(&qr_url),
        StegoClient::new(&stego_url),
        RegistryClient::new(&registry_url),
        RecorderClient::new(&recorder_url),
        Arc::new(LearnerIdPolicy),
        StegoDecisionPolicy {
            similarity_threshold,
            check_revocation,
        },
    );
    let validator = ArtifactValidator::new(max_artifact_bytes);
    let orchestrator = BatchOrchestrator::new(verifier.clone(), validator);

    let api_server = Arc::new(ApiServer::new(verifier, orchestrator, validator));

    log::info!("verification API listening on http://{}", bind_addr);
    log::info!("endpoints: POST /verify-certificate, POST /verify-batch, POST /auto-verify-image, POST /build-report, GET /health");

    api_server.run(bind_addr).await;
    Ok(())
}
