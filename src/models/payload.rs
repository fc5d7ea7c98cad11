// src/models/payload.rs
//! Decoded code payload data models.
//!
//! Exactly one payload is produced per artifact depending on its modality:
//! a `QrPayload` decoded from a visible QR code on a document, or a
//! `SteganographyResult` recovered from pixel-embedded data in an image.

use serde::{Deserialize, Serialize};

/// Payload decoded from a visible QR code on a certificate document.
///
/// Only `credential_id` is guaranteed; issuers embed the remaining fields
/// inconsistently. Whatever the QR carries is treated as a hint — once the
/// registry record is fetched, the registry is authoritative for every field
/// except what was physically decoded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub credential_id: String,
    pub credential_hash: Option<String>,
    pub learner_id: Option<String>,
    pub learner_name: Option<String>,
    pub issuer_name: Option<String>,
    pub issued_date: Option<String>,
}

/// Revocation status reported by the steganography auto-verify service.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RevocationStatus {
    Active,
    Revoked,
    Unknown,
}

/// Result of the combined steganographic auto-verify call.
///
/// The service identifies the issuer (OCR), looks up the issuer's embedding
/// secret, extracts the payload, and compares it bit-by-bit against the
/// expected payload reconstructed from the registry's credential hash.
///
/// Decision inputs: `similarity_score`, `signature_valid`,
/// `revocation_status`. Diagnostics only (surfaced for audit, never part of
/// the verdict): `extraction_success`, `bit_error_rate`, `blocks_read`,
/// `anchor_verified`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SteganographyResult {
    /// Whether the raw payload could be recovered from the image at all
    pub extraction_success: bool,

    /// Fraction of payload bits that differ from the expected payload (0.0–1.0)
    pub bit_error_rate: f64,

    /// Number of embedding blocks successfully read
    pub blocks_read: u32,

    /// Whether the embedded issuer signature verified
    pub signature_valid: bool,

    /// Whether the blockchain anchor for the credential hash verified
    pub anchor_verified: bool,

    /// Bit-level similarity between recovered and expected payload (0–100)
    pub similarity_score: f64,

    /// Revocation status as known to the service at decode time
    pub revocation_status: RevocationStatus,

    /// Credential ID recovered from the payload, when extraction succeeded
    pub credential_id: Option<String>,
}

/// Payload decoded from an artifact, tagged by modality.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CodePayload {
    Qr(QrPayload),
    Steganographic(SteganographyResult),
}
