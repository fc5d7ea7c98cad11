// src/models/record.rs
//! Authoritative credential record data model.
//!
//! A `CredentialRecord` is fetched from the external registry by credential
//! ID or blockchain hash. The registry owns it; the pipeline holds a
//! read-only snapshot for the duration of one verification.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a registered credential.
///
/// The registry's status vocabulary is open-ended; anything this client does
/// not recognize is carried through as `Other` so new statuses never break
/// deserialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum CredentialStatus {
    Issued,
    Confirmed,
    Revoked,
    Other(String),
}

impl From<String> for CredentialStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "issued" => CredentialStatus::Issued,
            "confirmed" => CredentialStatus::Confirmed,
            "revoked" => CredentialStatus::Revoked,
            _ => CredentialStatus::Other(raw),
        }
    }
}

impl From<CredentialStatus> for String {
    fn from(status: CredentialStatus) -> Self {
        match status {
            CredentialStatus::Issued => "issued".to_string(),
            CredentialStatus::Confirmed => "confirmed".to_string(),
            CredentialStatus::Revoked => "revoked".to_string(),
            CredentialStatus::Other(raw) => raw,
        }
    }
}

/// Authoritative credential record held by the registry.
///
/// Source of truth for every field during matching — OCR claims and QR
/// payloads are compared against it, never the other way round.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub credential_id: String,

    /// Registry learner ID; optional because legacy records predate the
    /// learner-ID rollout
    pub learner_id: Option<String>,

    pub learner_name: String,
    pub credential_title: String,
    pub issuer_name: String,
    pub issued_date: String,
    pub expiry_date: Option<String>,

    #[serde(default)]
    pub skill_tags: Vec<String>,

    pub nsqf_level: Option<u8>,

    /// Blockchain-anchored hash of the canonical credential document
    pub credential_hash: String,

    pub status: CredentialStatus,
}
