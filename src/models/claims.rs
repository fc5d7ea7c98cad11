// src/models/claims.rs
//! OCR-extracted claims data model.
//!
//! `ExtractedClaims` is the structured output of the OCR adapter for the
//! document modality. It is produced once per artifact, consumed only by the
//! match engine, and never mutated after creation.

use serde::{Deserialize, Serialize};

/// Claims extracted from a certificate document by OCR.
///
/// All identity fields are optional: OCR is best-effort and may fail to
/// locate any given field on the page. The match engine treats a missing
/// learner ID as a non-match, never as a wildcard.
///
/// # Fields
/// - `learner_id`: learner identifier printed on the certificate
/// - `learner_name`: learner's full name
/// - `credential_title`: title of the awarded credential
/// - `issuer_name`: issuing body
/// - `issued_date` / `expiry_date`: dates as printed (kept as text; OCR
///   output is not normalized to a calendar type)
/// - `skills`: skill tags listed on the certificate
/// - `nsqf_level`: National Skills Qualification Framework level, if printed
/// - `confidence_score`: OCR engine confidence in the extraction (0.0–1.0)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedClaims {
    pub learner_id: Option<String>,
    pub learner_name: Option<String>,
    pub credential_title: Option<String>,
    pub issuer_name: Option<String>,
    pub issued_date: Option<String>,
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub nsqf_level: Option<u8>,
    pub confidence_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_service_payload() {
        let json = r#"{
            "learnerId": "L-9321",
            "learnerName": "Asha Verma",
            "credentialTitle": "Welding Level 4",
            "issuerName": "NSDC",
            "issuedDate": "2024-03-11",
            "skills": ["arc welding", "safety"],
            "nsqfLevel": 4,
            "confidenceScore": 0.93
        }"#;
        let claims: ExtractedClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.learner_id.as_deref(), Some("L-9321"));
        assert_eq!(claims.skills.len(), 2);
        assert_eq!(claims.nsqf_level, Some(4));
        assert!(claims.expiry_date.is_none());
    }

    #[test]
    fn skills_default_to_empty() {
        let claims: ExtractedClaims =
            serde_json::from_str(r#"{"confidenceScore": 0.5}"#).unwrap();
        assert!(claims.skills.is_empty());
        assert!(claims.learner_id.is_none());
    }
}
