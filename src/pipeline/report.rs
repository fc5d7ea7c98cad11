// src/pipeline/report.rs
//! Report builder.
//!
//! Pure functions that serialize a verification outcome or batch summary into
//! a canonical JSON document suitable for download. Reports carry the full
//! stage trail and every decision-relevant score — similarity, bit error
//! rate, match flags — so a report can be audited without re-running the
//! pipeline. No network, no clock, no state: the same input always produces
//! the same document.

use crate::models::outcome::{BatchSummary, VerificationOutcome};
use serde_json::{json, Value};

/// Report format version stamped into every document.
const REPORT_VERSION: &str = "1.0";

/// Builds the canonical report document for one verification outcome.
pub fn item_report(outcome: &VerificationOutcome) -> Value {
    json!({
        "reportType": "verification-outcome",
        "reportVersion": REPORT_VERSION,
        "subject": {
            "artifactName": outcome.artifact_name,
            "credentialId": outcome.credential_id(),
        },
        "codePayload": outcome.code_payload(),
        "outcome": outcome,
    })
}

/// Builds the canonical report document for a whole batch.
pub fn batch_report(summary: &BatchSummary) -> Value {
    json!({
        "reportType": "batch-summary",
        "reportVersion": REPORT_VERSION,
        "totals": {
            "totalProcessed": summary.total_processed,
            "verifiedCount": summary.verified_count,
            "unverifiedCount": summary.unverified_count,
            "errorCount": summary.error_count,
            "rejectedCount": summary.rejected.len(),
        },
        "summary": summary,
    })
}

/// Deterministic download name for an item report.
///
/// Named from the subject's credential ID when one was decoded, falling back
/// to a sanitized artifact name.
pub fn item_report_file_name(outcome: &VerificationOutcome) -> String {
    let subject = outcome
        .credential_id()
        .map(str::to_string)
        .unwrap_or_else(|| sanitize(&outcome.artifact_name));
    format!("verification-report-{}.json", sanitize(&subject))
}

/// Deterministic download name for a batch report.
pub fn batch_report_file_name(summary: &BatchSummary) -> String {
    format!("batch-verification-report-{}-items.json", summary.total_processed)
}

/// Renders a report document as a canonical UTF-8 JSON string.
pub fn to_canonical_json(report: &Value) -> String {
    // serde_json keeps map insertion order, so identical inputs always
    // render byte-identically.
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Keeps file names to a conservative character set.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::models::outcome::{FinalStatus, OutcomeDetail, RejectedArtifact};
    use crate::models::payload::{QrPayload, RevocationStatus, SteganographyResult};

    fn verified_document_outcome() -> VerificationOutcome {
        let mut outcome = VerificationOutcome::document("cert.pdf");
        outcome.document_detail_mut().qr_payload = Some(QrPayload {
            credential_id: "CRED-7".into(),
            credential_hash: None,
            learner_id: Some("L1".into()),
            learner_name: None,
            issuer_name: None,
            issued_date: None,
        });
        outcome.finish(FinalStatus::Verified);
        outcome
    }

    #[test]
    fn item_report_includes_stage_trail() {
        let report = item_report(&verified_document_outcome());
        assert_eq!(report["reportType"], "verification-outcome");
        assert_eq!(report["subject"]["credentialId"], "CRED-7");
        // The stage trail must be present, not just the final verdict.
        assert_eq!(report["outcome"]["detail"]["stages"]["extraction"], "pending");
        assert_eq!(report["outcome"]["finalStatus"], "verified");
        assert_eq!(report["codePayload"]["kind"], "qr");
    }

    #[test]
    fn item_report_surfaces_stego_diagnostics() {
        let mut outcome = VerificationOutcome::steganography("img.png");
        if let OutcomeDetail::Steganography(detail) = &mut outcome.detail {
            detail.result = Some(SteganographyResult {
                extraction_success: true,
                bit_error_rate: 0.04,
                blocks_read: 52,
                signature_valid: true,
                anchor_verified: false,
                similarity_score: 91.5,
                revocation_status: RevocationStatus::Active,
                credential_id: Some("CRED-8".into()),
            });
        }
        outcome.finish(FinalStatus::Verified);

        let report = item_report(&outcome);
        let result = &report["outcome"]["detail"]["result"];
        assert_eq!(result["similarityScore"], 91.5);
        assert_eq!(result["bitErrorRate"], 0.04);
        assert_eq!(result["blocksRead"], 52);
    }

    #[test]
    fn error_outcome_report_carries_kind_and_message() {
        let mut outcome = VerificationOutcome::document("broken.pdf");
        outcome.fail(&PipelineError::Extraction {
            detail: "socket closed".into(),
        });
        let report = item_report(&outcome);
        assert_eq!(report["outcome"]["errorKind"], "extraction");
        assert_eq!(report["outcome"]["errorMessage"], "OCR extraction failed");
    }

    #[test]
    fn batch_report_totals_mirror_summary() {
        let mut err_outcome = VerificationOutcome::document("b.pdf");
        err_outcome.fail(&PipelineError::Decode {
            detail: "bad gateway".into(),
        });
        let summary = BatchSummary::from_outcomes(
            vec![verified_document_outcome(), err_outcome],
            vec![RejectedArtifact {
                name: "big.pdf".into(),
                reason: "too large".into(),
            }],
        );
        let report = batch_report(&summary);
        assert_eq!(report["totals"]["totalProcessed"], 2);
        assert_eq!(report["totals"]["verifiedCount"], 1);
        assert_eq!(report["totals"]["errorCount"], 1);
        assert_eq!(report["totals"]["rejectedCount"], 1);
    }

    #[test]
    fn file_name_uses_credential_id_when_present() {
        let name = item_report_file_name(&verified_document_outcome());
        assert_eq!(name, "verification-report-CRED-7.json");
    }

    #[test]
    fn file_name_sanitizes_artifact_fallback() {
        let outcome = VerificationOutcome::document("scan (final) v2.pdf");
        let name = item_report_file_name(&outcome);
        assert_eq!(name, "verification-report-scan--final--v2-pdf.json");
    }

    #[test]
    fn canonical_rendering_is_deterministic() {
        let outcome = verified_document_outcome();
        let a = to_canonical_json(&item_report(&outcome));
        let b = to_canonical_json(&item_report(&outcome));
        assert_eq!(a, b);
    }
}
