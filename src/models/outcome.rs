// src/models/outcome.rs
//! Verification outcome and batch summary data models.
//!
//! `VerificationOutcome` is the per-artifact result envelope shared by both
//! modalities; the modality-specific detail lives in a tagged variant rather
//! than one struct of loosely related optional fields. `BatchSummary` is the
//! immutable aggregate computed once a batch has finished.

use crate::error::PipelineError;
use crate::models::claims::ExtractedClaims;
use crate::models::payload::{CodePayload, QrPayload, SteganographyResult};
use crate::models::record::CredentialRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of one pipeline stage for the document modality.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Terminal (or in-flight) status of a whole verification.
///
/// `Unverified` and `Error` are distinct, user-visible states: a learner-ID
/// mismatch is not the same thing as a broken pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FinalStatus {
    Processing,
    Verified,
    Unverified,
    Error,
}

/// Stage trail for a document-modality verification.
///
/// Each field moves `pending -> processing -> completed | failed`; once a
/// stage fails, later stages stay `pending`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStages {
    pub extraction: StageStatus,
    pub code_decode: StageStatus,
    pub registry_fetch: StageStatus,
    pub matching: StageStatus,
}

impl Default for DocumentStages {
    fn default() -> Self {
        DocumentStages {
            extraction: StageStatus::Pending,
            code_decode: StageStatus::Pending,
            registry_fetch: StageStatus::Pending,
            matching: StageStatus::Pending,
        }
    }
}

/// Result of comparing extracted claims against the registry record.
///
/// `overall_match` is authoritative. The four non-learner-ID checks are
/// currently informational placeholders recorded as `true` without being
/// evaluated; see the match engine for the policy that fills this in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchVerdict {
    pub learner_id_match: bool,
    pub learner_name_match: bool,
    pub credential_title_match: bool,
    pub issuer_name_match: bool,
    pub issued_date_match: bool,
    pub overall_match: bool,
}

/// Document-modality detail: stage trail plus everything each stage produced.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutcome {
    pub stages: DocumentStages,
    pub claims: Option<ExtractedClaims>,
    pub qr_payload: Option<QrPayload>,
    pub record: Option<CredentialRecord>,
    pub verdict: Option<MatchVerdict>,
}

/// Steganography-modality detail.
///
/// The external service evaluates the image atomically, so there is no stage
/// trail; the full decode result is kept for audit (bit error rate and blocks
/// read are diagnostics the report must surface).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SteganographyOutcome {
    pub result: Option<SteganographyResult>,
    /// Registry record fetched for display purposes; absence is never fatal
    pub record: Option<CredentialRecord>,
}

/// Modality-specific portion of a verification outcome.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "modality", rename_all = "camelCase")]
pub enum OutcomeDetail {
    Document(DocumentOutcome),
    Steganography(SteganographyOutcome),
}

/// Per-artifact verification result.
///
/// Created when an artifact enters the pipeline, mutated only by the stage
/// that currently owns it, terminal once `final_status` leaves `Processing`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub artifact_name: String,
    pub final_status: FinalStatus,

    /// Stable error-kind label (see `PipelineError::kind`), set with
    /// `error_message` when `final_status` is `Error`
    pub error_kind: Option<String>,
    pub error_message: Option<String>,

    pub detail: OutcomeDetail,

    /// When the outcome reached a terminal status (audit only)
    pub completed_at: Option<DateTime<Utc>>,
}

impl VerificationOutcome {
    /// Fresh in-flight outcome for a document-modality artifact.
    pub fn document(artifact_name: impl Into<String>) -> Self {
        VerificationOutcome {
            artifact_name: artifact_name.into(),
            final_status: FinalStatus::Processing,
            error_kind: None,
            error_message: None,
            detail: OutcomeDetail::Document(DocumentOutcome::default()),
            completed_at: None,
        }
    }

    /// Fresh in-flight outcome for a steganographic-image artifact.
    pub fn steganography(artifact_name: impl Into<String>) -> Self {
        VerificationOutcome {
            artifact_name: artifact_name.into(),
            final_status: FinalStatus::Processing,
            error_kind: None,
            error_message: None,
            detail: OutcomeDetail::Steganography(SteganographyOutcome::default()),
            completed_at: None,
        }
    }

    /// Marks the outcome terminal with the given status.
    pub fn finish(&mut self, status: FinalStatus) {
        self.final_status = status;
        self.completed_at = Some(Utc::now());
    }

    /// Marks the outcome terminal as `Error`, recording the error's kind and
    /// user-visible message verbatim.
    pub fn fail(&mut self, err: &PipelineError) {
        self.error_kind = Some(err.kind().to_string());
        self.error_message = Some(err.to_string());
        self.finish(FinalStatus::Error);
    }

    /// Whether the outcome has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.final_status != FinalStatus::Processing
    }

    /// Mutable access to the document detail.
    ///
    /// # Panics
    /// Panics if called on a steganography outcome; the item verifier only
    /// calls this on outcomes it constructed with [`VerificationOutcome::document`].
    pub(crate) fn document_detail_mut(&mut self) -> &mut DocumentOutcome {
        match &mut self.detail {
            OutcomeDetail::Document(doc) => doc,
            OutcomeDetail::Steganography(_) => {
                unreachable!("document detail requested on steganography outcome")
            }
        }
    }

    /// The decoded payload in its modality-tagged form, if decoding got far
    /// enough to produce one. Reports surface this uniformly across
    /// modalities.
    pub fn code_payload(&self) -> Option<CodePayload> {
        match &self.detail {
            OutcomeDetail::Document(doc) => {
                doc.qr_payload.clone().map(CodePayload::Qr)
            }
            OutcomeDetail::Steganography(s) => {
                s.result.clone().map(CodePayload::Steganographic)
            }
        }
    }

    /// Credential ID this outcome settled on, if any stage produced one.
    pub fn credential_id(&self) -> Option<&str> {
        match &self.detail {
            OutcomeDetail::Document(doc) => doc
                .record
                .as_ref()
                .map(|r| r.credential_id.as_str())
                .or_else(|| doc.qr_payload.as_ref().map(|q| q.credential_id.as_str())),
            OutcomeDetail::Steganography(s) => s
                .record
                .as_ref()
                .map(|r| r.credential_id.as_str())
                .or_else(|| {
                    s.result
                        .as_ref()
                        .and_then(|r| r.credential_id.as_deref())
                }),
        }
    }
}

/// An artifact the validator refused before it entered the pipeline.
///
/// Rejected artifacts never get a `VerificationOutcome` and are not counted
/// in `BatchSummary::total_processed`; they are reported here instead.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RejectedArtifact {
    pub name: String,
    pub reason: String,
}

/// Immutable aggregate over one finished batch.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_processed: usize,
    pub verified_count: usize,
    pub unverified_count: usize,
    pub error_count: usize,
    pub outcomes: Vec<VerificationOutcome>,
    pub rejected: Vec<RejectedArtifact>,
}

impl BatchSummary {
    /// Folds terminal outcomes into a summary.
    ///
    /// Counts are derived from `final_status` alone, so the invariant
    /// `total_processed == verified + unverified + errors == outcomes.len()`
    /// holds by construction for any input of terminal outcomes.
    pub fn from_outcomes(
        outcomes: Vec<VerificationOutcome>,
        rejected: Vec<RejectedArtifact>,
    ) -> Self {
        let verified_count = outcomes
            .iter()
            .filter(|o| o.final_status == FinalStatus::Verified)
            .count();
        let unverified_count = outcomes
            .iter()
            .filter(|o| o.final_status == FinalStatus::Unverified)
            .count();
        let error_count = outcomes
            .iter()
            .filter(|o| o.final_status == FinalStatus::Error)
            .count();

        BatchSummary {
            total_processed: outcomes.len(),
            verified_count,
            unverified_count,
            error_count,
            outcomes,
            rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(name: &str, status: FinalStatus) -> VerificationOutcome {
        let mut outcome = VerificationOutcome::document(name);
        outcome.finish(status);
        outcome
    }

    #[test]
    fn summary_counts_partition_total() {
        let outcomes = vec![
            terminal("a.pdf", FinalStatus::Verified),
            terminal("b.pdf", FinalStatus::Error),
            terminal("c.pdf", FinalStatus::Unverified),
            terminal("d.pdf", FinalStatus::Verified),
        ];
        let summary = BatchSummary::from_outcomes(outcomes, vec![]);
        assert_eq!(summary.total_processed, 4);
        assert_eq!(summary.verified_count, 2);
        assert_eq!(summary.unverified_count, 1);
        assert_eq!(summary.error_count, 1);
        assert_eq!(
            summary.total_processed,
            summary.verified_count + summary.unverified_count + summary.error_count
        );
        assert_eq!(summary.total_processed, summary.outcomes.len());
    }

    #[test]
    fn rejected_artifacts_do_not_count_as_processed() {
        let summary = BatchSummary::from_outcomes(
            vec![terminal("a.pdf", FinalStatus::Verified)],
            vec![RejectedArtifact {
                name: "huge.pdf".into(),
                reason: "artifact exceeds size limit".into(),
            }],
        );
        assert_eq!(summary.total_processed, 1);
        assert_eq!(summary.rejected.len(), 1);
    }

    #[test]
    fn fail_records_kind_and_message() {
        let mut outcome = VerificationOutcome::document("a.pdf");
        let err = PipelineError::Extraction {
            detail: "timeout".into(),
        };
        outcome.fail(&err);
        assert_eq!(outcome.final_status, FinalStatus::Error);
        assert_eq!(outcome.error_kind.as_deref(), Some("extraction"));
        assert_eq!(outcome.error_message.as_deref(), Some("OCR extraction failed"));
        assert!(outcome.is_terminal());
        assert!(outcome.completed_at.is_some());
    }

    #[test]
    fn outcome_serializes_with_modality_tag() {
        let outcome = VerificationOutcome::steganography("img.png");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["detail"]["modality"], "steganography");
        assert_eq!(value["finalStatus"], "processing");
    }

    #[test]
    fn credential_id_falls_back_to_qr_payload() {
        let mut outcome = VerificationOutcome::document("a.pdf");
        {
            let doc = outcome.document_detail_mut();
            doc.qr_payload = Some(QrPayload {
                credential_id: "from-qr".into(),
                credential_hash: None,
                learner_id: None,
                learner_name: None,
                issuer_name: None,
                issued_date: None,
            });
        }
        assert_eq!(outcome.credential_id(), Some("from-qr"));
    }
}
