// src/pipeline/match_engine.rs
//! Match engine: compares extracted claims against registry records.
//!
//! Two policies, one per modality:
//! - document: deterministic field equality, expressed as a named strategy
//!   behind [`DocumentMatchPolicy`] so the matching rule stays swappable and
//!   testable rather than inlined into the verifier
//! - steganography: threshold decision over the similarity score plus the
//!   signature and revocation flags

use crate::models::claims::ExtractedClaims;
use crate::models::outcome::{FinalStatus, MatchVerdict};
use crate::models::payload::{RevocationStatus, SteganographyResult};
use crate::models::record::CredentialRecord;

/// Strategy for comparing document-modality claims against a registry record.
pub trait DocumentMatchPolicy: Send + Sync {
    /// Computes the verdict for one (claims, record) pair.
    fn evaluate(&self, claims: &ExtractedClaims, record: &CredentialRecord) -> MatchVerdict;
}

/// Current production policy: learner ID equality is the sole authoritative
/// check.
///
/// `learner_id_match` holds iff both sides carry a learner ID and the IDs are
/// equal; a missing ID on either side is a non-match. The four other named
/// checks are recorded as `true` without being evaluated — they are
/// informational placeholders carried for the report, not decision inputs.
/// Whether they should eventually be evaluated is an open policy question
/// tracked in DESIGN.md.
pub struct LearnerIdPolicy;

impl DocumentMatchPolicy for LearnerIdPolicy {
    fn evaluate(&self, claims: &ExtractedClaims, record: &CredentialRecord) -> MatchVerdict {
        let learner_id_match = match (&claims.learner_id, &record.learner_id) {
            (Some(ocr), Some(registry)) => ocr == registry,
            _ => false,
        };

        MatchVerdict {
            learner_id_match,
            learner_name_match: true,
            credential_title_match: true,
            issuer_name_match: true,
            issued_date_match: true,
            overall_match: learner_id_match,
        }
    }
}

/// Decision policy for the steganography modality.
///
/// An image verifies iff the similarity score clears the threshold, the
/// embedded signature is valid, and (when revocation checking is enabled)
/// the credential is not revoked. Bit error rate and blocks read never enter
/// the decision; they are surfaced as diagnostics only.
#[derive(Clone, Copy, Debug)]
pub struct StegoDecisionPolicy {
    /// Minimum similarity score (0–100) for a verified verdict
    pub similarity_threshold: f64,
    /// Whether a revoked credential fails verification
    pub check_revocation: bool,
}

impl StegoDecisionPolicy {
    /// Applies the policy to one decode result.
    pub fn decide(&self, result: &SteganographyResult) -> FinalStatus {
        let similar = result.similarity_score >= self.similarity_threshold;
        let not_revoked =
            !self.check_revocation || result.revocation_status != RevocationStatus::Revoked;

        if similar && result.signature_valid && not_revoked {
            FinalStatus::Verified
        } else {
            FinalStatus::Unverified
        }
    }
}
