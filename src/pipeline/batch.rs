// src/pipeline/batch.rs
//! Batch orchestrator.
//!
//! Drives the single-item verifier over a set of document artifacts and folds
//! the outcomes into an immutable `BatchSummary`. Items are independent: a
//! failure in one is recorded in that item's outcome and never prevents the
//! rest of the batch from running. The loop is sequential by design — items
//! share no state, counters are computed once after every item is terminal,
//! and nothing here needs a lock.

use crate::models::artifact::{CertificateArtifact, Modality};
use crate::models::outcome::{BatchSummary, RejectedArtifact};
use crate::pipeline::item_verifier::ItemVerifier;
use crate::pipeline::validator::ArtifactValidator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation handle for a running batch.
///
/// Cancelling stops new items from being scheduled; the in-flight item always
/// runs to a terminal state, so no outcome is ever left at `processing`.
/// Unscheduled items appear in neither the outcomes nor the counters.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a fresh, uncancelled flag.
    pub fn new() -> Self {
        CancelFlag::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs batches of document verifications.
///
/// Steganography batches are not supported; image artifacts submitted in a
/// batch are rejected up front alongside anything else the validator refuses.
#[derive(Clone)]
pub struct BatchOrchestrator {
    verifier: ItemVerifier,
    validator: ArtifactValidator,
}

impl BatchOrchestrator {
    /// Creates an orchestrator over the given verifier and validator.
    pub fn new(verifier: ItemVerifier, validator: ArtifactValidator) -> Self {
        BatchOrchestrator {
            verifier,
            validator,
        }
    }

    /// Verifies every artifact in the batch, in input order.
    ///
    /// Equivalent to [`BatchOrchestrator::run_batch_cancellable`] with a flag
    /// that is never raised.
    pub async fn run_batch(
        &self,
        artifacts: &[CertificateArtifact],
        bearer: &str,
    ) -> BatchSummary {
        self.run_batch_cancellable(artifacts, bearer, &CancelFlag::new())
            .await
    }

    /// Verifies artifacts until done or cancelled.
    ///
    /// Per artifact: modality gate and validation first (rejections never
    /// enter the pipeline or the counters), then the single-item verifier.
    /// The verifier converts every per-item failure into an `error` outcome,
    /// so one broken item cannot halt the batch. Retries are a caller-level
    /// concern; no item is retried here.
    pub async fn run_batch_cancellable(
        &self,
        artifacts: &[CertificateArtifact],
        bearer: &str,
        cancel: &CancelFlag,
    ) -> BatchSummary {
        let mut outcomes = Vec::with_capacity(artifacts.len());
        let mut rejected = Vec::new();

        for artifact in artifacts {
            if cancel.is_cancelled() {
                log::info!(
                    "batch cancelled after {} of {} items",
                    outcomes.len() + rejected.len(),
                    artifacts.len()
                );
                break;
            }

            if artifact.modality != Modality::Document {
                rejected.push(RejectedArtifact {
                    name: artifact.name.clone(),
                    reason: "batch verification supports document artifacts only".to_string(),
                });
                continue;
            }

            if let Err(err) = self.validator.validate(artifact) {
                log::warn!("{}: rejected before pipeline entry: {}", artifact.name, err);
                rejected.push(RejectedArtifact {
                    name: artifact.name.clone(),
                    reason: err.to_string(),
                });
                continue;
            }

            let outcome = self.verifier.verify_document(artifact, bearer).await;
            debug_assert!(outcome.is_terminal());
            outcomes.push(outcome);
        }

        BatchSummary::from_outcomes(outcomes, rejected)
    }
}
