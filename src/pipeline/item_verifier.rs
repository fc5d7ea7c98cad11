// src/pipeline/item_verifier.rs
//! Single-item verifier.
//!
//! Drives one artifact through its modality's stages and produces a terminal
//! `VerificationOutcome`. Document verification is strictly sequential with
//! early exit on the first failing stage; steganographic images are evaluated
//! in one external call. The outcome is owned exclusively by this verifier
//! until it is terminal — nothing mutates it concurrently.

use crate::adapters::ocr_client::OcrClient;
use crate::adapters::qr_client::QrClient;
use crate::adapters::recorder_client::RecorderClient;
use crate::adapters::registry_client::RegistryClient;
use crate::adapters::stego_client::StegoClient;
use crate::error::PipelineError;
use crate::models::artifact::CertificateArtifact;
use crate::models::outcome::{FinalStatus, OutcomeDetail, StageStatus, VerificationOutcome};
use crate::models::payload::QrPayload;
use crate::models::record::CredentialRecord;
use crate::pipeline::match_engine::{DocumentMatchPolicy, StegoDecisionPolicy};
use std::sync::Arc;

/// Runs one artifact through the verification pipeline.
///
/// Clients are shared across items (cheap clones over pooled connections);
/// the verifier itself carries no per-item state.
#[derive(Clone)]
pub struct ItemVerifier {
    ocr: OcrClient,
    qr: QrClient,
    stego: StegoClient,
    registry: RegistryClient,
    recorder: RecorderClient,
    match_policy: Arc<dyn DocumentMatchPolicy>,
    stego_policy: StegoDecisionPolicy,
}

impl ItemVerifier {
    /// Wires a verifier from its adapter clients and decision policies.
    pub fn new(
        ocr: OcrClient,
        qr: QrClient,
        stego: StegoClient,
        registry: RegistryClient,
        recorder: RecorderClient,
        match_policy: Arc<dyn DocumentMatchPolicy>,
        stego_policy: StegoDecisionPolicy,
    ) -> Self {
        ItemVerifier {
            ocr,
            qr,
            stego,
            registry,
            recorder,
            match_policy,
            stego_policy,
        }
    }

    /// Verifies one certificate document (OCR + QR modality).
    ///
    /// Stages, in order, each failing the item on error:
    /// 1. OCR extraction -> `ExtractedClaims`
    /// 2. QR decode -> `QrPayload` with the credential ID
    /// 3. Registry fetch by ID (hash-lookup fallback when the payload carries
    ///    one); the registry record overrides the partial QR fields as source
    ///    of truth
    /// 4. Match verdict -> `verified` / `unverified`
    /// 5. If verified: best-effort recorder write. Failure here is logged and
    ///    swallowed; the verdict already stands.
    ///
    /// Always returns a terminal outcome; errors are recorded in it rather
    /// than propagated.
    pub async fn verify_document(
        &self,
        artifact: &CertificateArtifact,
        bearer: &str,
    ) -> VerificationOutcome {
        let mut outcome = VerificationOutcome::document(&artifact.name);

        // Stage 1: OCR extraction
        outcome.document_detail_mut().stages.extraction = StageStatus::Processing;
        let claims = match self.ocr.extract(artifact, bearer).await {
            Ok(claims) => claims,
            Err(err) => {
                log::error!(
                    "{}: {} ({})",
                    artifact.name,
                    err,
                    err.detail().unwrap_or("no detail")
                );
                outcome.document_detail_mut().stages.extraction = StageStatus::Failed;
                outcome.fail(&err);
                return outcome;
            }
        };
        {
            let doc = outcome.document_detail_mut();
            doc.stages.extraction = StageStatus::Completed;
            doc.claims = Some(claims.clone());
        }

        // Stage 2: QR decode
        outcome.document_detail_mut().stages.code_decode = StageStatus::Processing;
        let payload = match self.qr.decode(artifact, bearer).await {
            Ok(payload) => payload,
            Err(err) => {
                log::error!("{}: {:?}", artifact.name, err);
                outcome.document_detail_mut().stages.code_decode = StageStatus::Failed;
                outcome.fail(&err);
                return outcome;
            }
        };
        {
            let doc = outcome.document_detail_mut();
            doc.stages.code_decode = StageStatus::Completed;
            doc.qr_payload = Some(payload.clone());
        }

        // Stage 3: registry fetch by decoded credential ID
        outcome.document_detail_mut().stages.registry_fetch = StageStatus::Processing;
        let record = match self.fetch_record(&payload, bearer).await {
            Ok(record) => record,
            Err(err) => {
                log::error!("{}: {:?}", artifact.name, err);
                outcome.document_detail_mut().stages.registry_fetch = StageStatus::Failed;
                outcome.fail(&err);
                return outcome;
            }
        };
        {
            let doc = outcome.document_detail_mut();
            doc.stages.registry_fetch = StageStatus::Completed;
            doc.record = Some(record.clone());
        }

        // Stage 4: match verdict
        outcome.document_detail_mut().stages.matching = StageStatus::Processing;
        let verdict = self.match_policy.evaluate(&claims, &record);
        {
            let doc = outcome.document_detail_mut();
            doc.stages.matching = StageStatus::Completed;
            doc.verdict = Some(verdict);
        }
        let status = if verdict.overall_match {
            FinalStatus::Verified
        } else {
            FinalStatus::Unverified
        };
        outcome.finish(status);
        log::info!(
            "{}: document verification finished as {:?}",
            artifact.name,
            status
        );

        // Stage 5: best-effort recording, at most once per verified item
        if status == FinalStatus::Verified {
            if let Err(err) = self.recorder.record(&record, bearer).await {
                log::warn!(
                    "{}: verified-credential recording failed, keeping verdict: {:?}",
                    artifact.name,
                    err
                );
            }
        }

        outcome
    }

    /// Resolves the registry record for a decoded payload.
    ///
    /// The credential ID is the primary key. When the payload also carries a
    /// credential hash, an ID miss falls back to the hash lookup before the
    /// stage fails; the record found either way is authoritative.
    async fn fetch_record(
        &self,
        payload: &QrPayload,
        bearer: &str,
    ) -> Result<CredentialRecord, PipelineError> {
        match self.registry.fetch_by_id(&payload.credential_id, bearer).await {
            Ok(record) => Ok(record),
            Err(err) => match payload.credential_hash.as_deref() {
                Some(hash) => {
                    log::info!(
                        "registry miss for {}, retrying by hash",
                        payload.credential_id
                    );
                    self.registry.fetch_by_hash(hash, bearer).await
                }
                None => Err(err),
            },
        }
    }

    /// Verifies one steganographed image.
    ///
    /// One auto-verify call evaluates the image server-side; the decision
    /// policy then sets the final status. A secondary registry fetch fills in
    /// display fields when the payload yielded a credential ID — its failure
    /// is diagnostic only and never changes the verdict.
    pub async fn verify_image(
        &self,
        artifact: &CertificateArtifact,
        bearer: &str,
    ) -> VerificationOutcome {
        let mut outcome = VerificationOutcome::steganography(&artifact.name);

        let result = match self.stego.auto_verify(artifact, bearer).await {
            Ok(result) => result,
            Err(err) => {
                log::error!("{}: {:?}", artifact.name, err);
                outcome.fail(&err);
                return outcome;
            }
        };

        if let OutcomeDetail::Steganography(detail) = &mut outcome.detail {
            detail.result = Some(result.clone());

            if let Some(credential_id) = &result.credential_id {
                match self.registry.fetch_by_id(credential_id, bearer).await {
                    Ok(record) => detail.record = Some(record),
                    Err(err) => {
                        // Display data only; the similarity verdict stands.
                        log::warn!(
                            "{}: registry fetch for display failed: {:?}",
                            artifact.name,
                            err
                        );
                    }
                }
            }
        }

        let status = self.stego_policy.decide(&result);
        outcome.finish(status);
        log::info!(
            "{}: steganographic verification finished as {:?} (similarity {:.1})",
            artifact.name,
            status,
            result.similarity_score
        );
        outcome
    }
}
