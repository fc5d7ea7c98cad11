// src/pipeline/validator.rs
//! Artifact validator.
//!
//! Gate in front of the pipeline: anything that cannot be verified (wrong
//! type for its modality, oversized, empty) is rejected here, before any
//! network call. A rejected artifact never gets a `VerificationOutcome`.

use crate::error::PipelineError;
use crate::models::artifact::{CertificateArtifact, Modality};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Extensions accepted for the document modality.
static DOCUMENT_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["pdf"]));

/// Extensions accepted for the steganographic-image modality.
static IMAGE_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["jpg", "jpeg", "png"]));

/// Default artifact size ceiling: 10 MiB.
pub const DEFAULT_MAX_ARTIFACT_BYTES: u64 = 10 * 1024 * 1024;

/// Validates artifacts against per-modality type rules and a size ceiling.
#[derive(Clone, Copy)]
pub struct ArtifactValidator {
    max_bytes: u64,
}

impl ArtifactValidator {
    /// Creates a validator with the given size ceiling in bytes.
    pub fn new(max_bytes: u64) -> Self {
        ArtifactValidator { max_bytes }
    }

    /// Checks an artifact against the rules for its modality.
    ///
    /// # Errors
    /// `PipelineError::Validation` with a human-readable reason when the
    /// artifact is empty, oversized, or its type is not allowed for the
    /// modality (`pdf` for documents; `jpg`/`jpeg`/`png` for images).
    pub fn validate(&self, artifact: &CertificateArtifact) -> Result<(), PipelineError> {
        if artifact.byte_size == 0 {
            return Err(PipelineError::Validation(format!(
                "{}: artifact is empty",
                artifact.name
            )));
        }
        if artifact.byte_size > self.max_bytes {
            return Err(PipelineError::Validation(format!(
                "{}: artifact exceeds size limit of {} bytes",
                artifact.name, self.max_bytes
            )));
        }

        let allowed: &HashSet<&str> = match artifact.modality {
            Modality::Document => &DOCUMENT_EXTENSIONS,
            Modality::SteganographicImage => &IMAGE_EXTENSIONS,
        };

        let ext = normalized_extension(artifact);
        match ext {
            Some(ext) if allowed.contains(ext.as_str()) => Ok(()),
            _ => Err(PipelineError::Validation(format!(
                "{}: file type {:?} is not allowed for this verification mode",
                artifact.name, artifact.mime_or_extension
            ))),
        }
    }
}

impl Default for ArtifactValidator {
    fn default() -> Self {
        ArtifactValidator::new(DEFAULT_MAX_ARTIFACT_BYTES)
    }
}

/// Resolves an artifact's effective extension from its declared MIME type or
/// bare extension, falling back to the file name.
fn normalized_extension(artifact: &CertificateArtifact) -> Option<String> {
    let declared = artifact.mime_or_extension.to_ascii_lowercase();
    let from_mime = match declared.as_str() {
        "application/pdf" => Some("pdf"),
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "pdf" | "png" | "jpg" | "jpeg" => Some(declared.as_str()),
        _ => None,
    };
    from_mime
        .map(str::to_string)
        .or_else(|| artifact.extension())
}
