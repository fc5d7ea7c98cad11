// src/models/artifact.rs
//! Certificate artifact data model.
//!
//! An artifact is one uploaded file subject to verification. It is created at
//! submission time, never mutated, and discarded once the pipeline has
//! produced a `VerificationOutcome` for it — the pipeline does not persist
//! original files.

use serde::{Deserialize, Serialize};

/// Verification modality of an artifact.
///
/// Determines which extraction path the artifact takes through the pipeline:
/// - `Document`: OCR text extraction plus visible QR-code decoding (PDF)
/// - `SteganographicImage`: payload recovery from pixel-embedded data (JPG/PNG)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// PDF certificate verified via OCR + QR decoding
    #[serde(rename = "document")]
    Document,

    /// Image certificate verified via steganographic payload extraction
    #[serde(rename = "steganographic-image")]
    SteganographicImage,
}

/// One uploaded certificate file.
///
/// # Fields
/// - `name`: original file name as submitted (used for reporting only)
/// - `byte_size`: size of `data` in bytes, kept separately so validation can
///   run against metadata without touching the payload
/// - `mime_or_extension`: MIME type or bare extension reported by the caller
/// - `modality`: which verification path this artifact takes
/// - `data`: raw file bytes, base64-encoded when crossing service boundaries
///
/// # Lifecycle
/// Immutable after construction. The pipeline holds it only for the duration
/// of a single verification run.
#[derive(Debug, Clone)]
pub struct CertificateArtifact {
    /// Original file name, e.g. "certificate-2024.pdf"
    pub name: String,

    /// Payload size in bytes
    pub byte_size: u64,

    /// MIME type ("application/pdf") or bare extension ("pdf")
    pub mime_or_extension: String,

    /// Verification modality for this artifact
    pub modality: Modality,

    /// Raw file contents
    pub data: Vec<u8>,
}

impl CertificateArtifact {
    /// Builds an artifact from submitted bytes.
    ///
    /// # Arguments
    /// * `name` - Original file name
    /// * `mime_or_extension` - MIME type or extension reported by the caller
    /// * `modality` - Verification modality
    /// * `data` - Raw file contents
    pub fn new(
        name: impl Into<String>,
        mime_or_extension: impl Into<String>,
        modality: Modality,
        data: Vec<u8>,
    ) -> Self {
        CertificateArtifact {
            name: name.into(),
            byte_size: data.len() as u64,
            mime_or_extension: mime_or_extension.into(),
            modality,
            data,
        }
    }

    /// Lowercased file extension taken from `name`, if any.
    ///
    /// Used by the validator when `mime_or_extension` carries a full MIME
    /// type rather than a bare extension.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_size_tracks_payload() {
        let artifact = CertificateArtifact::new(
            "cert.pdf",
            "application/pdf",
            Modality::Document,
            vec![0u8; 512],
        );
        assert_eq!(artifact.byte_size, 512);
    }

    #[test]
    fn extension_is_lowercased() {
        let artifact = CertificateArtifact::new(
            "SCAN.PDF",
            "application/pdf",
            Modality::Document,
            vec![],
        );
        assert_eq!(artifact.extension().as_deref(), Some("pdf"));
    }

    #[test]
    fn extension_absent_when_no_dot() {
        let artifact =
            CertificateArtifact::new("certificate", "pdf", Modality::Document, vec![]);
        assert!(artifact.extension().is_none());
    }
}
