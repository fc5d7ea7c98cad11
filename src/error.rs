// src/error.rs
//! Error taxonomy for the credential verification pipeline.
//!
//! Every failure an artifact can hit on its way through the pipeline maps to
//! exactly one variant here. All variants except `Recorder` terminate the
//! current item; `Recorder` failures are best-effort and only ever logged.

use thiserror::Error;

/// Pipeline error covering validation, extraction, decoding, registry and
/// recording failures.
///
/// The `Display` output of each variant is what ends up in
/// `VerificationOutcome::error_message`, so the wording here is user-visible:
/// - `Extraction` always renders the fixed message "OCR extraction failed"
///   (the underlying detail is carried separately for logs)
/// - `DecodeNotFound` renders the decode service's reason verbatim, e.g.
///   "No QR codes found in PDF"
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input rejected before any network call was made.
    #[error("{0}")]
    Validation(String),

    /// OCR adapter failed (transport or service-side).
    #[error("OCR extraction failed")]
    Extraction {
        /// Underlying cause, logged but not surfaced to callers.
        detail: String,
    },

    /// Decode service reported that no embedded code was present.
    /// Distinct from a broken decode call: the document was readable,
    /// it just carries nothing to decode.
    #[error("{reason}")]
    DecodeNotFound { reason: String },

    /// Decode call failed for any reason other than "not found".
    #[error("code decode failed: {detail}")]
    Decode { detail: String },

    /// Registry fetch failed: credential unknown or registry unreachable.
    #[error("registry lookup failed: {detail}")]
    RegistryLookup { detail: String },

    /// Verified-credential recording failed. Always swallowed by the
    /// pipeline; surfaces only in logs.
    #[error("credential recording failed: {detail}")]
    Recorder { detail: String },

    /// Generic network failure on an adapter call.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PipelineError {
    /// Underlying detail for variants whose `Display` hides it. Log-only.
    pub fn detail(&self) -> Option<&str> {
        match self {
            PipelineError::Extraction { detail } => Some(detail),
            _ => None,
        }
    }

    /// Stable label for the error kind, recorded alongside the message in
    /// verification outcomes and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Extraction { .. } => "extraction",
            PipelineError::DecodeNotFound { .. } => "decode-not-found",
            PipelineError::Decode { .. } => "decode",
            PipelineError::RegistryLookup { .. } => "registry-lookup",
            PipelineError::Recorder { .. } => "recorder",
            PipelineError::Transport(_) => "transport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_error_renders_fixed_message() {
        let err = PipelineError::Extraction {
            detail: "connection reset by peer".to_string(),
        };
        // The detail must never leak into the user-visible message.
        assert_eq!(err.to_string(), "OCR extraction failed");
        assert_eq!(err.kind(), "extraction");
    }

    #[test]
    fn decode_not_found_renders_adapter_reason_verbatim() {
        let err = PipelineError::DecodeNotFound {
            reason: "No QR codes found in PDF".to_string(),
        };
        assert_eq!(err.to_string(), "No QR codes found in PDF");
        assert_eq!(err.kind(), "decode-not-found");
    }

    #[test]
    fn kinds_are_distinct() {
        let errs = [
            PipelineError::Validation("x".into()).kind(),
            PipelineError::Extraction { detail: "x".into() }.kind(),
            PipelineError::DecodeNotFound { reason: "x".into() }.kind(),
            PipelineError::Decode { detail: "x".into() }.kind(),
            PipelineError::RegistryLookup { detail: "x".into() }.kind(),
            PipelineError::Recorder { detail: "x".into() }.kind(),
        ];
        let mut dedup = errs.to_vec();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), errs.len());
    }
}
