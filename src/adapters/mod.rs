// src/adapters/mod.rs
//! HTTP clients for the external collaborators the pipeline calls.
//!
//! Every call carries the caller-supplied bearer credential; this core does
//! not manage authentication. Documents and images travel as raw base64
//! (no data-URI prefix) inside JSON bodies.

pub mod ocr_client;
pub mod qr_client;
pub mod recorder_client;
pub mod registry_client;
pub mod stego_client;
