// src/models/mod.rs
//! Data structures shared across the verification pipeline.

pub mod artifact;
pub mod claims;
pub mod outcome;
pub mod payload;
pub mod record;
