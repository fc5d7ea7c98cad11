// src/pipeline/mod.rs
//! Core verification pipeline: validation, per-item verification, matching,
//! batch orchestration and report building.

pub mod batch;
pub mod item_verifier;
pub mod match_engine;
pub mod report;
pub mod validator;
