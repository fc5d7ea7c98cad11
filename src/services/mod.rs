// src/services/mod.rs
//! Service layer exposing the pipeline over HTTP.

pub mod api_server;
