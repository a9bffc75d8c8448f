//! Infrastructure Layer
//!
//! Adapters behind the application ports: YAML configuration, the TCP
//! FIX engine and tracing setup.

pub mod config;
pub mod engine;
pub mod telemetry;
