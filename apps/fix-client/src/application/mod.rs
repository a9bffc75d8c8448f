//! Application Layer - Message building, session orchestration and ports.
//!
//! This layer turns validated intents into messages and drives the engine
//! through the port interfaces.

/// Port interfaces for the engine, the configuration and the display sink.
pub mod ports;

/// Message builder, channel adapter and session orchestrator.
pub mod services;
