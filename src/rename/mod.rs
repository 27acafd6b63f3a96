//! Rename orchestration
//!
//! This module consolidates:
//! - The per-image fallback chain and rename step (orchestrator.rs)
//! - The folder-level loop (batch.rs)

pub mod batch;
pub mod orchestrator;

pub use orchestrator::Pipeline;
