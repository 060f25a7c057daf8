//! Core orchestration logic.
//!
//! This module contains:
//! - Retry: backoff policy and wrapper for transient failures
//! - Orchestrator: the triage state machine

pub mod orchestrator;
pub mod retry;

// Re-export commonly used types
pub use orchestrator::{RequestError, TriageOrchestrator, TriageRequest, TriageSettings};
pub use retry::{with_retry, RetryPolicy};
