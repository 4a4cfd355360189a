//! # concord-tribunal
//!
//! The validator tribunal and its orchestrator: nine independent
//! validators evaluate a request in parallel under a bounded deadline;
//! the orchestrator synthesizes the outcome against fixed risk-level
//! thresholds. Deadlocks route to human review, never auto-resolve.

pub mod orchestrator;
pub mod tribunal;
pub mod validator;

pub use orchestrator::{approve_ratio, synthesize, TribunalOutcome, TribunalVerdict};
pub use tribunal::{Evaluation, Tribunal};
pub use validator::{ReviewContext, RulesetValidator, Validator};

// ── Tests ─────────────────────────────────────────────────────────────────────
