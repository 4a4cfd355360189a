//! # concord-gate
//!
//! The human escalation gate: deadlocks and Level-4 confirmations park
//! here until a human resolves them (fail-closed — never auto-resolved),
//! and human overrides pass through here with absolute precedence. The
//! no-resistance contract is enforced on every override acknowledgment.

pub mod compliance;
pub mod gate;

pub use compliance::{check_acknowledgment, compliance_state, AckViolation, FORBIDDEN_PHRASES};
pub use gate::{EscalationGate, EscalationReason, PendingEscalation, Resolution};

// ── Tests ─────────────────────────────────────────────────────────────────────
