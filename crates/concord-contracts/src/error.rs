//! Runtime error types for the CONCORD governance core.
//!
//! All fallible operations return `GovResult<T>`. Threshold misses and
//! deadlocks are NOT errors — they are recorded business outcomes; a
//! validator timeout is recovered locally into an abstain vote. Only
//! `ChainIntegrityViolation` is fatal: it halts all further appends until
//! a human-triggered re-verification clears it.

use thiserror::Error;

/// The unified error type for the CONCORD crates.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// The action request was malformed and was rejected before
    /// classification. Not written to the chain.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// A reported signal's magnitude fell outside the configured safety
    /// band. The score is untouched; the rejection is logged separately.
    #[error("invalid signal for agent '{agent}': {reason}")]
    InvalidSignal { agent: String, reason: String },

    /// Chain verification found a broken record. Fatal: all further
    /// appends halt pending operator re-verification.
    #[error("audit chain integrity violated at sequence {sequence}")]
    ChainIntegrityViolation { sequence: u64 },

    /// An append was attempted while the chain is halted.
    #[error("audit chain is halted pending operator re-verification")]
    ChainHalted,

    /// The chain could not persist a record. Treated as fatal for the
    /// operation — an unauditable decision cannot proceed.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// No agent is registered under the given id.
    #[error("unknown agent '{agent}'")]
    UnknownAgent { agent: String },

    /// No decision exists under the given id.
    #[error("unknown decision '{decision}'")]
    UnknownDecision { decision: String },

    /// No pending escalation exists under the given id.
    #[error("unknown escalation '{escalation}'")]
    UnknownEscalation { escalation: String },

    /// The agent's lifecycle status forbids the requested operation.
    #[error("agent '{agent}' is {status} and may not {operation}")]
    AgentNotActive {
        agent: String,
        status: String,
        operation: String,
    },

    /// The platform-wide kill switch is engaged; no evaluations run.
    #[error("kill switch engaged (version {version}): {reason}")]
    KillSwitchEngaged { version: u64, reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the CONCORD crates.
pub type GovResult<T> = Result<T, GovernanceError>;
