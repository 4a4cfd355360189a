//! Trust signal types.
//!
//! A `Signal` is an immutable fact about an agent, owned exclusively by the
//! Signal Store. Signals are never mutated after insert; the running trust
//! score is just their clamped accumulation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// The kind of trust-affecting event being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// A delegated task completed successfully.
    TaskSuccess,
    /// A delegated task failed.
    TaskFailure,
    /// The tribunal denied one of the agent's requests.
    CouncilDenial,
    /// The agent violated an operating policy.
    PolicyViolation,
    /// A human rated the agent's work positively.
    PositiveFeedback,
    /// A significant delivery (larger than a single task success).
    Milestone,
    /// Emitted by the decay scheduler for an idle agent.
    InactivityTick,
}

impl SignalKind {
    /// The conventional magnitude for this kind.
    ///
    /// Callers may report a different magnitude (e.g. a weighted task
    /// success); the Trust Engine's safety band bounds how far they can
    /// stray.
    pub fn default_magnitude(self) -> i64 {
        match self {
            SignalKind::TaskSuccess => 1,
            SignalKind::TaskFailure => -2,
            SignalKind::CouncilDenial => -5,
            SignalKind::PolicyViolation => -50,
            SignalKind::PositiveFeedback => 3,
            SignalKind::Milestone => 10,
            SignalKind::InactivityTick => -1,
        }
    }
}

/// An immutable trust-affecting fact about one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The agent this signal concerns.
    pub agent_id: AgentId,
    /// What happened.
    pub kind: SignalKind,
    /// Signed score delta. Validated against the safety band on apply.
    pub magnitude: i64,
    /// When the underlying event occurred (UTC).
    pub timestamp: DateTime<Utc>,
    /// Reference to the originating record (e.g. a decision id).
    pub source_ref: String,
}

impl Signal {
    /// Build a signal with the kind's conventional magnitude.
    pub fn with_default_magnitude(
        agent_id: AgentId,
        kind: SignalKind,
        source_ref: impl Into<String>,
    ) -> Self {
        Self {
            agent_id,
            kind,
            magnitude: kind.default_magnitude(),
            timestamp: Utc::now(),
            source_ref: source_ref.into(),
        }
    }
}
