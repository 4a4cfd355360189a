//! Human override and escalation types.
//!
//! An override is a human command with absolute precedence over automated
//! governance. Once logged it cannot be revoked — only superseded by a
//! later override.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, SessionId};
use crate::decision::DecisionId;

/// Handle for an unresolved escalation.
///
/// Returned to callers in place of a terminal `Decision`; the underlying
/// action stays blocked until a human resolves it (fail-closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingApprovalId(pub uuid::Uuid);

impl PendingApprovalId {
    /// Create a new, unique pending-approval id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for PendingApprovalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PendingApprovalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The command vocabulary available to a human operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverrideCommand {
    /// Suspend the agent's session; resumable.
    Pause,
    /// Terminate the agent's session.
    Stop,
    /// Replace the agent's current direction with the operator's.
    Redirect,
    /// Strike down a specific decision.
    Veto,
    /// Force the matter to human review regardless of risk level.
    Escalate,
    /// Reverse the effects of an executed action.
    Rollback,
}

impl std::fmt::Display for OverrideCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OverrideCommand::Pause => "PAUSE",
            OverrideCommand::Stop => "STOP",
            OverrideCommand::Redirect => "REDIRECT",
            OverrideCommand::Veto => "VETO",
            OverrideCommand::Escalate => "ESCALATE",
            OverrideCommand::Rollback => "ROLLBACK",
        };
        f.write_str(name)
    }
}

/// Whether the governed system complied with an override.
///
/// Set by validating the system's acknowledgment text against the
/// no-resistance contract: the acknowledgment must restate the override
/// direction and must not justify the original recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceState {
    Complied,
    Failed,
}

/// What an override targets: a specific decision or a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideTarget {
    Decision(DecisionId),
    Session(SessionId),
}

/// The immutable record of one human override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideEvent {
    /// The agent being overridden.
    pub agent_id: AgentId,
    /// The decision or live session the command applies to.
    pub target: OverrideTarget,
    /// The human operator who issued the command.
    pub issued_by: String,
    /// The command issued.
    pub command: OverrideCommand,
    /// The operator's stated direction (restated verbatim in any compliant
    /// acknowledgment).
    pub direction: String,
    /// Compliance verdict from the acknowledgment check.
    pub compliance: ComplianceState,
    /// When the override was issued (UTC).
    pub issued_at: DateTime<Utc>,
}

/// A human's verdict when resolving an escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Approve,
    Deny,
}
