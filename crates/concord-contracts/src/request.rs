//! Action request and risk types.
//!
//! An `ActionRequest` is the ephemeral input to the governance pipeline: it
//! is classified, voted on, and then discarded — only the `Decision` it
//! produces is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, SessionId};

/// Unique identifier for a single action request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub uuid::Uuid);

impl RequestId {
    /// Create a new, unique request id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Coarse action category declared by the requester.
///
/// The classifier maps each category to a base risk level and then applies
/// escalation rules; an undeclared category falls back to keyword detection
/// over the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    ReadOnly,
    ContentGeneration,
    ExternalCall,
    SystemMutation,
    FinancialDestructive,
}

/// Risk hints declared alongside a request.
///
/// Hints are advisory: the classifier trusts them only upward. A request
/// that declares `read_only` but describes a deletion still classifies as
/// destructive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskHints {
    /// The category the requester believes this action belongs to.
    pub category: Option<ActionCategory>,
    /// The action cannot be undone once executed.
    pub irreversible: bool,
    /// The action touches a production system.
    pub touches_production: bool,
    /// The action moves money or touches a financial system.
    pub touches_financial: bool,
}

/// Discrete 0–4 risk classification of an action's potential impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Read-only; auto-executes, logged only.
    L0,
    /// Low impact; auto-executes, logged only.
    L1,
    /// Review-subset approval required.
    L2,
    /// Simple-majority tribunal approval required.
    L3,
    /// Supermajority plus separate human confirmation required.
    L4,
}

impl RiskLevel {
    /// The numeric level, 0 through 4.
    pub fn as_u8(self) -> u8 {
        match self {
            RiskLevel::L0 => 0,
            RiskLevel::L1 => 1,
            RiskLevel::L2 => 2,
            RiskLevel::L3 => 3,
            RiskLevel::L4 => 4,
        }
    }

    /// Map a numeric level to the enum, saturating at L4.
    pub fn from_u8(level: u8) -> Self {
        match level {
            0 => RiskLevel::L0,
            1 => RiskLevel::L1,
            2 => RiskLevel::L2,
            3 => RiskLevel::L3,
            _ => RiskLevel::L4,
        }
    }

    /// One level higher, saturating at L4.
    pub fn escalated(self) -> Self {
        RiskLevel::from_u8(self.as_u8().saturating_add(1))
    }

    /// True for levels that bypass the tribunal entirely.
    pub fn auto_executes(self) -> bool {
        matches!(self, RiskLevel::L0 | RiskLevel::L1)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.as_u8())
    }
}

/// A proposed action awaiting a governance decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Unique id for this request.
    pub id: RequestId,
    /// The agent asking to act.
    pub agent_id: AgentId,
    /// Plain-language description of the proposed action.
    pub description: String,
    /// Declared risk hints (advisory, trusted only upward).
    pub hints: RiskHints,
    /// The live session this request belongs to.
    pub session_id: SessionId,
    /// Submission time (UTC).
    pub submitted_at: DateTime<Utc>,
}

impl ActionRequest {
    /// Build a request submitted now.
    pub fn new(
        agent_id: AgentId,
        description: impl Into<String>,
        hints: RiskHints,
        session_id: SessionId,
    ) -> Self {
        Self {
            id: RequestId::new(),
            agent_id,
            description: description.into(),
            hints,
            session_id,
            submitted_at: Utc::now(),
        }
    }
}
