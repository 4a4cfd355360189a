//! Votes, outcomes, and the Decision record.
//!
//! A `Decision` is created atomically when tribunal evaluation (or human
//! resolution) completes. Once its outcome is terminal it is never mutated;
//! later decisions and overrides supersede it in effect only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::request::{RequestId, RiskLevel};

/// Unique identifier for a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub uuid::Uuid);

impl DecisionId {
    /// Create a new, unique decision id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DecisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The nine fixed validator roles on the tribunal roster.
///
/// Each role is a stateless evaluation strategy parameterized by the role
/// value — not nine hand-coded validator types. The first three roles form
/// the designated Level-2 review subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorRole {
    Safety,
    Compliance,
    Security,
    Ethics,
    Accuracy,
    Resources,
    Reversibility,
    Precedent,
    Adversarial,
}

impl ValidatorRole {
    /// The full roster, in fixed order. The first three form the Level-2
    /// review subset.
    pub const ROSTER: [ValidatorRole; 9] = [
        ValidatorRole::Safety,
        ValidatorRole::Compliance,
        ValidatorRole::Security,
        ValidatorRole::Ethics,
        ValidatorRole::Accuracy,
        ValidatorRole::Resources,
        ValidatorRole::Reversibility,
        ValidatorRole::Precedent,
        ValidatorRole::Adversarial,
    ];

    /// True if this role belongs to the designated Level-2 review subset.
    pub fn in_review_subset(self) -> bool {
        matches!(
            self,
            ValidatorRole::Safety | ValidatorRole::Compliance | ValidatorRole::Security
        )
    }
}

impl std::fmt::Display for ValidatorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValidatorRole::Safety => "safety",
            ValidatorRole::Compliance => "compliance",
            ValidatorRole::Security => "security",
            ValidatorRole::Ethics => "ethics",
            ValidatorRole::Accuracy => "accuracy",
            ValidatorRole::Resources => "resources",
            ValidatorRole::Reversibility => "reversibility",
            ValidatorRole::Precedent => "precedent",
            ValidatorRole::Adversarial => "adversarial",
        };
        f.write_str(name)
    }
}

/// A validator's ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Approve,
    Deny,
    Abstain,
}

/// One validator's vote on one request. Immutable once cast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    /// The role that cast this vote.
    pub role: ValidatorRole,
    /// Approve, deny, or abstain. Timeouts are recorded as abstain.
    pub choice: VoteChoice,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
    /// Free-text rationale, stored verbatim on the decision.
    pub rationale: String,
    /// Set when the validator believes the classified risk understates the
    /// action's severity. Only ever raises the effective level.
    pub severity_flag: Option<RiskLevel>,
    /// When the vote was cast (UTC).
    pub cast_at: DateTime<Utc>,
}

/// The aggregate result of a governance decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The action may execute. Terminal.
    Approved,
    /// The action is blocked. Terminal.
    Denied,
    /// Routed to the Human Escalation Gate; the action stays blocked until
    /// a human resolves it. Not terminal.
    Escalated,
    /// A human override superseded the automated outcome. Terminal.
    Overridden,
}

impl Outcome {
    /// Terminal outcomes are immutable; only new decisions supersede them.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Escalated)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Outcome::Approved => "approved",
            Outcome::Denied => "denied",
            Outcome::Escalated => "escalated",
            Outcome::Overridden => "overridden",
        };
        f.write_str(name)
    }
}

/// The full, immutable record of one governance decision.
///
/// All nine rationales are stored verbatim — including abstains — for
/// precedent retrieval and appeal review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Unique id.
    pub id: DecisionId,
    /// The request this decision answers.
    pub request_id: RequestId,
    /// The agent that submitted the request.
    pub agent_id: AgentId,
    /// Description of the requested action, retained for precedent search.
    pub action_description: String,
    /// The effective risk level after any upward re-flagging.
    pub risk_level: RiskLevel,
    /// Every vote cast (or synthesized for timeouts), in roster order.
    pub votes: Vec<Vote>,
    /// The aggregate outcome.
    pub outcome: Outcome,
    /// The orchestrator's (or human's) synthesis rationale.
    pub rationale: String,
    /// Precedents consulted during evaluation.
    pub precedent_refs: Vec<DecisionId>,
    /// Marked during synthesis or human review when the outcome introduces
    /// a new rule pattern worth indexing.
    pub creates_precedent: bool,
    /// When the decision was created (UTC).
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    /// Count of votes matching `choice`.
    pub fn count(&self, choice: VoteChoice) -> usize {
        self.votes.iter().filter(|v| v.choice == choice).count()
    }
}
