//! Audit chain payload types.
//!
//! Every decision, override, and trust-score mutation maps 1–1 to a chain
//! record. The payload enum here is what gets hashed; the chain wrapper
//! (sequence, hashes, signature) lives in `concord-audit`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, SessionId, TrustTier};
use crate::decision::Decision;
use crate::human::OverrideEvent;
use crate::request::{RequestId, RiskLevel};
use crate::signal::SignalKind;

/// A trust-score mutation, chained alongside the in-place agent update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreMutation {
    /// The agent whose score changed.
    pub agent_id: AgentId,
    /// The signal kind that drove the change (`InactivityTick` for decay).
    pub kind: SignalKind,
    /// The applied magnitude after clamping.
    pub magnitude: i64,
    /// Score before the mutation.
    pub old_score: u32,
    /// Score after the mutation.
    pub new_score: u32,
    /// Tier before the mutation.
    pub old_tier: TrustTier,
    /// Tier after the mutation.
    pub new_tier: TrustTier,
}

/// A Level-0/1 request that executed without a tribunal, logged only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoExecution {
    pub request_id: RequestId,
    pub agent_id: AgentId,
    pub description: String,
    pub risk_level: RiskLevel,
}

/// An in-flight evaluation cancelled by an incoming override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCancelled {
    pub request_id: RequestId,
    pub agent_id: AgentId,
    pub session_id: SessionId,
    /// Always "cancelled_by_override"; kept in the record for exports.
    pub reason: String,
}

/// The hashable body of one audit chain record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainPayload {
    Decision(Decision),
    Override(OverrideEvent),
    ScoreMutation(ScoreMutation),
    AutoExecution(AutoExecution),
    EvaluationCancelled(EvaluationCancelled),
}

impl ChainPayload {
    /// Short payload-kind label for public verification summaries.
    pub fn kind_label(&self) -> &'static str {
        match self {
            ChainPayload::Decision(_) => "decision",
            ChainPayload::Override(_) => "override",
            ChainPayload::ScoreMutation(_) => "score_mutation",
            ChainPayload::AutoExecution(_) => "auto_execution",
            ChainPayload::EvaluationCancelled(_) => "evaluation_cancelled",
        }
    }

    /// The agent this payload concerns, for compliance exports.
    pub fn agent_id(&self) -> &AgentId {
        match self {
            ChainPayload::Decision(d) => &d.agent_id,
            ChainPayload::Override(o) => &o.agent_id,
            ChainPayload::ScoreMutation(m) => &m.agent_id,
            ChainPayload::AutoExecution(a) => &a.agent_id,
            ChainPayload::EvaluationCancelled(c) => &c.agent_id,
        }
    }

    /// A one-line outcome summary safe for public verification responses.
    ///
    /// Exposes enough to prove existence and integrity without leaking
    /// rationales, votes, or operator identities.
    pub fn outcome_summary(&self) -> String {
        match self {
            ChainPayload::Decision(d) => format!("{} at {}", d.outcome, d.risk_level),
            ChainPayload::Override(o) => format!("override {}", o.command),
            ChainPayload::ScoreMutation(m) => {
                format!("score {} -> {}", m.old_score, m.new_score)
            }
            ChainPayload::AutoExecution(a) => format!("auto-executed at {}", a.risk_level),
            ChainPayload::EvaluationCancelled(_) => "cancelled_by_override".to_string(),
        }
    }
}

/// The public slice of a chain record returned by `publicVerify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Payload kind label.
    pub payload_kind: String,
    /// When the record was chained (UTC).
    pub timestamp: DateTime<Utc>,
    /// One-line outcome description.
    pub outcome: String,
    /// Position in the chain.
    pub sequence: u64,
}
