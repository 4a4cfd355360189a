//! Agent identity, lifecycle, and trust tier types.
//!
//! These types define the governed population. CONCORD does not prescribe
//! agent internals — an agent is an identity with an earned trust score and
//! a lifecycle status; everything else arrives as structured requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable, human-readable identifier for an agent.
///
/// Used across signals, decisions, audit records, and trust lookups.
/// Example: AgentId("invoice-triage-agent")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    /// Construct an agent id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a live agent session.
///
/// Overrides target sessions; an in-flight tribunal evaluation for a session
/// is cancelable through this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Create a new, unique session id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The agent's lifecycle status.
///
/// Agents are never physically deleted — `Archived` is the terminal status,
/// preserving audit continuity for every decision the agent ever received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Not yet graduated; may only submit examination requests.
    Training,
    /// Fully governed and able to submit action requests.
    Active,
    /// Temporarily suspended (e.g. by a PAUSE override).
    Paused,
    /// Permanently retired. Terminal.
    Archived,
}

/// How the agent came into existence.
///
/// Provenance adjusts the examination seed score: a clone starts below a
/// fresh agent, a promoted agent above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Fresh,
    Cloned,
    Evolved,
    Promoted,
    Imported,
}

impl Provenance {
    /// The signed adjustment applied to an examination seed score.
    pub fn seed_modifier(self) -> i64 {
        match self {
            Provenance::Fresh => 0,
            Provenance::Cloned => -50,
            Provenance::Evolved => 100,
            Provenance::Promoted => 150,
            Provenance::Imported => -100,
        }
    }
}

/// Named trust band over the 0–1000 score.
///
/// The tribunal consults the tier, not the raw score, when selecting
/// approval thresholds, so a single noisy signal cannot flip the required
/// oversight level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    /// 0–99.
    Untrusted,
    /// 100–249.
    Probation,
    /// 250–499.
    Developing,
    /// 500–749.
    Established,
    /// 750–899.
    Trusted,
    /// 900–1000.
    Legendary,
}

impl TrustTier {
    /// Map a clamped score to its tier.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=99 => TrustTier::Untrusted,
            100..=249 => TrustTier::Probation,
            250..=499 => TrustTier::Developing,
            500..=749 => TrustTier::Established,
            750..=899 => TrustTier::Trusted,
            _ => TrustTier::Legendary,
        }
    }

    /// The lowest score that still belongs to this tier.
    ///
    /// Decay floors at `lower_bound() - 10`, so an idle agent can slip at
    /// most 10 points into the tier below before decay stops.
    pub fn lower_bound(self) -> u32 {
        match self {
            TrustTier::Untrusted => 0,
            TrustTier::Probation => 100,
            TrustTier::Developing => 250,
            TrustTier::Established => 500,
            TrustTier::Trusted => 750,
            TrustTier::Legendary => 900,
        }
    }
}

impl std::fmt::Display for TrustTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrustTier::Untrusted => "Untrusted",
            TrustTier::Probation => "Probation",
            TrustTier::Developing => "Developing",
            TrustTier::Established => "Established",
            TrustTier::Trusted => "Trusted",
            TrustTier::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// The governed record for one agent.
///
/// `score` and `status` are the only fields mutated in place, always through
/// the Trust Engine and always paired with an audit chain record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Stable identity.
    pub id: AgentId,
    /// Current trust score, clamped to [0, 1000].
    pub score: u32,
    /// Capability names the agent is allowed to declare in requests.
    pub capabilities: Vec<String>,
    /// Lifecycle status.
    pub status: AgentStatus,
    /// How the agent came into existence.
    pub provenance: Provenance,
    /// Wall-clock registration time (UTC).
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent trust-affecting signal.
    pub last_activity: DateTime<Utc>,
}

impl AgentRecord {
    /// The tier derived from the current score.
    pub fn tier(&self) -> TrustTier {
        TrustTier::from_score(self.score)
    }
}
