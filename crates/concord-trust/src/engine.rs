//! The Trust Engine: score accumulation, decay, and examination seeding.
//!
//! Concurrency model per the governance contract: signal application and
//! decay for a SINGLE agent are serialized (one mutex per agent entry);
//! different agents mutate concurrently without coordination (the outer
//! map lock is only held long enough to clone the entry handle).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use concord_contracts::agent::{AgentId, AgentRecord, AgentStatus, Provenance, TrustTier};
use concord_contracts::error::{GovResult, GovernanceError};
use concord_contracts::signal::{Signal, SignalKind};

/// Tuning knobs for the trust engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Absolute magnitude bound; signals outside ±band are rejected with
    /// `InvalidSignal` and never touch the score.
    pub safety_band: i64,
    /// Days without any signal before decay starts.
    pub decay_grace_days: i64,
    /// Points lost per day once decay starts.
    pub decay_points_per_day: u32,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            safety_band: 100,
            decay_grace_days: 7,
            decay_points_per_day: 1,
        }
    }
}

/// The result of one score mutation: old/new score and tier.
///
/// A tier change here is notification-worthy; surfacing it is the caller's
/// concern, the engine only reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSnapshot {
    pub old_score: u32,
    pub new_score: u32,
    pub old_tier: TrustTier,
    pub new_tier: TrustTier,
}

impl TrustSnapshot {
    /// True when the mutation crossed a tier boundary.
    pub fn tier_changed(&self) -> bool {
        self.old_tier != self.new_tier
    }
}

/// One agent's record plus its exclusively-owned signal history.
///
/// `decayed_days` is the decay watermark: how many days past the grace
/// window have already been shed since the last real signal. `last_activity`
/// only moves on real signals, so consecutive decay ticks keep measuring
/// idleness from the same instant and the watermark prevents double-charging.
struct AgentEntry {
    record: AgentRecord,
    signals: Vec<Signal>,
    decayed_days: u32,
    decay_floor: u32,
}

/// The combined Signal Store and Trust Engine.
pub struct TrustEngine {
    config: TrustConfig,
    agents: RwLock<HashMap<AgentId, Arc<Mutex<AgentEntry>>>>,
}

impl TrustEngine {
    pub fn new(config: TrustConfig) -> Self {
        Self {
            config,
            agents: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new agent in `Training` status with score 0.
    ///
    /// Score 0 is the universal starting point; examination graduation is
    /// the only path to a non-accumulated score.
    pub fn register(&self, id: AgentId, provenance: Provenance) -> GovResult<AgentRecord> {
        let now = Utc::now();
        let record = AgentRecord {
            id: id.clone(),
            score: 0,
            capabilities: Vec::new(),
            status: AgentStatus::Training,
            provenance,
            created_at: now,
            last_activity: now,
        };

        let mut agents = self.write_map()?;
        let entry = AgentEntry {
            record: record.clone(),
            signals: Vec::new(),
            decayed_days: 0,
            decay_floor: 0,
        };
        agents.insert(id.clone(), Arc::new(Mutex::new(entry)));

        info!(agent = %id, ?provenance, "agent registered in training");
        Ok(record)
    }

    /// Current (score, tier) for an agent.
    pub fn compute_score(&self, id: &AgentId) -> GovResult<(u32, TrustTier)> {
        let entry = self.entry(id)?;
        let guard = self.lock_entry(&entry)?;
        Ok((guard.record.score, guard.record.tier()))
    }

    /// A full snapshot of the agent record.
    pub fn record(&self, id: &AgentId) -> GovResult<AgentRecord> {
        let entry = self.entry(id)?;
        let guard = self.lock_entry(&entry)?;
        Ok(guard.record.clone())
    }

    /// The agent's signal history, oldest first.
    pub fn history(&self, id: &AgentId) -> GovResult<Vec<Signal>> {
        let entry = self.entry(id)?;
        let guard = self.lock_entry(&entry)?;
        Ok(guard.signals.clone())
    }

    /// Apply one trust signal: validate against the safety band, record it
    /// in the signal store, and move the clamped running score.
    ///
    /// # Errors
    ///
    /// `InvalidSignal` when |magnitude| exceeds the safety band — the
    /// score is untouched and the signal is NOT stored; the rejection is
    /// logged so a single bad input cannot cause runaway trust inflation.
    pub fn apply_signal(&self, signal: Signal) -> GovResult<TrustSnapshot> {
        if signal.magnitude.abs() > self.config.safety_band {
            warn!(
                agent = %signal.agent_id,
                magnitude = signal.magnitude,
                band = self.config.safety_band,
                "signal rejected: magnitude outside safety band"
            );
            return Err(GovernanceError::InvalidSignal {
                agent: signal.agent_id.0.clone(),
                reason: format!(
                    "magnitude {} outside safety band ±{}",
                    signal.magnitude, self.config.safety_band
                ),
            });
        }

        let entry = self.entry(&signal.agent_id)?;
        let mut guard = self.lock_entry(&entry)?;

        let old_score = guard.record.score;
        let old_tier = guard.record.tier();

        let new_score = clamp_score(old_score as i64 + signal.magnitude);
        guard.record.score = new_score;
        if signal.kind != SignalKind::InactivityTick {
            guard.record.last_activity = signal.timestamp.max(guard.record.last_activity);
            guard.decayed_days = 0;
        }
        guard.signals.push(signal.clone());

        let snapshot = TrustSnapshot {
            old_score,
            new_score,
            old_tier,
            new_tier: guard.record.tier(),
        };

        debug!(
            agent = %signal.agent_id,
            kind = ?signal.kind,
            old_score,
            new_score,
            "signal applied"
        );
        if snapshot.tier_changed() {
            info!(
                agent = %signal.agent_id,
                old_tier = %snapshot.old_tier,
                new_tier = %snapshot.new_tier,
                "trust tier changed"
            );
        }

        Ok(snapshot)
    }

    /// Run one decay evaluation for an agent at wall-clock time `now`.
    ///
    /// Idleness is measured from the last REAL signal: the stored
    /// `InactivityTick` never counts as activity, so a daily scheduler
    /// sheds `decay_points_per_day` for every day past `decay_grace_days`.
    /// The `decayed_days` watermark records how many of those days have
    /// already been charged, making a re-run at the same instant a no-op.
    ///
    /// The floor is fixed when the idle period starts decaying: the tier
    /// lower bound at that moment, minus 10 (never below 0). An idle agent
    /// therefore slips at most 10 points into the tier below, no matter
    /// how many ticks run, until real activity resets the watermark.
    pub fn decay(&self, id: &AgentId, now: DateTime<Utc>) -> GovResult<TrustSnapshot> {
        let entry = self.entry(id)?;
        let mut guard = self.lock_entry(&entry)?;

        let old_score = guard.record.score;
        let old_tier = guard.record.tier();
        let unchanged = TrustSnapshot {
            old_score,
            new_score: old_score,
            old_tier,
            new_tier: old_tier,
        };

        let idle_days = (now - guard.record.last_activity).num_days();
        if idle_days <= self.config.decay_grace_days {
            return Ok(unchanged);
        }

        let total_days = (idle_days - self.config.decay_grace_days) as u32;
        if total_days <= guard.decayed_days {
            return Ok(unchanged);
        }
        if guard.decayed_days == 0 {
            guard.decay_floor = old_tier.lower_bound().saturating_sub(10);
        }

        let fresh_days = total_days - guard.decayed_days;
        guard.decayed_days = total_days;

        let decayed = old_score
            .saturating_sub(fresh_days * self.config.decay_points_per_day)
            .max(guard.decay_floor);

        if decayed == old_score {
            return Ok(unchanged);
        }

        guard.record.score = decayed;
        let tick = Signal {
            agent_id: id.clone(),
            kind: SignalKind::InactivityTick,
            magnitude: decayed as i64 - old_score as i64,
            timestamp: now,
            source_ref: format!("decay:{}", now.to_rfc3339()),
        };
        guard.signals.push(tick);

        let snapshot = TrustSnapshot {
            old_score,
            new_score: decayed,
            old_tier,
            new_tier: guard.record.tier(),
        };

        debug!(agent = %id, old_score, new_score = decayed, idle_days, "decay applied");
        Ok(snapshot)
    }

    /// Seed an agent's score from its graduation examination.
    ///
    /// `approve_ratio` ∈ [0, 1] maps to [200, 399]; the agent's provenance
    /// modifier then shifts the seed, clamped to [0, 1000]. Flips status
    /// `Training → Active`. This is the only score assignment that does
    /// not flow through `apply_signal`.
    pub fn seed_from_examination(
        &self,
        id: &AgentId,
        approve_ratio: f64,
    ) -> GovResult<TrustSnapshot> {
        let entry = self.entry(id)?;
        let mut guard = self.lock_entry(&entry)?;

        if guard.record.status != AgentStatus::Training {
            return Err(GovernanceError::AgentNotActive {
                agent: id.0.clone(),
                status: format!("{:?}", guard.record.status).to_lowercase(),
                operation: "graduate".to_string(),
            });
        }

        let ratio = approve_ratio.clamp(0.0, 1.0);
        let base = 200 + (ratio * 199.0).round() as i64;
        let seeded = clamp_score(base + guard.record.provenance.seed_modifier());

        let old_score = guard.record.score;
        let old_tier = guard.record.tier();

        guard.record.score = seeded;
        guard.record.status = AgentStatus::Active;
        guard.record.last_activity = Utc::now();
        guard.decayed_days = 0;

        info!(
            agent = %id,
            seed = seeded,
            ratio,
            "agent graduated from examination"
        );

        Ok(TrustSnapshot {
            old_score,
            new_score: seeded,
            old_tier,
            new_tier: guard.record.tier(),
        })
    }

    /// Transition the agent's lifecycle status.
    ///
    /// `Archived` is terminal; archived agents are never reactivated and
    /// never deleted, preserving audit continuity.
    pub fn set_status(&self, id: &AgentId, status: AgentStatus) -> GovResult<()> {
        let entry = self.entry(id)?;
        let mut guard = self.lock_entry(&entry)?;

        if guard.record.status == AgentStatus::Archived {
            return Err(GovernanceError::AgentNotActive {
                agent: id.0.clone(),
                status: "archived".to_string(),
                operation: "change status".to_string(),
            });
        }

        info!(agent = %id, from = ?guard.record.status, to = ?status, "status transition");
        guard.record.status = status;
        Ok(())
    }

    /// Grant a capability string to the agent.
    pub fn grant_capability(&self, id: &AgentId, capability: impl Into<String>) -> GovResult<()> {
        let entry = self.entry(id)?;
        let mut guard = self.lock_entry(&entry)?;
        let capability = capability.into();
        if !guard.record.capabilities.contains(&capability) {
            guard.record.capabilities.push(capability);
        }
        Ok(())
    }

    /// All registered agent ids (for the decay batch job).
    pub fn agent_ids(&self) -> GovResult<Vec<AgentId>> {
        let agents = self.read_map()?;
        Ok(agents.keys().cloned().collect())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn entry(&self, id: &AgentId) -> GovResult<Arc<Mutex<AgentEntry>>> {
        let agents = self.read_map()?;
        agents
            .get(id)
            .cloned()
            .ok_or_else(|| GovernanceError::UnknownAgent { agent: id.0.clone() })
    }

    fn lock_entry<'a>(
        &self,
        entry: &'a Arc<Mutex<AgentEntry>>,
    ) -> GovResult<std::sync::MutexGuard<'a, AgentEntry>> {
        entry.lock().map_err(|e| GovernanceError::AuditWriteFailed {
            reason: format!("agent entry lock poisoned: {}", e),
        })
    }

    fn read_map(
        &self,
    ) -> GovResult<std::sync::RwLockReadGuard<'_, HashMap<AgentId, Arc<Mutex<AgentEntry>>>>> {
        self.agents.read().map_err(|e| GovernanceError::AuditWriteFailed {
            reason: format!("agent map lock poisoned: {}", e),
        })
    }

    fn write_map(
        &self,
    ) -> GovResult<std::sync::RwLockWriteGuard<'_, HashMap<AgentId, Arc<Mutex<AgentEntry>>>>> {
        self.agents.write().map_err(|e| GovernanceError::AuditWriteFailed {
            reason: format!("agent map lock poisoned: {}", e),
        })
    }
}

/// Clamp a raw running sum into the [0, 1000] score range.
fn clamp_score(raw: i64) -> u32 {
    raw.clamp(0, 1000) as u32
}
