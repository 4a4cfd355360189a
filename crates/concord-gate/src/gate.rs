//! The escalation ledger: pending approvals and their resolution.
//!
//! Escalations are fail-closed. An unresolved escalation never
//! auto-approves or auto-denies; past the staleness window it is merely
//! flagged for operator tooling while the underlying action stays blocked.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use concord_contracts::decision::{Decision, DecisionId};
use concord_contracts::error::{GovResult, GovernanceError};
use concord_contracts::human::{PendingApprovalId, ResolutionOutcome};

/// Why a matter reached the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationReason {
    /// A Level-4 request passed its supermajority and awaits the
    /// mandatory human confirmation.
    AwaitingHumanConfirmation,
    /// The tribunal deadlocked.
    Deadlock,
    /// A human forced the matter to review via an ESCALATE override.
    HumanInitiated,
}

/// One unresolved escalation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingEscalation {
    pub id: PendingApprovalId,
    /// The (non-terminal) decision under review.
    pub decision: Decision,
    pub reason: EscalationReason,
    pub escalated_at: DateTime<Utc>,
}

/// A resolved escalation, as returned to the governance core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub pending: PendingEscalation,
    pub outcome: ResolutionOutcome,
    pub comment: String,
    /// Marked by the resolving human when the call introduces a new rule
    /// pattern; the core feeds these back as precedent candidates.
    pub significant: bool,
    pub resolved_at: DateTime<Utc>,
}

/// The human escalation gate.
///
/// Callers must treat an escalation as a long-lived, cancelable wait:
/// `escalate` returns a handle immediately and the requesting workflow
/// stays suspended until `resolve` (or an override) lands.
pub struct EscalationGate {
    /// How long before an unresolved escalation is flagged stale.
    /// Staleness never resolves anything.
    stale_after: Duration,
    pending: Mutex<HashMap<PendingApprovalId, PendingEscalation>>,
}

impl EscalationGate {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Park a decision at the gate and hand back the pending handle.
    pub fn escalate(
        &self,
        decision: Decision,
        reason: EscalationReason,
    ) -> GovResult<PendingApprovalId> {
        let id = PendingApprovalId::new();
        let entry = PendingEscalation {
            id,
            decision,
            reason: reason.clone(),
            escalated_at: Utc::now(),
        };

        info!(pending = %id, ?reason, "decision escalated to human review");
        self.lock()?.insert(id, entry);
        Ok(id)
    }

    /// Resolve a pending escalation with a human verdict.
    ///
    /// Removes the entry; the caller mints the terminal decision and
    /// chains it.
    pub fn resolve(
        &self,
        id: PendingApprovalId,
        outcome: ResolutionOutcome,
        comment: impl Into<String>,
        significant: bool,
    ) -> GovResult<Resolution> {
        let pending = self.lock()?.remove(&id).ok_or_else(|| {
            GovernanceError::UnknownEscalation {
                escalation: id.to_string(),
            }
        })?;

        let age = Utc::now() - pending.escalated_at;
        if age > self.stale_after {
            // Stale but still resolvable — fail-closed means blocked, not
            // expired.
            warn!(pending = %id, age_hours = age.num_hours(), "resolving a stale escalation");
        }

        info!(pending = %id, ?outcome, significant, "escalation resolved");
        Ok(Resolution {
            pending,
            outcome,
            comment: comment.into(),
            significant,
            resolved_at: Utc::now(),
        })
    }

    /// Look up a pending escalation without resolving it.
    pub fn get(&self, id: PendingApprovalId) -> GovResult<Option<PendingEscalation>> {
        Ok(self.lock()?.get(&id).cloned())
    }

    /// The pending escalation (if any) parked for a given decision.
    pub fn find_by_decision(&self, decision: DecisionId) -> GovResult<Option<PendingEscalation>> {
        Ok(self
            .lock()?
            .values()
            .find(|p| p.decision.id == decision)
            .cloned())
    }

    /// Ids of escalations older than the staleness window.
    ///
    /// Operator tooling polls this; nothing here resolves, approves, or
    /// denies — the underlying actions stay blocked.
    pub fn stale(&self, now: DateTime<Utc>) -> GovResult<Vec<PendingApprovalId>> {
        Ok(self
            .lock()?
            .values()
            .filter(|p| now - p.escalated_at > self.stale_after)
            .map(|p| p.id)
            .collect())
    }

    /// Number of unresolved escalations.
    pub fn pending_count(&self) -> usize {
        self.lock().map(|p| p.len()).unwrap_or(0)
    }

    fn lock(
        &self,
    ) -> GovResult<std::sync::MutexGuard<'_, HashMap<PendingApprovalId, PendingEscalation>>> {
        self.pending.lock().map_err(|e| GovernanceError::AuditWriteFailed {
            reason: format!("escalation ledger lock poisoned: {}", e),
        })
    }
}
