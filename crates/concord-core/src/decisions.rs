//! In-memory store of every decision the core has minted.
//!
//! Decisions are write-once: a terminal decision is never edited, and a
//! pending (escalated) decision is replaced only by the terminal decision
//! a human resolution mints under a new id.

use std::collections::HashMap;
use std::sync::Mutex;

use concord_contracts::decision::{Decision, DecisionId};
use concord_contracts::error::{GovResult, GovernanceError};

pub struct DecisionStore {
    decisions: Mutex<HashMap<DecisionId, Decision>>,
}

impl DecisionStore {
    pub fn new() -> Self {
        Self {
            decisions: Mutex::new(HashMap::new()),
        }
    }

    /// Store a freshly minted decision.
    pub fn insert(&self, decision: Decision) -> GovResult<()> {
        self.lock()?.insert(decision.id, decision);
        Ok(())
    }

    /// Fetch a decision by id.
    pub fn get(&self, id: DecisionId) -> GovResult<Decision> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or_else(|| GovernanceError::UnknownDecision {
                decision: id.to_string(),
            })
    }

    /// Number of decisions stored.
    pub fn len(&self) -> usize {
        self.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// True when no decision has been minted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> GovResult<std::sync::MutexGuard<'_, HashMap<DecisionId, Decision>>> {
        self.decisions
            .lock()
            .map_err(|e| GovernanceError::AuditWriteFailed {
                reason: format!("decision store lock poisoned: {}", e),
            })
    }
}

impl Default for DecisionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use concord_contracts::agent::AgentId;
    use concord_contracts::decision::{Decision, DecisionId, Outcome};
    use concord_contracts::request::{RequestId, RiskLevel};

    use super::DecisionStore;

    fn decision() -> Decision {
        Decision {
            id: DecisionId::new(),
            request_id: RequestId::new(),
            agent_id: AgentId::new("store-test"),
            action_description: "post the weekly summary".to_string(),
            risk_level: RiskLevel::L2,
            votes: Vec::new(),
            outcome: Outcome::Approved,
            rationale: "review subset unanimous".to_string(),
            precedent_refs: Vec::new(),
            creates_precedent: false,
            decided_at: Utc::now(),
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let store = DecisionStore::new();
        let d = decision();
        let id = d.id;
        store.insert(d).unwrap();
        assert_eq!(store.get(id).unwrap().outcome, Outcome::Approved);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let store = DecisionStore::new();
        assert!(store.get(DecisionId::new()).is_err());
    }
}
