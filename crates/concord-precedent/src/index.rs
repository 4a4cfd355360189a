//! The precedent arena and retrieval logic.
//!
//! Precedents are append-only: a later decision marks an earlier one
//! obsolete through a supersession pointer, never by mutation or delete.
//! Retrieval is token-set similarity over action descriptions with a risk
//! window filter; ties break toward the most recent precedent.

use std::collections::HashSet;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use concord_contracts::decision::{Decision, DecisionId};
use concord_contracts::error::{GovResult, GovernanceError};
use concord_contracts::request::{ActionRequest, RiskLevel};

/// One indexed precedent: the decision it wraps plus its supersession
/// pointer. `superseded_by` is the only field ever written after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Precedent {
    pub decision: Decision,
    pub indexed_at: DateTime<Utc>,
    pub superseded_by: Option<DecisionId>,
}

/// Append-only, concurrently-readable precedent index.
///
/// All nine validators read the index during a round; the `RwLock` keeps
/// those reads concurrent while the (rare, off-critical-path) writes
/// serialize.
pub struct PrecedentIndex {
    arena: RwLock<Vec<Precedent>>,
}

impl PrecedentIndex {
    pub fn new() -> Self {
        Self {
            arena: RwLock::new(Vec::new()),
        }
    }

    /// Index a terminal decision flagged `creates_precedent`.
    ///
    /// Decisions without the flag, and non-terminal decisions, are
    /// silently skipped — callers route every decision through here and
    /// the index keeps only what qualifies.
    pub fn index(&self, decision: &Decision) -> GovResult<bool> {
        if !decision.creates_precedent || !decision.outcome.is_terminal() {
            return Ok(false);
        }

        let mut arena = self.write()?;
        arena.push(Precedent {
            decision: decision.clone(),
            indexed_at: Utc::now(),
            superseded_by: None,
        });

        info!(
            decision = %decision.id,
            outcome = %decision.outcome,
            corpus = arena.len(),
            "precedent indexed"
        );
        Ok(true)
    }

    /// Retrieve up to `k` precedents relevant to a request.
    ///
    /// Candidates are filtered to within one risk level of `risk`, scored
    /// by Jaccard similarity between lowercase token sets of the action
    /// descriptions, and ranked by (score, recency) — the most recent
    /// precedent wins a tie. Superseded precedents never surface.
    pub fn retrieve(
        &self,
        request: &ActionRequest,
        risk: RiskLevel,
        k: usize,
    ) -> GovResult<Vec<Decision>> {
        let arena = self.read()?;
        let query = tokenize(&request.description);

        let mut scored: Vec<(f64, DateTime<Utc>, &Precedent)> = arena
            .iter()
            .filter(|p| p.superseded_by.is_none())
            .filter(|p| risk_window(p.decision.risk_level, risk))
            .map(|p| {
                let score = jaccard(&query, &tokenize(&p.decision.action_description));
                (score, p.indexed_at, p)
            })
            .filter(|(score, _, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.1.cmp(&a.1))
        });

        debug!(
            request = %request.id,
            candidates = scored.len(),
            k,
            "precedent retrieval"
        );

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, _, p)| p.decision.clone())
            .collect())
    }

    /// Mark `old` as superseded by `new`.
    ///
    /// The superseded precedent stays in the arena — the append-only
    /// invariant — but is excluded from all future retrieval.
    pub fn supersede(&self, old: DecisionId, new: DecisionId) -> GovResult<()> {
        let mut arena = self.write()?;
        let entry = arena
            .iter_mut()
            .find(|p| p.decision.id == old)
            .ok_or_else(|| GovernanceError::UnknownDecision {
                decision: old.to_string(),
            })?;

        entry.superseded_by = Some(new);
        info!(old = %old, new = %new, "precedent superseded");
        Ok(())
    }

    /// Number of precedents in the arena, superseded included.
    pub fn len(&self) -> usize {
        self.read().map(|a| a.len()).unwrap_or(0)
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> GovResult<std::sync::RwLockReadGuard<'_, Vec<Precedent>>> {
        self.arena.read().map_err(|e| GovernanceError::AuditWriteFailed {
            reason: format!("precedent arena lock poisoned: {}", e),
        })
    }

    fn write(&self) -> GovResult<std::sync::RwLockWriteGuard<'_, Vec<Precedent>>> {
        self.arena.write().map_err(|e| GovernanceError::AuditWriteFailed {
            reason: format!("precedent arena lock poisoned: {}", e),
        })
    }
}

impl Default for PrecedentIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// A precedent is relevant when its level is within one of the request's.
fn risk_window(precedent: RiskLevel, request: RiskLevel) -> bool {
    precedent.as_u8().abs_diff(request.as_u8()) <= 1
}

/// Lowercase alphanumeric token set of a description.
fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of two token sets; 0.0 when either is empty.
fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}
