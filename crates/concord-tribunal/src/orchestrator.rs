//! Vote synthesis: risk-level thresholds, deadlock detection, upward
//! re-flagging, and examination scoring.
//!
//! Threshold policy is fixed, not configurable per call:
//!
//!   L2 — all 3 of the designated review subset must approve; any
//!        explicit subset deny blocks; subset abstains deadlock.
//!   L3 — simple majority, 5 of 9, in either direction; else deadlock.
//!   L4 — supermajority, 7 of 9, to pass — and passing still awaits a
//!        separate human confirmation; 3 denials make the supermajority
//!        unreachable and deny outright; else deadlock.
//!
//! Deadlocks are never auto-resolved; they route to the Human Escalation
//! Gate.

use tracing::{info, warn};

use concord_contracts::decision::{ValidatorRole, Vote, VoteChoice};
use concord_contracts::request::RiskLevel;

/// The synthesized aggregate of one tribunal round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TribunalOutcome {
    /// Threshold met; the action may execute.
    Approved,
    /// Deny threshold met (or a subset deny blocked); the action is
    /// refused.
    Denied,
    /// Neither threshold met. Routed to the Human Escalation Gate.
    Deadlock,
    /// L4 supermajority met — the action stays blocked until a human
    /// separately confirms. Never auto-executes.
    AwaitingHuman,
}

/// The full product of synthesis: effective level, votes, outcome, and a
/// one-line rationale for the decision record.
#[derive(Debug, Clone)]
pub struct TribunalVerdict {
    /// The classified level raised by any validator severity flags.
    pub effective_level: RiskLevel,
    /// All nine votes, roster order, timeouts included as abstains.
    pub votes: Vec<Vote>,
    pub outcome: TribunalOutcome,
    pub rationale: String,
}

/// Synthesize nine votes against the threshold for the classified level.
///
/// Severity flags are folded in first: the effective level is the maximum
/// of the classified level and every flag raised in a rationale — the
/// tribunal re-flags risk upward, never downward.
pub fn synthesize(classified: RiskLevel, votes: Vec<Vote>) -> TribunalVerdict {
    let effective = votes
        .iter()
        .filter_map(|v| v.severity_flag)
        .fold(classified, RiskLevel::max);

    if effective > classified {
        warn!(
            classified = %classified,
            effective = %effective,
            "validator severity flags raised the effective risk level"
        );
    }

    let approvals = count(&votes, VoteChoice::Approve);
    let denials = count(&votes, VoteChoice::Deny);
    let abstains = count(&votes, VoteChoice::Abstain);

    let outcome = match effective {
        // L0/L1 never reach the tribunal; synthesizing them anyway takes
        // the conservative review-subset path.
        RiskLevel::L0 | RiskLevel::L1 | RiskLevel::L2 => subset_outcome(&votes),
        RiskLevel::L3 => {
            if approvals >= 5 {
                TribunalOutcome::Approved
            } else if denials >= 5 {
                TribunalOutcome::Denied
            } else {
                TribunalOutcome::Deadlock
            }
        }
        RiskLevel::L4 => {
            if approvals >= 7 {
                TribunalOutcome::AwaitingHuman
            } else if denials >= 3 {
                // Supermajority is unreachable.
                TribunalOutcome::Denied
            } else {
                TribunalOutcome::Deadlock
            }
        }
    };

    let rationale = format!(
        "{}: {} approve / {} deny / {} abstain — {}",
        effective,
        approvals,
        denials,
        abstains,
        describe(&outcome, effective)
    );

    info!(
        level = %effective,
        approvals,
        denials,
        abstains,
        outcome = ?outcome,
        "tribunal synthesis complete"
    );

    TribunalVerdict {
        effective_level: effective,
        votes,
        outcome,
        rationale,
    }
}

/// The approve ratio over all nine ballots, used to seed examination
/// scores: ratio × 199 + 200 lands in [200, 399].
pub fn approve_ratio(votes: &[Vote]) -> f64 {
    if votes.is_empty() {
        return 0.0;
    }
    count(votes, VoteChoice::Approve) as f64 / votes.len() as f64
}

/// L2 rule: the designated review subset (first three roster roles) must
/// unanimously approve; any explicit subset deny blocks; anything else
/// (a subset abstain, e.g. a timeout) is a deadlock — ties are never
/// auto-resolved.
fn subset_outcome(votes: &[Vote]) -> TribunalOutcome {
    let subset: Vec<&Vote> = votes.iter().filter(|v| v.role.in_review_subset()).collect();

    if subset.iter().any(|v| v.choice == VoteChoice::Deny) {
        TribunalOutcome::Denied
    } else if subset.len() == subset_size()
        && subset.iter().all(|v| v.choice == VoteChoice::Approve)
    {
        TribunalOutcome::Approved
    } else {
        TribunalOutcome::Deadlock
    }
}

fn subset_size() -> usize {
    ValidatorRole::ROSTER
        .iter()
        .filter(|r| r.in_review_subset())
        .count()
}

fn count(votes: &[Vote], choice: VoteChoice) -> usize {
    votes.iter().filter(|v| v.choice == choice).count()
}

fn describe(outcome: &TribunalOutcome, level: RiskLevel) -> &'static str {
    match (outcome, level) {
        (TribunalOutcome::Approved, RiskLevel::L3) => "majority approval met",
        (TribunalOutcome::Approved, _) => "review subset unanimous",
        (TribunalOutcome::Denied, RiskLevel::L2) => "blocked by review subset deny",
        (TribunalOutcome::Denied, _) => "deny threshold met",
        (TribunalOutcome::Deadlock, _) => "deadlocked, escalating to human review",
        (TribunalOutcome::AwaitingHuman, _) => {
            "supermajority met, awaiting separate human confirmation"
        }
    }
}
