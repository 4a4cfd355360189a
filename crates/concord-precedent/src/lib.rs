//! # concord-precedent
//!
//! Append-only precedent index: terminal decisions flagged as
//! precedent-creating are stored in an arena and retrieved by description
//! similarity with a risk window, promoting consistent governance without
//! ever deleting history.

pub mod index;

pub use index::{Precedent, PrecedentIndex};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use concord_contracts::agent::{AgentId, SessionId};
    use concord_contracts::decision::{Decision, DecisionId, Outcome};
    use concord_contracts::request::{ActionRequest, RequestId, RiskHints, RiskLevel};

    use super::PrecedentIndex;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn decision(description: &str, risk: RiskLevel, outcome: Outcome, precedent: bool) -> Decision {
        Decision {
            id: DecisionId::new(),
            request_id: RequestId::new(),
            agent_id: AgentId::new("a-1"),
            action_description: description.to_string(),
            risk_level: risk,
            votes: Vec::new(),
            outcome,
            rationale: "test".to_string(),
            precedent_refs: Vec::new(),
            creates_precedent: precedent,
            decided_at: Utc::now(),
        }
    }

    fn request(description: &str) -> ActionRequest {
        ActionRequest::new(
            AgentId::new("a-2"),
            description,
            RiskHints::default(),
            SessionId::new(),
        )
    }

    // ── Indexing rules ────────────────────────────────────────────────────────

    #[test]
    fn only_flagged_terminal_decisions_are_indexed() {
        let index = PrecedentIndex::new();

        // Flagged + terminal: kept.
        assert!(index
            .index(&decision("purge old logs", RiskLevel::L3, Outcome::Denied, true))
            .unwrap());

        // Unflagged: skipped.
        assert!(!index
            .index(&decision("purge old logs", RiskLevel::L3, Outcome::Denied, false))
            .unwrap());

        // Escalated (non-terminal): skipped even when flagged.
        assert!(!index
            .index(&decision("purge old logs", RiskLevel::L3, Outcome::Escalated, true))
            .unwrap());

        assert_eq!(index.len(), 1);
    }

    // ── Retrieval ─────────────────────────────────────────────────────────────

    #[test]
    fn retrieval_ranks_by_similarity() {
        let index = PrecedentIndex::new();
        let close = decision(
            "purge stale database records",
            RiskLevel::L3,
            Outcome::Approved,
            true,
        );
        let far = decision(
            "send weekly digest email",
            RiskLevel::L3,
            Outcome::Approved,
            true,
        );
        index.index(&close).unwrap();
        index.index(&far).unwrap();

        let hits = index
            .retrieve(&request("purge old database records"), RiskLevel::L3, 5)
            .unwrap();
        assert_eq!(hits[0].id, close.id, "closest description must rank first");
        // The digest precedent shares no tokens with the query.
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn retrieval_filters_by_risk_window() {
        let index = PrecedentIndex::new();
        index
            .index(&decision("rotate access keys", RiskLevel::L0, Outcome::Approved, true))
            .unwrap();
        index
            .index(&decision("rotate access keys", RiskLevel::L3, Outcome::Approved, true))
            .unwrap();

        // At L4, only the L3 precedent is within one level.
        let hits = index
            .retrieve(&request("rotate access keys"), RiskLevel::L4, 5)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].risk_level, RiskLevel::L3);
    }

    #[test]
    fn ties_break_toward_the_most_recent_precedent() {
        let index = PrecedentIndex::new();
        let older = decision("archive project files", RiskLevel::L2, Outcome::Denied, true);
        let newer = decision("archive project files", RiskLevel::L2, Outcome::Approved, true);
        index.index(&older).unwrap();
        index.index(&newer).unwrap();

        let hits = index
            .retrieve(&request("archive project files"), RiskLevel::L2, 1)
            .unwrap();
        assert_eq!(hits[0].id, newer.id);
    }

    #[test]
    fn k_caps_the_result_count() {
        let index = PrecedentIndex::new();
        for _ in 0..6 {
            index
                .index(&decision("rebuild search index", RiskLevel::L2, Outcome::Approved, true))
                .unwrap();
        }
        let hits = index
            .retrieve(&request("rebuild search index"), RiskLevel::L2, 3)
            .unwrap();
        assert_eq!(hits.len(), 3);
    }

    // ── Supersession ──────────────────────────────────────────────────────────

    #[test]
    fn superseded_precedents_never_surface_but_are_not_deleted() {
        let index = PrecedentIndex::new();
        let old = decision("grant api access", RiskLevel::L2, Outcome::Denied, true);
        let new = decision("grant api access", RiskLevel::L2, Outcome::Approved, true);
        index.index(&old).unwrap();
        index.index(&new).unwrap();

        index.supersede(old.id, new.id).unwrap();

        let hits = index
            .retrieve(&request("grant api access"), RiskLevel::L2, 5)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, new.id);

        // Append-only: the arena still holds both.
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn superseding_an_unknown_precedent_is_an_error() {
        let index = PrecedentIndex::new();
        let err = index
            .supersede(DecisionId::new(), DecisionId::new())
            .unwrap_err();
        assert!(err.to_string().contains("unknown decision"));
    }
}
