//! # concord-trust
//!
//! Signal store and trust engine: the durable record of trust-affecting
//! events per agent, and the clamped 0–1000 score computed from them.
//!
//! The score starts at 0, moves only through signals (clamped, safety-band
//! checked), decays after 7 idle days with a tier-bounded floor, and is
//! seeded exactly once by examination graduation.

pub mod engine;

pub use engine::{TrustConfig, TrustEngine, TrustSnapshot};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use concord_contracts::agent::{AgentId, AgentStatus, Provenance, TrustTier};
    use concord_contracts::error::GovernanceError;
    use concord_contracts::signal::{Signal, SignalKind};

    use super::{TrustConfig, TrustEngine};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn engine() -> TrustEngine {
        TrustEngine::new(TrustConfig::default())
    }

    fn registered(engine: &TrustEngine, id: &str) -> AgentId {
        let id = AgentId::new(id);
        engine.register(id.clone(), Provenance::Fresh).unwrap();
        id
    }

    fn signal(id: &AgentId, kind: SignalKind, magnitude: i64) -> Signal {
        Signal {
            agent_id: id.clone(),
            kind,
            magnitude,
            timestamp: Utc::now(),
            source_ref: "test".to_string(),
        }
    }

    /// Push an agent to an exact score through milestone-sized signals.
    fn set_score(engine: &TrustEngine, id: &AgentId, target: u32) {
        let mut remaining = target as i64;
        while remaining > 0 {
            let step = remaining.min(100);
            engine
                .apply_signal(signal(id, SignalKind::Milestone, step))
                .unwrap();
            remaining -= step;
        }
        assert_eq!(engine.compute_score(id).unwrap().0, target);
    }

    // ── Registration and basics ───────────────────────────────────────────────

    #[test]
    fn new_agents_start_at_zero_in_training() {
        let engine = engine();
        let record = engine
            .register(AgentId::new("a-1"), Provenance::Fresh)
            .unwrap();
        assert_eq!(record.score, 0);
        assert_eq!(record.status, AgentStatus::Training);
        assert_eq!(record.tier(), TrustTier::Untrusted);
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let engine = engine();
        let err = engine.compute_score(&AgentId::new("ghost")).unwrap_err();
        assert!(matches!(err, GovernanceError::UnknownAgent { .. }));
    }

    // ── Signal application ────────────────────────────────────────────────────

    #[test]
    fn signals_accumulate_and_clamp_at_both_ends() {
        let engine = engine();
        let id = registered(&engine, "a-1");

        engine
            .apply_signal(signal(&id, SignalKind::TaskSuccess, 1))
            .unwrap();
        engine
            .apply_signal(signal(&id, SignalKind::Milestone, 10))
            .unwrap();
        assert_eq!(engine.compute_score(&id).unwrap().0, 11);

        // Drive far below zero: clamped at 0.
        engine
            .apply_signal(signal(&id, SignalKind::PolicyViolation, -50))
            .unwrap();
        assert_eq!(engine.compute_score(&id).unwrap().0, 0);

        // Drive to the ceiling: clamped at 1000.
        set_score(&engine, &id, 1000);
        let snap = engine
            .apply_signal(signal(&id, SignalKind::Milestone, 10))
            .unwrap();
        assert_eq!(snap.new_score, 1000);
    }

    #[test]
    fn safety_band_rejects_oversized_magnitudes_without_touching_score() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 500);

        let err = engine
            .apply_signal(signal(&id, SignalKind::Milestone, 101))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidSignal { .. }));

        // Score untouched, signal not stored.
        assert_eq!(engine.compute_score(&id).unwrap().0, 500);
        let history = engine.history(&id).unwrap();
        assert!(history.iter().all(|s| s.magnitude.abs() <= 100));
    }

    #[test]
    fn tier_change_is_reported_in_the_snapshot() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 95);

        let snap = engine
            .apply_signal(signal(&id, SignalKind::Milestone, 10))
            .unwrap();
        assert!(snap.tier_changed());
        assert_eq!(snap.old_tier, TrustTier::Untrusted);
        assert_eq!(snap.new_tier, TrustTier::Probation);
    }

    // ── Decay ─────────────────────────────────────────────────────────────────

    #[test]
    fn no_decay_within_the_grace_window() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 300);

        let snap = engine.decay(&id, Utc::now() + Duration::days(7)).unwrap();
        assert_eq!(snap.new_score, 300);
    }

    #[test]
    fn decay_drops_one_point_per_day_past_grace() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 300);

        // 12 idle days = 5 days past the 7-day grace = -5.
        let snap = engine.decay(&id, Utc::now() + Duration::days(12)).unwrap();
        assert_eq!(snap.new_score, 295);
    }

    #[test]
    fn decay_floors_ten_points_below_the_tier_lower_bound() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        // Developing tier (lower bound 250): floor is 240.
        set_score(&engine, &id, 255);

        // 100 idle days would naively drop 93 points; the floor holds.
        let snap = engine.decay(&id, Utc::now() + Duration::days(100)).unwrap();
        assert_eq!(snap.new_score, 240);
        // Exactly one tier boundary crossed.
        assert_eq!(snap.old_tier, TrustTier::Developing);
        assert_eq!(snap.new_tier, TrustTier::Probation);
    }

    #[test]
    fn decay_never_goes_below_zero() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 5);

        // Untrusted lower bound is 0; saturating floor is 0.
        let snap = engine.decay(&id, Utc::now() + Duration::days(60)).unwrap();
        assert_eq!(snap.new_score, 0);
    }

    #[test]
    fn decay_is_idempotent_at_the_same_instant() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 300);

        let tick_at = Utc::now() + Duration::days(12);
        let first = engine.decay(&id, tick_at).unwrap();
        assert_eq!(first.new_score, 295);

        // Those five days are already charged; a re-run at the same
        // instant finds nothing new to shed.
        let second = engine.decay(&id, tick_at).unwrap();
        assert_eq!(second.new_score, 295);
        assert_eq!(second.old_score, 295);
    }

    #[test]
    fn daily_decay_ticks_shed_one_point_each() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 300);

        // A daily scheduler running on days 8 through 12 of inactivity
        // must shed one point per run, not one point per grace window.
        let start = Utc::now();
        for day in 8..=12 {
            engine.decay(&id, start + Duration::days(day)).unwrap();
        }
        assert_eq!(engine.compute_score(&id).unwrap().0, 295);
    }

    #[test]
    fn decay_floor_holds_across_repeated_ticks() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        // Developing tier: the idle-period floor is 240.
        set_score(&engine, &id, 255);

        let start = Utc::now();
        engine.decay(&id, start + Duration::days(30)).unwrap();
        assert_eq!(engine.compute_score(&id).unwrap().0, 240);

        // Later ticks in the same idle period stay at the floor instead
        // of cascading into the next tier down.
        engine.decay(&id, start + Duration::days(90)).unwrap();
        assert_eq!(engine.compute_score(&id).unwrap().0, 240);
    }

    #[test]
    fn real_activity_restarts_the_decay_clock() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 300);

        let start = Utc::now();
        engine.decay(&id, start + Duration::days(10)).unwrap();
        assert_eq!(engine.compute_score(&id).unwrap().0, 297);

        // A real signal on day 10 resets last_activity; the next tick
        // sits inside a fresh grace window.
        engine
            .apply_signal(Signal {
                agent_id: id.clone(),
                kind: SignalKind::TaskSuccess,
                magnitude: 1,
                timestamp: start + Duration::days(10),
                source_ref: "test".to_string(),
            })
            .unwrap();
        let snap = engine.decay(&id, start + Duration::days(15)).unwrap();
        assert_eq!(snap.new_score, 298);
    }

    #[test]
    fn decay_records_an_inactivity_tick_signal() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        set_score(&engine, &id, 300);

        engine.decay(&id, Utc::now() + Duration::days(10)).unwrap();
        let history = engine.history(&id).unwrap();
        let tick = history.last().unwrap();
        assert_eq!(tick.kind, SignalKind::InactivityTick);
        assert!(tick.magnitude < 0);
    }

    // ── Examination seeding ───────────────────────────────────────────────────

    #[test]
    fn examination_seed_spans_200_to_399() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        let snap = engine.seed_from_examination(&id, 0.0).unwrap();
        assert_eq!(snap.new_score, 200);

        let id2 = registered(&engine, "a-2");
        let snap = engine.seed_from_examination(&id2, 1.0).unwrap();
        assert_eq!(snap.new_score, 399);

        let id3 = registered(&engine, "a-3");
        let snap = engine.seed_from_examination(&id3, 0.5).unwrap();
        assert_eq!(snap.new_score, 300);
    }

    #[test]
    fn graduation_flips_status_to_active() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        engine.seed_from_examination(&id, 0.8).unwrap();
        assert_eq!(engine.record(&id).unwrap().status, AgentStatus::Active);

        // A second graduation attempt is rejected.
        let err = engine.seed_from_examination(&id, 0.8).unwrap_err();
        assert!(matches!(err, GovernanceError::AgentNotActive { .. }));
    }

    #[test]
    fn provenance_shifts_the_examination_seed() {
        let engine = engine();

        let cloned = AgentId::new("cloned");
        engine.register(cloned.clone(), Provenance::Cloned).unwrap();
        let snap = engine.seed_from_examination(&cloned, 0.5).unwrap();
        assert_eq!(snap.new_score, 250); // 300 - 50

        let promoted = AgentId::new("promoted");
        engine
            .register(promoted.clone(), Provenance::Promoted)
            .unwrap();
        let snap = engine.seed_from_examination(&promoted, 0.5).unwrap();
        assert_eq!(snap.new_score, 450); // 300 + 150
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    #[test]
    fn archived_is_terminal() {
        let engine = engine();
        let id = registered(&engine, "a-1");
        engine.set_status(&id, AgentStatus::Archived).unwrap();

        let err = engine.set_status(&id, AgentStatus::Active).unwrap_err();
        assert!(matches!(err, GovernanceError::AgentNotActive { .. }));

        // The record itself survives archival.
        assert_eq!(engine.record(&id).unwrap().status, AgentStatus::Archived);
    }

    // ── Concurrency ───────────────────────────────────────────────────────────

    /// Concurrent signal application for the same agent loses no updates:
    /// the per-agent mutex serializes mutations.
    #[test]
    fn concurrent_signals_for_one_agent_are_not_lost() {
        use std::sync::Arc;

        let engine = Arc::new(engine());
        let id = registered(&engine, "a-1");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = engine.clone();
            let id = id.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    engine
                        .apply_signal(Signal {
                            agent_id: id.clone(),
                            kind: SignalKind::TaskSuccess,
                            magnitude: 1,
                            timestamp: Utc::now(),
                            source_ref: "load".to_string(),
                        })
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 8 threads × 25 signals × +1 each.
        assert_eq!(engine.compute_score(&id).unwrap().0, 200);
        assert_eq!(engine.history(&id).unwrap().len(), 200);
    }
}
