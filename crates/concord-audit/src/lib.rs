//! # concord-audit
//!
//! Immutable, append-only, SHA-256 hash-chained audit ledger for the
//! CONCORD governance core.
//!
//! ## Overview
//!
//! Every decision, override, score mutation, auto-execution, and
//! cancellation is wrapped in a `ChainRecord` that links to the previous
//! record via its SHA-256 hash. Tampering with any record — even a single
//! byte — breaks the chain from that record forward and is detected by
//! `verify`. A detected break latches the ledger: all further appends fail
//! with `ChainHalted` until a human-triggered `reverify()` passes cleanly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use concord_audit::AuditLedger;
//!
//! let ledger = AuditLedger::new("chain-key".as_bytes());
//! let record = ledger.append(payload)?;
//! assert!(ledger.verify(0, record.sequence)?.valid);
//! let summary = ledger.public_verify(&record.this_hash)?;
//! ```

pub mod hash;
pub mod ledger;
pub mod record;

pub use hash::{hash_payload, hash_record, sign_hash, verify_records};
pub use ledger::AuditLedger;
pub use record::{ChainRecord, IntegrityReport};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use concord_contracts::agent::AgentId;
    use concord_contracts::chain::{AutoExecution, ChainPayload};
    use concord_contracts::error::GovernanceError;
    use concord_contracts::request::{RequestId, RiskLevel};

    use super::{AuditLedger, ChainRecord};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build a distinguishable auto-execution payload.
    fn make_payload(description: &str) -> ChainPayload {
        ChainPayload::AutoExecution(AutoExecution {
            request_id: RequestId::new(),
            agent_id: AgentId::new("agent-1"),
            description: description.to_string(),
            risk_level: RiskLevel::L1,
        })
    }

    // ── Chain integrity ───────────────────────────────────────────────────────

    /// Appending three records yields a valid chain.
    #[test]
    fn test_chain_integrity_after_appends() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        ledger.append(make_payload("first")).unwrap();
        ledger.append(make_payload("second")).unwrap();
        ledger.append(make_payload("third")).unwrap();

        let report = ledger.verify(0, 2).unwrap();
        assert!(report.valid, "chain must be valid after sequential appends");
        assert_eq!(report.records_checked, 3);
    }

    /// The first record's prev_hash must be the genesis sentinel.
    #[test]
    fn test_genesis_anchor() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        let record = ledger.append(make_payload("first")).unwrap();
        assert_eq!(record.prev_hash, ChainRecord::GENESIS_HASH);
        assert_eq!(record.sequence, 0);
    }

    /// Sequence numbers are 0, 1, 2, … with no gaps.
    #[test]
    fn test_sequence_gapless() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        for expected in 0..5u64 {
            let record = ledger.append(make_payload("x")).unwrap();
            assert_eq!(record.sequence, expected);
        }
    }

    /// Tampering with a stored payload breaks verification at exactly that
    /// record — never before it — and latches the halt.
    #[test]
    fn test_tamper_detection_reports_first_break_and_halts() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        ledger.append(make_payload("a")).unwrap();
        ledger.append(make_payload("b")).unwrap();
        ledger.append(make_payload("c")).unwrap();

        ledger.tamper_with_payload(1, "TAMPERED");

        let report = ledger.verify(0, 2).unwrap();
        assert!(!report.valid);
        assert_eq!(report.first_broken, Some(1), "break must be at the tampered record");
        // Record 0 verified cleanly before the break.
        assert_eq!(report.records_checked, 1);

        // The ledger is now halted: appends fail.
        assert!(ledger.is_halted());
        let err = ledger.append(make_payload("d")).unwrap_err();
        assert!(matches!(err, GovernanceError::ChainHalted));
    }

    /// Verification over an untampered prefix still passes after a break
    /// further down — the chain is compromised forward, not backward.
    #[test]
    fn test_break_does_not_invalidate_earlier_records() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        ledger.append(make_payload("a")).unwrap();
        ledger.append(make_payload("b")).unwrap();
        ledger.append(make_payload("c")).unwrap();

        ledger.tamper_with_payload(2, "TAMPERED");

        let prefix = ledger.verify(0, 1).unwrap();
        assert!(prefix.valid, "records before the break must still verify");
    }

    /// verify() run twice over the same unmodified range is idempotent.
    #[test]
    fn test_verify_idempotent() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        ledger.append(make_payload("a")).unwrap();
        ledger.append(make_payload("b")).unwrap();

        let first = ledger.verify(0, 1).unwrap();
        let second = ledger.verify(0, 1).unwrap();
        assert_eq!(first, second);
    }

    /// A clean reverify() clears the halt latch; appends work again.
    #[test]
    fn test_reverify_clears_halt_only_when_clean() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        ledger.append(make_payload("a")).unwrap();
        ledger.append(make_payload("b")).unwrap();

        ledger.tamper_with_payload(1, "TAMPERED");
        assert!(!ledger.verify(0, 1).unwrap().valid);
        assert!(ledger.is_halted());

        // Still broken: reverify keeps the latch.
        assert!(!ledger.reverify().unwrap().valid);
        assert!(ledger.is_halted());

        // Restore the original payload, then reverify.
        ledger.tamper_with_payload(1, "b");
        assert!(ledger.reverify().unwrap().valid);
        assert!(!ledger.is_halted());
        ledger.append(make_payload("c")).unwrap();
    }

    /// An empty chain verifies trivially.
    #[test]
    fn test_verify_empty() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        let report = ledger.verify(0, 0).unwrap();
        assert!(report.valid);
        assert_eq!(report.records_checked, 0);
    }

    // ── Public verification ───────────────────────────────────────────────────

    /// public_verify returns the summary slice for a known hash and None
    /// for an unknown one.
    #[test]
    fn test_public_verify() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        let record = ledger.append(make_payload("look me up")).unwrap();

        let summary = ledger.public_verify(&record.this_hash).unwrap().unwrap();
        assert_eq!(summary.payload_kind, "auto_execution");
        assert_eq!(summary.sequence, 0);

        assert!(ledger.public_verify("feedbeef").unwrap().is_none());
    }

    /// public_verify refuses to vouch for a tampered record.
    #[test]
    fn test_public_verify_rejects_tampered() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        let record = ledger.append(make_payload("original")).unwrap();

        ledger.tamper_with_payload(0, "TAMPERED");
        assert!(ledger.public_verify(&record.this_hash).unwrap().is_none());
    }

    // ── Export ────────────────────────────────────────────────────────────────

    /// export filters by agent and time window.
    #[test]
    fn test_export_filters_by_agent() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        ledger.append(make_payload("a1 action")).unwrap();

        let other = ChainPayload::AutoExecution(
            concord_contracts::chain::AutoExecution {
                request_id: RequestId::new(),
                agent_id: AgentId::new("agent-2"),
                description: "a2 action".to_string(),
                risk_level: RiskLevel::L0,
            },
        );
        ledger.append(other).unwrap();

        let window_start = chrono::Utc::now() - chrono::Duration::hours(1);
        let window_end = chrono::Utc::now() + chrono::Duration::hours(1);

        let exported = ledger
            .export(&AgentId::new("agent-1"), window_start, window_end)
            .unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].sequence, 0);
    }

    /// export refuses to hand over records from a broken chain: the error
    /// names the broken sequence and the halt latches.
    #[test]
    fn test_export_refuses_tampered_chain() {
        let ledger = AuditLedger::new(b"test-key".to_vec());
        ledger.append(make_payload("a")).unwrap();
        ledger.append(make_payload("b")).unwrap();

        ledger.tamper_with_payload(1, "TAMPERED");

        let window_start = chrono::Utc::now() - chrono::Duration::hours(1);
        let window_end = chrono::Utc::now() + chrono::Duration::hours(1);
        let err = ledger
            .export(&AgentId::new("agent-1"), window_start, window_end)
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::ChainIntegrityViolation { sequence: 1 }
        ));
        assert!(ledger.is_halted());
    }

    // ── Signature ─────────────────────────────────────────────────────────────

    /// Two ledgers with different keys sign the same hash differently.
    #[test]
    fn test_signature_is_keyed() {
        use super::sign_hash;
        let a = sign_hash(b"key-a", "deadbeef");
        let b = sign_hash(b"key-b", "deadbeef");
        assert_ne!(a, b);
        // Same key, same hash: deterministic.
        assert_eq!(sign_hash(b"key-a", "deadbeef"), a);
    }
}
