//! The in-memory audit ledger: single-writer, halt-latching chain store.
//!
//! The chain tail is the most contended resource in the system, so every
//! append runs through one `Mutex` — sequence numbers are assigned inside
//! the critical section, which makes them strictly increasing and gapless
//! by construction, and guarantees each append observes the true tail hash.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use concord_contracts::agent::AgentId;
use concord_contracts::chain::{ChainPayload, RecordSummary};
use concord_contracts::error::{GovResult, GovernanceError};

use crate::hash::{hash_payload, hash_record, sign_hash, verify_records};
use crate::record::{ChainRecord, IntegrityReport};

/// The mutable interior of an `AuditLedger`.
struct LedgerState {
    /// All records written so far, in append order. Index == sequence.
    records: Vec<ChainRecord>,
    /// The next sequence number to assign (starts at 0).
    sequence: u64,
    /// The `this_hash` of the last written record, or `GENESIS_HASH`
    /// before any record has been written.
    last_hash: String,
    /// Latched when verification detects a broken record. While set, all
    /// appends fail with `ChainHalted`; only `reverify()` can clear it.
    halted: bool,
}

/// An append-only, halt-latching audit ledger backed by a SHA-256 chain.
///
/// # Thread safety
///
/// All operations acquire the internal `Mutex`; concurrent appenders from
/// different decision paths serialize on the tail.
pub struct AuditLedger {
    signing_key: Vec<u8>,
    state: Mutex<LedgerState>,
}

impl AuditLedger {
    /// Create an empty ledger with the given chain-instance signing key.
    pub fn new(signing_key: impl Into<Vec<u8>>) -> Self {
        Self {
            signing_key: signing_key.into(),
            state: Mutex::new(LedgerState {
                records: Vec::new(),
                sequence: 0,
                last_hash: ChainRecord::GENESIS_HASH.to_string(),
                halted: false,
            }),
        }
    }

    /// Append one payload to the chain.
    ///
    /// Computes `this_hash` over (prev_hash, payload, sequence, timestamp)
    /// inside the tail critical section, signs it, and advances the tail.
    ///
    /// # Errors
    ///
    /// `ChainHalted` when a prior integrity violation has latched the
    /// ledger; `AuditWriteFailed` when the payload cannot be serialized or
    /// the lock is poisoned.
    pub fn append(&self, payload: ChainPayload) -> GovResult<ChainRecord> {
        let mut state = self.lock()?;

        if state.halted {
            warn!(
                payload_kind = payload.kind_label(),
                "append rejected: chain is halted"
            );
            return Err(GovernanceError::ChainHalted);
        }

        let timestamp = Utc::now();
        let sequence = state.sequence;
        let prev_hash = state.last_hash.clone();

        let payload_hash = hash_payload(&payload)?;
        let this_hash = hash_record(&prev_hash, &payload, sequence, timestamp)?;
        let signature = sign_hash(&self.signing_key, &this_hash);

        let record = ChainRecord {
            sequence,
            payload,
            payload_hash,
            prev_hash,
            this_hash: this_hash.clone(),
            signature,
            timestamp,
        };

        debug!(
            sequence,
            payload_kind = record.payload.kind_label(),
            "chained audit record"
        );

        state.records.push(record.clone());
        state.sequence += 1;
        state.last_hash = this_hash;

        Ok(record)
    }

    /// Verify the records in `[from_seq, to_seq]` inclusive.
    ///
    /// Recomputes every hash in the range, anchored on the `this_hash` of
    /// the record before `from_seq` (or the genesis sentinel). A detected
    /// break latches the ledger into the halted state and names the first
    /// broken sequence; subsequent records are not inspected.
    ///
    /// Idempotent: re-running over the same unmodified range returns an
    /// identical report.
    pub fn verify(&self, from_seq: u64, to_seq: u64) -> GovResult<IntegrityReport> {
        let mut state = self.lock()?;

        let end = (to_seq.saturating_add(1)).min(state.records.len() as u64);
        let start = from_seq.min(end);

        let anchor = if start == 0 {
            ChainRecord::GENESIS_HASH.to_string()
        } else {
            state.records[(start - 1) as usize].this_hash.clone()
        };

        let report = verify_records(&state.records[start as usize..end as usize], &anchor)?;

        if let Some(sequence) = report.first_broken {
            error!(
                sequence,
                "chain integrity violation detected; halting all appends"
            );
            state.halted = true;
        }

        Ok(report)
    }

    /// Human-triggered full re-verification.
    ///
    /// Walks the entire chain from genesis. A clean pass clears the halt
    /// latch; a failing pass keeps it set and returns the report.
    pub fn reverify(&self) -> GovResult<IntegrityReport> {
        let mut state = self.lock()?;
        let report = verify_records(&state.records, ChainRecord::GENESIS_HASH)?;

        if report.valid {
            if state.halted {
                info!("re-verification clean; chain halt cleared");
            }
            state.halted = false;
        } else {
            state.halted = true;
        }

        Ok(report)
    }

    /// Public, unauthenticated existence-and-integrity probe.
    ///
    /// Looks up a record by its `this_hash`, recomputes the hash, and — on
    /// a match — returns only the public slice: payload kind, timestamp,
    /// outcome summary, and sequence. Internal rationales, votes, and
    /// operator identities are never exposed here.
    pub fn public_verify(&self, hash: &str) -> GovResult<Option<RecordSummary>> {
        let state = self.lock()?;

        let record = match state.records.iter().find(|r| r.this_hash == hash) {
            Some(r) => r,
            None => return Ok(None),
        };

        let recomputed = hash_record(
            &record.prev_hash,
            &record.payload,
            record.sequence,
            record.timestamp,
        )?;
        if recomputed != record.this_hash {
            // The stored record no longer matches its own hash: treat the
            // probe as a miss rather than vouching for a tampered record.
            warn!(sequence = record.sequence, "public verify hit a tampered record");
            return Ok(None);
        }

        Ok(Some(RecordSummary {
            payload_kind: record.payload.kind_label().to_string(),
            timestamp: record.timestamp,
            outcome: record.payload.outcome_summary(),
            sequence: record.sequence,
        }))
    }

    /// Compliance export: every record touching `agent` within the
    /// inclusive `[from, to]` time window, in chain order.
    ///
    /// An export vouches for what it hands over, so the full chain is
    /// re-verified first. A detected break latches the halt and fails the
    /// export with `ChainIntegrityViolation` naming the broken sequence —
    /// tampered records are never exported as evidence.
    ///
    /// # Errors
    ///
    /// `ChainIntegrityViolation` when verification finds a broken record.
    pub fn export(
        &self,
        agent: &AgentId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> GovResult<Vec<ChainRecord>> {
        let mut state = self.lock()?;

        let report = verify_records(&state.records, ChainRecord::GENESIS_HASH)?;
        if let Some(sequence) = report.first_broken {
            error!(sequence, "export refused: chain integrity violation");
            state.halted = true;
            return Err(GovernanceError::ChainIntegrityViolation { sequence });
        }

        Ok(state
            .records
            .iter()
            .filter(|r| r.payload.agent_id() == agent)
            .filter(|r| r.timestamp >= from && r.timestamp <= to)
            .cloned()
            .collect())
    }

    /// Number of records in the chain.
    pub fn len(&self) -> usize {
        self.lock().map(|s| s.records.len()).unwrap_or(0)
    }

    /// True when no records have been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while the halt latch is set.
    pub fn is_halted(&self) -> bool {
        self.lock().map(|s| s.halted).unwrap_or(true)
    }

    /// The `this_hash` of the last record, or the genesis sentinel.
    pub fn tail_hash(&self) -> GovResult<String> {
        Ok(self.lock()?.last_hash.clone())
    }

    #[cfg(test)]
    pub(crate) fn tamper_with_payload(&self, sequence: usize, description: &str) {
        // Test-only hook: mutate a stored record to simulate tampering.
        let mut state = self.state.lock().unwrap();
        if let ChainPayload::AutoExecution(ref mut auto) =
            state.records[sequence].payload
        {
            auto.description = description.to_string();
        }
    }

    fn lock(&self) -> GovResult<std::sync::MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|e| GovernanceError::AuditWriteFailed {
            reason: format!("ledger lock poisoned: {}", e),
        })
    }
}
