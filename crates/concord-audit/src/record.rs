//! Chain record and integrity report types.
//!
//! `ChainRecord` is a single entry in the hash chain — it wraps a
//! `ChainPayload` with sequence numbering, the SHA-256 hashes that make
//! tampering detectable, and a chain-instance signature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use concord_contracts::chain::ChainPayload;

/// A single entry in the SHA-256 hash chain.
///
/// Each record commits to the previous record via `prev_hash`, forming an
/// append-only chain. Modifying any field — including those of the embedded
/// payload — invalidates `this_hash` and every subsequent `prev_hash`,
/// which verification detects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRecord {
    /// Monotonically increasing position in the chain, starting at 0.
    /// Gapless by construction: the single-writer append path assigns it.
    pub sequence: u64,

    /// The immutable payload: a decision, override, score mutation,
    /// auto-execution, or cancellation.
    pub payload: ChainPayload,

    /// SHA-256 hash (hex) of the canonical payload JSON alone.
    pub payload_hash: String,

    /// SHA-256 hash (hex) of the previous record, or `GENESIS_HASH` for
    /// the first record.
    pub prev_hash: String,

    /// SHA-256 hash (hex) of this record's canonical content.
    ///
    /// Computed over (prev_hash, canonical payload JSON, sequence,
    /// timestamp).
    pub this_hash: String,

    /// Hex SHA-256 over (chain signing key, this_hash) — proves the record
    /// was appended by this chain instance.
    pub signature: String,

    /// Wall-clock time the record was appended (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ChainRecord {
    /// The sentinel `prev_hash` used for the first record in every chain.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// The result of verifying a range of the chain.
///
/// Verification is idempotent: running it twice over the same unmodified
/// range returns identical reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// True when every record in the range verified.
    pub valid: bool,
    /// The FIRST sequence number whose record failed verification. The
    /// chain is considered compromised from this point forward, never
    /// before it.
    pub first_broken: Option<u64>,
    /// How many records were checked.
    pub records_checked: u64,
}

impl IntegrityReport {
    /// A passing report over `n` records.
    pub fn ok(n: u64) -> Self {
        Self {
            valid: true,
            first_broken: None,
            records_checked: n,
        }
    }

    /// A failing report that broke at `sequence` after checking `n`.
    pub fn broken_at(sequence: u64, n: u64) -> Self {
        Self {
            valid: false,
            first_broken: Some(sequence),
            records_checked: n,
        }
    }
}
