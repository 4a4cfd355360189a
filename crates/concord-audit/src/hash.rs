//! Hash-chain primitives: record hashing and range verification.
//!
//! Every field that contributes to a record's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   2. canonical JSON of payload (serde_json with no pretty-printing)
//!   3. sequence as 8-byte little-endian
//!   4. timestamp as RFC 3339 UTF-8 bytes

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use concord_contracts::chain::ChainPayload;
use concord_contracts::error::{GovResult, GovernanceError};

use crate::record::{ChainRecord, IntegrityReport};

/// Compute the SHA-256 hash of the canonical payload JSON alone.
///
/// Stored on each record so public verification can prove payload
/// integrity without re-serializing the payload on every probe.
pub fn hash_payload(payload: &ChainPayload) -> GovResult<String> {
    let bytes = canonical_payload_bytes(payload)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Compute the SHA-256 hash for a single chain record.
///
/// The hash commits to the record's link to its predecessor (`prev_hash`),
/// its full payload, its position (`sequence`), and its append time.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_record(
    prev_hash: &str,
    payload: &ChainPayload,
    sequence: u64,
    timestamp: DateTime<Utc>,
) -> GovResult<String> {
    let payload_json = canonical_payload_bytes(payload)?;

    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(&payload_json);
    hasher.update(sequence.to_le_bytes());
    hasher.update(timestamp.to_rfc3339_opts(SecondsFormat::Micros, true).as_bytes());

    Ok(hex::encode(hasher.finalize()))
}

/// Sign a record hash with the chain instance's signing key.
///
/// signature = SHA-256(key || this_hash), hex. Proves the record was
/// appended through this chain instance; not an asymmetric signature.
pub fn sign_hash(signing_key: &[u8], this_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(signing_key);
    hasher.update(this_hash.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify the integrity of a contiguous slice of chain records.
///
/// `expected_prev` is the `this_hash` of the record immediately before the
/// slice (or `ChainRecord::GENESIS_HASH` when the slice starts at
/// sequence 0). Two rules are checked per record:
///
/// 1. **Prev-hash linkage** — the stored `prev_hash` equals the running
///    expected value.
/// 2. **Hash correctness** — `this_hash` matches the value recomputed from
///    the record's own fields.
///
/// Returns a report naming the FIRST broken sequence; records after the
/// break are not inspected — the chain is compromised from that point
/// forward. An empty slice verifies trivially.
pub fn verify_records(records: &[ChainRecord], expected_prev: &str) -> GovResult<IntegrityReport> {
    let mut expected_prev = expected_prev.to_string();
    let mut checked: u64 = 0;

    for record in records {
        // Rule 1: stored prev_hash must match what we expect.
        if record.prev_hash != expected_prev {
            return Ok(IntegrityReport::broken_at(record.sequence, checked));
        }

        // Rule 2: recompute this_hash and compare to the stored value.
        let recomputed = hash_record(
            &record.prev_hash,
            &record.payload,
            record.sequence,
            record.timestamp,
        )?;
        if record.this_hash != recomputed {
            return Ok(IntegrityReport::broken_at(record.sequence, checked));
        }

        expected_prev = record.this_hash.clone();
        checked += 1;
    }

    Ok(IntegrityReport::ok(checked))
}

/// Canonical, deterministic JSON bytes for a payload.
///
/// serde_json::to_vec produces stable output for the same value — no
/// pretty-printing, no key reordering across calls.
fn canonical_payload_bytes(payload: &ChainPayload) -> GovResult<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|e| GovernanceError::AuditWriteFailed {
        reason: format!("payload serialization failed: {}", e),
    })
}
