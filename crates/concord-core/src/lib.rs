//! # concord-core
//!
//! The assembled governance core: one facade wiring trust scoring, risk
//! classification, the nine-validator tribunal, precedent retrieval, the
//! human escalation gate, and the hash-chained audit ledger.
//!
//! The external surface is the `GovernanceCore` method set — submission,
//! escalation resolution, human override, trust reporting, and audit
//! verification. Every consequential step lands on the audit chain;
//! callers always receive a terminal `Decision` or a pending handle.

pub mod config;
pub mod decisions;
pub mod governance;
pub mod kill;
pub mod sessions;

pub use config::GovernanceConfig;
pub use decisions::DecisionStore;
pub use governance::{GovernanceCore, Submission, TrustReport};
pub use kill::KillSwitch;
pub use sessions::SessionRegistry;

// ── Tests ─────────────────────────────────────────────────────────────────────
