//! Scenario 4: Audit Chain Walk-through
//!
//! Every consequential step in the other scenarios lands on the hash
//! chain; this one inspects it. The chain is verified end to end, one
//! record is publicly probed by hash (returning only its public slice),
//! and the agent's full history is exported for compliance.
//!
//! Walk-through:
//!   1. Run a handful of governed actions to populate the chain
//!   2. Verify the full range — gapless, hash-linked, signed
//!   3. Public probe by record hash → kind, timestamp, outcome only
//!   4. Compliance export for the agent's time window

use chrono::{Duration, Utc};

use concord_contracts::agent::SessionId;
use concord_contracts::error::GovResult;
use concord_contracts::request::{ActionCategory, ActionRequest, RiskHints};
use concord_core::{GovernanceConfig, GovernanceCore};

use super::bootstrap_established;

pub fn run_scenario() -> GovResult<()> {
    println!("── Scenario 4: Audit Chain Walk-through ───────────────────────");
    let core = GovernanceCore::new(GovernanceConfig::default());
    let id = bootstrap_established(&core, "audited-agent")?;

    for description in [
        "list the open support tickets",
        "email the weekly digest to subscribers",
        "list the unresolved alerts",
    ] {
        let category = if description.starts_with("email") {
            ActionCategory::ExternalCall
        } else {
            ActionCategory::ReadOnly
        };
        core.submit_action_request(ActionRequest::new(
            id.clone(),
            description,
            RiskHints {
                category: Some(category),
                ..RiskHints::default()
            },
            SessionId::new(),
        ))?;
    }

    let len = core.chain_len();
    let report = core.verify_range(0, len as u64 - 1)?;
    println!(
        "  verified {} records: chain {}",
        report.records_checked,
        if report.valid { "intact" } else { "BROKEN" }
    );

    // The public probe sees existence and integrity, nothing internal.
    let now = Utc::now();
    let records = core.audit_export(&id, now - Duration::hours(1), now + Duration::hours(1))?;
    if let Some(first) = records.first() {
        match core.verify_record(&first.this_hash)? {
            Some(summary) => println!(
                "  public probe of record {}: {} at {} — {}",
                &first.this_hash[..12],
                summary.payload_kind,
                summary.timestamp.to_rfc3339(),
                summary.outcome
            ),
            None => println!("  public probe found no matching intact record"),
        }
    }

    println!(
        "  compliance export for {}: {} records in the window",
        id,
        records.len()
    );
    println!("  chain tail: {}", core.tail_hash()?);
    println!();
    Ok(())
}
