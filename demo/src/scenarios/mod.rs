//! The four CONCORD demo scenarios, each self-contained around its own
//! `GovernanceCore`.

pub mod audit_walkthrough;
pub mod escalation;
pub mod override_authority;
pub mod trust_journey;

use chrono::Utc;

use concord_contracts::agent::{AgentId, Provenance};
use concord_contracts::error::GovResult;
use concord_contracts::signal::{Signal, SignalKind};
use concord_core::GovernanceCore;

/// Register, graduate, and build an agent up to roughly Established
/// standing (score ~520) through milestone signals.
pub fn bootstrap_established(core: &GovernanceCore, name: &str) -> GovResult<AgentId> {
    let id = AgentId::new(name);
    core.register_agent(id.clone(), Provenance::Fresh)?;

    let graduated = core.graduate_agent(&id, "summarize the onboarding handbook")?;
    println!(
        "  [trust] {} graduated: seed score {} ({})",
        id,
        graduated.score,
        graduated.tier()
    );

    for n in 1..=3 {
        core.report_signal(Signal {
            agent_id: id.clone(),
            kind: SignalKind::Milestone,
            magnitude: 100,
            timestamp: Utc::now(),
            source_ref: format!("demo:milestone-{}", n),
        })?;
    }

    let report = core.trust_score(&id)?;
    println!(
        "  [trust] {} after three milestones: score {} ({})",
        id, report.score, report.tier
    );
    Ok(id)
}
