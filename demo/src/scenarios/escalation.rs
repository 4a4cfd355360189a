//! Scenario 2: Deadlock, Human Resolution, and Precedent
//!
//! A Level-3 deployment splits the tribunal — neither majority threshold
//! is met, so the matter parks at the Human Escalation Gate. A human
//! approves it and marks the call significant, which indexes it as
//! precedent; the identical request then passes the tribunal outright.
//! A Level-4 destructive request from the same agent is denied cold.
//!
//! Walk-through:
//!   1. Established agent requests a deployment (L3) → deadlock
//!   2. The gate holds the matter; nothing executes (fail-closed)
//!   3. Human approves, marks significant → precedent indexed
//!   4. Same request again → precedent tips the tribunal → approved
//!   5. "wipe the archived invoices" (L4, irreversible) → denied

use concord_contracts::agent::{AgentId, SessionId};
use concord_contracts::error::GovResult;
use concord_contracts::human::ResolutionOutcome;
use concord_contracts::request::{ActionCategory, ActionRequest, RiskHints};
use concord_core::{GovernanceConfig, GovernanceCore, Submission};

use super::bootstrap_established;

pub fn run_scenario() -> GovResult<()> {
    println!("── Scenario 2: Deadlock, Human Resolution, Precedent ──────────");
    let core = GovernanceCore::new(GovernanceConfig::default());
    let id = bootstrap_established(&core, "platform-agent")?;

    // Round one: the deployment deadlocks.
    let first = deploy_request(&core, &id)?;
    let pending = match first {
        Submission::Pending(p) => {
            println!("  deployment round deadlocked; parked at the gate ({})", p);
            p
        }
        Submission::Decided(d) => {
            println!("  unexpected terminal outcome: {}", d.outcome);
            return Ok(());
        }
    };

    // The human approves and flags the call as a new rule pattern.
    let resolved = core.resolve_escalation(
        pending,
        ResolutionOutcome::Approve,
        "deployment window confirmed with the platform team",
        true,
    )?;
    println!(
        "  human resolution: {} (precedent indexed: {})",
        resolved.outcome, resolved.creates_precedent
    );
    println!("  precedents in the arena: {}", core.precedent_count());

    // Round two: the precedent tips the same request to approval.
    match deploy_request(&core, &id)? {
        Submission::Decided(d) => {
            println!("  repeat deployment: {} — {}", d.outcome, d.rationale);
        }
        Submission::Pending(p) => {
            println!("  repeat deployment still pending ({})", p);
        }
    }

    // A destructive Level-4 request gets no such sympathy.
    let wipe = core.submit_action_request(ActionRequest::new(
        id.clone(),
        "wipe the archived invoices",
        RiskHints {
            irreversible: true,
            ..RiskHints::default()
        },
        SessionId::new(),
    ))?;
    match wipe {
        Submission::Decided(d) => {
            println!("  L4 wipe request: {} — {}", d.outcome, d.rationale);
        }
        Submission::Pending(p) => {
            println!("  L4 wipe request awaiting human confirmation ({})", p);
        }
    }

    println!("  chain records written: {}", core.chain_len());
    println!();
    Ok(())
}

fn deploy_request(core: &GovernanceCore, id: &AgentId) -> GovResult<Submission> {
    core.submit_action_request(ActionRequest::new(
        id.clone(),
        "deploy the scheduler service",
        RiskHints {
            category: Some(ActionCategory::SystemMutation),
            ..RiskHints::default()
        },
        SessionId::new(),
    ))
}
