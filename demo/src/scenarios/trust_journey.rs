//! Scenario 1: Trust Journey
//!
//! Shows the trust tier changing a governance outcome. A freshly
//! graduated agent (Probation) is denied a Level-2 external call by the
//! review subset; after earning milestone signals into Established
//! standing, the identical request is approved unanimously.
//!
//! Walk-through:
//!   1. Register + graduate → Probation seed score
//!   2. Level-0 read auto-executes, logged only
//!   3. Level-2 external call → review subset blocks (denial, −5)
//!   4. Three milestone signals → Established tier
//!   5. Same Level-2 request → subset unanimous, approved

use chrono::Utc;

use concord_contracts::agent::{AgentId, Provenance, SessionId};
use concord_contracts::decision::{Outcome, VoteChoice};
use concord_contracts::error::GovResult;
use concord_contracts::request::{ActionCategory, ActionRequest, RiskHints};
use concord_contracts::signal::{Signal, SignalKind};
use concord_core::{GovernanceConfig, GovernanceCore, Submission};

pub fn run_scenario() -> GovResult<()> {
    println!("── Scenario 1: Trust Journey ──────────────────────────────────");
    let core = GovernanceCore::new(GovernanceConfig::default());

    let id = AgentId::new("digest-agent");
    core.register_agent(id.clone(), Provenance::Fresh)?;
    let graduated = core.graduate_agent(&id, "summarize the onboarding handbook")?;
    core.grant_capability(&id, "email.send")?;
    println!(
        "  graduated with seed score {} ({}), capabilities: {:?}",
        graduated.score,
        graduated.tier(),
        core.agent(&id)?.capabilities
    );

    // A read-only request never reaches the tribunal.
    let read = submit(&core, &id, "list the open support tickets", ActionCategory::ReadOnly)?;
    if let Submission::Decided(d) = &read {
        println!("  L0 read: {} ({})", d.outcome, d.rationale);
    }

    // The same external call, before and after the trust climb.
    let first = submit(
        &core,
        &id,
        "email the weekly digest to subscribers",
        ActionCategory::ExternalCall,
    )?;
    describe(&core, &id, "first attempt (Probation)", &first)?;

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
        "  after three milestones: score {} ({})",
        report.score, report.tier
    );

    let second = submit(
        &core,
        &id,
        "email the weekly digest to subscribers",
        ActionCategory::ExternalCall,
    )?;
    describe(&core, &id, "second attempt (Established)", &second)?;

    println!("  chain records written: {}", core.chain_len());
    println!();
    Ok(())
}

fn submit(
    core: &GovernanceCore,
    id: &AgentId,
    description: &str,
    category: ActionCategory,
) -> GovResult<Submission> {
    core.submit_action_request(ActionRequest::new(
        id.clone(),
        description,
        RiskHints {
            category: Some(category),
            ..RiskHints::default()
        },
        SessionId::new(),
    ))
}

fn describe(
    core: &GovernanceCore,
    id: &AgentId,
    label: &str,
    submission: &Submission,
) -> GovResult<()> {
    match submission {
        Submission::Decided(decision) => {
            let approvals = decision.count(VoteChoice::Approve);
            let denials = decision.count(VoteChoice::Deny);
            println!(
                "  {}: {} ({} approve / {} deny)",
                label, decision.outcome, approvals, denials
            );
            if decision.outcome == Outcome::Denied {
                let report = core.trust_score(id)?;
                println!(
                    "    denial penalty applied: score {} ({})",
                    report.score, report.tier
                );
            }
        }
        Submission::Pending(pending) => {
            println!("  {}: pending human review ({})", label, pending);
        }
    }
    Ok(())
}
