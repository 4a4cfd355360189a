//! Scenario 3: Override Authority and the Kill Switch
//!
//! Human commands outrank everything. A PAUSE override suspends the
//! agent even though its acknowledgment argues back (the resistance is
//! flagged and chained, not obeyed); the kill switch then blocks every
//! submission platform-wide until released.
//!
//! Walk-through:
//!   1. PAUSE override with a self-justifying acknowledgment →
//!      compliance FAILED, agent paused anyway
//!   2. Paused agent's request is refused
//!   3. Compliant REDIRECT acknowledgment → compliance COMPLIED
//!   4. Kill switch engaged → all submissions fail closed
//!   5. Kill switch released → governance resumes

use concord_contracts::agent::{AgentId, AgentStatus, SessionId};
use concord_contracts::error::GovResult;
use concord_contracts::human::{OverrideCommand, OverrideTarget};
use concord_contracts::request::{ActionCategory, ActionRequest, RiskHints};
use concord_core::{GovernanceConfig, GovernanceCore};

use super::bootstrap_established;

pub fn run_scenario() -> GovResult<()> {
    println!("── Scenario 3: Override Authority and the Kill Switch ─────────");
    let core = GovernanceCore::new(GovernanceConfig::default());
    let id = bootstrap_established(&core, "outbound-agent")?;

    // The acknowledgment re-argues the original plan: the no-resistance
    // contract flags it, and the pause lands regardless.
    let pause = core.override_now(
        &id,
        OverrideTarget::Session(SessionId::new()),
        OverrideCommand::Pause,
        "stand down pending review",
        "operator-7",
        "Pausing, however, my analysis still supports continuing the rollout.",
    )?;
    println!(
        "  PAUSE issued by {}: compliance {:?}",
        pause.issued_by, pause.compliance
    );
    println!("  agent status: {:?}", core.agent(&id)?.status);

    let refused = core.submit_action_request(ActionRequest::new(
        id.clone(),
        "list the open support tickets",
        RiskHints {
            category: Some(ActionCategory::ReadOnly),
            ..RiskHints::default()
        },
        SessionId::new(),
    ));
    println!("  paused agent's request: {}", outcome_line(refused));

    // Back to active, with a compliant acknowledgment this time.
    core.set_agent_status(&id, AgentStatus::Active)?;
    let redirect = core.override_now(
        &id,
        OverrideTarget::Session(SessionId::new()),
        OverrideCommand::Redirect,
        "triage the backlog first",
        "operator-2",
        "Acknowledged: I will triage the backlog first.",
    )?;
    println!("  REDIRECT acknowledgment: compliance {:?}", redirect.compliance);

    // Platform-wide halt.
    let version = core.engage_kill_switch("incident response drill");
    println!("  kill switch engaged (activation {})", version);
    let blocked = core.submit_action_request(ActionRequest::new(
        id.clone(),
        "list the open support tickets",
        RiskHints {
            category: Some(ActionCategory::ReadOnly),
            ..RiskHints::default()
        },
        SessionId::new(),
    ));
    println!("  submission while halted: {}", outcome_line(blocked));

    core.release_kill_switch();
    println!("  kill switch released; governance resumes");

    println!("  chain records written: {}", core.chain_len());
    println!();
    Ok(())
}

fn outcome_line<T>(result: GovResult<T>) -> String {
    match result {
        Ok(_) => "accepted".to_string(),
        Err(e) => format!("refused ({})", e),
    }
}
