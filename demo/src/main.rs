//! CONCORD Governance Core — Demo CLI
//!
//! Runs one or all of the four governance scenarios. Each scenario wires
//! a real `GovernanceCore` (trust engine, risk classifier, tribunal,
//! precedent index, escalation gate, audit chain) and narrates what the
//! core decides and why.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- trust-journey
//!   cargo run -p demo -- escalation
//!   cargo run -p demo -- override-authority
//!   cargo run -p demo -- audit-walkthrough

mod scenarios;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scenarios::{audit_walkthrough, escalation, override_authority, trust_journey};

// ── CLI definition ────────────────────────────────────────────────────────────

/// CONCORD — governance and trust core demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "CONCORD governance core demo",
    long_about = "Runs CONCORD governance scenarios showing trust-tiered review,\n\
                  tribunal thresholds, human escalation, override authority,\n\
                  and audit chain integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: trust tier changing a Level-2 outcome.
    TrustJourney,
    /// Scenario 2: deadlock, human resolution, and precedent.
    Escalation,
    /// Scenario 3: override authority and the kill switch.
    OverrideAuthority,
    /// Scenario 4: audit chain verification and export.
    AuditWalkthrough,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging; set RUST_LOG=debug for the core's internals.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::TrustJourney => trust_journey::run_scenario(),
        Command::Escalation => escalation::run_scenario(),
        Command::OverrideAuthority => override_authority::run_scenario(),
        Command::AuditWalkthrough => audit_walkthrough::run_scenario(),
    };

    match result {
        Ok(()) => println!("All selected scenarios completed."),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> concord_contracts::error::GovResult<()> {
    trust_journey::run_scenario()?;
    escalation::run_scenario()?;
    override_authority::run_scenario()?;
    audit_walkthrough::run_scenario()
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("CONCORD — Governance & Trust Core");
    println!("=================================");
    println!();
    println!("Decision pipeline per request:");
    println!("  [1] Kill-switch check, request validation, agent status gate");
    println!("  [2] Risk classification 0-4 (category + keywords, hints trusted upward)");
    println!("  [3] L0/L1 auto-execute, logged; L2+ go to the nine-validator tribunal");
    println!("  [4] Threshold synthesis: subset / majority / supermajority + human");
    println!("  [5] Deadlocks and L4 passes park at the Human Escalation Gate");
    println!("  [6] Every step chained to the SHA-256 audit ledger");
    println!();
}
