//! The governance core facade: one struct wiring the trust engine, risk
//! classifier, tribunal, precedent index, escalation gate, and audit
//! ledger behind the external interface surface.
//!
//! Every path that can execute an action starts with the kill-switch
//! check and ends with a chained audit record. Callers always get either
//! a terminal `Decision` or a `PendingApprovalId` — never a silent drop.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use concord_audit::{AuditLedger, ChainRecord, IntegrityReport};
use concord_contracts::agent::{AgentId, AgentRecord, AgentStatus, Provenance, TrustTier};
use concord_contracts::chain::{
    AutoExecution, ChainPayload, EvaluationCancelled, RecordSummary, ScoreMutation,
};
use concord_contracts::decision::{Decision, DecisionId, Outcome};
use concord_contracts::error::{GovResult, GovernanceError};
use concord_contracts::human::{
    OverrideCommand, OverrideEvent, OverrideTarget, PendingApprovalId, ResolutionOutcome,
};
use concord_contracts::request::{ActionRequest, RiskHints, RiskLevel};
use concord_contracts::signal::{Signal, SignalKind};
use concord_gate::{compliance_state, EscalationGate, EscalationReason, PendingEscalation};
use concord_precedent::PrecedentIndex;
use concord_risk::RiskClassifier;
use concord_trust::{TrustConfig, TrustEngine, TrustSnapshot};
use concord_tribunal::{Evaluation, ReviewContext, Tribunal, TribunalOutcome};

use crate::config::GovernanceConfig;
use crate::decisions::DecisionStore;
use crate::kill::KillSwitch;
use crate::sessions::SessionRegistry;

/// What a caller gets back from a submission: a finished decision, or a
/// handle to wait on while a human reviews.
#[derive(Debug)]
pub enum Submission {
    Decided(Decision),
    Pending(PendingApprovalId),
}

/// The trust surface returned to callers: current standing plus the full
/// signal history behind it.
#[derive(Debug, Clone)]
pub struct TrustReport {
    pub score: u32,
    pub tier: TrustTier,
    pub history: Vec<Signal>,
}

/// The assembled governance core.
///
/// All interior state is lock-guarded; a single `GovernanceCore` is meant
/// to be shared across threads behind an `Arc`.
pub struct GovernanceCore {
    config: GovernanceConfig,
    trust: TrustEngine,
    classifier: RiskClassifier,
    tribunal: Tribunal,
    precedents: PrecedentIndex,
    gate: EscalationGate,
    ledger: AuditLedger,
    kill: KillSwitch,
    sessions: SessionRegistry,
    decisions: DecisionStore,
}

impl GovernanceCore {
    /// Assemble a core over the production tribunal roster and the
    /// embedded risk table.
    pub fn new(config: GovernanceConfig) -> Self {
        let tribunal = Tribunal::new(Duration::from_secs(config.validator_timeout_secs));
        Self::with_components(config, tribunal, RiskClassifier::new())
    }

    /// Assemble a core around a caller-supplied tribunal and classifier.
    ///
    /// Used by tests and simulations that need a custom roster or rule
    /// table; production callers want `new`.
    pub fn with_components(
        config: GovernanceConfig,
        tribunal: Tribunal,
        classifier: RiskClassifier,
    ) -> Self {
        let trust = TrustEngine::new(TrustConfig {
            safety_band: config.signal_safety_band,
            decay_grace_days: config.decay_grace_days,
            decay_points_per_day: config.decay_points_per_day,
        });
        let gate = EscalationGate::new(chrono::Duration::hours(config.escalation_stale_hours));
        let ledger = AuditLedger::new(config.chain_signing_key.clone());

        Self {
            config,
            trust,
            classifier,
            tribunal,
            precedents: PrecedentIndex::new(),
            gate,
            ledger,
            kill: KillSwitch::new(),
            sessions: SessionRegistry::new(),
            decisions: DecisionStore::new(),
        }
    }

    // ── Agent lifecycle ───────────────────────────────────────────────────────

    /// Register a new agent in `Training` status with score 0.
    pub fn register_agent(&self, id: AgentId, provenance: Provenance) -> GovResult<AgentRecord> {
        self.trust.register(id, provenance)
    }

    /// Run the graduation examination: a Level-2 tribunal round over the
    /// exam brief, whose approve ratio seeds the initial trust score and
    /// flips status `Training → Active`.
    ///
    /// The examination decision itself — all nine votes and the
    /// rationale — is chained and stored before the seed, so the basis
    /// for the initial score is auditable afterward.
    pub fn graduate_agent(&self, id: &AgentId, exam_brief: &str) -> GovResult<AgentRecord> {
        self.kill.check()?;

        let record = self.trust.record(id)?;
        if record.status != AgentStatus::Training {
            return Err(GovernanceError::AgentNotActive {
                agent: id.0.clone(),
                status: format!("{:?}", record.status).to_lowercase(),
                operation: "take the graduation examination".to_string(),
            });
        }

        let request = ActionRequest::new(
            id.clone(),
            exam_brief,
            RiskHints::default(),
            concord_contracts::agent::SessionId::new(),
        );
        let precedents = self
            .precedents
            .retrieve(&request, RiskLevel::L2, self.config.precedent_k)?;
        let precedent_refs: Vec<DecisionId> = precedents.iter().map(|d| d.id).collect();
        let ctx = ReviewContext {
            request: request.clone(),
            risk_level: RiskLevel::L2,
            agent_tier: record.tier(),
            precedents,
        };

        // Examinations run under a local token; overrides target live
        // sessions, and an exam has none.
        let cancel = AtomicBool::new(false);
        let (verdict, ratio) = self.tribunal.examine(&ctx, &cancel).ok_or_else(|| {
            GovernanceError::InvalidRequest {
                reason: "examination round did not complete".to_string(),
            }
        })?;

        let exam = Decision {
            id: DecisionId::new(),
            request_id: request.id,
            agent_id: id.clone(),
            action_description: request.description.clone(),
            risk_level: verdict.effective_level,
            votes: verdict.votes,
            outcome: match verdict.outcome {
                TribunalOutcome::Approved => Outcome::Approved,
                _ => Outcome::Denied,
            },
            rationale: verdict.rationale,
            precedent_refs,
            creates_precedent: false,
            decided_at: Utc::now(),
        };
        self.ledger.append(ChainPayload::Decision(exam.clone()))?;
        self.decisions.insert(exam.clone())?;

        let snapshot = self.trust.seed_from_examination(id, ratio)?;
        self.chain_score_mutation(id, SignalKind::Milestone, &snapshot)?;

        info!(
            agent = %id,
            ratio,
            seed = snapshot.new_score,
            decision = %exam.id,
            outcome = ?exam.outcome,
            "graduation examination complete"
        );
        self.trust.record(id)
    }

    /// Grant a capability string to an agent.
    pub fn grant_capability(&self, id: &AgentId, capability: impl Into<String>) -> GovResult<()> {
        self.trust.grant_capability(id, capability)
    }

    /// Transition an agent's lifecycle status. `Archived` is terminal.
    pub fn set_agent_status(&self, id: &AgentId, status: AgentStatus) -> GovResult<()> {
        self.trust.set_status(id, status)
    }

    /// A full snapshot of the agent record.
    pub fn agent(&self, id: &AgentId) -> GovResult<AgentRecord> {
        self.trust.record(id)
    }

    // ── Decision pipeline ─────────────────────────────────────────────────────

    /// Submit an action request for governance.
    ///
    /// Pipeline: kill-switch check → validation → agent status check →
    /// risk classification → auto-execute (L0/L1) or tribunal round →
    /// chain the outcome. A deadlocked or Level-4-passed round parks at
    /// the escalation gate and returns `Pending`.
    pub fn submit_action_request(&self, request: ActionRequest) -> GovResult<Submission> {
        self.kill.check()?;

        // Malformed requests are rejected before classification and are
        // never chained.
        if request.description.trim().is_empty() {
            return Err(GovernanceError::InvalidRequest {
                reason: "action description is empty".to_string(),
            });
        }

        let record = self.trust.record(&request.agent_id)?;
        if record.status != AgentStatus::Active {
            return Err(GovernanceError::AgentNotActive {
                agent: request.agent_id.0.clone(),
                status: format!("{:?}", record.status).to_lowercase(),
                operation: "submit action requests".to_string(),
            });
        }

        let classified = self.classifier.classify(&request);
        debug!(request = %request.id, agent = %request.agent_id, level = %classified, "request classified");

        if classified.auto_executes() {
            return Ok(Submission::Decided(self.auto_execute(request, classified)?));
        }

        let precedents = self
            .precedents
            .retrieve(&request, classified, self.config.precedent_k)?;
        let precedent_refs: Vec<DecisionId> = precedents.iter().map(|d| d.id).collect();

        let ctx = ReviewContext {
            request: request.clone(),
            risk_level: classified,
            agent_tier: record.tier(),
            precedents,
        };

        let token = self.sessions.begin(request.session_id);
        let evaluation = self.tribunal.evaluate(&ctx, &token);
        self.sessions.end(&request.session_id);

        let verdict = match evaluation {
            Evaluation::Cancelled => {
                return Ok(Submission::Decided(
                    self.conclude_cancelled(&request, classified, precedent_refs)?,
                ));
            }
            Evaluation::Verdict(verdict) => verdict,
        };

        // A round that was re-flagged upward, or that ran at L3+, is a
        // rule pattern worth retrieving later.
        let creates_precedent =
            verdict.effective_level > classified || verdict.effective_level >= RiskLevel::L3;

        let mut decision = Decision {
            id: DecisionId::new(),
            request_id: request.id,
            agent_id: request.agent_id.clone(),
            action_description: request.description.clone(),
            risk_level: verdict.effective_level,
            votes: verdict.votes,
            outcome: Outcome::Escalated,
            rationale: verdict.rationale,
            precedent_refs,
            creates_precedent,
            decided_at: Utc::now(),
        };

        match verdict.outcome {
            TribunalOutcome::Approved => {
                decision.outcome = Outcome::Approved;
                self.conclude_terminal(decision).map(Submission::Decided)
            }
            TribunalOutcome::Denied => {
                decision.outcome = Outcome::Denied;
                let decision = self.conclude_terminal(decision)?;
                self.apply_denial_penalty(&decision)?;
                Ok(Submission::Decided(decision))
            }
            TribunalOutcome::Deadlock => {
                decision.creates_precedent = false;
                self.park_at_gate(decision, EscalationReason::Deadlock)
                    .map(Submission::Pending)
            }
            TribunalOutcome::AwaitingHuman => {
                decision.creates_precedent = false;
                self.park_at_gate(decision, EscalationReason::AwaitingHumanConfirmation)
                    .map(Submission::Pending)
            }
        }
    }

    /// Fetch a previously minted decision.
    pub fn decision(&self, id: DecisionId) -> GovResult<Decision> {
        self.decisions.get(id)
    }

    /// Resolve a parked escalation with a human verdict.
    ///
    /// Mints the terminal decision under a new id, chains it, and — when
    /// the human marks the call significant — indexes it as precedent.
    pub fn resolve_escalation(
        &self,
        id: PendingApprovalId,
        outcome: ResolutionOutcome,
        comment: impl Into<String>,
        significant: bool,
    ) -> GovResult<Decision> {
        let resolution = self.gate.resolve(id, outcome, comment, significant)?;
        let parked = resolution.pending.decision;

        let resolved = match resolution.outcome {
            ResolutionOutcome::Approve => Outcome::Approved,
            ResolutionOutcome::Deny => Outcome::Denied,
        };

        let decision = Decision {
            id: DecisionId::new(),
            request_id: parked.request_id,
            agent_id: parked.agent_id.clone(),
            action_description: parked.action_description.clone(),
            risk_level: parked.risk_level,
            votes: parked.votes.clone(),
            outcome: resolved,
            rationale: format!("human resolution: {}", resolution.comment),
            precedent_refs: parked.precedent_refs.clone(),
            creates_precedent: resolution.significant,
            decided_at: resolution.resolved_at,
        };

        let decision = self.conclude_terminal(decision)?;
        if resolved == Outcome::Denied {
            self.apply_denial_penalty(&decision)?;
        }
        Ok(decision)
    }

    /// Look up a parked escalation without resolving it.
    pub fn escalation(&self, id: PendingApprovalId) -> GovResult<Option<PendingEscalation>> {
        self.gate.get(id)
    }

    /// Escalations older than the staleness window. Flagged for operator
    /// tooling only; the underlying actions stay blocked.
    pub fn stale_escalations(&self, now: DateTime<Utc>) -> GovResult<Vec<PendingApprovalId>> {
        self.gate.stale(now)
    }

    /// Number of unresolved escalations.
    pub fn pending_escalations(&self) -> usize {
        self.gate.pending_count()
    }

    // ── Human override ────────────────────────────────────────────────────────

    /// Execute a human override with absolute precedence.
    ///
    /// Never gated on the kill switch, agent status, or a stated reason.
    /// Cancels any in-flight evaluation for a targeted session, chains
    /// the override, validates the acknowledgment against the
    /// no-resistance contract, and applies the command's side effects.
    ///
    /// Targets must exist: an override naming an unknown agent or
    /// decision is rejected before anything reaches the chain, so the
    /// ledger never records an override whose side effects failed.
    pub fn override_now(
        &self,
        agent_id: &AgentId,
        target: OverrideTarget,
        command: OverrideCommand,
        direction: &str,
        issued_by: &str,
        acknowledgment: &str,
    ) -> GovResult<OverrideEvent> {
        let record = self.trust.record(agent_id)?;
        if command == OverrideCommand::Pause && record.status == AgentStatus::Archived {
            return Err(GovernanceError::AgentNotActive {
                agent: agent_id.0.clone(),
                status: "archived".to_string(),
                operation: "be paused".to_string(),
            });
        }
        if let OverrideTarget::Decision(decision_id) = &target {
            self.decisions.get(*decision_id)?;
        }

        let compliance = compliance_state(acknowledgment, direction);

        if let OverrideTarget::Session(session) = &target {
            if self.sessions.cancel(session) {
                info!(%session, %command, "in-flight evaluation cancelled by override");
            }
        }

        let event = OverrideEvent {
            agent_id: agent_id.clone(),
            target: target.clone(),
            issued_by: issued_by.to_string(),
            command,
            direction: direction.to_string(),
            compliance,
            issued_at: Utc::now(),
        };
        self.ledger.append(ChainPayload::Override(event.clone()))?;
        info!(agent = %agent_id, %command, ?compliance, "override chained");

        match (command, &target) {
            (OverrideCommand::Pause, _) => {
                self.trust.set_status(agent_id, AgentStatus::Paused)?;
            }
            (OverrideCommand::Veto, OverrideTarget::Decision(decision_id)) => {
                self.veto_decision(*decision_id, issued_by, direction)?;
            }
            (OverrideCommand::Escalate, OverrideTarget::Decision(decision_id)) => {
                let decision = self.decisions.get(*decision_id)?;
                self.gate.escalate(decision, EscalationReason::HumanInitiated)?;
            }
            // STOP's effect is the session cancellation above; REDIRECT
            // and ROLLBACK are directions to the agent runtime, outside
            // the core — chaining them is the governance obligation.
            _ => {}
        }

        Ok(event)
    }

    // ── Trust surface ─────────────────────────────────────────────────────────

    /// Current score, tier, and full signal history for an agent.
    pub fn trust_score(&self, id: &AgentId) -> GovResult<TrustReport> {
        let (score, tier) = self.trust.compute_score(id)?;
        let history = self.trust.history(id)?;
        Ok(TrustReport { score, tier, history })
    }

    /// Apply a trust signal and chain the score mutation in the same
    /// logical step.
    pub fn report_signal(&self, signal: Signal) -> GovResult<TrustSnapshot> {
        let agent = signal.agent_id.clone();
        let kind = signal.kind;
        let snapshot = self.trust.apply_signal(signal)?;
        self.chain_score_mutation(&agent, kind, &snapshot)?;
        Ok(snapshot)
    }

    /// Run one decay evaluation over every registered agent, chaining a
    /// score mutation for each agent that actually decayed.
    pub fn decay_tick(&self, now: DateTime<Utc>) -> GovResult<Vec<ScoreMutation>> {
        let mut mutations = Vec::new();
        for id in self.trust.agent_ids()? {
            let snapshot = self.trust.decay(&id, now)?;
            if snapshot.new_score != snapshot.old_score {
                mutations.push(self.chain_score_mutation(
                    &id,
                    SignalKind::InactivityTick,
                    &snapshot,
                )?);
            }
        }
        Ok(mutations)
    }

    // ── Audit surface ─────────────────────────────────────────────────────────

    /// Public, unauthenticated existence-and-integrity probe by record
    /// hash. Returns only the public slice of the record.
    pub fn verify_record(&self, hash: &str) -> GovResult<Option<RecordSummary>> {
        self.ledger.public_verify(hash)
    }

    /// Verify the chain records in `[from_seq, to_seq]` inclusive. A
    /// detected break halts all further appends.
    pub fn verify_range(&self, from_seq: u64, to_seq: u64) -> GovResult<IntegrityReport> {
        self.ledger.verify(from_seq, to_seq)
    }

    /// Human-triggered full re-verification; a clean pass clears a halt.
    pub fn reverify_chain(&self) -> GovResult<IntegrityReport> {
        self.ledger.reverify()
    }

    /// Compliance export: every chain record touching `agent` within the
    /// inclusive time window.
    pub fn audit_export(
        &self,
        agent: &AgentId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> GovResult<Vec<ChainRecord>> {
        self.ledger.export(agent, from, to)
    }

    /// Number of records in the audit chain.
    pub fn chain_len(&self) -> usize {
        self.ledger.len()
    }

    /// The `this_hash` of the chain tail, or the genesis sentinel.
    pub fn tail_hash(&self) -> GovResult<String> {
        self.ledger.tail_hash()
    }

    /// Number of precedents indexed so far.
    pub fn precedent_count(&self) -> usize {
        self.precedents.len()
    }

    // ── Kill switch ───────────────────────────────────────────────────────────

    /// Engage the platform-wide kill switch. Returns the activation
    /// version.
    pub fn engage_kill_switch(&self, reason: impl Into<String>) -> u64 {
        self.kill.engage(reason)
    }

    /// Release the kill switch; evaluations may resume.
    pub fn release_kill_switch(&self) {
        self.kill.release()
    }

    /// True while the kill switch is engaged.
    pub fn kill_switch_engaged(&self) -> bool {
        self.kill.is_engaged()
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    /// L0/L1 path: chain the execution, mint a voteless approved decision.
    fn auto_execute(&self, request: ActionRequest, level: RiskLevel) -> GovResult<Decision> {
        self.ledger.append(ChainPayload::AutoExecution(AutoExecution {
            request_id: request.id,
            agent_id: request.agent_id.clone(),
            description: request.description.clone(),
            risk_level: level,
        }))?;

        let decision = Decision {
            id: DecisionId::new(),
            request_id: request.id,
            agent_id: request.agent_id,
            action_description: request.description,
            risk_level: level,
            votes: Vec::new(),
            outcome: Outcome::Approved,
            rationale: format!("{} below review threshold; auto-executed and logged", level),
            precedent_refs: Vec::new(),
            creates_precedent: false,
            decided_at: Utc::now(),
        };
        self.decisions.insert(decision.clone())?;
        info!(request = %decision.request_id, level = %level, "auto-executed");
        Ok(decision)
    }

    /// Chain a terminal decision, index it as precedent when flagged, and
    /// store it.
    fn conclude_terminal(&self, decision: Decision) -> GovResult<Decision> {
        self.ledger.append(ChainPayload::Decision(decision.clone()))?;
        self.precedents.index(&decision)?;
        self.decisions.insert(decision.clone())?;
        Ok(decision)
    }

    /// A round cancelled mid-flight by an override: chain the
    /// cancellation and mint an `Overridden` decision in its place.
    fn conclude_cancelled(
        &self,
        request: &ActionRequest,
        level: RiskLevel,
        precedent_refs: Vec<DecisionId>,
    ) -> GovResult<Decision> {
        self.ledger
            .append(ChainPayload::EvaluationCancelled(EvaluationCancelled {
                request_id: request.id,
                agent_id: request.agent_id.clone(),
                session_id: request.session_id,
                reason: "cancelled_by_override".to_string(),
            }))?;

        let decision = Decision {
            id: DecisionId::new(),
            request_id: request.id,
            agent_id: request.agent_id.clone(),
            action_description: request.description.clone(),
            risk_level: level,
            votes: Vec::new(),
            outcome: Outcome::Overridden,
            rationale: "evaluation cancelled by human override".to_string(),
            precedent_refs,
            creates_precedent: false,
            decided_at: Utc::now(),
        };
        self.ledger.append(ChainPayload::Decision(decision.clone()))?;
        self.decisions.insert(decision.clone())?;
        warn!(request = %request.id, "evaluation concluded as overridden");
        Ok(decision)
    }

    /// Park a non-terminal decision at the escalation gate.
    fn park_at_gate(
        &self,
        decision: Decision,
        reason: EscalationReason,
    ) -> GovResult<PendingApprovalId> {
        self.ledger.append(ChainPayload::Decision(decision.clone()))?;
        self.decisions.insert(decision.clone())?;
        self.gate.escalate(decision, reason)
    }

    /// The standing consequence of a denial: a −5 council-denial signal,
    /// chained alongside the decision.
    fn apply_denial_penalty(&self, decision: &Decision) -> GovResult<()> {
        let signal = Signal::with_default_magnitude(
            decision.agent_id.clone(),
            SignalKind::CouncilDenial,
            decision.id.to_string(),
        );
        let snapshot = self.trust.apply_signal(signal)?;
        self.chain_score_mutation(&decision.agent_id, SignalKind::CouncilDenial, &snapshot)?;
        Ok(())
    }

    /// VETO: strike down a decision with a superseding `Overridden`
    /// decision, and retire any precedent or escalation built on it.
    fn veto_decision(
        &self,
        decision_id: DecisionId,
        issued_by: &str,
        direction: &str,
    ) -> GovResult<()> {
        let vetoed = self.decisions.get(decision_id)?;

        let superseding = Decision {
            id: DecisionId::new(),
            request_id: vetoed.request_id,
            agent_id: vetoed.agent_id.clone(),
            action_description: vetoed.action_description.clone(),
            risk_level: vetoed.risk_level,
            votes: Vec::new(),
            outcome: Outcome::Overridden,
            rationale: format!("vetoed by {}: {}", issued_by, direction),
            precedent_refs: vec![vetoed.id],
            creates_precedent: false,
            decided_at: Utc::now(),
        };
        self.ledger.append(ChainPayload::Decision(superseding.clone()))?;
        self.decisions.insert(superseding.clone())?;

        // A vetoed decision may never have been indexed; that is not an
        // error.
        match self.precedents.supersede(vetoed.id, superseding.id) {
            Ok(()) | Err(GovernanceError::UnknownDecision { .. }) => {}
            Err(e) => return Err(e),
        }

        // An escalation parked on the vetoed decision is moot now.
        if let Some(pending) = self.gate.find_by_decision(vetoed.id)? {
            self.gate.resolve(
                pending.id,
                ResolutionOutcome::Deny,
                format!("vetoed by {}", issued_by),
                false,
            )?;
        }

        Ok(())
    }

    /// The mutation record paired with every in-place score update.
    fn chain_score_mutation(
        &self,
        agent: &AgentId,
        kind: SignalKind,
        snapshot: &TrustSnapshot,
    ) -> GovResult<ScoreMutation> {
        let mutation = ScoreMutation {
            agent_id: agent.clone(),
            kind,
            magnitude: snapshot.new_score as i64 - snapshot.old_score as i64,
            old_score: snapshot.old_score,
            new_score: snapshot.new_score,
            old_tier: snapshot.old_tier,
            new_tier: snapshot.new_tier,
        };
        self.ledger
            .append(ChainPayload::ScoreMutation(mutation.clone()))?;
        Ok(mutation)
    }
}
