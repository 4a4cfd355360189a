//! The tribunal: parallel nine-validator evaluation with a bounded
//! deadline and override cancellation.
//!
//! Each validator runs on its own thread and reports through an mpsc
//! channel; the collection loop is the synchronization barrier, blocking
//! until all nine report or the deadline fires. A validator that misses
//! the deadline is recovered locally into an abstain ballot — a timeout is
//! never surfaced as an error. An override for the same session flips the
//! cancel token and aborts collection entirely.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use concord_contracts::decision::{ValidatorRole, Vote, VoteChoice};
use concord_contracts::request::RiskLevel;

use crate::orchestrator::{synthesize, TribunalVerdict};
use crate::validator::{ReviewContext, RulesetValidator, Validator};

/// How often the collection loop wakes to check the cancel token.
const CANCEL_POLL: Duration = Duration::from_millis(25);

/// The result of one evaluation round.
#[derive(Debug)]
pub enum Evaluation {
    /// All ballots collected (or synthesized); synthesis ran.
    Verdict(TribunalVerdict),
    /// An override for this session cancelled the round mid-flight.
    /// The caller must still chain a cancellation record.
    Cancelled,
}

/// A fixed roster of nine independent validators plus the evaluation
/// deadline.
pub struct Tribunal {
    validators: Vec<Arc<dyn Validator>>,
    timeout: Duration,
}

impl Tribunal {
    /// Build a tribunal over the production ruleset roster.
    pub fn new(timeout: Duration) -> Self {
        Self::with_validators(
            RulesetValidator::roster().into_iter().map(Arc::from).collect(),
            timeout,
        )
    }

    /// Build a tribunal over a caller-supplied roster.
    ///
    /// Intended for tests and simulations; the roster is expected to hold
    /// exactly one validator per roster role.
    pub fn with_validators(validators: Vec<Arc<dyn Validator>>, timeout: Duration) -> Self {
        Self { validators, timeout }
    }

    /// Run one full evaluation: fan out, collect under the deadline,
    /// synthesize.
    ///
    /// `cancel` is the session's override token; when it flips mid-round
    /// the evaluation returns `Cancelled` without synthesizing.
    pub fn evaluate(&self, ctx: &ReviewContext, cancel: &AtomicBool) -> Evaluation {
        let ctx = Arc::new(ctx.clone());
        let (tx, rx) = mpsc::channel::<Vote>();

        debug!(
            request = %ctx.request.id,
            risk = %ctx.risk_level,
            validators = self.validators.len(),
            "tribunal fan-out starting"
        );

        for validator in &self.validators {
            let validator = Arc::clone(validator);
            let ctx = Arc::clone(&ctx);
            let tx = tx.clone();
            std::thread::spawn(move || {
                let vote = validator.vote(&ctx);
                // The receiver may be gone (timeout or cancellation); a
                // straggler's ballot is simply dropped.
                let _ = tx.send(vote);
            });
        }
        drop(tx);

        let deadline = Instant::now() + self.timeout;
        let mut ballots: HashMap<ValidatorRole, Vote> = HashMap::new();

        while ballots.len() < self.validators.len() {
            if cancel.load(Ordering::SeqCst) {
                info!(request = %ctx.request.id, "evaluation cancelled by override");
                return Evaluation::Cancelled;
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let wait = CANCEL_POLL.min(deadline - now);

            match rx.recv_timeout(wait) {
                Ok(vote) => {
                    ballots.insert(vote.role, vote);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        // Synthesize abstains for validators that missed the deadline.
        let votes: Vec<Vote> = self
            .validators
            .iter()
            .map(|v| {
                let role = v.role();
                ballots.remove(&role).unwrap_or_else(|| {
                    warn!(
                        request = %ctx.request.id,
                        role = %role,
                        timeout_secs = self.timeout.as_secs_f64(),
                        "validator timed out; recording abstain"
                    );
                    Vote {
                        role,
                        choice: VoteChoice::Abstain,
                        confidence: 0.0,
                        rationale: format!(
                            "validator timed out after {:.1}s",
                            self.timeout.as_secs_f64()
                        ),
                        severity_flag: None,
                        cast_at: Utc::now(),
                    }
                })
            })
            .collect();

        Evaluation::Verdict(synthesize(ctx.risk_level, votes))
    }

    /// Examination mode: the graduation protocol runs the same fan-out at
    /// Level-2 thresholds. Returns the verdict and the approve ratio that
    /// seeds the initial trust score.
    pub fn examine(&self, ctx: &ReviewContext, cancel: &AtomicBool) -> Option<(TribunalVerdict, f64)> {
        let exam_ctx = ReviewContext {
            risk_level: RiskLevel::L2,
            ..ctx.clone()
        };
        match self.evaluate(&exam_ctx, cancel) {
            Evaluation::Verdict(verdict) => {
                let ratio = crate::orchestrator::approve_ratio(&verdict.votes);
                Some((verdict, ratio))
            }
            Evaluation::Cancelled => None,
        }
    }
}
