//! The validator seam and the parameterized ruleset strategy.
//!
//! The nine roster roles are NOT nine hand-coded types: `RulesetValidator`
//! is one stateless strategy whose behavior is a deterministic function of
//! its role parameter and the review context. Implementations of
//! `Validator` must be pure — same context, same vote.

use chrono::Utc;

use concord_contracts::agent::TrustTier;
use concord_contracts::decision::{Decision, Outcome, ValidatorRole, Vote, VoteChoice};
use concord_contracts::request::{ActionRequest, RiskLevel};

/// Everything a validator sees when reviewing one request.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    /// The full request under review.
    pub request: ActionRequest,
    /// The classifier's (advisory) risk level.
    pub risk_level: RiskLevel,
    /// The requesting agent's current trust tier — tier, not raw score,
    /// so a single noisy signal cannot flip the required oversight.
    pub agent_tier: TrustTier,
    /// Up to K relevant precedents, most similar first.
    pub precedents: Vec<Decision>,
}

/// An independent tribunal validator.
///
/// Implementations run concurrently on separate threads and must be
/// deterministic and side-effect free. A validator that misses the
/// evaluation deadline is recorded as an abstain; it is never retried.
pub trait Validator: Send + Sync {
    /// The roster role this validator fills.
    fn role(&self) -> ValidatorRole;

    /// Review the request and cast a vote.
    fn vote(&self, ctx: &ReviewContext) -> Vote;
}

/// The production validator strategy, parameterized by role.
///
/// Each role carries a risk tolerance; the vote falls out of the margin
/// between (tolerance + tier credit + precedent lean) and the request's
/// risk pressure. A positive margin approves, anything else denies —
/// abstention is reserved for the precedent role facing an empty corpus
/// and for timeouts synthesized by the tribunal.
pub struct RulesetValidator {
    role: ValidatorRole,
}

impl RulesetValidator {
    pub fn new(role: ValidatorRole) -> Self {
        Self { role }
    }

    /// The full nine-member production roster, in roster order.
    pub fn roster() -> Vec<Box<dyn Validator>> {
        ValidatorRole::ROSTER
            .iter()
            .map(|&role| Box::new(RulesetValidator::new(role)) as Box<dyn Validator>)
            .collect()
    }

    /// Role-specific base tolerance for a given request.
    ///
    /// Lower numbers are stricter. The adversarial role is deliberately
    /// the hardest to satisfy; the reversibility role collapses to near
    /// zero for irreversible actions.
    fn base_tolerance(&self, ctx: &ReviewContext) -> i64 {
        match self.role {
            ValidatorRole::Safety => 3,
            ValidatorRole::Compliance => 3,
            ValidatorRole::Security => 2,
            ValidatorRole::Ethics => 3,
            ValidatorRole::Accuracy => 4,
            ValidatorRole::Resources => 5,
            ValidatorRole::Reversibility => {
                if ctx.request.hints.irreversible {
                    1
                } else {
                    4
                }
            }
            ValidatorRole::Precedent => 3,
            ValidatorRole::Adversarial => 1,
        }
    }

    /// Net precedent lean: +1 per approved precedent, −1 per denied,
    /// clamped to ±2. Escalated/overridden precedents carry no lean.
    fn precedent_lean(precedents: &[Decision]) -> i64 {
        precedents
            .iter()
            .map(|p| match p.outcome {
                Outcome::Approved => 1,
                Outcome::Denied => -1,
                _ => 0,
            })
            .sum::<i64>()
            .clamp(-2, 2)
    }

    /// Ordinal tier credit: Untrusted 0 … Legendary 5.
    fn tier_credit(tier: TrustTier) -> i64 {
        match tier {
            TrustTier::Untrusted => 0,
            TrustTier::Probation => 1,
            TrustTier::Developing => 2,
            TrustTier::Established => 3,
            TrustTier::Trusted => 4,
            TrustTier::Legendary => 5,
        }
    }

    /// Severity re-flag: some roles push the effective level upward when
    /// the hints indicate more exposure than the classifier assigned.
    /// Flags only ever raise the level; downward never happens here.
    fn severity_flag(&self, ctx: &ReviewContext) -> Option<RiskLevel> {
        let under_l3 = ctx.risk_level < RiskLevel::L3;
        match self.role {
            ValidatorRole::Security if ctx.request.hints.touches_production && under_l3 => {
                Some(RiskLevel::L3)
            }
            ValidatorRole::Reversibility if ctx.request.hints.irreversible && under_l3 => {
                Some(RiskLevel::L3)
            }
            _ => None,
        }
    }
}

impl Validator for RulesetValidator {
    fn role(&self) -> ValidatorRole {
        self.role
    }

    fn vote(&self, ctx: &ReviewContext) -> Vote {
        // The precedent role has nothing to weigh without a corpus.
        if self.role == ValidatorRole::Precedent && ctx.precedents.is_empty() {
            return Vote {
                role: self.role,
                choice: VoteChoice::Abstain,
                confidence: 0.0,
                rationale: "no relevant precedents to weigh".to_string(),
                severity_flag: None,
                cast_at: Utc::now(),
            };
        }

        let tolerance = self.base_tolerance(ctx)
            + Self::tier_credit(ctx.agent_tier)
            + Self::precedent_lean(&ctx.precedents);
        let pressure = 2 * ctx.risk_level.as_u8() as i64;
        let margin = tolerance - pressure;

        let choice = if margin > 0 {
            VoteChoice::Approve
        } else {
            VoteChoice::Deny
        };

        let rationale = match choice {
            VoteChoice::Approve => format!(
                "{} review: {} tier absorbs {} exposure (margin {})",
                self.role, ctx.agent_tier, ctx.risk_level, margin
            ),
            _ => format!(
                "{} review: {} exposure exceeds {} tier standing (margin {})",
                self.role, ctx.risk_level, ctx.agent_tier, margin
            ),
        };

        Vote {
            role: self.role,
            choice,
            confidence: (margin.unsigned_abs() as f64 / 6.0).clamp(0.2, 0.95),
            rationale,
            severity_flag: self.severity_flag(ctx),
            cast_at: Utc::now(),
        }
    }
}
