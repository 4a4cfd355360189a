//! The TOML-driven risk classifier.
//!
//! Classification algorithm:
//!
//! 1. Start from the base level of the declared category, if any.
//! 2. Scan keyword rules against the lowercased description; every match
//!    raises the working level to at least the rule's minimum. Declared
//!    hints are trusted only upward — a request that declares `read_only`
//!    but describes a deletion still classifies as a mutation.
//! 3. With neither a declared category nor a keyword match, fall back to
//!    content-generation level (never silently L0).
//! 4. Escalations: irreversibility forces at least level 3; touching
//!    production or financial systems bumps one level, capped at 4.
//!
//! The output is advisory input to the tribunal; the orchestrator may
//! re-flag upward from validator severity flags, never downward.

use std::path::Path;

use tracing::{debug, warn};

use concord_contracts::error::{GovResult, GovernanceError};
use concord_contracts::request::{ActionRequest, RiskLevel};

use crate::table::RiskTable;

/// Embedded default risk table, used when no file override is given.
const DEFAULT_TABLE: &str = include_str!("../tables/default.toml");

/// A deterministic `ActionRequest -> RiskLevel` classifier.
///
/// Construct via `new` (embedded defaults), `from_toml_str`, or
/// `from_file`, then hand to the governance core.
#[derive(Debug)]
pub struct RiskClassifier {
    table: RiskTable,
}

impl RiskClassifier {
    /// Build a classifier from the embedded default table.
    pub fn new() -> Self {
        Self {
            table: toml::from_str(DEFAULT_TABLE)
                .expect("embedded default risk table must parse"),
        }
    }

    /// Parse `s` as TOML and build a classifier.
    ///
    /// Returns `ConfigError` if the TOML is malformed or does not match
    /// the `RiskTable` schema.
    pub fn from_toml_str(s: &str) -> GovResult<Self> {
        let table: RiskTable = toml::from_str(s).map_err(|e| GovernanceError::ConfigError {
            reason: format!("failed to parse risk table TOML: {}", e),
        })?;
        Ok(Self { table })
    }

    /// Read the file at `path` and parse it as a risk table.
    pub fn from_file(path: &Path) -> GovResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GovernanceError::ConfigError {
            reason: format!("failed to read risk table '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Classify a request into a discrete 0–4 risk level.
    pub fn classify(&self, request: &ActionRequest) -> RiskLevel {
        let description = request.description.to_lowercase();
        let declared = request
            .hints
            .category
            .map(|c| self.table.categories.level_for(c));

        // Keyword pass: every match raises the working level.
        let mut keyword_level: Option<u8> = None;
        for rule in &self.table.keywords {
            if description.contains(&rule.keyword) {
                debug!(
                    keyword = %rule.keyword,
                    min_level = rule.min_level,
                    "keyword rule matched"
                );
                keyword_level = Some(keyword_level.unwrap_or(0).max(rule.min_level));
            }
        }

        // Ambiguity resolves upward: the higher of declared and detected.
        let mut level = match (declared, keyword_level) {
            (Some(d), Some(k)) => d.max(k),
            (Some(d), None) => d,
            (None, Some(k)) => k,
            (None, None) => {
                warn!(
                    request = %request.id,
                    "no category declared and no keyword matched; \
                     defaulting to content-generation level"
                );
                self.table.categories.content_generation
            }
        };

        // Irreversibility always forces at least level 3.
        if request.hints.irreversible {
            level = level.max(3);
        }

        // Production or financial contact bumps one level, capped at 4.
        if request.hints.touches_production || request.hints.touches_financial {
            level = (level + 1).min(4);
        }

        let classified = RiskLevel::from_u8(level);
        debug!(request = %request.id, level = %classified, "request classified");
        classified
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new()
    }
}
