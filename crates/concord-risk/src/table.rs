//! Risk rule table types and configuration schema.
//!
//! A `RiskTable` is deserialized from TOML: a base level per action
//! category plus keyword rules used when a request declares no category.
//! The table is deterministic — the same request always classifies to the
//! same level — and fail-safe: ambiguity resolves upward.

use serde::{Deserialize, Serialize};

use concord_contracts::request::ActionCategory;

/// A keyword rule: when `keyword` appears in the (lowercased) action
/// description, the request is at least `min_level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Lowercase substring matched against the action description.
    pub keyword: String,
    /// The minimum level this keyword forces (0–4).
    pub min_level: u8,
}

/// Base risk level per declared action category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryLevels {
    pub read_only: u8,
    pub content_generation: u8,
    pub external_call: u8,
    pub system_mutation: u8,
    pub financial_destructive: u8,
}

impl CategoryLevels {
    /// The base level for a category.
    pub fn level_for(&self, category: ActionCategory) -> u8 {
        match category {
            ActionCategory::ReadOnly => self.read_only,
            ActionCategory::ContentGeneration => self.content_generation,
            ActionCategory::ExternalCall => self.external_call,
            ActionCategory::SystemMutation => self.system_mutation,
            ActionCategory::FinancialDestructive => self.financial_destructive,
        }
    }
}

/// The top-level structure deserialized from a TOML risk table file.
///
/// Example:
/// ```toml
/// [categories]
/// read_only = 0
/// content_generation = 1
/// external_call = 2
/// system_mutation = 3
/// financial_destructive = 4
///
/// [[keywords]]
/// keyword = "delete"
/// min_level = 3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskTable {
    /// Base level per category.
    pub categories: CategoryLevels,
    /// Keyword rules for undeclared or understated categories.
    #[serde(default)]
    pub keywords: Vec<KeywordRule>,
}
