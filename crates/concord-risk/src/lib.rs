//! # concord-risk
//!
//! Deterministic rule-table risk classifier: maps an `ActionRequest` to a
//! discrete 0–4 `RiskLevel` with a fail-safe upward bias. The table loads
//! from TOML with embedded defaults.

pub mod classifier;
pub mod table;

pub use classifier::RiskClassifier;
pub use table::{CategoryLevels, KeywordRule, RiskTable};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use concord_contracts::agent::{AgentId, SessionId};
    use concord_contracts::request::{ActionCategory, ActionRequest, RiskHints, RiskLevel};

    use super::RiskClassifier;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn request(description: &str, hints: RiskHints) -> ActionRequest {
        ActionRequest::new(AgentId::new("a-1"), description, hints, SessionId::new())
    }

    fn declared(category: ActionCategory) -> RiskHints {
        RiskHints {
            category: Some(category),
            ..RiskHints::default()
        }
    }

    // ── Category base levels ──────────────────────────────────────────────────

    #[test]
    fn declared_categories_map_to_base_levels() {
        let classifier = RiskClassifier::new();
        let cases = [
            (ActionCategory::ReadOnly, RiskLevel::L0),
            (ActionCategory::ContentGeneration, RiskLevel::L1),
            (ActionCategory::ExternalCall, RiskLevel::L2),
            (ActionCategory::SystemMutation, RiskLevel::L3),
            (ActionCategory::FinancialDestructive, RiskLevel::L4),
        ];
        for (category, expected) in cases {
            let req = request("summarize the weekly report", declared(category));
            assert_eq!(classifier.classify(&req), expected, "{:?}", category);
        }
    }

    // ── Fail-safe bias ────────────────────────────────────────────────────────

    /// A declared low category with a destructive description resolves to
    /// the higher keyword level — hints are trusted only upward.
    #[test]
    fn understated_hints_are_overridden_by_keywords() {
        let classifier = RiskClassifier::new();
        let req = request(
            "delete stale records from the archive",
            declared(ActionCategory::ReadOnly),
        );
        assert_eq!(classifier.classify(&req), RiskLevel::L3);
    }

    /// With no declared category and no keyword match, classification
    /// defaults to the content-generation level, never L0.
    #[test]
    fn undeclared_ambiguous_requests_do_not_fall_to_l0() {
        let classifier = RiskClassifier::new();
        let req = request("compose a haiku about governance", RiskHints::default());
        assert_eq!(classifier.classify(&req), RiskLevel::L1);
    }

    // ── Escalations ───────────────────────────────────────────────────────────

    #[test]
    fn irreversibility_forces_at_least_l3() {
        let classifier = RiskClassifier::new();
        let req = request(
            "summarize the weekly report",
            RiskHints {
                category: Some(ActionCategory::ReadOnly),
                irreversible: true,
                ..RiskHints::default()
            },
        );
        assert_eq!(classifier.classify(&req), RiskLevel::L3);
    }

    #[test]
    fn production_contact_bumps_one_level_capped_at_l4() {
        let classifier = RiskClassifier::new();

        let req = request(
            "call the partner api",
            RiskHints {
                category: Some(ActionCategory::ExternalCall),
                touches_production: true,
                ..RiskHints::default()
            },
        );
        assert_eq!(classifier.classify(&req), RiskLevel::L3);

        // Already at L4: the bump saturates.
        let req = request(
            "initiate payment run",
            RiskHints {
                category: Some(ActionCategory::FinancialDestructive),
                touches_financial: true,
                ..RiskHints::default()
            },
        );
        assert_eq!(classifier.classify(&req), RiskLevel::L4);
    }

    #[test]
    fn irreversible_production_mutation_is_l4() {
        let classifier = RiskClassifier::new();
        let req = request(
            "drop the legacy table",
            RiskHints {
                category: None,
                irreversible: true,
                touches_production: true,
                touches_financial: false,
            },
        );
        // Keyword "drop" → 3, irreversible keeps 3, production bumps → 4.
        assert_eq!(classifier.classify(&req), RiskLevel::L4);
    }

    // ── Determinism and overrides ─────────────────────────────────────────────

    #[test]
    fn classification_is_deterministic() {
        let classifier = RiskClassifier::new();
        let req = request("deploy the new build", RiskHints::default());
        let first = classifier.classify(&req);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&req), first);
        }
    }

    #[test]
    fn table_loads_from_toml_override() {
        let toml = r#"
            [categories]
            read_only = 1
            content_generation = 1
            external_call = 2
            system_mutation = 3
            financial_destructive = 4
        "#;
        let classifier = RiskClassifier::from_toml_str(toml).unwrap();
        let req = request("anything", declared(ActionCategory::ReadOnly));
        assert_eq!(classifier.classify(&req), RiskLevel::L1);
    }

    #[test]
    fn malformed_table_is_a_config_error() {
        let err = RiskClassifier::from_toml_str("categories = 3").unwrap_err();
        assert!(err.to_string().contains("configuration error"));
    }
}
