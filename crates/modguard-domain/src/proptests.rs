//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Evaluation determinism
//! - Duplicate detection counting
//! - The overall result depending only on fail-level verdicts

use crate::engine::evaluate;
use crate::model::{Declaration, ModuleModel};
use crate::test_support::{attr, config, file, model, output, resource, validation, variable};
use modguard_types::{Category, Status, ids};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z][a-z0-9_]{0,12}").unwrap(),
        prop::string::string_regex("[A-Z][A-Za-z0-9_]{0,12}").unwrap(),
        Just("region".to_string()),
        Just("vpc_cidr".to_string()),
        Just("enable_nat".to_string()),
    ]
}

fn arb_variable() -> impl Strategy<Value = Declaration> {
    (arb_name(), any::<bool>(), any::<bool>()).prop_map(|(name, described, validated)| {
        let mut attrs = Vec::new();
        if described {
            attrs.push(attr("description", "\"d\"", 2));
        }
        let blocks = if validated {
            vec![validation(&format!("can(cidrhost(var.{name}, 0))"), 4)]
        } else {
            Vec::new()
        };
        variable(&name, attrs, blocks)
    })
}

fn arb_output() -> impl Strategy<Value = Declaration> {
    (
        arb_name(),
        prop_oneof![
            Just(None),
            Just(Some("\"literal\"")),
            Just(Some("aws_vpc.main.id")),
            Just(Some("var.region")),
            Just(Some("local.nope")),
        ],
    )
        .prop_map(|(name, value)| output(&name, value))
}

fn arb_model() -> impl Strategy<Value = ModuleModel> {
    (
        prop::collection::vec(arb_variable(), 0..8),
        prop::collection::vec(arb_output(), 0..6),
        any::<bool>(),
    )
        .prop_map(|(vars, outs, with_vpc)| {
            let mut main = Vec::new();
            if with_vpc {
                main.push(resource(
                    "aws_vpc",
                    "main",
                    vec![attr("cidr_block", "var.vpc_cidr", 2)],
                ));
            }
            model(
                vec![
                    file("main.tf", main, vec![]),
                    file("variables.tf", vars, vec![]),
                    file("outputs.tf", outs, vec![]),
                ],
                &[],
            )
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn evaluation_is_deterministic(m in arb_model()) {
        let cfg = config();
        let a = evaluate(&m, &cfg);
        let b = evaluate(&m, &cfg);
        prop_assert_eq!(a.categories, b.categories);
        prop_assert_eq!(a.summary, b.summary);
        prop_assert_eq!(a.data, b.data);
    }

    #[test]
    fn overall_result_tracks_fail_verdicts_only(m in arb_model()) {
        let report = evaluate(&m, &config());
        let any_fail = report
            .categories
            .iter()
            .flat_map(|c| c.verdicts.iter())
            .any(|v| v.status == Status::Fail);
        prop_assert_eq!(report.passed, !any_fail);
        prop_assert_eq!(report.summary.failed == 0, report.passed);
    }

    #[test]
    fn one_duplicate_verdict_per_repeated_name(names in prop::collection::vec(arb_name(), 1..12)) {
        let vars = names.iter().map(|n| variable(n, vec![], vec![])).collect();
        let m = model(vec![file("variables.tf", vars, vec![])], &[]);
        let report = evaluate(&m, &config());

        let mut distinct = names.clone();
        distinct.sort();
        distinct.dedup();
        let repeated = distinct
            .iter()
            .filter(|n| names.iter().filter(|x| x == n).count() > 1)
            .count();

        let dup_verdicts = report
            .categories
            .iter()
            .flat_map(|c| c.verdicts.iter())
            .filter(|v| v.code == ids::CODE_DUPLICATE_DECLARATION)
            .count();
        prop_assert_eq!(dup_verdicts, repeated);
    }

    #[test]
    fn warn_only_categories_never_fail(m in arb_model()) {
        let report = evaluate(&m, &config());
        for section in &report.categories {
            if matches!(section.category, Category::TypePattern | Category::Reference) {
                prop_assert_eq!(section.summary.failed, 0);
            }
        }
    }

    #[test]
    fn category_totals_add_up(m in arb_model()) {
        let report = evaluate(&m, &config());
        let total: u32 = report.categories.iter().map(|c| c.summary.total).sum();
        prop_assert_eq!(total, report.summary.total);
        for section in &report.categories {
            prop_assert_eq!(section.verdicts.len() as u32, section.summary.total);
        }
    }
}
