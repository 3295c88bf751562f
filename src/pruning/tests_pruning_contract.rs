// =========================================================================
// FALSIFY-RP: rule pruner contract (nested importance-ordered reduction)
//
// Properties under falsification:
//   RP-001: iteration k retains exactly N - k + 1 rules
//   RP-002: retained sets are monotonically nested
//   RP-003: rule/consequent lengths agree after every reduction
// =========================================================================

use super::*;
use crate::fis::{Consequent, InputVariable, OutputVariable, Rule};
use crate::membership::MembershipFunction;

fn fis_with_rules(n: usize) -> FuzzyInferenceSystem {
    let mf = MembershipFunction::triangular(0.0, 0.5, 1.0).unwrap();
    FuzzyInferenceSystem::new(
        vec![InputVariable::new("x", vec![mf])],
        OutputVariable::new((0..n).map(|i| Consequent::Singleton(i as f32)).collect()),
        (0..n).map(|_| Rule::new(vec![Some(0)])).collect(),
    )
    .unwrap()
}

/// FALSIFY-RP-001: exact retained counts across a full sweep
#[test]
fn falsify_rp_001_retained_counts() {
    let n = 7;
    let fis = fis_with_rules(n);
    let importance: Vec<f32> = (0..n).map(|i| ((i * 13) % 7) as f32).collect();
    let steps = RulePruner::new()
        .with_floor(1)
        .sweep(&fis, &importance, None)
        .unwrap();

    assert_eq!(steps.len(), n, "FALSIFIED RP-001: wrong iteration count");
    for (k, step) in steps.iter().enumerate() {
        let expected = n - k;
        assert_eq!(
            step.num_rules(),
            expected,
            "FALSIFIED RP-001: iteration {} retained {} rules, expected {expected}",
            k + 1,
            step.num_rules()
        );
    }
}

/// FALSIFY-RP-002: each retained set is a subset of the previous one
#[test]
fn falsify_rp_002_monotone_nesting() {
    let fis = fis_with_rules(8);
    let importance = [3.0, 3.0, 9.0, 0.5, 7.0, 7.0, 1.0, 4.0];
    let steps = RulePruner::new()
        .with_floor(2)
        .sweep(&fis, &importance, None)
        .unwrap();

    for window in steps.windows(2) {
        let prev: std::collections::HashSet<usize> =
            window[0].kept_indices.iter().copied().collect();
        for idx in &window[1].kept_indices {
            assert!(
                prev.contains(idx),
                "FALSIFIED RP-002: rule {idx} appeared after being dropped"
            );
        }
    }
}

/// FALSIFY-RP-003: structural invariant survives every reduction
#[test]
fn falsify_rp_003_length_invariant() {
    let fis = fis_with_rules(5);
    let steps = RulePruner::new()
        .with_floor(1)
        .sweep(&fis, &[0.1, 0.9, 0.4, 0.9, 0.2], None)
        .unwrap();

    for step in &steps {
        assert_eq!(
            step.fis.rules.len(),
            step.fis.output.consequents.len(),
            "FALSIFIED RP-003: rule/consequent lengths diverged"
        );
    }
}

/// Worked scenario: importance [5, 1, 3] over 3 rules, floor 1
#[test]
fn falsify_rp_scenario_5_1_3() {
    let fis = fis_with_rules(3);
    let steps = RulePruner::new()
        .with_floor(1)
        .sweep(&fis, &[5.0, 1.0, 3.0], None)
        .unwrap();

    assert_eq!(steps[0].kept_indices, vec![0, 1, 2]);
    assert_eq!(steps[1].kept_indices, vec![0, 2]);
    assert_eq!(steps[2].kept_indices, vec![0]);
}

mod rp_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    /// FALSIFY-RP-001/002-prop: counts and nesting for random importance
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(30))]

        #[test]
        fn falsify_rp_prop_sweep(
            n in 2..=10usize,
            floor in 1..=2usize,
            seed in 0..500u32,
        ) {
            prop_assume!(floor <= n);
            let fis = fis_with_rules(n);
            let importance: Vec<f32> = (0..n)
                .map(|i| ((i as f32 + seed as f32) * 0.77).sin().abs())
                .collect();

            let steps = RulePruner::new()
                .with_floor(floor)
                .sweep(&fis, &importance, None)
                .unwrap();

            prop_assert_eq!(steps.len(), n - floor + 1);
            for (k, step) in steps.iter().enumerate() {
                prop_assert_eq!(step.num_rules(), n - k);
                prop_assert_eq!(step.fis.num_rules(), step.fis.output.consequents.len());
            }
            for window in steps.windows(2) {
                let prev: std::collections::HashSet<usize> =
                    window[0].kept_indices.iter().copied().collect();
                prop_assert!(window[1].kept_indices.iter().all(|i| prev.contains(i)));
            }
        }
    }
}
