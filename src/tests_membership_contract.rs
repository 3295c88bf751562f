// =========================================================================
// FALSIFY-MF: membership function contract (podar fuzzy degrees)
//
// Properties under falsification:
//   MF-001: triangular evaluates to exactly 1 at its peak
//   MF-002: triangular evaluates to 0 at or beyond its support bounds
//   MF-003: every shape evaluates into [0, 1] for any finite input
// =========================================================================

use super::*;

/// FALSIFY-MF-001: peak degree is exactly 1.0
#[test]
fn falsify_mf_001_triangular_peak() {
    let mf = MembershipFunction::triangular(-2.0, 0.7, 3.5).unwrap();
    let degree = mf.evaluate(0.7);
    assert!(
        degree == 1.0,
        "FALSIFIED MF-001: degree={degree} at peak, expected exactly 1.0"
    );
}

/// FALSIFY-MF-002: zero at and beyond support bounds
#[test]
fn falsify_mf_002_triangular_support() {
    let mf = MembershipFunction::triangular(-1.0, 0.0, 1.0).unwrap();
    for x in [-1.0_f32, 1.0, -50.0, 50.0] {
        let degree = mf.evaluate(x);
        assert!(
            degree == 0.0,
            "FALSIFIED MF-002: degree={degree} at x={x}, expected 0.0 outside support"
        );
    }
}

/// FALSIFY-MF-003: range is [0, 1] for all shapes
#[test]
fn falsify_mf_003_range() {
    let shapes = [
        MembershipFunction::triangular(0.0, 0.5, 1.0).unwrap(),
        MembershipFunction::trapezoidal(0.0, 0.25, 0.75, 1.0).unwrap(),
        MembershipFunction::gaussian(0.5, 0.2).unwrap(),
    ];
    for mf in &shapes {
        for i in -20..=40 {
            let x = i as f32 * 0.05;
            let degree = mf.evaluate(x);
            assert!(
                (0.0..=1.0).contains(&degree),
                "FALSIFIED MF-003: degree={degree} outside [0,1] for {mf:?} at x={x}"
            );
        }
    }
}

mod mf_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    /// FALSIFY-MF-003-prop: arbitrary finite inputs stay in [0, 1]
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn falsify_mf_003_prop_range(
            x in -1e3_f32..1e3,
            peak in -10.0_f32..10.0,
            half_width in 0.1_f32..20.0,
        ) {
            let mf = MembershipFunction::triangular(
                peak - half_width,
                peak,
                peak + half_width,
            ).unwrap();
            let degree = mf.evaluate(x);
            prop_assert!(
                (0.0..=1.0).contains(&degree),
                "FALSIFIED MF-003-prop: degree={} at x={}",
                degree,
                x
            );
        }

        /// FALSIFY-MF-001-prop: peak always evaluates to 1.0
        #[test]
        fn falsify_mf_001_prop_peak(
            peak in -10.0_f32..10.0,
            half_width in 0.1_f32..20.0,
        ) {
            let mf = MembershipFunction::triangular(
                peak - half_width,
                peak,
                peak + half_width,
            ).unwrap();
            prop_assert!(
                mf.evaluate(peak) == 1.0,
                "FALSIFIED MF-001-prop: peak {} did not evaluate to 1.0",
                peak
            );
        }
    }
}
