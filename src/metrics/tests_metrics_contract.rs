// =========================================================================
// FALSIFY-GM: grouped metrics contract
//
// Properties under falsification:
//   GM-001: identical series score r2 = 1, mae = mse = rmse = 0
//   GM-002: the aggregate row equals direct computation over all pairs
//   GM-003: NaN pairs never influence any statistic
//   GM-004: a group with no usable pairs scores NaN across the board
// =========================================================================

use super::*;

/// FALSIFY-GM-001: a perfect prediction scores perfectly in every group
#[test]
fn falsify_gm_001_identical_series() {
    let values = [0.5, 1.5, 2.5, 3.5, 4.5, 5.5];
    let groups = ["a", "a", "a", "b", "b", "b"];
    let table = score_by_group(&values, &values, &groups).unwrap();

    for row in table.rows() {
        assert!(
            (row.r2 - 1.0).abs() < 1e-6,
            "FALSIFIED GM-001: group {} r2 = {}",
            row.group,
            row.r2
        );
        assert!(row.mae.abs() < 1e-6, "FALSIFIED GM-001: mae = {}", row.mae);
        assert!(row.mse.abs() < 1e-6, "FALSIFIED GM-001: mse = {}", row.mse);
        assert!(row.rmse.abs() < 1e-6, "FALSIFIED GM-001: rmse = {}", row.rmse);
    }
}

/// FALSIFY-GM-002: aggregate row is computed over all pairs at once
#[test]
fn falsify_gm_002_aggregate_matches_direct() {
    let predictions = [1.0, 4.0, 2.0, 8.0, 3.0];
    let targets = [1.2, 3.8, 2.4, 7.5, 3.3];
    let groups = ["u1", "u2", "u1", "u2", "u1"];
    let table = score_by_group(&predictions, &targets, &groups).unwrap();

    let agg = table.aggregate();
    let r = pearson_r(&predictions, &targets);
    assert!(
        (agg.r2 - r * r).abs() < 1e-6,
        "FALSIFIED GM-002: aggregate r2 diverged"
    );
    assert!(
        (agg.mae - mean_absolute_error(&predictions, &targets)).abs() < 1e-6,
        "FALSIFIED GM-002: aggregate mae diverged"
    );
    assert!(
        (agg.rmse - root_mean_squared_error(&predictions, &targets)).abs() < 1e-6,
        "FALSIFIED GM-002: aggregate rmse diverged"
    );
}

/// FALSIFY-GM-003: scores with sentinel pairs equal scores without them
#[test]
fn falsify_gm_003_sentinel_exclusion() {
    let clean_p = [1.0, 2.0, 3.0, 4.0];
    let clean_t = [1.1, 2.2, 2.9, 4.1];
    let noisy_p = [1.0, f32::NAN, 2.0, 3.0, 4.0, f32::NAN];
    let noisy_t = [1.1, 500.0, 2.2, 2.9, 4.1, -500.0];

    let clean = score_by_group(&clean_p, &clean_t, &["g"; 4]).unwrap();
    let noisy = score_by_group(&noisy_p, &noisy_t, &["g"; 6]).unwrap();

    let a = &clean.rows()[0];
    let b = &noisy.rows()[0];
    assert!((a.r2 - b.r2).abs() < 1e-6, "FALSIFIED GM-003: r2 diverged");
    assert!((a.mae - b.mae).abs() < 1e-6, "FALSIFIED GM-003: mae diverged");
    assert!((a.mse - b.mse).abs() < 1e-6, "FALSIFIED GM-003: mse diverged");
}

/// FALSIFY-GM-004: every statistic of a never-firing group is a sentinel,
/// and healthy groups are untouched by the dead one
#[test]
fn falsify_gm_004_all_sentinel_group() {
    let predictions = [1.0, f32::NAN, 2.0, f32::NAN, 3.0, f32::NAN];
    let targets = [1.1, 5.0, 2.2, 6.0, 2.9, 7.0];
    let groups = ["live", "dead", "live", "dead", "live", "dead"];
    let table = score_by_group(&predictions, &targets, &groups).unwrap();

    let dead = table.group("dead").unwrap();
    assert!(dead.r2.is_nan(), "FALSIFIED GM-004: dead r2 = {}", dead.r2);
    assert!(dead.mae.is_nan(), "FALSIFIED GM-004: dead mae = {}", dead.mae);
    assert!(dead.mse.is_nan(), "FALSIFIED GM-004: dead mse = {}", dead.mse);
    assert!(dead.rmse.is_nan(), "FALSIFIED GM-004: dead rmse = {}", dead.rmse);

    let live = table.group("live").unwrap();
    assert!(
        (live.r2 - 1.0).abs() < 0.05,
        "FALSIFIED GM-004: live r2 = {} dragged down by dead group",
        live.r2
    );
    assert!(live.mae < 0.5);

    // the aggregate still scores over the three usable pairs
    let all = table.aggregate();
    assert!(!all.r2.is_nan());
    assert!(!all.mae.is_nan());
}

mod gm_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    /// FALSIFY-GM-range-prop: r2 stays in [0, 1], errors stay non-negative
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        #[test]
        fn falsify_gm_range_prop(
            targets in prop::collection::vec(-100.0_f32..100.0, 2..40),
            noise in prop::collection::vec(-5.0_f32..5.0, 40),
        ) {
            let predictions: Vec<f32> = targets
                .iter()
                .zip(noise.iter())
                .map(|(t, n)| t + n)
                .collect();
            let groups = vec!["g"; predictions.len()];
            let table = score_by_group(&predictions, &targets, &groups).unwrap();

            for row in table.rows() {
                prop_assert!((0.0..=1.0 + 1e-6).contains(&row.r2));
                prop_assert!(row.mae >= 0.0);
                prop_assert!(row.mse >= 0.0);
                prop_assert!(row.rmse >= 0.0);
            }
        }
    }
}
