//! Grouped regression metrics for pruning trajectories.
//!
//! Predictions are scored per group (typically one group per sensor unit)
//! and aggregated over the full set. Pairs where either side is NaN are
//! excluded from every statistic, so the undefined-prediction sentinel of
//! the inference engine never poisons a score.

use crate::error::{PodarError, Result};
use serde::{Deserialize, Serialize};

/// Name of the terminal aggregate row of a [`MetricsTable`].
pub const AGGREGATE_GROUP: &str = "all";

/// Regression scores for one group of prediction/target pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    /// Group label, or [`AGGREGATE_GROUP`] for the terminal row.
    pub group: String,
    /// Squared Pearson correlation.
    pub r2: f32,
    /// Mean absolute error.
    pub mae: f32,
    /// Mean squared error.
    pub mse: f32,
    /// Root mean squared error.
    pub rmse: f32,
}

/// Per-group metrics plus a terminal aggregate row.
///
/// Built only by [`score_by_group`], which always appends the aggregate
/// row, so `aggregate` is total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTable {
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    /// Rows in first-seen group order, aggregate last.
    #[must_use]
    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    /// Returns the terminal aggregate row.
    #[must_use]
    pub fn aggregate(&self) -> &MetricsRow {
        self.rows
            .last()
            .filter(|row| row.group == AGGREGATE_GROUP)
            .unwrap_or_else(|| unreachable!("score_by_group appends the aggregate row"))
    }

    /// Looks up the row for `group`, if scored.
    #[must_use]
    pub fn group(&self, group: &str) -> Option<&MetricsRow> {
        self.rows.iter().find(|row| row.group == group)
    }
}

/// Pearson correlation coefficient over the finite pairs of two series.
///
/// Pairs with a NaN on either side are excluded. Returns NaN when fewer
/// than two usable pairs remain, so a series the model never fired on is
/// distinguishable from a genuinely uncorrelated one. Zero variance in
/// either side returns 0.
///
/// # Examples
///
/// ```
/// use podar::metrics::pearson_r;
///
/// let r = pearson_r(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
/// assert!((r - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn pearson_r(a: &[f32], b: &[f32]) -> f32 {
    let pairs: Vec<(f32, f32)> = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.len() < 2 {
        return f32::NAN;
    }
    let n = pairs.len() as f32;
    let mean_a: f32 = pairs.iter().map(|(x, _)| x).sum::<f32>() / n;
    let mean_b: f32 = pairs.iter().map(|(_, y)| y).sum::<f32>() / n;

    let mut cov = 0.0_f32;
    let mut var_a = 0.0_f32;
    let mut var_b = 0.0_f32;
    for (x, y) in &pairs {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

/// Mean absolute error over the finite pairs. NaN when no pair is usable.
#[must_use]
pub fn mean_absolute_error(predictions: &[f32], targets: &[f32]) -> f32 {
    pairwise_mean(predictions, targets, |p, t| (p - t).abs())
}

/// Mean squared error over the finite pairs. NaN when no pair is usable.
#[must_use]
pub fn mean_squared_error(predictions: &[f32], targets: &[f32]) -> f32 {
    pairwise_mean(predictions, targets, |p, t| (p - t) * (p - t))
}

/// Root mean squared error over the finite pairs. NaN when no pair is usable.
#[must_use]
pub fn root_mean_squared_error(predictions: &[f32], targets: &[f32]) -> f32 {
    mean_squared_error(predictions, targets).sqrt()
}

fn pairwise_mean(predictions: &[f32], targets: &[f32], f: impl Fn(f32, f32) -> f32) -> f32 {
    let mut sum = 0.0_f32;
    let mut count = 0usize;
    for (&p, &t) in predictions.iter().zip(targets.iter()) {
        if !p.is_nan() && !t.is_nan() {
            sum += f(p, t);
            count += 1;
        }
    }
    if count == 0 {
        return f32::NAN;
    }
    sum / count as f32
}

fn score_pair(group: impl Into<String>, predictions: &[f32], targets: &[f32]) -> MetricsRow {
    let r = pearson_r(predictions, targets);
    MetricsRow {
        group: group.into(),
        r2: r * r,
        mae: mean_absolute_error(predictions, targets),
        mse: mean_squared_error(predictions, targets),
        rmse: root_mean_squared_error(predictions, targets),
    }
}

/// Scores predictions against targets per group, then overall.
///
/// Groups appear in the table in first-seen order, followed by a terminal
/// [`AGGREGATE_GROUP`] row computed over all pairs at once. All three
/// slices must have the same length.
///
/// # Errors
///
/// Returns an error when the slices are empty or their lengths differ.
///
/// # Examples
///
/// ```
/// use podar::metrics::score_by_group;
///
/// let predictions = [1.0, 2.0, 10.0, 12.0];
/// let targets = [1.0, 2.0, 11.0, 12.0];
/// let groups = ["a", "a", "b", "b"];
/// let table = score_by_group(&predictions, &targets, &groups).unwrap();
///
/// assert_eq!(table.rows().len(), 3);
/// assert_eq!(table.rows()[0].group, "a");
/// assert_eq!(table.aggregate().group, "all");
/// ```
pub fn score_by_group<S: AsRef<str>>(
    predictions: &[f32],
    targets: &[f32],
    groups: &[S],
) -> Result<MetricsTable> {
    if predictions.is_empty() {
        return Err(PodarError::empty_input("predictions"));
    }
    if predictions.len() != targets.len() {
        return Err(PodarError::dimension_mismatch(
            "targets",
            predictions.len(),
            targets.len(),
        ));
    }
    if predictions.len() != groups.len() {
        return Err(PodarError::dimension_mismatch(
            "group labels",
            predictions.len(),
            groups.len(),
        ));
    }

    let mut order: Vec<&str> = Vec::new();
    for g in groups {
        let g = g.as_ref();
        if !order.contains(&g) {
            order.push(g);
        }
    }

    let mut rows = Vec::with_capacity(order.len() + 1);
    for g in order {
        let mut p = Vec::new();
        let mut t = Vec::new();
        for i in 0..predictions.len() {
            if groups[i].as_ref() == g {
                p.push(predictions[i]);
                t.push(targets[i]);
            }
        }
        rows.push(score_pair(g, &p, &t));
    }
    rows.push(score_pair(AGGREGATE_GROUP, predictions, targets));

    Ok(MetricsTable { rows })
}


#[cfg(test)]
#[path = "tests_metrics_contract.rs"]
mod tests_metrics_contract;
