//! Batch inference over a fuzzy rule base.
//!
//! Produces per-sample predictions and the per-sample/per-rule
//! firing-strength matrix consumed by the activation analyzer.

use super::FuzzyInferenceSystem;
use crate::error::{PodarError, Result};
use crate::primitives::{Matrix, Vector};
use rayon::prelude::*;

/// Result of evaluating a rule base against a sample batch.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// One prediction per sample; `NaN` where no rule fired.
    pub predictions: Vector<f32>,
    /// Firing strengths, shape (samples, rules), each value in [0, 1].
    pub firing_strengths: Matrix<f32>,
}

/// Batch fuzzy inference engine.
///
/// Antecedents combine through min-conjunction (fuzzy AND); predictions use
/// Sugeno weighted-average defuzzification. Conjunction and defuzzification
/// are independent concerns: min-conjunction applies even though the
/// consequents are functions.
///
/// Samples are independent, so rows fan out across rayon workers when
/// `parallel` is set; nothing mutates shared state.
///
/// # Examples
///
/// ```
/// use podar::fis::{Consequent, FuzzyInferenceSystem, InferenceEngine, InputVariable, OutputVariable, Rule};
/// use podar::membership::MembershipFunction;
/// use podar::primitives::Matrix;
///
/// let low = MembershipFunction::triangular(0.0, 0.0, 1.0).unwrap();
/// let high = MembershipFunction::triangular(0.0, 1.0, 1.0).unwrap();
/// let fis = FuzzyInferenceSystem::new(
///     vec![InputVariable::new("x", vec![low, high])],
///     OutputVariable::new(vec![Consequent::Singleton(0.0), Consequent::Singleton(1.0)]),
///     vec![Rule::new(vec![Some(0)]), Rule::new(vec![Some(1)])],
/// ).unwrap();
///
/// let x = Matrix::from_vec(1, 1, vec![0.25]).unwrap();
/// let out = InferenceEngine::new().evaluate(&fis, &x).unwrap();
/// assert!((out.predictions[0] - 0.25).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    parallel: bool,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceEngine {
    /// Creates an engine with parallel row evaluation enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables rayon fan-out across samples.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Evaluates `fis` over a sample batch (rows are samples, columns are
    /// features in input-variable order).
    ///
    /// The base system is not modified; to evaluate a rule subset, build a
    /// working copy with [`FuzzyInferenceSystem::select_rules`] first.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the system fails validation or the
    /// batch column count differs from the system's input count. A sample
    /// for which no rule fires is not an error: its prediction is `NaN`.
    pub fn evaluate(&self, fis: &FuzzyInferenceSystem, x: &Matrix<f32>) -> Result<EngineOutput> {
        fis.validate()?;
        if x.n_cols() != fis.num_inputs() {
            return Err(PodarError::DimensionMismatch {
                expected: format!("{} feature columns", fis.num_inputs()),
                actual: format!("{}", x.n_cols()),
            });
        }

        let n_rows = x.n_rows();
        let rows: Vec<(f32, Vec<f32>)> = if self.parallel {
            (0..n_rows)
                .into_par_iter()
                .map(|i| evaluate_row(fis, x.row_slice(i)))
                .collect()
        } else {
            (0..n_rows)
                .map(|i| evaluate_row(fis, x.row_slice(i)))
                .collect()
        };

        let mut predictions = Vec::with_capacity(n_rows);
        let mut strengths = Vec::with_capacity(n_rows);
        for (prediction, row_strengths) in rows {
            predictions.push(prediction);
            strengths.push(row_strengths);
        }

        let firing_strengths = Matrix::from_rows(strengths, fis.num_rules())?;
        Ok(EngineOutput {
            predictions: Vector::from_vec(predictions),
            firing_strengths,
        })
    }
}

/// Firing strength of one rule for one feature row.
///
/// Min-conjunction over the non-don't-care antecedent terms, scaled by the
/// rule weight. An out-of-range membership index contributes degree 0, so a
/// malformed rule never fires rather than panicking. A rule with an empty
/// effective antecedent (all don't care) fires at its full weight.
fn firing_strength(fis: &FuzzyInferenceSystem, rule_idx: usize, features: &[f32]) -> f32 {
    let rule = &fis.rules[rule_idx];
    let mut strength = 1.0_f32;
    for (j, term) in rule.antecedent.iter().enumerate() {
        if let Some(mf_idx) = term {
            let degree = fis.inputs[j]
                .membership
                .get(*mf_idx)
                .map_or(0.0, |mf| mf.evaluate(features[j]));
            strength = strength.min(degree);
        }
    }
    strength * rule.weight
}

/// Evaluates all rules for one row: (prediction, per-rule strengths).
fn evaluate_row(fis: &FuzzyInferenceSystem, features: &[f32]) -> (f32, Vec<f32>) {
    let n_rules = fis.num_rules();
    let mut strengths = Vec::with_capacity(n_rules);
    let mut numerator = 0.0_f32;
    let mut denominator = 0.0_f32;

    for r in 0..n_rules {
        let w = firing_strength(fis, r, features);
        if w > 0.0 {
            numerator += w * fis.output.consequents[r].evaluate(features);
            denominator += w;
        }
        strengths.push(w);
    }

    let prediction = if denominator > 0.0 {
        numerator / denominator
    } else {
        f32::NAN
    };
    (prediction, strengths)
}
