//! Parameter re-optimization for reduced rule bases.
//!
//! The pruner only depends on the narrow [`Trainer`] contract, so the
//! tuner can be swapped without touching the pruning logic. The shipped
//! implementation, [`HybridAnfis`], follows the classic ANFIS hybrid
//! procedure: a least-squares solve for consequent parameters with
//! antecedent shapes held fixed, interleaved with a stochastic
//! gradient pass over the antecedent shape parameters. The rule
//! structure (antecedent index pattern, rule count) is never changed.

use crate::error::{PodarError, Result};
use crate::fis::{Consequent, FuzzyInferenceSystem, InferenceEngine};
use crate::primitives::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Re-optimizes the numeric parameters of a fuzzy system.
///
/// Contract: `x.n_rows() == y.len()`; the returned system has the same
/// rule structure as the input, with re-tuned numeric parameters.
pub trait Trainer: Send + Sync {
    /// Tunes `fis` against `(x, y)` for `epochs` epochs.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for mismatched input shapes and
    /// [`PodarError::TrainerFailure`] when optimization breaks down.
    fn tune(
        &self,
        fis: &FuzzyInferenceSystem,
        x: &Matrix<f32>,
        y: &Vector<f32>,
        epochs: usize,
    ) -> Result<FuzzyInferenceSystem>;
}

/// ANFIS-style hybrid least-squares / gradient-descent tuner.
///
/// Per epoch:
/// 1. **Consequent pass**: with antecedent shapes fixed, all consequent
///    parameters are solved jointly by damped normal equations over the
///    strength-normalized design matrix (Cholesky, as in ordinary least
///    squares).
/// 2. **Antecedent pass**: one stochastic pass over the samples adjusts
///    membership shape parameters by central-difference gradients of the
///    squared error, with a decaying step size. Steps that would violate a
///    shape's ordering constraints are skipped.
///
/// # Examples
///
/// ```
/// use podar::trainer::HybridAnfis;
///
/// let trainer = HybridAnfis::new()
///     .with_learning_rate(0.005)
///     .with_seed(7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridAnfis {
    /// Base step size for the antecedent gradient pass.
    learning_rate: f32,
    /// Tikhonov damping added to the normal equations.
    damping: f32,
    /// Seed for the per-epoch sample shuffle.
    seed: u64,
}

impl Default for HybridAnfis {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridAnfis {
    /// Creates a tuner with default hyperparameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            learning_rate: 0.01,
            damping: 1e-3,
            seed: 42,
        }
    }

    /// Sets the base learning rate for the antecedent pass.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the normal-equations damping factor.
    #[must_use]
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Seeds the sample shuffle for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Solves all consequent parameters by damped least squares.
    ///
    /// Design columns per rule: `[w_r * x_1, .., w_r * x_d, w_r]` for a
    /// linear consequent, `[w_r]` for a singleton, where `w_r` is the
    /// firing strength normalized over the sample's total strength.
    /// Samples where no rule fires contribute nothing.
    fn solve_consequents(
        &self,
        fis: &mut FuzzyInferenceSystem,
        x: &Matrix<f32>,
        y: &Vector<f32>,
        epoch: usize,
    ) -> Result<()> {
        let engine = InferenceEngine::new();
        let out = engine.evaluate(fis, x)?;
        let n_rules = fis.num_rules();
        let d = fis.num_inputs();

        // column layout: per-rule blocks, width depends on consequent kind
        let mut offsets = Vec::with_capacity(n_rules);
        let mut n_cols = 0;
        for consequent in &fis.output.consequents {
            offsets.push(n_cols);
            n_cols += match consequent {
                Consequent::Linear { .. } => d + 1,
                Consequent::Singleton(_) => 1,
            };
        }

        let n_samples = x.n_rows();
        let mut design = Vec::with_capacity(n_samples * n_cols);
        let mut rhs = Vec::with_capacity(n_samples);
        for i in 0..n_samples {
            let strengths = out.firing_strengths.row_slice(i);
            let total: f32 = strengths.iter().sum();
            if total <= 0.0 {
                continue;
            }
            let features = x.row_slice(i);
            let mut row = vec![0.0_f32; n_cols];
            for (r, &w) in strengths.iter().enumerate() {
                let wn = w / total;
                match &fis.output.consequents[r] {
                    Consequent::Linear { .. } => {
                        for (j, &f) in features.iter().enumerate() {
                            row[offsets[r] + j] = wn * f;
                        }
                        row[offsets[r] + d] = wn;
                    }
                    Consequent::Singleton(_) => {
                        row[offsets[r]] = wn;
                    }
                }
            }
            design.extend_from_slice(&row);
            rhs.push(y[i]);
        }

        if rhs.is_empty() {
            return Err(PodarError::TrainerFailure {
                epochs: epoch,
                message: "no rule fires for any training sample".to_string(),
            });
        }

        let phi = Matrix::from_vec(rhs.len(), n_cols, design)?;
        let phi_t = phi.transpose();
        let mut gram = phi_t.matmul(&phi)?;
        for k in 0..n_cols {
            gram.set(k, k, gram.get(k, k) + self.damping);
        }
        let rhs_vec = phi_t.matvec(&Vector::from_vec(rhs))?;
        let beta = gram.cholesky_solve(&rhs_vec).map_err(|e| {
            PodarError::TrainerFailure {
                epochs: epoch,
                message: format!("consequent least-squares solve failed: {e}"),
            }
        })?;

        for (r, consequent) in fis.output.consequents.iter_mut().enumerate() {
            match consequent {
                Consequent::Linear {
                    coefficients,
                    intercept,
                } => {
                    for j in 0..d {
                        coefficients[j] = beta[offsets[r] + j];
                    }
                    *intercept = beta[offsets[r] + d];
                }
                Consequent::Singleton(value) => {
                    *value = beta[offsets[r]];
                }
            }
        }
        Ok(())
    }

    /// One stochastic pass adjusting antecedent shape parameters.
    fn descend_antecedents(
        &self,
        fis: &mut FuzzyInferenceSystem,
        x: &Matrix<f32>,
        y: &Vector<f32>,
        epoch: usize,
    ) {
        let step = self.learning_rate / (1.0 + epoch as f32 * 0.1);
        let h = 1e-3_f32;

        let mut order: Vec<usize> = (0..x.n_rows()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(epoch as u64));
        order.shuffle(&mut rng);

        for &i in &order {
            let features = x.row_slice(i);
            let target = y[i];

            for input_idx in 0..fis.num_inputs() {
                for mf_idx in 0..fis.inputs[input_idx].membership.len() {
                    let params = fis.inputs[input_idx].membership[mf_idx].params();
                    let mut updated = params.clone();
                    let mut changed = false;

                    for p in 0..params.len() {
                        let grad = {
                            let mut plus = params.clone();
                            plus[p] += h;
                            let mut minus = params.clone();
                            minus[p] -= h;
                            let e_plus = squared_error_with(fis, input_idx, mf_idx, &plus, features, target);
                            let e_minus =
                                squared_error_with(fis, input_idx, mf_idx, &minus, features, target);
                            match (e_plus, e_minus) {
                                (Some(ep), Some(em)) => (ep - em) / (2.0 * h),
                                _ => continue,
                            }
                        };
                        if grad.is_finite() {
                            updated[p] -= step * grad;
                            changed = true;
                        }
                    }

                    if changed {
                        // an update that breaks the shape's ordering is dropped
                        if let Ok(mf) =
                            fis.inputs[input_idx].membership[mf_idx].with_params(&updated)
                        {
                            fis.inputs[input_idx].membership[mf_idx] = mf;
                        }
                    }
                }
            }
        }
    }
}

/// Squared prediction error for one sample with one membership function's
/// parameters temporarily replaced. `None` when the perturbed shape is
/// invalid or no rule fires.
fn squared_error_with(
    fis: &FuzzyInferenceSystem,
    input_idx: usize,
    mf_idx: usize,
    params: &[f32],
    features: &[f32],
    target: f32,
) -> Option<f32> {
    let perturbed_mf = fis.inputs[input_idx].membership[mf_idx]
        .with_params(params)
        .ok()?;
    let mut working = fis.clone();
    working.inputs[input_idx].membership[mf_idx] = perturbed_mf;

    let x = Matrix::from_vec(1, features.len(), features.to_vec()).ok()?;
    let out = InferenceEngine::new()
        .with_parallel(false)
        .evaluate(&working, &x)
        .ok()?;
    let prediction = out.predictions[0];
    if prediction.is_nan() {
        return None;
    }
    let err = prediction - target;
    Some(err * err)
}

impl Trainer for HybridAnfis {
    fn tune(
        &self,
        fis: &FuzzyInferenceSystem,
        x: &Matrix<f32>,
        y: &Vector<f32>,
        epochs: usize,
    ) -> Result<FuzzyInferenceSystem> {
        if x.n_rows() != y.len() {
            return Err(PodarError::DimensionMismatch {
                expected: format!("{} targets (one per sample)", x.n_rows()),
                actual: format!("{}", y.len()),
            });
        }
        if x.n_rows() == 0 {
            return Err(PodarError::empty_input("training samples"));
        }
        fis.validate()?;

        let mut tuned = fis.clone();
        for epoch in 0..epochs {
            self.solve_consequents(&mut tuned, x, y, epoch)?;
            self.descend_antecedents(&mut tuned, x, y, epoch);

            let loss = training_mse(&tuned, x, y)?;
            if !loss.is_finite() {
                return Err(PodarError::TrainerFailure {
                    epochs: epoch,
                    message: format!("loss became non-finite ({loss})"),
                });
            }
        }
        if epochs > 0 {
            // the gradient pass moved the shapes after the last solve, so
            // finish with consequents that are optimal for the final shapes
            self.solve_consequents(&mut tuned, x, y, epochs)?;
        }
        tuned.validate()?;
        Ok(tuned)
    }
}

/// Mean squared error over the samples with a defined prediction.
fn training_mse(fis: &FuzzyInferenceSystem, x: &Matrix<f32>, y: &Vector<f32>) -> Result<f32> {
    let out = InferenceEngine::new().evaluate(fis, x)?;
    let mut sum = 0.0_f32;
    let mut count = 0usize;
    for i in 0..y.len() {
        let p = out.predictions[i];
        if !p.is_nan() {
            let e = p - y[i];
            sum += e * e;
            count += 1;
        }
    }
    if count == 0 {
        return Err(PodarError::TrainerFailure {
            epochs: 0,
            message: "no defined predictions over the training set".to_string(),
        });
    }
    Ok(sum / count as f32)
}
