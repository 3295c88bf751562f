//! Rule-importance scoring from firing-strength matrices.
//!
//! Two policies over the (samples x rules) firing-strength matrix produced
//! by the inference engine:
//!
//! - **Binary Activation Method (BAM)**: each rule earns 1 per sample in
//!   which it fires at all.
//! - **Weighted Activation Method (WAM)**: each rule earns its firing
//!   strength per sample, so partial activations contribute partially.
//!
//! Accumulation is read-only over the input and embarrassingly parallel
//! across samples; workers build partial vectors that are summed at the
//! end, never sharing a mutable accumulator.

use crate::error::{PodarError, Result};
use crate::primitives::{Matrix, Vector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Which importance policy to apply to a firing-strength matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationMethod {
    /// Count samples where the rule fires (strength > 0).
    Binary,
    /// Accumulate the firing strength itself.
    Weighted,
}

/// Computes rule-importance vectors from firing strengths.
///
/// # Examples
///
/// ```
/// use podar::activation::{ActivationAnalyzer, ActivationMethod};
/// use podar::primitives::Matrix;
///
/// // 2 samples x 2 rules
/// let strengths = Matrix::from_vec(2, 2, vec![0.8, 0.0, 0.4, 0.6]).unwrap();
///
/// let bam = ActivationAnalyzer::new(ActivationMethod::Binary);
/// let importance = bam.importance(&strengths).unwrap();
/// assert_eq!(importance.as_slice(), &[2.0, 1.0]);
///
/// let wam = ActivationAnalyzer::new(ActivationMethod::Weighted);
/// let importance = wam.importance(&strengths).unwrap();
/// assert!((importance[0] - 1.2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ActivationAnalyzer {
    method: ActivationMethod,
    normalized: bool,
}

impl ActivationAnalyzer {
    /// Creates an analyzer for the given method, without normalization.
    #[must_use]
    pub fn new(method: ActivationMethod) -> Self {
        Self {
            method,
            normalized: false,
        }
    }

    /// Divides accumulated scores by the sample count, turning BAM counts
    /// into firing frequencies and WAM sums into mean contributions.
    /// The induced rule ordering is unchanged.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }

    /// The configured method.
    #[must_use]
    pub fn method(&self) -> ActivationMethod {
        self.method
    }

    /// Computes one importance score per rule from a (samples x rules)
    /// firing-strength matrix. Output ordering matches the rule ordering
    /// of the system that produced the matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix has no rows or no columns.
    pub fn importance(&self, firing_strengths: &Matrix<f32>) -> Result<Vector<f32>> {
        let (n_samples, n_rules) = firing_strengths.shape();
        if n_samples == 0 || n_rules == 0 {
            return Err(PodarError::empty_input("firing strength matrix"));
        }

        let method = self.method;
        let accumulated = (0..n_samples)
            .into_par_iter()
            .fold(
                || vec![0.0_f32; n_rules],
                |mut partial, i| {
                    let row = firing_strengths.row_slice(i);
                    for (r, &w) in row.iter().enumerate() {
                        if w > 0.0 {
                            partial[r] += match method {
                                ActivationMethod::Binary => 1.0,
                                ActivationMethod::Weighted => w,
                            };
                        }
                    }
                    partial
                },
            )
            .reduce(
                || vec![0.0_f32; n_rules],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            );

        let scores = if self.normalized {
            accumulated
                .into_iter()
                .map(|v| v / n_samples as f32)
                .collect()
        } else {
            accumulated
        };

        Ok(Vector::from_vec(scores))
    }
}


#[cfg(test)]
#[path = "tests_activation_contract.rs"]
mod tests_activation_contract;
