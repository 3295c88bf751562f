//! Importance-ordered rule-base reduction.
//!
//! Given an importance vector from the activation analyzer, the pruner
//! produces nested rule subsets from the full base down to a floor, each
//! one dropping the least-important surviving rule. Reduced systems are
//! fresh deep copies built with [`FuzzyInferenceSystem::select_rules`];
//! the trained base system is never mutated.

use crate::error::{PodarError, Result};
use crate::fis::FuzzyInferenceSystem;
use crate::primitives::{Matrix, Vector};
use crate::trainer::Trainer;

/// Indices sorted by importance descending; ties keep original index order.
///
/// Stable, so equal scores resolve deterministically and sweeps are
/// reproducible.
///
/// # Examples
///
/// ```
/// use podar::pruning::argsort_desc;
///
/// assert_eq!(argsort_desc(&[5.0, 1.0, 3.0]), vec![0, 2, 1]);
/// assert_eq!(argsort_desc(&[2.0, 2.0, 9.0]), vec![2, 0, 1]);
/// ```
#[must_use]
pub fn argsort_desc(importance: &[f32]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..importance.len()).collect();
    indices.sort_by(|&a, &b| {
        importance[b]
            .partial_cmp(&importance[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// One iteration of a reduction sweep.
#[derive(Debug, Clone)]
pub struct ReductionStep {
    /// Surviving rule indices into the *base* system, in original order.
    pub kept_indices: Vec<usize>,
    /// The reduced (and, when retraining succeeded, re-tuned) system.
    pub fis: FuzzyInferenceSystem,
    /// Set when a configured trainer failed for this iteration; the step
    /// then carries the untuned reduced system and the sweep continues.
    pub retrain_error: Option<String>,
}

impl ReductionStep {
    /// Rules surviving in this step.
    #[must_use]
    pub fn num_rules(&self) -> usize {
        self.kept_indices.len()
    }
}

/// Reduces a rule base by importance ordering.
///
/// The sweep always works against the current rule count of the system it
/// is handed; no fixed rule count is assumed anywhere.
///
/// # Examples
///
/// ```
/// use podar::fis::{Consequent, FuzzyInferenceSystem, InputVariable, OutputVariable, Rule};
/// use podar::membership::MembershipFunction;
/// use podar::pruning::RulePruner;
///
/// let mf = MembershipFunction::triangular(0.0, 0.5, 1.0).unwrap();
/// let fis = FuzzyInferenceSystem::new(
///     vec![InputVariable::new("x", vec![mf])],
///     OutputVariable::new(vec![
///         Consequent::Singleton(0.0),
///         Consequent::Singleton(0.5),
///         Consequent::Singleton(1.0),
///     ]),
///     vec![
///         Rule::new(vec![Some(0)]),
///         Rule::new(vec![Some(0)]),
///         Rule::new(vec![Some(0)]),
///     ],
/// ).unwrap();
///
/// let steps = RulePruner::new()
///     .with_floor(1)
///     .sweep(&fis, &[5.0, 1.0, 3.0], None)
///     .unwrap();
/// assert_eq!(steps.len(), 3);
/// assert_eq!(steps[1].kept_indices, vec![0, 2]);
/// assert_eq!(steps[2].kept_indices, vec![0]);
/// ```
pub struct RulePruner {
    floor: usize,
    trainer: Option<Box<dyn Trainer>>,
    epochs: usize,
}

impl Default for RulePruner {
    fn default() -> Self {
        Self::new()
    }
}

impl RulePruner {
    /// Creates a pruner with the default floor of 2 rules and no retraining.
    #[must_use]
    pub fn new() -> Self {
        Self {
            floor: 2,
            trainer: None,
            epochs: 0,
        }
    }

    /// Sets the minimum number of rules a sweep keeps.
    #[must_use]
    pub fn with_floor(mut self, floor: usize) -> Self {
        self.floor = floor;
        self
    }

    /// Re-optimizes each reduced system with `trainer` for `epochs` epochs.
    /// The sweep then requires training data.
    #[must_use]
    pub fn with_trainer(mut self, trainer: Box<dyn Trainer>, epochs: usize) -> Self {
        self.trainer = Some(trainer);
        self.epochs = epochs;
        self
    }

    /// Runs the full sweep: iteration `k` keeps the `N - k + 1` highest
    /// ranked rules, down to the floor. Retained sets are monotonically
    /// nested, and kept rules stay in their original relative order.
    ///
    /// `train` supplies `(features, targets)` for retraining; required when
    /// a trainer is configured, ignored otherwise. A retrain failure is
    /// recorded on its step and the sweep continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the importance length disagrees with the rule
    /// count, the floor is outside `[1, num_rules]`, or a trainer is
    /// configured without training data.
    pub fn sweep(
        &self,
        fis: &FuzzyInferenceSystem,
        importance: &[f32],
        train: Option<(&Matrix<f32>, &Vector<f32>)>,
    ) -> Result<Vec<ReductionStep>> {
        let n = fis.num_rules();
        self.check_inputs(fis, importance, self.floor, train)?;

        let ranked = argsort_desc(importance);
        let mut steps = Vec::with_capacity(n - self.floor + 1);
        for keep in (self.floor..=n).rev() {
            steps.push(self.reduce_to_ranked(fis, &ranked, keep, train)?);
        }
        Ok(steps)
    }

    /// Single reduction to an exact rule count, same selection logic as the
    /// sweep but non-iterative.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::sweep`], with `target` in place of the
    /// floor.
    pub fn to_count(
        &self,
        fis: &FuzzyInferenceSystem,
        importance: &[f32],
        target: usize,
        train: Option<(&Matrix<f32>, &Vector<f32>)>,
    ) -> Result<ReductionStep> {
        self.check_inputs(fis, importance, target, train)?;
        let ranked = argsort_desc(importance);
        self.reduce_to_ranked(fis, &ranked, target, train)
    }

    fn check_inputs(
        &self,
        fis: &FuzzyInferenceSystem,
        importance: &[f32],
        count: usize,
        train: Option<(&Matrix<f32>, &Vector<f32>)>,
    ) -> Result<()> {
        let n = fis.num_rules();
        if importance.len() != n {
            return Err(PodarError::DimensionMismatch {
                expected: format!("{n} importance scores (one per rule)"),
                actual: format!("{}", importance.len()),
            });
        }
        if count == 0 || count > n {
            return Err(PodarError::InvalidRuleCount {
                requested: count,
                available: n,
            });
        }
        if self.trainer.is_some() && train.is_none() {
            return Err("trainer configured but no training data supplied".into());
        }
        Ok(())
    }

    fn reduce_to_ranked(
        &self,
        fis: &FuzzyInferenceSystem,
        ranked: &[usize],
        keep: usize,
        train: Option<(&Matrix<f32>, &Vector<f32>)>,
    ) -> Result<ReductionStep> {
        // keep the top `keep` ranked rules, restored to original order so
        // antecedent/consequent pairing stays unambiguous
        let mut kept: Vec<usize> = ranked[..keep].to_vec();
        kept.sort_unstable();

        let reduced = fis.select_rules(&kept)?;
        debug_assert_eq!(reduced.num_rules(), reduced.output.consequents.len());

        let (fis, retrain_error) = match (&self.trainer, train) {
            (Some(trainer), Some((x, y))) => match trainer.tune(&reduced, x, y, self.epochs) {
                Ok(tuned) => (tuned, None),
                Err(e) => (reduced, Some(e.to_string())),
            },
            _ => (reduced, None),
        };

        Ok(ReductionStep {
            kept_indices: kept,
            fis,
            retrain_error,
        })
    }
}


#[cfg(test)]
#[path = "tests_pruning_contract.rs"]
mod tests_pruning_contract;
