//! End-to-end pruning sweeps over train/test splits.
//!
//! The orchestrator wires the pipeline together: batch inference on the
//! training split yields firing strengths, the activation analyzer turns
//! them into per-rule importance, the pruner produces nested reduced
//! systems, and every reduced system is scored on both splits. The result
//! holds parallel trajectories over the shrinking rule counts.

use crate::activation::{ActivationAnalyzer, ActivationMethod};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::fis::{FuzzyInferenceSystem, InferenceEngine};
use crate::metrics::{score_by_group, MetricsTable};
use crate::pruning::RulePruner;
use crate::trainer::HybridAnfis;
use serde::{Deserialize, Serialize};

/// Which split of a sweep result to read a trajectory from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Split {
    /// The split the sweep was driven by.
    Train,
    /// The held-out split.
    Test,
}

/// Configuration for a pruning sweep.
///
/// # Examples
///
/// ```
/// use podar::activation::ActivationMethod;
/// use podar::sweep::SweepConfig;
///
/// let config = SweepConfig::new()
///     .with_floor_rule_count(4)
///     .with_activation(ActivationMethod::Weighted)
///     .with_retrain(20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Smallest rule count the sweep reduces to.
    pub floor_rule_count: usize,
    /// Importance scoring method.
    pub activation: ActivationMethod,
    /// Whether each reduced system is re-tuned before scoring.
    pub retrain: bool,
    /// Training epochs per reduced system when retraining.
    pub epoch_budget: usize,
    /// Print a progress line per iteration.
    pub display_results: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepConfig {
    /// Default configuration: floor of 2, binary activation, no retraining.
    #[must_use]
    pub fn new() -> Self {
        Self {
            floor_rule_count: 2,
            activation: ActivationMethod::Binary,
            retrain: false,
            epoch_budget: 0,
            display_results: false,
        }
    }

    /// Sets the smallest rule count the sweep reduces to.
    #[must_use]
    pub fn with_floor_rule_count(mut self, floor: usize) -> Self {
        self.floor_rule_count = floor;
        self
    }

    /// Sets the importance scoring method.
    #[must_use]
    pub fn with_activation(mut self, activation: ActivationMethod) -> Self {
        self.activation = activation;
        self
    }

    /// Enables retraining with the given epoch budget per reduced system.
    #[must_use]
    pub fn with_retrain(mut self, epoch_budget: usize) -> Self {
        self.retrain = true;
        self.epoch_budget = epoch_budget;
        self
    }

    /// Prints a progress line per iteration.
    #[must_use]
    pub fn with_display_results(mut self) -> Self {
        self.display_results = true;
        self
    }
}

/// Scores and survivors for one full sweep, indexed by iteration.
///
/// All vectors have the same length. Trajectory accessors report NaN for
/// iterations whose retraining failed, so a plotted curve shows the gap
/// instead of an untuned system's score.
#[derive(Debug, Clone)]
pub struct SweepResult {
    /// Rules surviving at each iteration, strictly decreasing.
    pub rule_counts: Vec<usize>,
    /// Per-iteration grouped metrics on the training split.
    pub train_metrics: Vec<MetricsTable>,
    /// Per-iteration grouped metrics on the test split.
    pub test_metrics: Vec<MetricsTable>,
    /// Retrain failure messages, `None` where tuning succeeded or was off.
    pub retrain_errors: Vec<Option<String>>,
    /// The reduced system of each iteration.
    pub systems: Vec<FuzzyInferenceSystem>,
}

impl SweepResult {
    /// Number of sweep iterations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rule_counts.len()
    }

    /// True for a zero-iteration result. Sweeps always produce at least
    /// one iteration, so this is the conventional pairing with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rule_counts.is_empty()
    }

    /// Aggregate r2 trajectory for `split`.
    #[must_use]
    pub fn r2(&self, split: Split) -> Vec<f32> {
        self.trajectory(split, |t| t.aggregate().r2)
    }

    /// Aggregate MAE trajectory for `split`.
    #[must_use]
    pub fn mae(&self, split: Split) -> Vec<f32> {
        self.trajectory(split, |t| t.aggregate().mae)
    }

    /// Aggregate MSE trajectory for `split`.
    #[must_use]
    pub fn mse(&self, split: Split) -> Vec<f32> {
        self.trajectory(split, |t| t.aggregate().mse)
    }

    /// Aggregate RMSE trajectory for `split`.
    #[must_use]
    pub fn rmse(&self, split: Split) -> Vec<f32> {
        self.trajectory(split, |t| t.aggregate().rmse)
    }

    fn trajectory(&self, split: Split, read: impl Fn(&MetricsTable) -> f32) -> Vec<f32> {
        let tables = match split {
            Split::Train => &self.train_metrics,
            Split::Test => &self.test_metrics,
        };
        tables
            .iter()
            .zip(self.retrain_errors.iter())
            .map(|(table, err)| if err.is_some() { f32::NAN } else { read(table) })
            .collect()
    }
}

/// Runs a full reduction sweep and scores every iteration.
pub struct PruningOrchestrator {
    config: SweepConfig,
    engine: InferenceEngine,
}

impl PruningOrchestrator {
    /// Creates an orchestrator for `config`.
    #[must_use]
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            engine: InferenceEngine::new(),
        }
    }

    /// Sweeps `fis` down to the configured floor, scoring each reduced
    /// system on both splits.
    ///
    /// Importance is always computed from the training split. When
    /// retraining is enabled, each reduced system is re-tuned on the
    /// training split before scoring; a failed retrain is recorded and the
    /// sweep continues with the next iteration.
    ///
    /// # Errors
    ///
    /// Returns an error when the splits do not match the system's input
    /// dimension, or the floor is invalid for the system's rule count.
    pub fn run(
        &self,
        fis: &FuzzyInferenceSystem,
        train: &Dataset,
        test: &Dataset,
    ) -> Result<SweepResult> {
        let x_train = train.to_matrix();
        let y_train = train.targets();
        let x_test = test.to_matrix();

        let base = self.engine.evaluate(fis, &x_train)?;
        let importance = ActivationAnalyzer::new(self.config.activation)
            .importance(&base.firing_strengths)?;

        let mut pruner = RulePruner::new().with_floor(self.config.floor_rule_count);
        let train_data = if self.config.retrain {
            pruner = pruner.with_trainer(Box::new(HybridAnfis::new()), self.config.epoch_budget);
            Some((&x_train, &y_train))
        } else {
            None
        };
        let steps = pruner.sweep(fis, importance.as_slice(), train_data)?;

        let mut result = SweepResult {
            rule_counts: Vec::with_capacity(steps.len()),
            train_metrics: Vec::with_capacity(steps.len()),
            test_metrics: Vec::with_capacity(steps.len()),
            retrain_errors: Vec::with_capacity(steps.len()),
            systems: Vec::with_capacity(steps.len()),
        };

        for step in steps {
            let train_out = self.engine.evaluate(&step.fis, &x_train)?;
            let test_out = self.engine.evaluate(&step.fis, &x_test)?;
            let train_table = score_by_group(
                train_out.predictions.as_slice(),
                y_train.as_slice(),
                &train.group_ids(),
            )?;
            let test_table = score_by_group(
                test_out.predictions.as_slice(),
                test.targets().as_slice(),
                &test.group_ids(),
            )?;

            if self.config.display_results {
                let agg = test_table.aggregate();
                match &step.retrain_error {
                    Some(err) => println!(
                        "rules={:>3}  retrain failed: {err}",
                        step.num_rules()
                    ),
                    None => println!(
                        "rules={:>3}  test r2={:.4}  mae={:.4}  rmse={:.4}",
                        step.num_rules(),
                        agg.r2,
                        agg.mae,
                        agg.rmse
                    ),
                }
            }

            result.rule_counts.push(step.num_rules());
            result.train_metrics.push(train_table);
            result.test_metrics.push(test_table);
            result.retrain_errors.push(step.retrain_error);
            result.systems.push(step.fis);
        }

        Ok(result)
    }
}
