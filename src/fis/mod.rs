//! Fuzzy inference system: variables, rules, and the rule-base container.
//!
//! A [`FuzzyInferenceSystem`] is a Sugeno-style rule base: every rule owns
//! one consequent (positionally), so the consequent collection and the rule
//! collection are always the same length and are only ever resized together.
//!
//! # Example
//!
//! ```
//! use podar::fis::{Consequent, FuzzyInferenceSystem, InputVariable, OutputVariable, Rule};
//! use podar::membership::MembershipFunction;
//!
//! let low = MembershipFunction::triangular(0.0, 0.0, 0.5).unwrap();
//! let high = MembershipFunction::triangular(0.5, 1.0, 1.0).unwrap();
//! let input = InputVariable::new("pm2p5_raw", vec![low, high]);
//!
//! let fis = FuzzyInferenceSystem::new(
//!     vec![input],
//!     OutputVariable::new(vec![
//!         Consequent::Singleton(0.1),
//!         Consequent::Singleton(0.9),
//!     ]),
//!     vec![
//!         Rule::new(vec![Some(0)]),
//!         Rule::new(vec![Some(1)]),
//!     ],
//! ).unwrap();
//! assert_eq!(fis.num_rules(), 2);
//! ```

mod engine;

pub use engine::{EngineOutput, InferenceEngine};

use crate::error::{PodarError, Result};
use crate::membership::MembershipFunction;
use serde::{Deserialize, Serialize};

/// A named input variable with an ordered list of membership functions.
///
/// Order is significant: rules reference membership functions by index, and
/// the index mapping is stable under cloning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputVariable {
    /// Feature name this variable reads (e.g. `"humidity"`).
    pub name: String,
    /// Ordered membership functions partitioning the variable's range.
    pub membership: Vec<MembershipFunction>,
}

impl InputVariable {
    /// Creates an input variable.
    pub fn new(name: impl Into<String>, membership: Vec<MembershipFunction>) -> Self {
        Self {
            name: name.into(),
            membership,
        }
    }
}

/// Per-rule Sugeno consequent: the "THEN" side of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Consequent {
    /// First-order consequent: `y = coefficients . features + intercept`.
    Linear {
        /// One coefficient per input variable.
        coefficients: Vec<f32>,
        /// Constant term.
        intercept: f32,
    },
    /// Zero-order consequent: a constant output value.
    Singleton(f32),
}

impl Consequent {
    /// Evaluates the consequent for one feature row.
    #[must_use]
    pub fn evaluate(&self, features: &[f32]) -> f32 {
        match self {
            Consequent::Linear {
                coefficients,
                intercept,
            } => {
                let dot: f32 = coefficients
                    .iter()
                    .zip(features.iter())
                    .map(|(c, x)| c * x)
                    .sum();
                dot + intercept
            }
            Consequent::Singleton(value) => *value,
        }
    }
}

/// The output variable: one consequent entry per rule.
///
/// Length always equals the rule count of the owning system; the two are
/// resized together through [`FuzzyInferenceSystem::select_rules`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVariable {
    /// Per-rule consequents, positionally paired with the rule list.
    pub consequents: Vec<Consequent>,
}

impl OutputVariable {
    /// Creates an output variable from per-rule consequents.
    #[must_use]
    pub fn new(consequents: Vec<Consequent>) -> Self {
        Self { consequents }
    }
}

/// One fuzzy rule: `IF x1 is MF[i1] AND x2 is MF[i2] ... THEN y = consequent(x)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// One membership-function index per input variable; `None` is
    /// "don't care" (the input places no constraint on this rule).
    pub antecedent: Vec<Option<usize>>,
    /// Rule weight in [0, 1], multiplied into the firing strength.
    pub weight: f32,
}

impl Rule {
    /// Creates a rule with the default weight of 1.0.
    #[must_use]
    pub fn new(antecedent: Vec<Option<usize>>) -> Self {
        Self {
            antecedent,
            weight: 1.0,
        }
    }

    /// Sets the rule weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// A complete Sugeno-style fuzzy inference system.
///
/// Invariant: `rules.len() == output.consequents.len()` at all times.
/// Reductions go through [`Self::select_rules`], which copies both
/// collections by the same index set into a freshly allocated system, so
/// there is never an observable state where the two lengths disagree and
/// the base system is never aliased by a working copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyInferenceSystem {
    /// Ordered input variables.
    pub inputs: Vec<InputVariable>,
    /// Per-rule output specification.
    pub output: OutputVariable,
    /// Ordered rule base.
    pub rules: Vec<Rule>,
}

impl FuzzyInferenceSystem {
    /// Creates a system and validates its structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the rule/consequent lengths
    /// disagree or any rule is malformed (see [`Self::validate`]).
    pub fn new(
        inputs: Vec<InputVariable>,
        output: OutputVariable,
        rules: Vec<Rule>,
    ) -> Result<Self> {
        let fis = Self {
            inputs,
            output,
            rules,
        };
        fis.validate()?;
        Ok(fis)
    }

    /// Number of rules in the base.
    #[must_use]
    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }

    /// Number of input variables.
    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Checks the structural contract of the rule base.
    ///
    /// A `Some(mf_index)` that is out of range for its input is *not*
    /// rejected here: at inference time it degrades to membership 0, so a
    /// malformed reference never fires rather than crashing a sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the consequent count differs from the rule count
    /// - a rule's antecedent length differs from the input count
    /// - a rule weight is outside [0, 1] or non-finite
    /// - a linear consequent's coefficient count differs from the input count
    pub fn validate(&self) -> Result<()> {
        if self.output.consequents.len() != self.rules.len() {
            return Err(PodarError::DimensionMismatch {
                expected: format!("{} consequents (one per rule)", self.rules.len()),
                actual: format!("{}", self.output.consequents.len()),
            });
        }

        let n_inputs = self.inputs.len();
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.antecedent.len() != n_inputs {
                return Err(PodarError::MalformedRule {
                    rule: i,
                    reason: format!(
                        "antecedent length {}, expected {n_inputs}",
                        rule.antecedent.len()
                    ),
                });
            }
            if !rule.weight.is_finite() || !(0.0..=1.0).contains(&rule.weight) {
                return Err(PodarError::MalformedRule {
                    rule: i,
                    reason: format!("weight {} outside [0, 1]", rule.weight),
                });
            }
            if let Consequent::Linear { coefficients, .. } = &self.output.consequents[i] {
                if coefficients.len() != n_inputs {
                    return Err(PodarError::MalformedRule {
                        rule: i,
                        reason: format!(
                            "linear consequent has {} coefficients, expected {n_inputs}",
                            coefficients.len()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Builds a new system keeping only the rules at `indices`.
    ///
    /// Rules and their consequents are co-selected atomically, preserving
    /// the order given by `indices`. The returned system shares no backing
    /// storage with `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if `indices` is empty, contains an out-of-range
    /// index, or contains duplicates.
    pub fn select_rules(&self, indices: &[usize]) -> Result<Self> {
        if indices.is_empty() {
            return Err(PodarError::InvalidRuleCount {
                requested: 0,
                available: self.num_rules(),
            });
        }
        let mut seen = vec![false; self.num_rules()];
        for &idx in indices {
            if idx >= self.num_rules() {
                return Err(PodarError::Other(format!(
                    "rule index {idx} out of bounds (num_rules={})",
                    self.num_rules()
                )));
            }
            if seen[idx] {
                return Err(PodarError::Other(format!("duplicate rule index {idx}")));
            }
            seen[idx] = true;
        }

        let rules: Vec<Rule> = indices.iter().map(|&i| self.rules[i].clone()).collect();
        let consequents: Vec<Consequent> = indices
            .iter()
            .map(|&i| self.output.consequents[i].clone())
            .collect();

        Ok(Self {
            inputs: self.inputs.clone(),
            output: OutputVariable::new(consequents),
            rules,
        })
    }
}
