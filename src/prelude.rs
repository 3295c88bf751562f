//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use podar::prelude::*;
//! ```

pub use crate::activation::{ActivationAnalyzer, ActivationMethod};
pub use crate::dataset::{Dataset, Record};
pub use crate::error::{PodarError, Result};
pub use crate::fis::{
    Consequent, EngineOutput, FuzzyInferenceSystem, InferenceEngine, InputVariable,
    OutputVariable, Rule,
};
pub use crate::membership::MembershipFunction;
pub use crate::metrics::{score_by_group, MetricsRow, MetricsTable};
pub use crate::primitives::{Matrix, Vector};
pub use crate::pruning::{ReductionStep, RulePruner};
pub use crate::sweep::{PruningOrchestrator, Split, SweepConfig, SweepResult};
pub use crate::trainer::{HybridAnfis, Trainer};
