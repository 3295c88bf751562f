//! Podar: fuzzy inference and rule-base reduction in pure Rust.
//!
//! Podar builds Sugeno-style fuzzy inference systems for low-cost sensor
//! calibration, scores each rule's contribution over a training set, and
//! prunes the rule base down in nested importance-ordered steps while
//! tracking regression quality per sensor unit.
//!
//! # Quick Start
//!
//! ```
//! use podar::prelude::*;
//!
//! // One input with two overlapping regions
//! let low = MembershipFunction::triangular(-0.5, 0.0, 1.5).unwrap();
//! let high = MembershipFunction::triangular(-0.5, 1.0, 1.5).unwrap();
//!
//! let fis = FuzzyInferenceSystem::new(
//!     vec![InputVariable::new("pm_raw", vec![low, high])],
//!     OutputVariable::new(vec![
//!         Consequent::Singleton(1.0),
//!         Consequent::Singleton(3.0),
//!     ]),
//!     vec![Rule::new(vec![Some(0)]), Rule::new(vec![Some(1)])],
//! ).unwrap();
//!
//! // Batch inference over a small sample set
//! let x = Matrix::from_vec(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
//! let out = InferenceEngine::new().evaluate(&fis, &x).unwrap();
//! assert_eq!(out.predictions.len(), 3);
//!
//! // Score rule importance and reduce the base
//! let importance = ActivationAnalyzer::new(ActivationMethod::Weighted)
//!     .importance(&out.firing_strengths)
//!     .unwrap();
//! let steps = RulePruner::new()
//!     .with_floor(1)
//!     .sweep(&fis, importance.as_slice(), None)
//!     .unwrap();
//! assert_eq!(steps.len(), 2);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`membership`]: Triangular, trapezoidal, and Gaussian membership functions
//! - [`fis`]: Fuzzy inference systems and the batch inference engine
//! - [`activation`]: Rule importance scoring (binary and weighted activation)
//! - [`pruning`]: Importance-ordered nested rule-base reduction
//! - [`trainer`]: Hybrid least-squares / gradient parameter re-tuning
//! - [`metrics`]: Grouped regression metrics (r2, MAE, MSE, RMSE)
//! - [`dataset`]: Labeled sensor records and dense-matrix views
//! - [`sweep`]: End-to-end pruning sweeps over train/test splits

pub mod activation;
pub mod dataset;
pub mod error;
pub mod fis;
pub mod membership;
pub mod metrics;
pub mod prelude;
pub mod primitives;
pub mod pruning;
pub mod sweep;
pub mod trainer;

pub use error::{PodarError, Result};
