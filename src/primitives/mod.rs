//! Core compute primitives (Vector, Matrix).
//!
//! These types carry all numeric data flowing through the inference and
//! pruning pipeline: sample batches, firing-strength matrices, importance
//! vectors and prediction columns.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
