//! Error types for Podar operations.
//!
//! Provides rich error context for library consumers.
//!
//! Structural contract violations (dimension mismatches, malformed rules,
//! out-of-range rule counts) are surfaced immediately through these types.
//! Degenerate numeric situations (no rule fires for a sample) are *not*
//! errors: they degrade to NaN sentinels so a long unattended pruning sweep
//! keeps running.

use std::fmt;

/// Main error type for Podar operations.
///
/// # Examples
///
/// ```
/// use podar::error::PodarError;
///
/// let err = PodarError::DimensionMismatch {
///     expected: "4 features".to_string(),
///     actual: "3 features".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum PodarError {
    /// Input shapes don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A rule violates the structural contract of its rule base.
    MalformedRule {
        /// Index of the offending rule
        rule: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Requested floor/target rule count outside `[1, num_rules]`.
    InvalidRuleCount {
        /// Requested count
        requested: usize,
        /// Rules available in the base
        available: usize,
    },

    /// External retraining step failed for one reduction iteration.
    TrainerFailure {
        /// Epochs completed before the failure
        epochs: usize,
        /// Failure description
        message: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for PodarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodarError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            PodarError::MalformedRule { rule, reason } => {
                write!(f, "malformed rule {rule}: {reason}")
            }
            PodarError::InvalidRuleCount {
                requested,
                available,
            } => {
                write!(
                    f,
                    "invalid rule count {requested}: must be in [1, {available}]"
                )
            }
            PodarError::TrainerFailure { epochs, message } => {
                write!(f, "trainer failure after {epochs} epochs: {message}")
            }
            PodarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PodarError {}

impl From<&str> for PodarError {
    fn from(msg: &str) -> Self {
        PodarError::Other(msg.to_string())
    }
}

impl From<String> for PodarError {
    fn from(msg: String) -> Self {
        PodarError::Other(msg)
    }
}

impl PodarError {
    /// Create a dimension mismatch error with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error.
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for PodarError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, PodarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = PodarError::DimensionMismatch {
            expected: "4 inputs".to_string(),
            actual: "3 inputs".to_string(),
        };
        assert!(err.to_string().contains("dimension mismatch"));
        assert!(err.to_string().contains("4 inputs"));
        assert!(err.to_string().contains("3 inputs"));
    }

    #[test]
    fn test_malformed_rule_display() {
        let err = PodarError::MalformedRule {
            rule: 7,
            reason: "antecedent length 2, expected 4".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("malformed rule 7"));
        assert!(msg.contains("antecedent length 2"));
    }

    #[test]
    fn test_invalid_rule_count_display() {
        let err = PodarError::InvalidRuleCount {
            requested: 0,
            available: 48,
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid rule count 0"));
        assert!(msg.contains("[1, 48]"));
    }

    #[test]
    fn test_trainer_failure_display() {
        let err = PodarError::TrainerFailure {
            epochs: 3,
            message: "loss became non-finite".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("trainer failure after 3 epochs"));
        assert!(msg.contains("non-finite"));
    }

    #[test]
    fn test_from_str() {
        let err: PodarError = "test error".into();
        assert!(matches!(err, PodarError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_from_string() {
        let err: PodarError = "test error".to_string().into();
        assert!(matches!(err, PodarError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = PodarError::dimension_mismatch("features", 4, 2);
        let msg = err.to_string();
        assert!(msg.contains("features=4"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn test_empty_input_helper() {
        let err = PodarError::empty_input("firing strength matrix");
        let msg = err.to_string();
        assert!(msg.contains("empty input"));
        assert!(msg.contains("firing strength matrix"));
    }

    #[test]
    fn test_error_eq_str() {
        let err = PodarError::Other("test error".to_string());
        assert!(err == "test error");
    }

    #[test]
    fn test_error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PodarError>();
    }
}
