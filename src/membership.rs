//! Membership functions for fuzzy input variables.
//!
//! A membership function maps a scalar input to a degree in [0, 1].
//! Evaluation is pure and side-effect free, so functions are safe to share
//! across worker threads during batch inference.

use crate::error::{PodarError, Result};
use serde::{Deserialize, Serialize};

/// A fuzzy membership function over one scalar input.
///
/// Immutable once built. Triangular and trapezoidal shapes use the standard
/// piecewise-linear rise/plateau/fall semantics with inclusive boundaries:
/// a value exactly at a breakpoint evaluates to the analytically continuous
/// degree, never a discontinuous jump.
///
/// # Examples
///
/// ```
/// use podar::membership::MembershipFunction;
///
/// let mf = MembershipFunction::triangular(0.0, 0.5, 1.0).unwrap();
/// assert_eq!(mf.evaluate(0.5), 1.0);
/// assert_eq!(mf.evaluate(0.25), 0.5);
/// assert_eq!(mf.evaluate(2.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MembershipFunction {
    /// Triangle with support `[left, right]` and apex at `peak`.
    Triangular {
        /// Left foot (degree 0)
        left: f32,
        /// Apex (degree 1)
        peak: f32,
        /// Right foot (degree 0)
        right: f32,
    },
    /// Trapezoid with support `[a, d]` and plateau `[b, c]`.
    Trapezoidal {
        /// Left foot (degree 0)
        a: f32,
        /// Plateau start (degree 1)
        b: f32,
        /// Plateau end (degree 1)
        c: f32,
        /// Right foot (degree 0)
        d: f32,
    },
    /// Gaussian bell centered at `mean` with width `sigma`.
    Gaussian {
        /// Center (degree 1)
        mean: f32,
        /// Standard deviation, must be positive
        sigma: f32,
    },
}

impl MembershipFunction {
    /// Creates a triangular membership function.
    ///
    /// # Errors
    ///
    /// Returns an error unless `left <= peak <= right`, `left < right`,
    /// and all parameters are finite.
    pub fn triangular(left: f32, peak: f32, right: f32) -> Result<Self> {
        if !(left.is_finite() && peak.is_finite() && right.is_finite()) {
            return Err("triangular parameters must be finite".into());
        }
        if !(left <= peak && peak <= right && left < right) {
            return Err(PodarError::Other(format!(
                "triangular parameters must satisfy left <= peak <= right with left < right, got ({left}, {peak}, {right})"
            )));
        }
        Ok(Self::Triangular { left, peak, right })
    }

    /// Creates a trapezoidal membership function.
    ///
    /// # Errors
    ///
    /// Returns an error unless `a <= b <= c <= d`, `a < d`, and all
    /// parameters are finite.
    pub fn trapezoidal(a: f32, b: f32, c: f32, d: f32) -> Result<Self> {
        if !(a.is_finite() && b.is_finite() && c.is_finite() && d.is_finite()) {
            return Err("trapezoidal parameters must be finite".into());
        }
        if !(a <= b && b <= c && c <= d && a < d) {
            return Err(PodarError::Other(format!(
                "trapezoidal parameters must satisfy a <= b <= c <= d with a < d, got ({a}, {b}, {c}, {d})"
            )));
        }
        Ok(Self::Trapezoidal { a, b, c, d })
    }

    /// Creates a Gaussian membership function.
    ///
    /// # Errors
    ///
    /// Returns an error if `sigma` is not a positive finite value.
    pub fn gaussian(mean: f32, sigma: f32) -> Result<Self> {
        if !mean.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(PodarError::Other(format!(
                "gaussian requires finite mean and sigma > 0, got ({mean}, {sigma})"
            )));
        }
        Ok(Self::Gaussian { mean, sigma })
    }

    /// Returns the shape parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> Vec<f32> {
        match *self {
            Self::Triangular { left, peak, right } => vec![left, peak, right],
            Self::Trapezoidal { a, b, c, d } => vec![a, b, c, d],
            Self::Gaussian { mean, sigma } => vec![mean, sigma],
        }
    }

    /// Builds a function of the same shape with new parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter count is wrong for the shape or
    /// the values violate the shape's ordering constraints, so a tuner can
    /// reject an invalid step and keep the previous parameters.
    pub fn with_params(&self, params: &[f32]) -> Result<Self> {
        match (self, params) {
            (Self::Triangular { .. }, [left, peak, right]) => {
                Self::triangular(*left, *peak, *right)
            }
            (Self::Trapezoidal { .. }, [a, b, c, d]) => Self::trapezoidal(*a, *b, *c, *d),
            (Self::Gaussian { .. }, [mean, sigma]) => Self::gaussian(*mean, *sigma),
            _ => Err(PodarError::dimension_mismatch(
                "shape parameters",
                self.params().len(),
                params.len(),
            )),
        }
    }

    /// Evaluates the membership degree of `x`, always in [0, 1].
    ///
    /// Values outside the support return 0. Non-finite inputs return 0.
    #[must_use]
    pub fn evaluate(&self, x: f32) -> f32 {
        if !x.is_finite() {
            return 0.0;
        }
        match *self {
            Self::Triangular { left, peak, right } => {
                if x <= left || x >= right {
                    // degenerate apex-on-foot shapes keep the apex inclusive
                    if x == peak {
                        1.0
                    } else {
                        0.0
                    }
                } else if x == peak {
                    1.0
                } else if x < peak {
                    (x - left) / (peak - left)
                } else {
                    (right - x) / (right - peak)
                }
            }
            Self::Trapezoidal { a, b, c, d } => {
                if x >= b && x <= c {
                    1.0
                } else if x <= a || x >= d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            Self::Gaussian { mean, sigma } => {
                let z = (x - mean) / sigma;
                (-0.5 * z * z).exp()
            }
        }
    }
}


#[cfg(test)]
#[path = "tests_membership_contract.rs"]
mod tests_membership_contract;
