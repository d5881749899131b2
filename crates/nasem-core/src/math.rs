//! Checked arithmetic and clamp policies shared by all equations.
//!
//! Equations are pure functions over already-validated input, so an undefined
//! operation (dividing by zero, the root or log of a negative number) means the
//! input data are invalid. The helpers here turn those cases into
//! [`NasemError::Domain`] instead of letting `NaN` or `inf` flow downstream.
//!
//! Some published equations instead bound their result. Those bounds are
//! expressed as a [`ClampPolicy`] declared next to the equation that uses it.

use crate::errors::{NasemError, NasemResult};
use serde::{Deserialize, Serialize};

/// Divide, failing when the denominator is zero.
pub fn checked_div(equation: &str, numerator: f64, denominator: f64) -> NasemResult<f64> {
    if denominator == 0.0 {
        return Err(NasemError::domain(
            equation,
            format!("division by zero (numerator {numerator})"),
        ));
    }
    Ok(numerator / denominator)
}

/// Square root, failing for negative arguments.
pub fn checked_sqrt(equation: &str, value: f64) -> NasemResult<f64> {
    if value < 0.0 {
        return Err(NasemError::domain(
            equation,
            format!("square root of negative value {value}"),
        ));
    }
    Ok(value.sqrt())
}

/// Natural logarithm, failing for non-positive arguments.
pub fn checked_ln(equation: &str, value: f64) -> NasemResult<f64> {
    if value <= 0.0 {
        return Err(NasemError::domain(
            equation,
            format!("logarithm of non-positive value {value}"),
        ));
    }
    Ok(value.ln())
}

/// Real power, failing where the result would be complex or infinite.
pub fn checked_powf(equation: &str, base: f64, exponent: f64) -> NasemResult<f64> {
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(NasemError::domain(
            equation,
            format!("non-integer power {exponent} of negative value {base}"),
        ));
    }
    if base == 0.0 && exponent < 0.0 {
        return Err(NasemError::domain(
            equation,
            format!("negative power {exponent} of zero"),
        ));
    }
    Ok(base.powf(exponent))
}

/// Divide, returning zero when the denominator is zero.
///
/// Only for ratios whose published definition is zero in that case, such as
/// component shares of a zero milk yield.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// A documented bound applied to an equation result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClampPolicy {
    /// Values below the floor are raised to it. `NaN` becomes the floor.
    Floor(f64),
    /// Values above the ceiling are lowered to it. `NaN` is left unchanged.
    Ceiling(f64),
    /// Values are bounded to `[min, max]`. `NaN` becomes `min`.
    Range { min: f64, max: f64 },
    /// Non-finite values become zero.
    ZeroDefault,
}

impl ClampPolicy {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            ClampPolicy::Floor(min) => {
                if value.is_nan() {
                    min
                } else {
                    value.max(min)
                }
            }
            ClampPolicy::Ceiling(max) => {
                if value.is_nan() {
                    value
                } else {
                    value.min(max)
                }
            }
            ClampPolicy::Range { min, max } => {
                if value.is_nan() {
                    min
                } else {
                    num::clamp(value, min, max)
                }
            }
            ClampPolicy::ZeroDefault => {
                if value.is_finite() {
                    value
                } else {
                    0.0
                }
            }
        }
    }

    /// Apply the policy to an optional value. A missing value behaves like `NaN`.
    pub fn apply_opt(&self, value: Option<f64>) -> f64 {
        self.apply(value.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_div() {
        assert_eq!(checked_div("x", 1.0, 4.0).unwrap(), 0.25);
        assert!(matches!(
            checked_div("Rum_dcNDF", 1.0, 0.0),
            Err(NasemError::Domain { equation, .. }) if equation == "Rum_dcNDF"
        ));
    }

    #[test]
    fn test_checked_roots_and_logs() {
        assert_eq!(checked_sqrt("x", 9.0).unwrap(), 3.0);
        assert!(checked_sqrt("x", -1.0).is_err());
        assert!(checked_ln("x", 0.0).is_err());
        assert!(checked_powf("x", -2.0, 0.5).is_err());
        assert!(checked_powf("x", 0.0, -1.0).is_err());
        assert_eq!(checked_powf("x", -2.0, 2.0).unwrap(), 4.0);
    }

    #[test]
    fn test_ratio_or_zero() {
        assert_eq!(ratio_or_zero(3.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(3.0, 2.0), 1.5);
    }

    #[test]
    fn test_floor() {
        let policy = ClampPolicy::Floor(0.1);
        assert_eq!(policy.apply(-5.0), 0.1);
        assert_eq!(policy.apply(0.1), 0.1);
        assert_eq!(policy.apply(42.0), 42.0);
        assert_eq!(policy.apply(f64::NAN), 0.1);
        assert_eq!(policy.apply_opt(None), 0.1);
    }

    #[test]
    fn test_range() {
        let policy = ClampPolicy::Range {
            min: 0.1,
            max: 100.0,
        };
        assert_eq!(policy.apply(120.0), 100.0);
        assert_eq!(policy.apply(-3.0), 0.1);
        assert_eq!(policy.apply(55.0), 55.0);
        assert_eq!(policy.apply(f64::NAN), 0.1);
    }

    #[test]
    fn test_ceiling_and_zero_default() {
        assert_eq!(ClampPolicy::Ceiling(375.0).apply(400.0), 375.0);
        assert_eq!(ClampPolicy::Ceiling(375.0).apply(100.0), 100.0);
        assert_eq!(ClampPolicy::ZeroDefault.apply(f64::INFINITY), 0.0);
        assert_eq!(ClampPolicy::ZeroDefault.apply(f64::NAN), 0.0);
        assert_eq!(ClampPolicy::ZeroDefault.apply(2.5), 2.5);
    }
}
