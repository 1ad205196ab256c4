//! Objective functions.
//!
//! The engine minimizes an [`Objective`] over 3-dimensional real points.
//! [`Variant1`] is the log-transformed quartic bowl the optimizer was built
//! for; [`FnObjective`] adapts a plain closure.

use crate::error::DomainError;

/// A point in the search space.
pub type Point = [f64; 3];

/// Smallest admissible argument to the logarithm in [`Variant1`].
pub const DOMAIN_EPSILON: f64 = 1e-300;

/// A pure, deterministic function to minimize.
///
/// Returning `Err` aborts the run; the engine never clamps or resamples.
pub trait Objective: Send + Sync {
    /// Evaluates the objective at `x`. Lower is better.
    fn evaluate(&self, x: &Point) -> Result<f64, DomainError>;
}

impl<O: Objective + ?Sized> Objective for &O {
    fn evaluate(&self, x: &Point) -> Result<f64, DomainError> {
        (**self).evaluate(x)
    }
}

impl<O: Objective + ?Sized> Objective for Box<O> {
    fn evaluate(&self, x: &Point) -> Result<f64, DomainError> {
        (**self).evaluate(x)
    }
}

/// `ln(0.4(x1-0.9)^4 + 0.4(x2-0.6)^4 + 0.6(x3-0.9)^4 + 4)`.
///
/// Global minimum `ln 4` at [`Variant1::MINIMIZER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Variant1;

impl Variant1 {
    /// Location of the global minimum.
    pub const MINIMIZER: Point = [0.9, 0.6, 0.9];

    /// The quartic expression under the logarithm.
    pub fn inner(x: &Point) -> f64 {
        0.4 * (x[0] - 0.9).powi(4) + 0.4 * (x[1] - 0.6).powi(4) + 0.6 * (x[2] - 0.9).powi(4) + 4.0
    }
}

impl Objective for Variant1 {
    fn evaluate(&self, x: &Point) -> Result<f64, DomainError> {
        let inner = Self::inner(x);
        if !inner.is_finite() {
            return Err(DomainError::new(*x, format!("quartic term is not finite ({inner})")));
        }
        if inner < DOMAIN_EPSILON {
            return Err(DomainError::new(
                *x,
                format!("logarithm argument {inner} below {DOMAIN_EPSILON}"),
            ));
        }
        Ok(inner.ln())
    }
}

/// Wraps a closure as an [`Objective`].
///
/// Non-finite closure results are reported as [`DomainError`].
///
/// ```
/// use u_anneal::objective::{FnObjective, Objective};
///
/// let sphere = FnObjective::new(|x: &[f64; 3]| x.iter().map(|v| v * v).sum());
/// assert_eq!(sphere.evaluate(&[1.0, 2.0, 2.0]).unwrap(), 9.0);
/// ```
#[derive(Clone)]
pub struct FnObjective<F> {
    f: F,
}

impl<F> FnObjective<F>
where
    F: Fn(&Point) -> f64 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&Point) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: &Point) -> Result<f64, DomainError> {
        let value = (self.f)(x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DomainError::new(*x, format!("objective returned {value}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant1_minimum() {
        let value = Variant1.evaluate(&Variant1::MINIMIZER).unwrap();
        assert!((value - 4.0f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn test_variant1_known_value() {
        // inner = 0.4 * 0.1^4 + 0.4 * 0.4^4 + 0.6 * 0.1^4 + 4
        let x = [1.0, 1.0, 1.0];
        let expected = (0.4 * 1e-4 + 0.4 * 0.0256 + 0.6 * 1e-4 + 4.0f64).ln();
        assert!((Variant1.evaluate(&x).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_variant1_grows_away_from_minimum() {
        let near = Variant1.evaluate(&[1.0, 0.7, 1.0]).unwrap();
        let far = Variant1.evaluate(&[5.0, -3.0, 4.0]).unwrap();
        assert!(far > near);
    }

    #[test]
    fn test_variant1_overflow_is_domain_error() {
        let err = Variant1.evaluate(&[1e100, 0.0, 0.0]).unwrap_err();
        assert!(err.reason.contains("not finite"), "{}", err.reason);
    }

    #[test]
    fn test_variant1_nan_is_domain_error() {
        assert!(Variant1.evaluate(&[f64::NAN, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_fn_objective_rejects_nan() {
        let f = FnObjective::new(|_: &Point| f64::NAN);
        assert!(f.evaluate(&[0.0; 3]).is_err());
    }

    #[test]
    fn test_objective_through_reference() {
        let boxed: Box<dyn Objective> = Box::new(Variant1);
        let by_ref = &boxed;
        assert_eq!(
            by_ref.evaluate(&[0.0; 3]).unwrap(),
            Variant1.evaluate(&[0.0; 3]).unwrap()
        );
    }
}
