use std::convert::Infallible;

use super::dimension::Value;

/// The trait for objective functions driven by a
/// [`Runner`](crate::driver::Runner).
///
/// It is implemented for every closure `FnMut(&[Value]) -> Result<f64, E>`.
/// Use [`infallible`] to adapt a closure that cannot fail.
///
/// ```rust
/// use askopt::{infallible, Objective, Value};
///
/// let mut sphere = infallible(|x: &[Value]| {
///     x.iter().filter_map(Value::as_f64).map(|xi| xi * xi).sum()
/// });
///
/// let value = sphere.evaluate(&[Value::Real(3.0), Value::Integer(4)]);
/// assert_eq!(value, Ok(25.0));
/// ```
pub trait Objective {
    /// Error of a failed evaluation.
    type Error;

    /// Evaluates the objective at a point in native units. Lower values are
    /// better.
    fn evaluate(&mut self, point: &[Value]) -> Result<f64, Self::Error>;
}

impl<F, E> Objective for F
where
    F: FnMut(&[Value]) -> Result<f64, E>,
{
    type Error = E;

    fn evaluate(&mut self, point: &[Value]) -> Result<f64, Self::Error> {
        self(point)
    }
}

/// Adapts an objective that cannot fail.
pub fn infallible<F>(mut f: F) -> impl FnMut(&[Value]) -> Result<f64, Infallible>
where
    F: FnMut(&[Value]) -> f64,
{
    move |point| Ok(f(point))
}
