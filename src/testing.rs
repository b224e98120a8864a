//! Testing functions and utilities useful for benchmarking, debugging and
//! smoke testing.
//!
//! [`Sphere`] and [`Rosenbrock`] are recommended for first tests. [`Noisy`]
//! wraps any test function with Gaussian observation noise.
//!
//! # References
//!
//! \[1\] [A Literature Survey of Benchmark Functions For Global Optimization
//! Problems](https://arxiv.org/abs/1308.4008)

#![allow(unused)]

use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use thiserror::Error;

use crate::core::{AskTell, AskTellError, Bounds, Value};

/// Function with known optimum that is useful for testing optimizers.
///
/// Test functions are defined on continuous coordinates. Use [`objective`] to
/// adapt a test function to the [`Objective`](crate::Objective)
/// interface.
pub trait TestFunction {
    /// Dimension of the function.
    fn dim(&self) -> usize;

    /// Standard search space for the function.
    fn bounds(&self) -> Bounds;

    /// Evaluates the function.
    fn eval(&mut self, x: &[f64]) -> f64;

    /// A set of global optima (if known and finite).
    fn optima(&self) -> Vec<Vec<f64>> {
        Vec::new()
    }

    /// Value of the global optimum.
    fn optimum_value(&self) -> f64 {
        0.0
    }

    /// Tests if given point is a global optimum, given the tolerance `eps` on
    /// the function value.
    fn is_optimum(&mut self, x: &[f64], eps: f64) -> bool {
        self.eval(x) - self.optimum_value() <= eps
    }
}

/// [Rosenbrock function](https://en.wikipedia.org/wiki/Rosenbrock_function)
/// \[1\] (also known as Rosenbrock's valley or banana function).
///
/// The global minimum is inside a long, narrow, parabolic shaped flat valley.
/// The challenge is to find the solution inside the valley.
#[derive(Debug, Clone, Copy)]
pub struct Rosenbrock {
    n: usize,
    a: f64,
    b: f64,
}

impl Rosenbrock {
    /// Initializes the function with given dimension.
    pub fn new(n: usize) -> Self {
        Self::with_params(n, 1.0, 100.0)
    }

    /// Initializes the function with given dimension and parameters `a` and
    /// `b` in `(a - x_i)^2 + b (x_(i+1) - x_i^2)^2`.
    pub fn with_params(n: usize, a: f64, b: f64) -> Self {
        assert!(n >= 2, "n must be at least 2");
        Self { n, a, b }
    }
}

impl Default for Rosenbrock {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TestFunction for Rosenbrock {
    fn dim(&self) -> usize {
        self.n
    }

    fn bounds(&self) -> Bounds {
        Bounds::continuous(self.n, -5.0, 5.0).expect("valid bounds")
    }

    fn eval(&mut self, x: &[f64]) -> f64 {
        x.windows(2)
            .map(|w| (self.a - w[0]).powi(2) + self.b * (w[1] - w[0].powi(2)).powi(2))
            .sum()
    }

    fn optima(&self) -> Vec<Vec<f64>> {
        // For a = 1 and large enough b, the only minimum is (1, ..., 1). In
        // general, x_i = a^(2^i).
        let mut x = vec![self.a; self.n];
        for i in 1..self.n {
            x[i] = x[i - 1].powi(2);
        }
        vec![x]
    }
}

/// This is a simple paraboloid which can be used in early development and
/// debugging.
///
/// The optimum is at the origin unless shifted by
/// [`Sphere::with_optimum`].
#[derive(Debug, Clone)]
pub struct Sphere {
    optimum: Vec<f64>,
}

impl Sphere {
    /// Initializes the function with given dimension.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "n must be greater than zero");
        Self {
            optimum: vec![0.0; n],
        }
    }

    /// Initializes the function with the optimum at given point.
    pub fn with_optimum(optimum: Vec<f64>) -> Self {
        assert!(!optimum.is_empty(), "optimum must not be empty");
        Self { optimum }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TestFunction for Sphere {
    fn dim(&self) -> usize {
        self.optimum.len()
    }

    fn bounds(&self) -> Bounds {
        Bounds::continuous(self.dim(), -5.0, 5.0).expect("valid bounds")
    }

    fn eval(&mut self, x: &[f64]) -> f64 {
        x.iter()
            .zip(self.optimum.iter())
            .map(|(xi, oi)| (xi - oi).powi(2))
            .sum()
    }

    fn optima(&self) -> Vec<Vec<f64>> {
        vec![self.optimum.clone()]
    }
}

/// Test function with additive Gaussian noise of given standard deviation.
#[derive(Debug, Clone)]
pub struct Noisy<T> {
    inner: T,
    noise: Normal<f64>,
    rng: StdRng,
}

impl<T: TestFunction> Noisy<T> {
    /// Wraps the function. The noise is reproducible for the same seed.
    pub fn new(inner: T, std_dev: f64, seed: u64) -> Self {
        let noise = Normal::new(0.0, std_dev).expect("valid standard deviation");
        Self {
            inner,
            noise,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Gets the wrapped function.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: TestFunction> TestFunction for Noisy<T> {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn bounds(&self) -> Bounds {
        self.inner.bounds()
    }

    fn eval(&mut self, x: &[f64]) -> f64 {
        self.inner.eval(x) + self.noise.sample(&mut self.rng)
    }

    fn optima(&self) -> Vec<Vec<f64>> {
        self.inner.optima()
    }

    fn optimum_value(&self) -> f64 {
        self.inner.optimum_value()
    }

    fn is_optimum(&mut self, x: &[f64], eps: f64) -> bool {
        self.inner.is_optimum(x, eps)
    }
}

/// Error when evaluating a test function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestingError {
    /// A coordinate has no numeric value.
    #[error("coordinate {0} has no numeric value")]
    NonNumeric(usize),
}

/// Converts a native point into continuous coordinates.
pub fn numeric(point: &[Value]) -> Result<Vec<f64>, TestingError> {
    point
        .iter()
        .enumerate()
        .map(|(i, v)| v.as_f64().ok_or(TestingError::NonNumeric(i)))
        .collect()
}

/// Adapts a test function to the [`Objective`](crate::Objective)
/// interface.
pub fn objective<T: TestFunction>(
    mut f: T,
) -> impl FnMut(&[Value]) -> Result<f64, TestingError> {
    move |point| Ok(f.eval(&numeric(point)?))
}

/// A simple ask-tell loop that can be used in tests. Returns the best value
/// found.
pub fn minimize<A: AskTell, T: TestFunction>(
    optimizer: &mut A,
    f: &mut T,
    max_iters: usize,
) -> Result<f64, AskTellError> {
    let mut best = f64::INFINITY;

    for _ in 0..max_iters {
        let point = optimizer.suggest()?;
        let x = numeric(&point).expect("numeric bounds");
        let value = f.eval(&x);
        optimizer.observe(&point, value)?;

        if value < best {
            best = value;
        }
    }

    Ok(best)
}

/// Iterates the optimizer and inspects it after each observation.
pub fn iter<A: AskTell, T: TestFunction, G>(
    optimizer: &mut A,
    f: &mut T,
    iters: usize,
    mut inspect: G,
) -> Result<(), AskTellError>
where
    G: FnMut(&A, &[Value], f64),
{
    for _ in 0..iters {
        let point = optimizer.suggest()?;
        let x = numeric(&point).expect("numeric bounds");
        let value = f.eval(&x);
        optimizer.observe(&point, value)?;
        inspect(optimizer, &point, value);
    }

    Ok(())
}
