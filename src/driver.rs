//! High-level API for running the ask-tell loop.
//!
//! This module contains the [`Runner`] that owns an optimizer and an
//! objective, drives the suggest, evaluate and observe cycle and stops when
//! one of the configured conditions is met.
//!
//! The runner requires at least one termination condition:
//!
//! ```rust
//! use askopt::{algo::LocalSearch, infallible, Bounds, Runner, Termination, Value};
//!
//! let bounds = Bounds::continuous(2, -5.0, 5.0).expect("valid bounds");
//! let optimizer = LocalSearch::builder(bounds)
//!     .with_seed(7)
//!     .build()
//!     .expect("valid options");
//!
//! let sphere = infallible(|x: &[Value]| {
//!     x.iter().filter_map(Value::as_f64).map(|xi| xi * xi).sum()
//! });
//!
//! let mut runner = Runner::builder(optimizer, sphere)
//!     .with_max_samples(200)
//!     .with_target(1e-6)
//!     .build()
//!     .expect("termination condition is set");
//!
//! let report = runner.run().expect("no error");
//! assert!(matches!(
//!     report.termination(),
//!     Termination::MaxSamples | Termination::TargetValue
//! ));
//! println!("best value {} at {:?}", report.best_value(), report.best_point());
//! ```
//!
//! If you need more control over the process, you can do the cycles
//! manually:
//!
//! ```rust
//! # use askopt::{algo::LocalSearch, infallible, Bounds, Runner, Value};
//! #
//! # let bounds = Bounds::continuous(2, -5.0, 5.0).expect("valid bounds");
//! # let optimizer = LocalSearch::new(bounds).expect("valid options");
//! # let sphere = infallible(|x: &[Value]| {
//! #     x.iter().filter_map(Value::as_f64).map(|xi| xi * xi).sum()
//! # });
//! # let mut runner = Runner::builder(optimizer, sphere)
//! #     .with_max_samples(10)
//! #     .build()
//! #     .expect("termination condition is set");
//! loop {
//!     let (point, value) = runner.next().expect("no error");
//!     // ...
//! #   break;
//! }
//! ```

use std::{
    error::Error as StdError,
    fmt,
    time::{Duration, Instant},
};

use getset::{CopyGetters, Getters, Setters};
use log::info;
use thiserror::Error;

use crate::core::{AskTell, AskTellError, Objective, Value};

/// Options for [`Runner`].
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct RunnerOptions {
    /// Stop once the optimizer has observed this many samples. Default: not
    /// set.
    max_samples: Option<usize>,
    /// Stop once the best value is at most `target_val + target_tol`.
    /// Default: not set.
    target_val: Option<f64>,
    /// Tolerance for the target value. Default: `0`.
    target_tol: f64,
    /// Stop once the run takes longer than this. Default: not set.
    max_time: Option<Duration>,
    /// Log progress every this many evaluations, `0` disables it. Default:
    /// `0`.
    print_interval: usize,
    /// Stop once the optimizer reports convergence. Default: `false`.
    stop_on_convergence: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            max_samples: None,
            target_val: None,
            target_tol: 0.0,
            max_time: None,
            print_interval: 0,
            stop_on_convergence: false,
        }
    }
}

impl RunnerOptions {
    fn has_termination(&self) -> bool {
        self.max_samples.is_some()
            || self.target_val.is_some()
            || self.max_time.is_some()
            || self.stop_on_convergence
    }
}

/// Condition that ended a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The maximum number of samples was reached.
    MaxSamples,
    /// The target value was reached.
    TargetValue,
    /// The time budget was exhausted.
    MaxTime,
    /// The optimizer converged.
    Converged,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Termination::MaxSamples => "maximum number of samples reached",
            Termination::TargetValue => "target value reached",
            Termination::MaxTime => "time budget exhausted",
            Termination::Converged => "optimizer converged",
        };
        f.write_str(reason)
    }
}

/// Outcome of [`Runner::run`].
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Report {
    /// Best point found so far, in native units.
    #[getset(get = "pub")]
    best_point: Vec<Value>,
    /// Objective value of the best point. Infinity if no finite value was
    /// observed.
    #[getset(get_copy = "pub")]
    best_value: f64,
    /// Number of evaluations performed in the run.
    #[getset(get_copy = "pub")]
    evaluations: usize,
    /// Wall-clock duration of the run.
    #[getset(get_copy = "pub")]
    elapsed: Duration,
    /// The condition that ended the run.
    #[getset(get_copy = "pub")]
    termination: Termination,
}

/// Error returned from the [`Runner`].
#[derive(Debug, Error)]
pub enum RunError<E: StdError + 'static> {
    /// None of the termination conditions is set.
    #[error("no termination condition is set")]
    NoTerminationCondition,
    /// The objective failed to evaluate a point.
    #[error("objective evaluation failed: {0}")]
    Objective(#[source] E),
    /// Error of the optimizer.
    #[error("{0}")]
    AskTell(#[from] AskTellError),
}

/// Builder for the [`Runner`].
pub struct RunnerBuilder<A, O> {
    optimizer: A,
    objective: O,
    options: RunnerOptions,
}

impl<A, O> RunnerBuilder<A, O>
where
    A: AskTell,
    O: Objective,
    O::Error: StdError + 'static,
{
    /// Sets all options at once.
    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    /// Stops the run once the optimizer has observed `max_samples` samples.
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.options.set_max_samples(Some(max_samples));
        self
    }

    /// Stops the run once the best value reaches `target_val`.
    pub fn with_target(mut self, target_val: f64) -> Self {
        self.options.set_target_val(Some(target_val));
        self
    }

    /// Sets the tolerance for the target value.
    pub fn with_target_tol(mut self, target_tol: f64) -> Self {
        self.options.set_target_tol(target_tol);
        self
    }

    /// Stops the run once it takes longer than `max_time`.
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.options.set_max_time(Some(max_time));
        self
    }

    /// Logs progress every `print_interval` evaluations.
    pub fn with_print_interval(mut self, print_interval: usize) -> Self {
        self.options.set_print_interval(print_interval);
        self
    }

    /// Stops the run once the optimizer reports convergence.
    pub fn with_stop_on_convergence(mut self, stop: bool) -> Self {
        self.options.set_stop_on_convergence(stop);
        self
    }

    /// Builds the [`Runner`].
    pub fn build(self) -> Result<Runner<A, O>, RunError<O::Error>> {
        if !self.options.has_termination() {
            return Err(RunError::NoTerminationCondition);
        }

        Ok(Runner {
            optimizer: self.optimizer,
            objective: self.objective,
            options: self.options,
            best_point: None,
            best_value: f64::INFINITY,
            evaluations: 0,
        })
    }
}

/// The driver for the ask-tell process.
///
/// Use [`Runner::builder`] to create one. For the usage of the runner, see
/// [module](self) documentation.
pub struct Runner<A, O> {
    optimizer: A,
    objective: O,
    options: RunnerOptions,
    best_point: Option<Vec<Value>>,
    best_value: f64,
    evaluations: usize,
}

impl<A, O> Runner<A, O>
where
    A: AskTell,
    O: Objective,
    O::Error: StdError + 'static,
{
    /// Returns the builder for specifying termination conditions and other
    /// settings.
    pub fn builder(optimizer: A, objective: O) -> RunnerBuilder<A, O> {
        RunnerBuilder {
            optimizer,
            objective,
            options: RunnerOptions::default(),
        }
    }

    /// Does one suggest, evaluate and observe cycle, returning the evaluated
    /// point and its value.
    ///
    /// If the objective fails, the suggestion is cancelled and the optimizer
    /// stays usable.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(Vec<Value>, f64), RunError<O::Error>> {
        let point = self.optimizer.suggest()?;

        let value = match self.objective.evaluate(&point) {
            Ok(value) => value,
            Err(error) => {
                self.optimizer.cancel();
                return Err(RunError::Objective(error));
            }
        };

        self.optimizer.observe(&point, value)?;
        self.evaluations += 1;

        let score = nan_to_inf(value);
        if self.best_point.is_none() || score < self.best_value {
            self.best_value = score;
            self.best_point = Some(point.clone());
        }

        let interval = self.options.print_interval;
        if interval > 0 && self.evaluations % interval == 0 {
            info!(
                "{}: evaluations = {}, value = {}, best = {}",
                A::NAME,
                self.evaluations,
                value,
                self.best_value
            );
        }

        Ok((point, value))
    }

    /// Runs the process until one of the termination conditions is met.
    ///
    /// If the sample budget is already exhausted, no evaluation is done.
    /// Otherwise at least one cycle is done before the other conditions are
    /// checked.
    pub fn run(&mut self) -> Result<Report, RunError<O::Error>> {
        let start = Instant::now();
        let evaluations = self.evaluations;

        let termination = match self.check_samples() {
            Some(termination) => termination,
            None => loop {
                self.next()?;

                if let Some(termination) = self.check(start) {
                    break termination;
                }
            },
        };

        info!(
            "{} terminated after {} evaluations: {}, best = {}",
            A::NAME,
            self.evaluations - evaluations,
            termination,
            self.best_value
        );

        Ok(Report {
            best_point: self.best_point.clone().unwrap_or_default(),
            best_value: self.best_value,
            evaluations: self.evaluations - evaluations,
            elapsed: start.elapsed(),
            termination,
        })
    }

    fn check_samples(&self) -> Option<Termination> {
        match self.options.max_samples {
            Some(max_samples) if self.optimizer.iteration() >= max_samples => {
                Some(Termination::MaxSamples)
            }
            _ => None,
        }
    }

    fn check(&self, start: Instant) -> Option<Termination> {
        let options = &self.options;

        if let Some(termination) = self.check_samples() {
            return Some(termination);
        }

        if let Some(target_val) = options.target_val {
            if self.best_value <= target_val + options.target_tol {
                return Some(Termination::TargetValue);
            }
        }

        if let Some(max_time) = options.max_time {
            if start.elapsed() >= max_time {
                return Some(Termination::MaxTime);
            }
        }

        if options.stop_on_convergence && self.optimizer.converged() {
            return Some(Termination::Converged);
        }

        None
    }
}

impl<A: AskTell, O> Runner<A, O> {
    /// Returns the best point found so far.
    pub fn best_point(&self) -> Option<&[Value]> {
        self.best_point.as_deref()
    }

    /// Returns the best value found so far, infinity if there is none.
    pub fn best_value(&self) -> f64 {
        self.best_value
    }

    /// Returns the number of evaluations done by the runner.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Returns the optimizer.
    pub fn optimizer(&self) -> &A {
        &self.optimizer
    }

    /// Returns the options.
    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Returns the name of the used optimizer.
    pub fn name(&self) -> &str {
        A::NAME
    }

    /// Consumes the runner, returning the optimizer and the objective.
    pub fn into_parts(self) -> (A, O) {
        (self.optimizer, self.objective)
    }
}

fn nan_to_inf(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        // Not finite also covers NaN and negative infinity.
        f64::INFINITY
    }
}
