#![allow(clippy::many_single_char_names)]
#![warn(missing_docs)]

//! # Askopt
//!
//! A pure Rust implementation of ask-tell black-box optimization over mixed
//! search spaces.
//!
//! The library minimizes expensive objective functions of continuous,
//! integer, categorical and boolean parameters without any derivative
//! information. The optimizer never calls the objective itself. Instead, it
//! *suggests* a point and waits until it is *told* the observed value, which
//! gives the user full control over how and where the evaluation happens.
//!
//! ## Algorithms
//!
//! * [Local search](algo::local_search) -- Adaptive Gaussian search with a
//!   forgetting window of recent observations. Recommended as a default.
//!   The initial samples may also come from a uniform or Latin hypercube design.
//!
//! ## Search space
//!
//! Every parameter is described by a [`Dimension`]. Continuous and integer
//! dimensions may be searched in a transformed space (logarithmic, logit or
//! bi-logarithmic), which is useful for parameters spanning several orders of
//! magnitude. The whole search space is [`Bounds`], most conveniently built
//! with the [`BoundsConfig`] builder.
//!
//! ```rust
//! use askopt::{BoundsConfig, Transform};
//!
//! let bounds = BoundsConfig::new()
//!     .add_continuous_with_transform("learning_rate", 1e-5, 1e-1, Transform::Log)
//!     .add_discrete("layers", 1, 8)
//!     .add_categorical("activation", ["relu", "tanh", "gelu"])
//!     .add_boolean("batch_norm")
//!     .build()
//!     .expect("valid bounds");
//!
//! println!("{}", bounds);
//! ```
//!
//! Internally, all optimizers work in the normalized unit hypercube and
//! [`Bounds`] converts between the normalized and the native
//! representations.
//!
//! ## Ask and tell
//!
//! The lowest-level API is the [`AskTell`] trait. Each suggestion must be
//! followed by exactly one observation (or cancelled) before the next
//! suggestion.
//!
//! ```rust
//! use askopt::{algo::LocalSearch, AskTell, Bounds, Value};
//!
//! let bounds = Bounds::continuous(2, -5.0, 5.0).expect("valid bounds");
//! let mut optimizer = LocalSearch::builder(bounds)
//!     .with_seed(3)
//!     .build()
//!     .expect("valid options");
//!
//! for _ in 0..100 {
//!     let point = optimizer.suggest().expect("ready for a suggestion");
//!     let value = point
//!         .iter()
//!         .filter_map(Value::as_f64)
//!         .map(|x| (x - 1.0).powi(2))
//!         .sum::<f64>();
//!     optimizer
//!         .observe(&point, value)
//!         .expect("observation of the last suggestion");
//! }
//!
//! let best = optimizer.best().expect("at least one observation");
//! println!("best value = {}", best.value());
//! ```
//!
//! ## Running
//!
//! When the objective can be called directly, the [`Runner`] drives the loop
//! until a termination condition is met and reports the best point.
//!
//! ```rust
//! use askopt::{algo::LocalSearch, infallible, BoundsConfig, Runner, Value};
//!
//! let bounds = BoundsConfig::new()
//!     .add_continuous("x", -2.0, 2.0)
//!     .add_discrete("n", 0, 10)
//!     .build()
//!     .expect("valid bounds");
//!
//! let optimizer = LocalSearch::new(bounds).expect("valid options");
//! let objective = infallible(|point: &[Value]| {
//!     let x = point[0].as_f64().unwrap_or_default();
//!     let n = point[1].as_i64().unwrap_or_default() as f64;
//!     x * x + (n - 3.0).powi(2)
//! });
//!
//! let mut runner = Runner::builder(optimizer, objective)
//!     .with_max_samples(200)
//!     .with_target(0.0)
//!     .with_target_tol(1e-4)
//!     .build()
//!     .expect("termination condition is set");
//!
//! let report = runner.run().expect("objective never fails");
//! println!(
//!     "{} after {} evaluations: {:?} = {}",
//!     report.termination(),
//!     report.evaluations(),
//!     report.best_point(),
//!     report.best_value()
//! );
//! ```
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
pub mod analysis;
mod core;
pub mod driver;
pub mod history;

pub use core::*;
pub use driver::{Report, RunError, Runner, RunnerBuilder, RunnerOptions, Termination};

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
