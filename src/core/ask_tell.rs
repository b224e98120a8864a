use std::fmt;

use super::{bounds::Bounds, dimension::Value, error::AskTellError};

/// Protocol state of an ask-tell optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// A new suggestion can be requested.
    Ready,
    /// A suggestion was handed out and its value must be observed first.
    AwaitingObservation,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Ready => f.write_str("ready"),
            State::AwaitingObservation => f.write_str("awaiting observation"),
        }
    }
}

/// Common interface for all ask-tell optimizers.
///
/// The essential methods are [`suggest`](AskTell::suggest) which proposes a
/// candidate point in native units of the [`Bounds`] and
/// [`observe`](AskTell::observe) which reports the objective value of that
/// point back. The two calls must alternate, starting with `suggest`. Calling
/// them out of order is an error that leaves the state untouched.
///
/// ## Implementing an optimizer
///
/// Here is an implementation of a random search (if such a thing can be called
/// an optimizer) which samples the normalized space uniformly and ignores all
/// observations.
///
/// ```rust
/// use askopt::{AskTell, AskTellError, Bounds, State, Value};
/// use rand::Rng;
///
/// struct Random<R> {
///     bounds: Bounds,
///     rng: R,
///     pending: Option<Vec<Value>>,
///     iteration: usize,
/// }
///
/// impl<R: Rng> AskTell for Random<R> {
///     const NAME: &'static str = "Random";
///
///     fn bounds(&self) -> &Bounds {
///         &self.bounds
///     }
///
///     fn iteration(&self) -> usize {
///         self.iteration
///     }
///
///     fn state(&self) -> State {
///         if self.pending.is_some() {
///             State::AwaitingObservation
///         } else {
///             State::Ready
///         }
///     }
///
///     fn suggest(&mut self) -> Result<Vec<Value>, AskTellError> {
///         if self.pending.is_some() {
///             return Err(AskTellError::ProtocolViolation {
///                 operation: "suggest",
///                 state: self.state(),
///             });
///         }
///
///         let u = (0..self.bounds.dim())
///             .map(|_| self.rng.gen::<f64>())
///             .collect::<Vec<_>>();
///         let point = self.bounds.to_native(&u)?;
///         self.pending = Some(point.clone());
///         Ok(point)
///     }
///
///     fn observe(&mut self, _point: &[Value], _value: f64) -> Result<(), AskTellError> {
///         self.pending.take().ok_or(AskTellError::ProtocolViolation {
///             operation: "observe",
///             state: State::Ready,
///         })?;
///         self.iteration += 1;
///         Ok(())
///     }
///
///     fn cancel(&mut self) -> Option<Vec<Value>> {
///         self.pending.take()
///     }
/// }
/// ```
pub trait AskTell {
    /// Name of the optimizer.
    const NAME: &'static str;

    /// Returns the search space the optimizer works in.
    fn bounds(&self) -> &Bounds;

    /// Returns the number of completed observations.
    fn iteration(&self) -> usize;

    /// Returns the protocol state.
    fn state(&self) -> State;

    /// Proposes the next point to evaluate, in native units.
    ///
    /// Fails with [`AskTellError::ProtocolViolation`] if the previous
    /// suggestion was not observed yet.
    fn suggest(&mut self) -> Result<Vec<Value>, AskTellError>;

    /// Reports the objective value of the pending suggestion. Lower values are
    /// better.
    fn observe(&mut self, point: &[Value], value: f64) -> Result<(), AskTellError>;

    /// Drops the pending suggestion, if any, returning it.
    fn cancel(&mut self) -> Option<Vec<Value>>;

    /// Returns whether the search distribution collapsed so that further
    /// suggestions are unlikely to bring any progress.
    fn converged(&self) -> bool {
        false
    }
}
