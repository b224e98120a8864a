//! Monotone transformations applied to an axis before it is rescaled into
//! normalized space.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Transformation of a continuous (or integer) axis.
///
/// The normalized coordinate of a value `v` on an axis with bounds `[l, u]`
/// is `(t(v) - t(l)) / (t(u) - t(l))` where `t` is the transformation. Using a
/// non-identity transformation makes the optimizer search uniformly in the
/// transformed space, e.g., in orders of magnitude for [`Transform::Log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transform {
    /// No transformation.
    #[default]
    Identity,
    /// Natural logarithm. Requires strictly positive bounds.
    Log,
    /// Logit function `ln(x / (1 - x))`. Requires bounds inside `(0, 1)`.
    Logit,
    /// Symmetric logarithm `sign(x) ln(1 + |x|)`, useful for ranges spanning
    /// several orders of magnitude on both sides of zero.
    BiLog,
}

impl Transform {
    /// Applies the transformation.
    pub fn forward(&self, x: f64) -> f64 {
        match self {
            Transform::Identity => x,
            Transform::Log => x.ln(),
            Transform::Logit => (x / (1.0 - x)).ln(),
            Transform::BiLog => x.signum() * x.abs().ln_1p(),
        }
    }

    /// Applies the inverse transformation.
    pub fn inverse(&self, y: f64) -> f64 {
        match self {
            Transform::Identity => y,
            Transform::Log => y.exp(),
            Transform::Logit => 1.0 / (1.0 + (-y).exp()),
            Transform::BiLog => y.signum() * y.abs().exp_m1(),
        }
    }

    /// Checks that the transformation is defined on the whole `[lower, upper]`
    /// range, returning the reason if it is not.
    pub(crate) fn check_range(&self, lower: f64, upper: f64) -> Result<(), String> {
        match self {
            Transform::Identity | Transform::BiLog => Ok(()),
            Transform::Log if lower <= 0.0 => Err(format!(
                "log transform requires positive bounds, got lower bound {}",
                lower
            )),
            Transform::Logit if lower <= 0.0 || upper >= 1.0 => Err(format!(
                "logit transform requires bounds inside (0, 1), got [{}, {}]",
                lower, upper
            )),
            _ => Ok(()),
        }
    }

    /// Returns the name used by [`FromStr`] and [`Display`](fmt::Display).
    pub fn as_str(&self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::Log => "log",
            Transform::Logit => "logit",
            Transform::BiLog => "bilog",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown transformation name.
#[derive(Debug, Error)]
#[error("unknown transform \"{0}\"")]
pub struct ParseTransformError(String);

impl FromStr for Transform {
    type Err = ParseTransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "linear" | "none" => Ok(Transform::Identity),
            "log" => Ok(Transform::Log),
            "logit" | "logistic" => Ok(Transform::Logit),
            "bilog" => Ok(Transform::BiLog),
            _ => Err(ParseTransformError(s.to_string())),
        }
    }
}
