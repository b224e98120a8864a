//! A single axis of the search space and its mapping to normalized space.

use std::fmt;

use super::{error::BoundsError, transform::Transform};

/// Native value of a single coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Value of a continuous dimension.
    Real(f64),
    /// Value of a discrete dimension.
    Integer(i64),
    /// Label of a categorical dimension.
    Category(String),
    /// Value of a boolean dimension.
    Boolean(bool),
}

impl Value {
    /// Returns the numeric view of the value. Booleans map to `0` and `1`,
    /// categories have no numeric view.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(x) => Some(*x),
            Value::Integer(k) => Some(*k as f64),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Category(_) => None,
        }
    }

    /// Returns the integer if the value is [`Value::Integer`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(k) => Some(*k),
            _ => None,
        }
    }

    /// Returns the label if the value is [`Value::Category`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Category(label) => Some(label),
            _ => None,
        }
    }

    /// Returns the flag if the value is [`Value::Boolean`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Real(_) => "real",
            Value::Integer(_) => "integer",
            Value::Category(_) => "category",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(x) => write!(f, "{}", x),
            Value::Integer(k) => write!(f, "{}", k),
            Value::Category(label) => f.write_str(label),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<i64> for Value {
    fn from(k: i64) -> Self {
        Value::Integer(k)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(label: &str) -> Self {
        Value::Category(label.to_string())
    }
}

impl From<String> for Value {
    fn from(label: String) -> Self {
        Value::Category(label)
    }
}

/// Kind of a dimension together with its domain.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionKind {
    /// Real values in `[lower, upper]`.
    Continuous {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
        /// Transformation applied before rescaling.
        transform: Transform,
    },
    /// Integers in `[lower, upper]`.
    Discrete {
        /// Lower bound.
        lower: i64,
        /// Upper bound.
        upper: i64,
        /// Transformation applied before rescaling. Logit is not supported.
        transform: Transform,
    },
    /// One of an ordered set of unique labels.
    Categorical {
        /// The labels.
        categories: Vec<String>,
    },
    /// `false` or `true`.
    Boolean,
}

/// A named axis of the search space.
///
/// Every dimension maps its native values to the unit interval and back. The
/// mapping is a round trip: `from_normalized(to_normalized(v)) == v` for every
/// valid native value `v` (up to floating point precision for continuous
/// dimensions).
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    name: String,
    kind: DimensionKind,
}

impl Dimension {
    /// Creates a dimension, checking all invariants of its kind.
    pub fn new(name: impl Into<String>, kind: DimensionKind) -> Result<Self, BoundsError> {
        let dim = Self {
            name: name.into(),
            kind,
        };
        dim.validate()?;
        Ok(dim)
    }

    /// Creates a continuous dimension without transformation.
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Result<Self, BoundsError> {
        Self::continuous_with_transform(name, lower, upper, Transform::Identity)
    }

    /// Creates a continuous dimension with given transformation.
    pub fn continuous_with_transform(
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        transform: Transform,
    ) -> Result<Self, BoundsError> {
        Self::new(
            name,
            DimensionKind::Continuous {
                lower,
                upper,
                transform,
            },
        )
    }

    /// Creates a discrete dimension without transformation.
    pub fn discrete(name: impl Into<String>, lower: i64, upper: i64) -> Result<Self, BoundsError> {
        Self::discrete_with_transform(name, lower, upper, Transform::Identity)
    }

    /// Creates a discrete dimension with given transformation.
    pub fn discrete_with_transform(
        name: impl Into<String>,
        lower: i64,
        upper: i64,
        transform: Transform,
    ) -> Result<Self, BoundsError> {
        Self::new(
            name,
            DimensionKind::Discrete {
                lower,
                upper,
                transform,
            },
        )
    }

    /// Creates a categorical dimension.
    pub fn categorical<I, S>(name: impl Into<String>, categories: I) -> Result<Self, BoundsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            DimensionKind::Categorical {
                categories: categories.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Creates a boolean dimension.
    pub fn boolean(name: impl Into<String>) -> Result<Self, BoundsError> {
        Self::new(name, DimensionKind::Boolean)
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind.
    pub fn kind(&self) -> &DimensionKind {
        &self.kind
    }

    fn validate(&self) -> Result<(), BoundsError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }

        match &self.kind {
            DimensionKind::Continuous {
                lower,
                upper,
                transform,
            } => {
                if !lower.is_finite() || !upper.is_finite() {
                    return Err(self.invalid(format!("bounds [{}, {}] must be finite", lower, upper)));
                }
                if lower >= upper {
                    return Err(self.invalid(format!(
                        "lower bound {} must be less than upper bound {}",
                        lower, upper
                    )));
                }
                transform
                    .check_range(*lower, *upper)
                    .map_err(|reason| self.invalid(reason))?;
                self.check_span(*transform, *lower, *upper)
            }
            DimensionKind::Discrete {
                lower,
                upper,
                transform,
            } => {
                if lower >= upper {
                    return Err(self.invalid(format!(
                        "lower bound {} must be less than upper bound {}",
                        lower, upper
                    )));
                }
                if *transform == Transform::Logit {
                    return Err(self.invalid("logit transform is not supported for discrete dimension"));
                }
                transform
                    .check_range(*lower as f64, *upper as f64)
                    .map_err(|reason| self.invalid(reason))?;
                self.check_span(*transform, *lower as f64, *upper as f64)
            }
            DimensionKind::Categorical { categories } => {
                if categories.len() < 2 {
                    return Err(self.invalid(format!(
                        "at least 2 categories are required, got {}",
                        categories.len()
                    )));
                }
                for (i, category) in categories.iter().enumerate() {
                    if category.is_empty() {
                        return Err(self.invalid("category labels must not be empty"));
                    }
                    if categories[..i].contains(category) {
                        return Err(self.invalid(format!("duplicate category \"{}\"", category)));
                    }
                }
                Ok(())
            }
            DimensionKind::Boolean => Ok(()),
        }
    }

    // The width in transformed space must be representable, otherwise the
    // normalized coordinate degenerates to the endpoints or NaN.
    fn check_span(&self, transform: Transform, lower: f64, upper: f64) -> Result<(), BoundsError> {
        let span = transform.forward(upper) - transform.forward(lower);
        if span.is_finite() && span > 0.0 {
            Ok(())
        } else {
            Err(self.invalid(format!(
                "range [{}, {}] is too wide to be represented",
                lower, upper
            )))
        }
    }

    /// Maps a native value into `[0, 1]`.
    pub fn to_normalized(&self, value: &Value) -> Result<f64, BoundsError> {
        match (&self.kind, value) {
            (
                DimensionKind::Continuous {
                    lower,
                    upper,
                    transform,
                },
                Value::Real(x),
            ) => {
                if !(lower <= x && x <= upper) {
                    return Err(self.invalid_value(format!(
                        "{} is outside of [{}, {}]",
                        x, lower, upper
                    )));
                }
                Ok(rescale(*transform, *lower, *upper, *x))
            }
            (
                DimensionKind::Discrete {
                    lower,
                    upper,
                    transform,
                },
                Value::Integer(k),
            ) => {
                if k < lower || k > upper {
                    return Err(self.invalid_value(format!(
                        "{} is outside of [{}, {}]",
                        k, lower, upper
                    )));
                }
                Ok(rescale(*transform, *lower as f64, *upper as f64, *k as f64))
            }
            (DimensionKind::Categorical { categories }, Value::Category(label)) => {
                let index = categories
                    .iter()
                    .position(|category| category == label)
                    .ok_or_else(|| self.invalid_value(format!("unknown category \"{}\"", label)))?;
                Ok(bucket_midpoint(index, categories.len()))
            }
            (DimensionKind::Boolean, Value::Boolean(b)) => Ok(bucket_midpoint(*b as usize, 2)),
            (_, value) => Err(self.invalid_value(format!(
                "{} value given to {} dimension",
                value.type_name(),
                self.kind_name()
            ))),
        }
    }

    /// Maps a normalized coordinate back to the native value. Coordinates
    /// outside of `[0, 1]` are clamped first.
    pub fn from_normalized(&self, u: f64) -> Value {
        let u = u.clamp(0.0, 1.0);

        match &self.kind {
            DimensionKind::Continuous {
                lower,
                upper,
                transform,
            } => Value::Real(unscale(*transform, *lower, *upper, u).clamp(*lower, *upper)),
            DimensionKind::Discrete {
                lower,
                upper,
                transform,
            } => {
                let x = unscale(*transform, *lower as f64, *upper as f64, u);
                let k = round_half_even(x).clamp(*lower as f64, *upper as f64);
                Value::Integer(k as i64)
            }
            DimensionKind::Categorical { categories } => {
                Value::Category(categories[bucket(u, categories.len())].clone())
            }
            DimensionKind::Boolean => Value::Boolean(bucket(u, 2) == 1),
        }
    }

    /// Checks whether the native value belongs to the dimension.
    pub fn contains(&self, value: &Value) -> bool {
        self.to_normalized(value).is_ok()
    }

    /// Smallest distance in normalized space between two distinct native
    /// values. Zero for continuous dimensions.
    pub fn resolution(&self) -> f64 {
        match &self.kind {
            DimensionKind::Continuous { .. } => 0.0,
            DimensionKind::Discrete {
                lower,
                upper,
                transform,
            } => {
                let (l, u) = (*lower as f64, *upper as f64);
                let span = transform.forward(u) - transform.forward(l);
                let first = transform.forward(l + 1.0) - transform.forward(l);
                let last = transform.forward(u) - transform.forward(u - 1.0);
                first.min(last) / span
            }
            DimensionKind::Categorical { categories } => 1.0 / categories.len() as f64,
            DimensionKind::Boolean => 0.5,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            DimensionKind::Continuous { .. } => "continuous",
            DimensionKind::Discrete { .. } => "discrete",
            DimensionKind::Categorical { .. } => "categorical",
            DimensionKind::Boolean => "boolean",
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> BoundsError {
        BoundsError::InvalidDimension {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn invalid_value(&self, reason: impl Into<String>) -> BoundsError {
        BoundsError::InvalidValue {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind_name())?;

        match &self.kind {
            DimensionKind::Continuous {
                lower,
                upper,
                transform,
            } => {
                write!(f, " [{}, {}]", lower, upper)?;
                if *transform != Transform::Identity {
                    write!(f, " ({})", transform)?;
                }
            }
            DimensionKind::Discrete {
                lower,
                upper,
                transform,
            } => {
                write!(f, " [{}, {}]", lower, upper)?;
                if *transform != Transform::Identity {
                    write!(f, " ({})", transform)?;
                }
            }
            DimensionKind::Categorical { categories } => {
                write!(f, " {{{}}}", categories.join(", "))?;
            }
            DimensionKind::Boolean => {}
        }

        Ok(())
    }
}

fn rescale(transform: Transform, lower: f64, upper: f64, x: f64) -> f64 {
    let a = transform.forward(lower);
    let b = transform.forward(upper);
    ((transform.forward(x) - a) / (b - a)).clamp(0.0, 1.0)
}

fn unscale(transform: Transform, lower: f64, upper: f64, u: f64) -> f64 {
    let a = transform.forward(lower);
    let b = transform.forward(upper);
    transform.inverse(a + u * (b - a))
}

fn bucket(u: f64, n: usize) -> usize {
    ((u * n as f64).floor() as usize).min(n - 1)
}

fn bucket_midpoint(index: usize, n: usize) -> f64 {
    (index as f64 + 0.5) / n as f64
}

// Ties go to the even neighbor so that samples exactly between two integers
// are not biased in one direction.
fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}
