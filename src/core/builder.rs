//! Incremental construction of [`Bounds`].
//!
//! ```rust
//! use askopt::{BoundsConfig, Transform};
//!
//! let bounds = BoundsConfig::new()
//!     .add_continuous("momentum", 0.0, 0.99)
//!     .add_continuous_with_transform("learning_rate", 1e-5, 1e-1, Transform::Log)
//!     .add_discrete("layers", 1, 6)
//!     .add_categorical("activation", ["relu", "tanh", "gelu"])
//!     .add_boolean("batch_norm")
//!     .build()
//!     .expect("valid bounds");
//!
//! assert_eq!(bounds.dim(), 5);
//! ```

use std::{fmt, ops::Range, str::FromStr};

use thiserror::Error;

use super::{
    bounds::Bounds,
    dimension::{Dimension, DimensionKind},
    error::BoundsError,
    transform::Transform,
};

// Floats in this range convert to `i64` without saturation.
const INTEGER_RANGE: Range<f64> = (i64::MIN as f64)..(i64::MAX as f64);

/// Type of a dimension in a [`DimensionSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionType {
    /// Continuous dimension.
    Real,
    /// Discrete dimension.
    Integer,
    /// Categorical dimension.
    Categorical,
    /// Boolean dimension.
    Boolean,
}

impl fmt::Display for DimensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DimensionType::Real => "real",
            DimensionType::Integer => "int",
            DimensionType::Categorical => "cat",
            DimensionType::Boolean => "bool",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown dimension type.
#[derive(Debug, Error)]
#[error("unknown dimension type \"{0}\"")]
pub struct ParseDimensionTypeError(String);

impl FromStr for DimensionType {
    type Err = ParseDimensionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real" | "float" | "continuous" => Ok(DimensionType::Real),
            "int" | "integer" | "discrete" => Ok(DimensionType::Integer),
            "cat" | "categorical" => Ok(DimensionType::Categorical),
            "bool" | "boolean" => Ok(DimensionType::Boolean),
            _ => Err(ParseDimensionTypeError(s.to_string())),
        }
    }
}

/// Untyped description of a dimension, as produced by configuration adapters.
///
/// Fields that do not apply to the [`kind`](DimensionSpec::kind) must be
/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSpec {
    /// Name of the dimension.
    pub name: String,
    /// Type of the dimension.
    pub kind: DimensionType,
    /// Optional transformation for real and integer dimensions.
    pub transform: Option<Transform>,
    /// `(lower, upper)` for real and integer dimensions.
    pub range: Option<(f64, f64)>,
    /// Labels for categorical dimensions.
    pub categories: Option<Vec<String>>,
}

impl DimensionSpec {
    /// Converts the description into a validated dimension.
    pub fn into_dimension(self) -> Result<Dimension, BoundsError> {
        let DimensionSpec {
            name,
            kind,
            transform,
            range,
            categories,
        } = self;

        let invalid = |name: String, reason: String| BoundsError::InvalidDimension { name, reason };

        match kind {
            DimensionType::Real | DimensionType::Integer => {
                if categories.is_some() {
                    return Err(invalid(name, format!("categories given to {} dimension", kind)));
                }
                let (lower, upper) = match range {
                    Some(range) => range,
                    None => return Err(invalid(name, format!("{} dimension requires a range", kind))),
                };
                let transform = transform.unwrap_or_default();

                if kind == DimensionType::Real {
                    return Dimension::continuous_with_transform(name, lower, upper, transform);
                }

                if lower.fract() != 0.0 || upper.fract() != 0.0 {
                    return Err(invalid(
                        name,
                        format!("integer range [{}, {}] has fractional bounds", lower, upper),
                    ));
                }
                if !INTEGER_RANGE.contains(&lower) || !INTEGER_RANGE.contains(&upper) {
                    return Err(invalid(
                        name,
                        format!(
                            "integer range [{}, {}] does not fit in 64-bit integers",
                            lower, upper
                        ),
                    ));
                }
                Dimension::discrete_with_transform(name, lower as i64, upper as i64, transform)
            }
            DimensionType::Categorical | DimensionType::Boolean => {
                if range.is_some() || transform.is_some() {
                    return Err(invalid(
                        name,
                        format!("range and transform do not apply to {} dimension", kind),
                    ));
                }

                if kind == DimensionType::Boolean {
                    if categories.is_some() {
                        return Err(invalid(name, "categories given to bool dimension".to_string()));
                    }
                    return Dimension::boolean(name);
                }

                match categories {
                    Some(categories) => Dimension::new(name, DimensionKind::Categorical { categories }),
                    None => Err(invalid(name, "cat dimension requires categories".to_string())),
                }
            }
        }
    }
}

/// Builder for [`Bounds`].
///
/// Every `add_*` method validates its dimension immediately. The first error
/// is kept, all subsequent additions are ignored and [`build`](BoundsConfig::build)
/// reports the error.
#[derive(Debug, Clone, Default)]
pub struct BoundsConfig {
    dimensions: Vec<Dimension>,
    error: Option<BoundsError>,
}

impl BoundsConfig {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from dimension descriptions.
    pub fn from_specs<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = DimensionSpec>,
    {
        Self::new().extend(specs)
    }

    /// Adds a continuous dimension.
    pub fn add_continuous(self, name: impl Into<String>, lower: f64, upper: f64) -> Self {
        self.add_with(|| Dimension::continuous(name, lower, upper))
    }

    /// Adds a continuous dimension with a transformation.
    pub fn add_continuous_with_transform(
        self,
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        transform: Transform,
    ) -> Self {
        self.add_with(|| Dimension::continuous_with_transform(name, lower, upper, transform))
    }

    /// Adds a discrete dimension.
    pub fn add_discrete(self, name: impl Into<String>, lower: i64, upper: i64) -> Self {
        self.add_with(|| Dimension::discrete(name, lower, upper))
    }

    /// Adds a discrete dimension with a transformation.
    pub fn add_discrete_with_transform(
        self,
        name: impl Into<String>,
        lower: i64,
        upper: i64,
        transform: Transform,
    ) -> Self {
        self.add_with(|| Dimension::discrete_with_transform(name, lower, upper, transform))
    }

    /// Adds a categorical dimension.
    pub fn add_categorical<I, S>(self, name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_with(|| Dimension::categorical(name, categories))
    }

    /// Adds a boolean dimension.
    pub fn add_boolean(self, name: impl Into<String>) -> Self {
        self.add_with(|| Dimension::boolean(name))
    }

    /// Adds an already constructed dimension.
    pub fn add_dimension(self, dimension: Dimension) -> Self {
        self.add_with(|| Ok(dimension))
    }

    /// Adds a dimension from its description.
    pub fn add_spec(self, spec: DimensionSpec) -> Self {
        self.add_with(|| spec.into_dimension())
    }

    /// Adds dimensions from their descriptions, in order.
    #[allow(clippy::should_implement_trait)]
    pub fn extend<I>(self, specs: I) -> Self
    where
        I: IntoIterator<Item = DimensionSpec>,
    {
        specs.into_iter().fold(self, Self::add_spec)
    }

    /// Returns the first error encountered so far.
    pub fn error(&self) -> Option<&BoundsError> {
        self.error.as_ref()
    }

    /// Returns the number of dimensions added so far.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns whether no dimension was added so far.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Builds the [`Bounds`].
    pub fn build(self) -> Result<Bounds, BoundsError> {
        match self.error {
            Some(error) => Err(error),
            None => Bounds::new(self.dimensions),
        }
    }

    fn add_with<F>(mut self, make: F) -> Self
    where
        F: FnOnce() -> Result<Dimension, BoundsError>,
    {
        if self.error.is_some() {
            return self;
        }

        match make() {
            Ok(dim) if self.dimensions.iter().any(|other| other.name() == dim.name()) => {
                self.error = Some(BoundsError::InvalidDimension {
                    name: dim.name().to_string(),
                    reason: "duplicate dimension name".to_string(),
                });
            }
            Ok(dim) => self.dimensions.push(dim),
            Err(error) => self.error = Some(error),
        }

        self
    }
}

impl FromIterator<DimensionSpec> for BoundsConfig {
    fn from_iter<I: IntoIterator<Item = DimensionSpec>>(iter: I) -> Self {
        Self::from_specs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn preserves_order() {
        let bounds = BoundsConfig::new()
            .add_boolean("b")
            .add_continuous("x", 0.0, 1.0)
            .add_categorical("c", ["u", "v"])
            .add_discrete("n", 0, 3)
            .build()
            .unwrap();

        assert_eq!(bounds.names().collect::<Vec<_>>(), vec!["b", "x", "c", "n"]);
    }

    #[test]
    fn degenerate_log_range() {
        let config = BoundsConfig::new()
            .add_continuous("ok", 0.0, 1.0)
            .add_continuous_with_transform("n", 1000.0, 0.01, Transform::Log)
            .add_continuous("ignored", 0.0, 1.0);

        assert!(matches!(
            config.error(),
            Some(BoundsError::InvalidDimension { name, .. }) if name == "n"
        ));
        assert_eq!(config.len(), 1);
        assert!(matches!(
            config.build(),
            Err(BoundsError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn log_requires_positive_lower() {
        let result = BoundsConfig::new()
            .add_continuous_with_transform("lr", 0.0, 1.0, Transform::Log)
            .build();
        assert!(matches!(result, Err(BoundsError::InvalidDimension { .. })));
    }

    #[test]
    fn empty() {
        assert_eq!(BoundsConfig::new().build(), Err(BoundsError::EmptyBounds));
    }

    #[test]
    fn duplicate_names() {
        let result = BoundsConfig::new()
            .add_continuous("x", 0.0, 1.0)
            .add_discrete("x", 0, 1)
            .build();
        assert!(matches!(result, Err(BoundsError::InvalidDimension { name, .. }) if name == "x"));
    }

    #[test]
    fn from_specs() {
        let specs = vec![
            DimensionSpec {
                name: "lr".to_string(),
                kind: "real".parse().unwrap(),
                transform: Some(Transform::Log),
                range: Some((1e-4, 1.0)),
                categories: None,
            },
            DimensionSpec {
                name: "depth".to_string(),
                kind: "int".parse().unwrap(),
                transform: None,
                range: Some((2.0, 12.0)),
                categories: None,
            },
            DimensionSpec {
                name: "kernel".to_string(),
                kind: "cat".parse().unwrap(),
                transform: None,
                range: None,
                categories: Some(vec!["rbf".to_string(), "linear".to_string()]),
            },
            DimensionSpec {
                name: "shrinking".to_string(),
                kind: "bool".parse().unwrap(),
                transform: None,
                range: None,
                categories: None,
            },
        ];

        let bounds = specs.into_iter().collect::<BoundsConfig>().build().unwrap();
        assert_eq!(bounds.dim(), 4);
        assert!(bounds.contains(&[
            Value::Real(0.01),
            Value::Integer(7),
            Value::from("linear"),
            Value::Boolean(false),
        ]));
    }

    #[test]
    fn invalid_specs() {
        let fractional = DimensionSpec {
            name: "n".to_string(),
            kind: DimensionType::Integer,
            transform: None,
            range: Some((0.5, 3.0)),
            categories: None,
        };
        assert!(fractional.into_dimension().is_err());

        let huge = DimensionSpec {
            name: "n".to_string(),
            kind: DimensionType::Integer,
            transform: None,
            range: Some((0.0, 1e20)),
            categories: None,
        };
        match huge.into_dimension() {
            Err(BoundsError::InvalidDimension { name, reason }) => {
                assert_eq!(name, "n");
                assert!(reason.contains("64-bit"), "{}", reason);
            }
            other => panic!("unexpected {:?}", other),
        }

        let missing_range = DimensionSpec {
            name: "x".to_string(),
            kind: DimensionType::Real,
            transform: None,
            range: None,
            categories: None,
        };
        assert!(missing_range.into_dimension().is_err());

        let config = BoundsConfig::from_specs(vec![DimensionSpec {
            name: "c".to_string(),
            kind: DimensionType::Categorical,
            transform: None,
            range: None,
            categories: None,
        }]);
        assert!(config.error().is_some());
    }

    #[test]
    fn parse_dimension_type() {
        assert_eq!("Real".parse::<DimensionType>().unwrap(), DimensionType::Real);
        assert_eq!("integer".parse::<DimensionType>().unwrap(), DimensionType::Integer);
        assert_eq!("categorical".parse::<DimensionType>().unwrap(), DimensionType::Categorical);
        assert_eq!("bool".parse::<DimensionType>().unwrap(), DimensionType::Boolean);
        assert!("complex".parse::<DimensionType>().is_err());
    }
}
