//! Search space definition as an ordered sequence of dimensions.

use std::{collections::HashSet, fmt, ops::Index};

use super::{
    dimension::{Dimension, Value},
    error::BoundsError,
};

/// Search space of a problem.
///
/// The order of dimensions defines the coordinate order of every point, both
/// in native units ([`Value`]s) and in the normalized unit hypercube. Use
/// [`BoundsConfig`](super::BoundsConfig) to build bounds incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    dimensions: Vec<Dimension>,
}

impl Bounds {
    /// Creates bounds from already validated dimensions.
    ///
    /// Fails if there is no dimension or if two dimensions share the same
    /// name.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self, BoundsError> {
        if dimensions.is_empty() {
            return Err(BoundsError::EmptyBounds);
        }

        let mut names = HashSet::new();
        for dim in dimensions.iter() {
            if !names.insert(dim.name()) {
                return Err(BoundsError::InvalidDimension {
                    name: dim.name().to_string(),
                    reason: "duplicate dimension name".to_string(),
                });
            }
        }

        Ok(Self { dimensions })
    }

    /// Creates `dim` continuous dimensions with the same range, named `x0`,
    /// `x1`, ...
    pub fn continuous(dim: usize, lower: f64, upper: f64) -> Result<Self, BoundsError> {
        let dimensions = (0..dim)
            .map(|i| Dimension::continuous(format!("x{}", i), lower, upper))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dimensions)
    }

    /// Gets the dimensionality of the search space.
    pub fn dim(&self) -> usize {
        self.dimensions.len()
    }

    /// Gets all dimensions in order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Iterates over the dimensions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Dimension> {
        self.dimensions.iter()
    }

    /// Gets the dimension at given position.
    pub fn get(&self, i: usize) -> Option<&Dimension> {
        self.dimensions.get(i)
    }

    /// Iterates over the dimension names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.dimensions.iter().map(Dimension::name)
    }

    /// Converts a point from normalized space into native units.
    pub fn to_native(&self, u: &[f64]) -> Result<Vec<Value>, BoundsError> {
        self.check_len(u.len())?;
        Ok(self
            .dimensions
            .iter()
            .zip(u.iter())
            .map(|(dim, ui)| dim.from_normalized(*ui))
            .collect())
    }

    /// Converts a point from native units into normalized space.
    pub fn to_normalized(&self, point: &[Value]) -> Result<Vec<f64>, BoundsError> {
        self.check_len(point.len())?;
        self.dimensions
            .iter()
            .zip(point.iter())
            .map(|(dim, value)| dim.to_normalized(value))
            .collect()
    }

    /// Checks whether the point in native units belongs to the search space.
    pub fn contains(&self, point: &[Value]) -> bool {
        point.len() == self.dim()
            && self
                .dimensions
                .iter()
                .zip(point.iter())
                .all(|(dim, value)| dim.contains(value))
    }

    fn check_len(&self, actual: usize) -> Result<(), BoundsError> {
        if actual != self.dim() {
            Err(BoundsError::DimensionMismatch {
                expected: self.dim(),
                actual,
            })
        } else {
            Ok(())
        }
    }
}

impl Index<usize> for Bounds {
    type Output = Dimension;

    fn index(&self, i: usize) -> &Self::Output {
        &self.dimensions[i]
    }
}

impl<'a> IntoIterator for &'a Bounds {
    type Item = &'a Dimension;
    type IntoIter = std::slice::Iter<'a, Dimension>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dim) in self.dimensions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", dim)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::core::Transform;

    fn mixed() -> Bounds {
        Bounds::new(vec![
            Dimension::continuous("x", -1.0, 1.0).unwrap(),
            Dimension::continuous_with_transform("lr", 1e-3, 1.0, Transform::Log).unwrap(),
            Dimension::discrete("n", 1, 8).unwrap(),
            Dimension::categorical("opt", ["sgd", "adam"]).unwrap(),
            Dimension::boolean("nesterov").unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn round_trip() {
        let bounds = mixed();
        let point = vec![
            Value::Real(0.25),
            Value::Real(0.01),
            Value::Integer(5),
            Value::from("adam"),
            Value::Boolean(true),
        ];

        let u = bounds.to_normalized(&point).unwrap();
        assert_eq!(u.len(), 5);
        assert!(u.iter().all(|ui| (0.0..=1.0).contains(ui)));

        let back = bounds.to_native(&u).unwrap();
        assert_relative_eq!(back[0].as_f64().unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(back[1].as_f64().unwrap(), 0.01, max_relative = 1e-12);
        assert_eq!(&back[2..], &point[2..]);
    }

    #[test]
    fn dimension_mismatch() {
        let bounds = mixed();
        assert_eq!(
            bounds.to_native(&[0.5, 0.5]),
            Err(BoundsError::DimensionMismatch {
                expected: 5,
                actual: 2
            })
        );
        assert!(matches!(
            bounds.to_normalized(&[Value::Real(0.0)]),
            Err(BoundsError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn contains() {
        let bounds = mixed();
        let inside = bounds.to_native(&[0.1, 0.2, 0.3, 0.4, 0.9]).unwrap();
        assert!(bounds.contains(&inside));

        let mut outside = inside.clone();
        outside[2] = Value::Integer(9);
        assert!(!bounds.contains(&outside));
        assert!(!bounds.contains(&inside[..4]));
    }

    #[test]
    fn empty_and_duplicate() {
        assert_eq!(Bounds::new(Vec::new()), Err(BoundsError::EmptyBounds));
        assert!(matches!(
            Bounds::new(vec![
                Dimension::boolean("a").unwrap(),
                Dimension::boolean("a").unwrap()
            ]),
            Err(BoundsError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn continuous_shortcut() {
        let bounds = Bounds::continuous(3, -5.0, 5.0).unwrap();
        assert_eq!(bounds.dim(), 3);
        assert_eq!(bounds.names().collect::<Vec<_>>(), vec!["x0", "x1", "x2"]);
        assert_eq!(bounds.to_native(&[0.5; 3]).unwrap(), vec![Value::Real(0.0); 3]);
        assert_eq!(Bounds::continuous(0, 0.0, 1.0), Err(BoundsError::EmptyBounds));
    }

    #[test]
    fn display() {
        let bounds = mixed();
        let expected = "x: continuous [-1, 1]\n\
                        lr: continuous [0.001, 1] (log)\n\
                        n: discrete [1, 8]\n\
                        opt: categorical {sgd, adam}\n\
                        nesterov: boolean";
        assert_eq!(bounds.to_string(), expected);
    }
}
