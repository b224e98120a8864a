//! Statistics for adapting a search distribution to ranked samples and
//! designs of initial samples.
//!
//! # References
//!
//! \[1\] [The CMA Evolution Strategy: A
//! Tutorial](https://arxiv.org/abs/1604.00772)

use nalgebra::{DMatrix, DVector, SymmetricEigen};

mod initial;

pub use initial::*;

/// Computes positive, decreasing and normalized weights for the `mu` best
/// ranked samples.
///
/// The weight of the sample with rank `i` (starting at 1) is proportional to
/// `ln(mu + 1/2) - ln(i)` as in \[1\].
pub fn rank_weights(mu: usize) -> Vec<f64> {
    let log_half = (mu as f64 + 0.5).ln();
    let weights = (1..=mu)
        .map(|i| log_half - (i as f64).ln())
        .collect::<Vec<_>>();
    let sum = weights.iter().sum::<f64>();

    weights.into_iter().map(|w| w / sum).collect()
}

/// Computes the weighted covariance of the points about given center.
///
/// The center is not required to be the mean of the points. Using the center
/// of the previous distribution makes the covariance elongated in the
/// direction of the mean shift.
pub fn weighted_covariance(
    points: &[&DVector<f64>],
    weights: &[f64],
    center: &DVector<f64>,
) -> DMatrix<f64> {
    let dim = center.len();
    let mut cov = DMatrix::zeros(dim, dim);

    for (x, w) in points.iter().zip(weights.iter()) {
        let diff = *x - center;
        cov.ger(*w, &diff, &diff, 1.0);
    }

    cov
}

/// Square root of a covariance matrix.
#[derive(Debug, Clone)]
pub struct CovarianceSqrt {
    /// Symmetric positive-definite matrix `S` such that `S S = C`.
    pub sqrt: DMatrix<f64>,
    /// Principal standard deviations, that is, eigenvalues of `S`.
    pub stds: DVector<f64>,
}

/// Computes the symmetric square root of a covariance matrix `C = B Λ Bᵀ` as
/// `B Λ^(1/2) Bᵀ`.
///
/// Eigenvalues are clamped from below by `min_std²`, so the result is always
/// positive-definite even for singular or slightly indefinite input.
pub fn covariance_sqrt(cov: &DMatrix<f64>, min_std: f64) -> CovarianceSqrt {
    let eigen = SymmetricEigen::new(cov.clone());
    let min_var = min_std * min_std;

    // NaN is replaced by the floor too since `max` ignores NaN operands.
    let stds = eigen.eigenvalues.map(|lambda| lambda.max(min_var).sqrt());
    let sqrt = &eigen.eigenvectors * DMatrix::from_diagonal(&stds) * eigen.eigenvectors.transpose();

    CovarianceSqrt { sqrt, stds }
}
