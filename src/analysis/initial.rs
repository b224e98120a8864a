//! Space-filling designs of initial samples in the unit hypercube.
//!
//! # References
//!
//! \[1\] [A Comparison of Three Methods for Selecting Values of Input
//! Variables in the Analysis of Output from a Computer
//! Code](https://doi.org/10.2307/1268522)

use nalgebra::DVector;
use rand::{seq::SliceRandom, Rng};

/// Draws `n` points independently and uniformly from `[0, 1)^dim`.
pub fn uniform_design<R: Rng + ?Sized>(n: usize, dim: usize, rng: &mut R) -> Vec<DVector<f64>> {
    (0..n)
        .map(|_| DVector::from_iterator(dim, (0..dim).map(|_| rng.gen::<f64>())))
        .collect()
}

/// Draws a Latin hypercube design of `n` points in `[0, 1)^dim` \[1\].
///
/// Every axis is split into `n` equal strata and each stratum contains
/// exactly one point. The pairing of strata across axes is a random
/// permutation and the position inside a stratum is uniform.
pub fn latin_hypercube<R: Rng + ?Sized>(n: usize, dim: usize, rng: &mut R) -> Vec<DVector<f64>> {
    let mut design = vec![DVector::zeros(dim); n];
    let mut strata = (0..n).collect::<Vec<_>>();

    for j in 0..dim {
        strata.shuffle(rng);

        for (point, stratum) in design.iter_mut().zip(strata.iter()) {
            point[j] = (*stratum as f64 + rng.gen::<f64>()) / n as f64;
        }
    }

    design
}
