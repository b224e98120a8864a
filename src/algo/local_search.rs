//! Adaptive local search in normalized space.
//!
//! The optimizer samples one candidate at a time from a Gaussian distribution
//! centered at the best point of a bounded window of recent observations (the
//! *forgetting window*). After each observation, the shape of the
//! distribution is fitted to the better half of the window with log-rank
//! weights \[1\], the orientation follows the principal components of the
//! fitted covariance \[2\] and the overall step size follows the one-fifth
//! success rule \[3\]. The first few candidates form an initial design drawn
//! around the prior center with a fixed isotropic spread.
//!
//! All computations happen in the normalized unit hypercube, so continuous,
//! transformed, integer, categorical and boolean dimensions are handled
//! uniformly. Integer and categorical axes keep a variance floor derived from
//! their resolution so that they never freeze.
//!
//! # References
//!
//! \[1\] [The CMA Evolution Strategy: A
//! Tutorial](https://arxiv.org/abs/1604.00772)
//!
//! \[2\] [LABCAT: Locally adaptive Bayesian optimization using
//! principal-component-aligned trust regions](https://arxiv.org/abs/2311.11328)
//!
//! \[3\] [Evolution strategies – A comprehensive
//! introduction](https://link.springer.com/article/10.1023/A:1015059928466)

use approx::relative_eq;
use getset::{CopyGetters, Setters};
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::{
    analysis::{
        covariance_sqrt, latin_hypercube, rank_weights, uniform_design, weighted_covariance,
        CovarianceSqrt,
    },
    core::{AskTell, AskTellError, Bounds, BoundsError, State, Value},
    history::{History, Sample},
};

// Step size factors of the one-fifth success rule: the step size is stable
// when one in five observations is a success.
const SUCCESS_EXPONENT: f64 = 1.0 / 3.0;
const FAILURE_EXPONENT: f64 = -1.0 / 12.0;

// The normalized space has unit width.
const MAX_SIGMA: f64 = 1.0;

/// Placement of the initial design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialDesign {
    /// Isotropic Gaussian around the center with standard deviation
    /// `prior_sigma`.
    #[default]
    Gaussian,
    /// Independent uniform points over the whole normalized space.
    Uniform,
    /// Latin hypercube over the whole normalized space.
    LatinHypercube,
}

/// Options for [`LocalSearch`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct LocalSearchOptions {
    /// Multiplier on the adapted standard deviations, effectively the size of
    /// the trust region. Default: `1`.
    beta: f64,
    /// Isotropic standard deviation of the initial design and the initial
    /// step size. Default: `0.15`.
    prior_sigma: f64,
    /// Learning rate of the shape of the distribution. Default: `0.3`.
    shape_rate: f64,
    /// Ridge added to the fitted shape, keeps it well-conditioned. Default:
    /// `0.05`.
    shape_reg: f64,
    /// Size of the initial design as a function of the dimension. Default:
    /// `2d + 1`.
    init_fn: fn(usize) -> usize,
    /// Placement of the initial design, also used after a restart. Default:
    /// Gaussian.
    initial_design: InitialDesign,
    /// Size of the forgetting window as a function of the dimension. Default:
    /// `7d`.
    forget_fn: fn(usize) -> usize,
    /// Seed of the random number generator. When `None`, a seed is drawn from
    /// the entropy of the process. Default: `None`.
    seed: Option<u64>,
    /// Adapt the orientation of the distribution. If disabled, the
    /// distribution is axis-aligned. Default: `true`.
    adapt_orientation: bool,
    /// Lower bound for any principal standard deviation. Default: `1e-12`.
    min_scale: f64,
    /// The distribution is considered converged when all principal standard
    /// deviations are below this value. Default: `1e-9`.
    tol_scale: f64,
    /// Restart the distribution around the best sample on convergence.
    /// Default: `false`.
    restarts: bool,
}

impl Default for LocalSearchOptions {
    fn default() -> Self {
        Self {
            beta: 1.0,
            prior_sigma: 0.15,
            shape_rate: 0.3,
            shape_reg: 0.05,
            init_fn: |d| 2 * d + 1,
            initial_design: InitialDesign::Gaussian,
            forget_fn: |d| 7 * d,
            seed: None,
            adapt_orientation: true,
            min_scale: 1e-12,
            tol_scale: 1e-9,
            restarts: false,
        }
    }
}

impl LocalSearchOptions {
    fn validate(&self, dim: usize) -> Result<(), AskTellError> {
        let positive = [
            ("beta", self.beta),
            ("prior_sigma", self.prior_sigma),
            ("min_scale", self.min_scale),
            ("tol_scale", self.tol_scale),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(AskTellError::InvalidParameter {
                    name,
                    reason: format!("must be finite and positive, got {}", value),
                });
            }
        }

        if !(self.shape_rate > 0.0 && self.shape_rate <= 1.0) {
            return Err(AskTellError::InvalidParameter {
                name: "shape_rate",
                reason: format!("must be in (0, 1], got {}", self.shape_rate),
            });
        }

        if !(self.shape_reg.is_finite() && self.shape_reg >= 0.0) {
            return Err(AskTellError::InvalidParameter {
                name: "shape_reg",
                reason: format!("must be finite and non-negative, got {}", self.shape_reg),
            });
        }

        if (self.forget_fn)(dim) == 0 {
            return Err(AskTellError::InvalidParameter {
                name: "forget_fn",
                reason: format!("window for dimension {} must not be empty", dim),
            });
        }

        Ok(())
    }
}

/// Builder for [`LocalSearch`].
pub struct LocalSearchBuilder {
    bounds: Bounds,
    options: LocalSearchOptions,
    center: Option<Vec<Value>>,
}

impl LocalSearchBuilder {
    /// Sets all options at once.
    pub fn with_options(mut self, options: LocalSearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the seed of the random number generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.set_seed(Some(seed));
        self
    }

    /// Sets the multiplier on the adapted standard deviations.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.options.set_beta(beta);
        self
    }

    /// Sets the spread of the initial design.
    pub fn with_prior_sigma(mut self, prior_sigma: f64) -> Self {
        self.options.set_prior_sigma(prior_sigma);
        self
    }

    /// Sets the point in native units around which the search starts. By
    /// default, it is the middle of the normalized space.
    pub fn with_center(mut self, center: Vec<Value>) -> Self {
        self.center = Some(center);
        self
    }

    /// Builds the [`LocalSearch`].
    pub fn build(self) -> Result<LocalSearch, AskTellError> {
        LocalSearch::from_parts(self.bounds, self.options, self.center)
    }
}

#[derive(Debug, Clone)]
struct Pending {
    normalized: DVector<f64>,
    native: Vec<Value>,
}

/// Adaptive local search optimizer.
///
/// See [module](self) documentation for more details.
#[derive(Debug, Clone)]
pub struct LocalSearch {
    bounds: Bounds,
    options: LocalSearchOptions,
    seed: u64,
    rng: StdRng,
    center: DVector<f64>,
    sigma: f64,
    shape: DMatrix<f64>,
    scale: DMatrix<f64>,
    stds: DVector<f64>,
    floor: DVector<f64>,
    history: History,
    init_count: usize,
    iteration: usize,
    phase_start: usize,
    restarts: usize,
    design: Vec<DVector<f64>>,
    pending: Option<Pending>,
}

impl LocalSearch {
    /// Returns the builder for specifying additional settings.
    pub fn builder(bounds: Bounds) -> LocalSearchBuilder {
        LocalSearchBuilder {
            bounds,
            options: LocalSearchOptions::default(),
            center: None,
        }
    }

    /// Initializes the optimizer with the default settings.
    pub fn new(bounds: Bounds) -> Result<Self, AskTellError> {
        Self::builder(bounds).build()
    }

    fn from_parts(
        bounds: Bounds,
        options: LocalSearchOptions,
        center: Option<Vec<Value>>,
    ) -> Result<Self, AskTellError> {
        let dim = bounds.dim();
        options.validate(dim)?;

        let center = match center {
            Some(point) => DVector::from_vec(bounds.to_normalized(&point)?),
            None => DVector::from_element(dim, 0.5),
        };

        let floor = DVector::from_iterator(
            dim,
            bounds.iter().map(|dimension| (dimension.resolution() / 4.0).powi(2)),
        );

        let seed = options.seed.unwrap_or_else(rand::random);
        let init_count = (options.init_fn)(dim);
        let window = (options.forget_fn)(dim);

        debug!(
            "local search in {} dimensions: seed = {}, initial design = {}, window = {}",
            dim, seed, init_count, window
        );

        let mut this = Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            center,
            sigma: options.prior_sigma,
            shape: DMatrix::identity(dim, dim),
            scale: DMatrix::zeros(dim, dim),
            stds: DVector::zeros(dim),
            floor,
            history: History::new(window),
            init_count,
            iteration: 0,
            phase_start: 0,
            restarts: 0,
            design: Vec::new(),
            pending: None,
            bounds,
            options,
        };

        this.plan_design();
        this.update_scale();
        Ok(this)
    }

    /// Gets the options.
    pub fn options(&self) -> &LocalSearchOptions {
        &self.options
    }

    /// Gets the seed of the random number generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Gets the center of the distribution in normalized space.
    pub fn center(&self) -> &DVector<f64> {
        &self.center
    }

    /// Gets the scale matrix mapping standard normal draws to offsets from
    /// the center.
    pub fn scale(&self) -> &DMatrix<f64> {
        &self.scale
    }

    /// Gets the principal standard deviations of the distribution.
    pub fn stds(&self) -> &DVector<f64> {
        &self.stds
    }

    /// Gets the current step size.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Gets the forgetting window.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Gets the best sample in the forgetting window.
    pub fn best(&self) -> Option<&Sample> {
        self.history.best()
    }

    /// Gets the pending suggestion, if any.
    pub fn pending(&self) -> Option<&[Value]> {
        self.pending.as_ref().map(|pending| pending.native.as_slice())
    }

    /// Gets the number of restarts so far.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Gets the size of the initial design.
    pub fn init_count(&self) -> usize {
        self.init_count
    }

    /// Gets the capacity of the forgetting window.
    pub fn window(&self) -> usize {
        self.history.capacity()
    }

    fn plan_design(&mut self) {
        let dim = self.bounds.dim();
        let n = self.init_count;

        self.design = match self.options.initial_design {
            InitialDesign::Gaussian => Vec::new(),
            InitialDesign::Uniform => uniform_design(n, dim, &mut self.rng),
            InitialDesign::LatinHypercube => latin_hypercube(n, dim, &mut self.rng),
        };

        debug!(
            "initial design: {:?} with {} points",
            self.options.initial_design, n
        );
    }

    fn standard_normal(&mut self) -> DVector<f64> {
        let dim = self.bounds.dim();
        let rng = &mut self.rng;
        DVector::from_iterator(dim, (0..dim).map(|_| StandardNormal.sample(&mut *rng)))
    }

    fn in_initial_design(&self) -> bool {
        self.iteration - self.phase_start < self.init_count
    }

    fn adapt(&mut self, success: bool) {
        let dim = self.bounds.dim();
        let rate = self.options.shape_rate;

        let (center, cov) = {
            let sorted = self.history.sorted();
            let center = match sorted.first() {
                Some(best) => best.point().clone(),
                None => return,
            };

            let mu = (sorted.len() + 1) / 2;
            let weights = rank_weights(mu);
            let elite = sorted
                .iter()
                .take(mu)
                .map(|sample| sample.point())
                .collect::<Vec<_>>();

            let cov = weighted_covariance(&elite, &weights, &center);
            (center, cov)
        };

        let cov = if self.options.adapt_orientation {
            cov
        } else {
            DMatrix::from_diagonal(&cov.diagonal())
        };

        let mean_var = cov.trace() / dim as f64;
        if mean_var.is_finite() && mean_var > 0.0 {
            let mut target = cov / mean_var;
            for j in 0..dim {
                target[(j, j)] += self.options.shape_reg;
            }
            let target = &target / (target.trace() / dim as f64);
            self.shape = &self.shape * (1.0 - rate) + target * rate;
        }

        if !self.in_initial_design() {
            let exponent = if success {
                SUCCESS_EXPONENT
            } else {
                FAILURE_EXPONENT
            };
            self.sigma = (self.sigma * exponent.exp()).clamp(self.options.min_scale, MAX_SIGMA);
        }

        self.center = center;
        self.update_scale();

        debug!(
            "iteration {}: sigma = {:.3e}, principal stds in [{:.3e}, {:.3e}]",
            self.iteration,
            self.sigma,
            self.stds.min(),
            self.stds.max()
        );
    }

    fn update_scale(&mut self) {
        let dim = self.bounds.dim();
        let min_scale = self.options.min_scale;

        // Normalize the shape to unit geometric mean of its principal
        // standard deviations so that sigma alone controls the volume.
        let shape = covariance_sqrt(&self.shape, min_scale);
        let g = (shape.stds.iter().map(|s| s.ln()).sum::<f64>() / dim as f64).exp();
        let size = self.options.beta * self.sigma / g;

        let mut cov = &self.shape * (size * size);
        for j in 0..dim {
            cov[(j, j)] += self.floor[j];
        }

        let CovarianceSqrt { sqrt, stds } = covariance_sqrt(&cov, min_scale);
        self.scale = sqrt;
        self.stds = stds;
    }

    fn restart(&mut self) {
        self.history.retain_best();
        if let Some(best) = self.history.best() {
            self.center = best.point().clone();
        }

        let dim = self.bounds.dim();
        self.sigma = self.options.prior_sigma;
        self.shape = DMatrix::identity(dim, dim);
        self.phase_start = self.iteration;
        self.restarts += 1;
        self.plan_design();
        self.update_scale();

        debug!(
            "restart #{} at iteration {} around {:?}",
            self.restarts,
            self.iteration,
            self.center.as_slice()
        );
    }
}

impl AskTell for LocalSearch {
    const NAME: &'static str = "LocalSearch";

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn iteration(&self) -> usize {
        self.iteration
    }

    fn state(&self) -> State {
        if self.pending.is_some() {
            State::AwaitingObservation
        } else {
            State::Ready
        }
    }

    fn suggest(&mut self) -> Result<Vec<Value>, AskTellError> {
        if self.pending.is_some() {
            return Err(AskTellError::ProtocolViolation {
                operation: "suggest",
                state: self.state(),
            });
        }

        let planned = if self.in_initial_design() {
            self.design.get(self.iteration - self.phase_start).cloned()
        } else {
            None
        };

        // A cancelled design point is suggested again.
        let mut x = match planned {
            Some(x) => x,
            None if self.in_initial_design() => {
                let z = self.standard_normal();
                &self.center + z * self.options.prior_sigma
            }
            None => {
                let z = self.standard_normal();
                &self.center + &self.scale * z
            }
        };
        x.iter_mut().for_each(|xi| *xi = xi.clamp(0.0, 1.0));

        let native = self.bounds.to_native(x.as_slice())?;
        trace!("suggestion #{}: {:?}", self.iteration, native);

        self.pending = Some(Pending {
            normalized: x,
            native: native.clone(),
        });

        Ok(native)
    }

    fn observe(&mut self, point: &[Value], value: f64) -> Result<(), AskTellError> {
        let pending = self
            .pending
            .as_ref()
            .ok_or(AskTellError::ProtocolViolation {
                operation: "observe",
                state: State::Ready,
            })?;

        if point.len() != self.bounds.dim() {
            return Err(BoundsError::DimensionMismatch {
                expected: self.bounds.dim(),
                actual: point.len(),
            }
            .into());
        }

        if !same_point(&pending.native, point) {
            return Err(AskTellError::PointMismatch);
        }

        // The reported point may differ by rounding, the pending one is exact.
        let normalized = DVector::from_vec(self.bounds.to_normalized(&pending.native)?);
        trace!(
            "observation #{}: {} (sampled at {:?})",
            self.iteration,
            value,
            pending.normalized.as_slice()
        );
        self.pending = None;

        let success = value.is_finite()
            && self
                .history
                .iter()
                .all(|sample| !sample.value().is_finite() || value < sample.value());

        self.history
            .push(Sample::new(normalized, value, self.iteration));
        self.adapt(success);
        self.iteration += 1;

        if self.init_count > 0 && self.iteration - self.phase_start == self.init_count {
            debug!("initial design finished at iteration {}", self.iteration);
        }

        if self.options.restarts && self.converged() {
            self.restart();
        }

        Ok(())
    }

    fn cancel(&mut self) -> Option<Vec<Value>> {
        self.pending.take().map(|pending| {
            trace!("suggestion #{} cancelled", self.iteration);
            pending.native
        })
    }

    fn converged(&self) -> bool {
        !self.in_initial_design() && self.stds.iter().all(|s| *s < self.options.tol_scale)
    }
}

fn same_point(expected: &[Value], actual: &[Value]) -> bool {
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual.iter())
            .all(|(expected, actual)| match (expected, actual) {
                (Value::Real(expected), Value::Real(actual)) => {
                    relative_eq!(*expected, *actual, epsilon = 1e-12, max_relative = 1e-9)
                }
                _ => expected == actual,
            })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        core::{BoundsConfig, Transform},
        testing::*,
    };

    fn mixed() -> Bounds {
        BoundsConfig::new()
            .add_continuous("x", -2.0, 2.0)
            .add_continuous_with_transform("lr", 1e-4, 1.0, Transform::Log)
            .add_discrete("n", 0, 10)
            .add_categorical("kind", ["a", "b", "c"])
            .add_boolean("flag")
            .build()
            .unwrap()
    }

    fn mixed_objective(point: &[Value]) -> f64 {
        let x = point[0].as_f64().unwrap();
        let lr = point[1].as_f64().unwrap();
        let n = point[2].as_i64().unwrap();
        let kind = match point[3].as_str().unwrap() {
            "a" => 1.0,
            "b" => 0.0,
            _ => 2.0,
        };
        let flag = if point[4].as_bool().unwrap() { 0.0 } else { 0.5 };

        (x - 0.5).powi(2) + (lr.log10() + 2.0).powi(2) + ((n - 7) as f64).powi(2) + kind + flag
    }

    #[test]
    fn suggestions_are_contained() {
        let bounds = mixed();
        let mut optimizer = LocalSearch::builder(bounds.clone())
            .with_seed(3)
            .build()
            .unwrap();

        for _ in 0..200 {
            let point = optimizer.suggest().unwrap();
            assert!(bounds.contains(&point), "{:?} is outside", point);
            assert!(optimizer
                .center()
                .iter()
                .all(|c| (0.0..=1.0).contains(c)));
            optimizer.observe(&point, mixed_objective(&point)).unwrap();
        }

        assert!(optimizer.best().unwrap().value() < 3.0);
    }

    #[test]
    fn protocol_discipline() {
        let mut optimizer = LocalSearch::builder(Bounds::continuous(2, 0.0, 1.0).unwrap())
            .with_seed(1)
            .build()
            .unwrap();

        assert_eq!(optimizer.state(), State::Ready);
        assert!(matches!(
            optimizer.observe(&[Value::Real(0.5), Value::Real(0.5)], 1.0),
            Err(AskTellError::ProtocolViolation {
                operation: "observe",
                state: State::Ready
            })
        ));

        let point = optimizer.suggest().unwrap();
        assert_eq!(optimizer.state(), State::AwaitingObservation);
        assert_eq!(optimizer.pending(), Some(point.as_slice()));
        assert!(matches!(
            optimizer.suggest(),
            Err(AskTellError::ProtocolViolation {
                operation: "suggest",
                state: State::AwaitingObservation
            })
        ));

        assert!(matches!(
            optimizer.observe(&point[..1], 1.0),
            Err(AskTellError::Bounds(BoundsError::DimensionMismatch {
                expected: 2,
                actual: 1
            }))
        ));

        let mut other = point.clone();
        other[0] = Value::Real(point[0].as_f64().unwrap() + 0.1);
        assert_eq!(
            optimizer.observe(&other, 1.0),
            Err(AskTellError::PointMismatch)
        );

        // Failed calls leave the state untouched.
        assert_eq!(optimizer.state(), State::AwaitingObservation);
        assert_eq!(optimizer.iteration(), 0);
        assert!(optimizer.history().is_empty());

        optimizer.observe(&point, 1.0).unwrap();
        assert_eq!(optimizer.state(), State::Ready);
        assert_eq!(optimizer.iteration(), 1);
        assert_eq!(optimizer.history().len(), 1);
    }

    #[test]
    fn observe_tolerates_rounding() {
        let mut optimizer = LocalSearch::builder(Bounds::continuous(1, -1.0, 1.0).unwrap())
            .with_seed(2)
            .build()
            .unwrap();

        let point = optimizer.suggest().unwrap();
        let x = point[0].as_f64().unwrap();
        let reported = vec![Value::Real(x * (1.0 + 1e-12))];
        optimizer.observe(&reported, x * x).unwrap();
    }

    #[test]
    fn cancel() {
        let mut optimizer = LocalSearch::builder(Bounds::continuous(2, 0.0, 1.0).unwrap())
            .with_seed(4)
            .build()
            .unwrap();

        assert_eq!(optimizer.cancel(), None);

        let point = optimizer.suggest().unwrap();
        assert_eq!(optimizer.cancel(), Some(point));
        assert_eq!(optimizer.state(), State::Ready);
        assert_eq!(optimizer.iteration(), 0);

        let point = optimizer.suggest().unwrap();
        optimizer.observe(&point, 0.0).unwrap();
        assert_eq!(optimizer.iteration(), 1);
    }

    #[test]
    fn window_is_bounded() {
        let mut f = Sphere::new(2);
        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_seed(5)
            .build()
            .unwrap();

        assert_eq!(optimizer.window(), 14);
        assert_eq!(optimizer.init_count(), 5);

        iter(&mut optimizer, &mut f, 60, |optimizer, _, _| {
            assert!(optimizer.history().len() <= 14);
        })
        .unwrap();

        assert_eq!(optimizer.history().len(), 14);
        assert_eq!(optimizer.iteration(), 60);
        assert_eq!(
            optimizer.history().iter().map(Sample::index).min(),
            Some(46)
        );
    }

    #[test]
    fn scale_is_positive_definite() {
        let mut f = Rosenbrock::new(3);
        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_seed(6)
            .build()
            .unwrap();

        iter(&mut optimizer, &mut f, 300, |optimizer, _, _| {
            let scale = optimizer.scale();
            assert_relative_eq!(*scale, scale.transpose(), epsilon = 1e-12);
            assert!(scale.clone().cholesky().is_some());
            assert!(optimizer.stds().iter().all(|s| *s > 0.0));
        })
        .unwrap();
    }

    #[test]
    fn axis_aligned_without_orientation() {
        let mut f = Rosenbrock::new(2);
        let mut options = LocalSearchOptions::default();
        options.set_adapt_orientation(false).set_seed(Some(7));

        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_options(options)
            .build()
            .unwrap();

        minimize(&mut optimizer, &mut f, 100).unwrap();

        let scale = optimizer.scale();
        assert!(scale[(0, 1)].abs() < 1e-12);
        assert!(scale[(1, 0)].abs() < 1e-12);
    }

    #[test]
    fn reproducible_with_seed() {
        let run = |seed| {
            let mut f = Rosenbrock::new(2);
            let mut optimizer = LocalSearch::builder(f.bounds())
                .with_seed(seed)
                .build()
                .unwrap();
            let mut points = Vec::new();
            iter(&mut optimizer, &mut f, 50, |_, point, _| points.push(point.to_vec())).unwrap();
            points
        };

        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn entropy_seed_is_recorded() {
        let bounds = Bounds::continuous(1, 0.0, 1.0).unwrap();
        let optimizer = LocalSearch::new(bounds.clone()).unwrap();

        let mut first = LocalSearch::new(bounds.clone()).unwrap();
        let mut second = LocalSearch::builder(bounds)
            .with_seed(first.seed())
            .build()
            .unwrap();
        assert_eq!(first.suggest().unwrap(), second.suggest().unwrap());
        assert!(optimizer.options().seed().is_none());
    }

    #[test]
    fn sphere() {
        let mut f = Sphere::with_optimum(vec![1.0, -2.0]);
        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_seed(8)
            .build()
            .unwrap();

        let best = minimize(&mut optimizer, &mut f, 300).unwrap();
        assert!(best < 1e-3, "best = {}", best);
    }

    #[test]
    fn noisy_sphere() {
        let mut f = Noisy::new(Sphere::new(2), 1e-3, 9);
        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_seed(9)
            .build()
            .unwrap();

        minimize(&mut optimizer, &mut f, 300).unwrap();

        let best = optimizer.best().unwrap();
        let x = optimizer.bounds().to_native(best.point().as_slice()).unwrap();
        let x = numeric(&x).unwrap();
        assert!(f.inner().clone().is_optimum(&x, 0.1), "x = {:?}", x);
    }

    #[test]
    fn prior_center() {
        let bounds = Bounds::continuous(2, -5.0, 5.0).unwrap();
        let optimizer = LocalSearch::builder(bounds)
            .with_center(vec![Value::Real(2.0), Value::Real(-5.0)])
            .build()
            .unwrap();

        assert_relative_eq!(optimizer.center()[0], 0.7, epsilon = 1e-12);
        assert_relative_eq!(optimizer.center()[1], 0.0);
    }

    #[test]
    fn invalid_options() {
        let bounds = Bounds::continuous(2, 0.0, 1.0).unwrap();

        assert!(matches!(
            LocalSearch::builder(bounds.clone()).with_beta(0.0).build(),
            Err(AskTellError::InvalidParameter { name: "beta", .. })
        ));
        assert!(matches!(
            LocalSearch::builder(bounds.clone())
                .with_prior_sigma(f64::NAN)
                .build(),
            Err(AskTellError::InvalidParameter {
                name: "prior_sigma",
                ..
            })
        ));

        let mut options = LocalSearchOptions::default();
        options.set_forget_fn(|_| 0);
        assert!(matches!(
            LocalSearch::builder(bounds.clone())
                .with_options(options)
                .build(),
            Err(AskTellError::InvalidParameter {
                name: "forget_fn",
                ..
            })
        ));

        let mut options = LocalSearchOptions::default();
        options.set_shape_rate(1.5);
        assert!(LocalSearch::builder(bounds.clone())
            .with_options(options)
            .build()
            .is_err());

        assert!(matches!(
            LocalSearch::builder(bounds)
                .with_center(vec![Value::Real(2.0), Value::Real(0.0)])
                .build(),
            Err(AskTellError::Bounds(BoundsError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn discrete_axes_never_freeze() {
        let bounds = BoundsConfig::new()
            .add_discrete("n", 0, 10)
            .add_categorical("c", ["a", "b", "c", "d"])
            .build()
            .unwrap();
        let mut optimizer = LocalSearch::builder(bounds).with_seed(10).build().unwrap();

        for _ in 0..500 {
            let point = optimizer.suggest().unwrap();
            let n = point[0].as_i64().unwrap();
            let c = if point[1].as_str() == Some("b") { 0.0 } else { 1.0 };
            optimizer.observe(&point, (n - 3).abs() as f64 + c).unwrap();
        }

        // Resolutions are 1/10 and 1/4, quarter of them is the floor.
        assert!(optimizer.stds().iter().all(|s| *s >= 0.025 - 1e-12));
        assert!(!optimizer.converged());
        assert_eq!(optimizer.best().unwrap().value(), 0.0);
    }

    #[test]
    fn non_finite_values() {
        let mut optimizer = LocalSearch::builder(Bounds::continuous(2, -1.0, 1.0).unwrap())
            .with_seed(11)
            .build()
            .unwrap();

        for i in 0..100 {
            let point = optimizer.suggest().unwrap();
            let value = if i % 3 == 0 {
                f64::NAN
            } else {
                numeric(&point).unwrap().iter().map(|x| x * x).sum()
            };
            optimizer.observe(&point, value).unwrap();
        }

        assert!(optimizer.best().unwrap().value().is_finite());
        assert!(optimizer.scale().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn converges_and_restarts() {
        let mut f = Sphere::new(1);
        let mut options = LocalSearchOptions::default();
        options.set_seed(Some(12)).set_tol_scale(1e-6);

        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_options(options.clone())
            .build()
            .unwrap();

        let mut converged_at = None;
        iter(&mut optimizer, &mut f, 3000, |optimizer, _, _| {
            if converged_at.is_none() && optimizer.converged() {
                converged_at = Some(optimizer.iteration());
            }
        })
        .unwrap();
        assert!(converged_at.is_some());
        assert_eq!(optimizer.restarts(), 0);

        options.set_restarts(true);
        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_options(options)
            .build()
            .unwrap();
        minimize(&mut optimizer, &mut f, 3000).unwrap();
        assert!(optimizer.restarts() >= 1);
    }

    fn design_strata(optimizer: &mut LocalSearch, f: &mut impl TestFunction) -> Vec<Vec<usize>> {
        let n = optimizer.init_count();
        let dim = optimizer.bounds().dim();
        let mut strata = vec![Vec::new(); dim];

        for _ in 0..n {
            let point = optimizer.suggest().unwrap();
            let u = optimizer.bounds().to_normalized(&point).unwrap();
            for (axis, ui) in u.iter().enumerate() {
                strata[axis].push(((ui * n as f64).floor() as usize).min(n - 1));
            }
            optimizer.observe(&point, f.eval(&numeric(&point).unwrap())).unwrap();
        }

        strata.iter_mut().for_each(|axis| axis.sort_unstable());
        strata
    }

    #[test]
    fn latin_hypercube_initial_design() {
        let mut f = Rosenbrock::new(3);
        let mut options = LocalSearchOptions::default();
        options
            .set_seed(Some(13))
            .set_initial_design(InitialDesign::LatinHypercube);

        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_options(options)
            .build()
            .unwrap();
        assert_eq!(optimizer.init_count(), 7);

        // Exactly one point in each of the 7 strata on every axis.
        let strata = design_strata(&mut optimizer, &mut f);
        for axis in strata {
            assert_eq!(axis, (0..7).collect::<Vec<_>>());
        }
    }

    #[test]
    fn uniform_initial_design_covers_space() {
        let mut f = Sphere::new(2);
        let mut options = LocalSearchOptions::default();
        options
            .set_seed(Some(14))
            .set_initial_design(InitialDesign::Uniform)
            .set_init_fn(|_| 40)
            .set_prior_sigma(0.01);

        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_options(options)
            .build()
            .unwrap();

        // A Gaussian design with this spread would stay near the center.
        let mut far = 0;
        for _ in 0..40 {
            let point = optimizer.suggest().unwrap();
            let u = optimizer.bounds().to_normalized(&point).unwrap();
            if u.iter().any(|ui| (ui - 0.5).abs() > 0.25) {
                far += 1;
            }
            optimizer.observe(&point, 1.0).unwrap();
        }
        assert!(far > 10, "far = {}", far);
    }

    #[test]
    fn cancelled_design_point_is_suggested_again() {
        let mut options = LocalSearchOptions::default();
        options
            .set_seed(Some(15))
            .set_initial_design(InitialDesign::LatinHypercube);

        let mut optimizer = LocalSearch::builder(Bounds::continuous(2, 0.0, 1.0).unwrap())
            .with_options(options)
            .build()
            .unwrap();

        let first = optimizer.suggest().unwrap();
        assert_eq!(optimizer.cancel(), Some(first.clone()));
        assert_eq!(optimizer.suggest().unwrap(), first);
    }

    #[test]
    fn restart_plans_new_design() {
        let mut f = Sphere::new(1);
        let mut options = LocalSearchOptions::default();
        options
            .set_seed(Some(12))
            .set_tol_scale(1e-6)
            .set_restarts(true)
            .set_initial_design(InitialDesign::LatinHypercube);

        let mut optimizer = LocalSearch::builder(f.bounds())
            .with_options(options)
            .build()
            .unwrap();

        let mut iters = 0;
        while optimizer.restarts() == 0 && iters < 10_000 {
            let point = optimizer.suggest().unwrap();
            optimizer
                .observe(&point, f.eval(&numeric(&point).unwrap()))
                .unwrap();
            iters += 1;
        }
        assert_eq!(optimizer.restarts(), 1);

        let strata = design_strata(&mut optimizer, &mut f);
        assert_eq!(strata, vec![vec![0, 1, 2]]);
    }
}
