use askopt::{
    algo::LocalSearch, infallible, AskTell, AskTellError, Bounds, Runner, State, Value,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

struct Random {
    bounds: Bounds,
    rng: StdRng,
    pending: Option<Vec<Value>>,
    iteration: usize,
}

impl Random {
    fn new(bounds: Bounds, seed: u64) -> Self {
        Self {
            bounds,
            rng: StdRng::seed_from_u64(seed),
            pending: None,
            iteration: 0,
        }
    }
}

impl AskTell for Random {
    const NAME: &'static str = "Random";

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

        // Randomly sample in the normalized space.
        let u = (0..self.bounds.dim())
            .map(|_| self.rng.gen::<f64>())
            .collect::<Vec<_>>();
        let point = self.bounds.to_native(&u)?;

        self.pending = Some(point.clone());
        Ok(point)
    }

    fn observe(&mut self, point: &[Value], _value: f64) -> Result<(), AskTellError> {
        match self.pending.take() {
            Some(pending) if pending == point => {
                self.iteration += 1;
                Ok(())
            }
            Some(pending) => {
                self.pending = Some(pending);
                Err(AskTellError::PointMismatch)
            }
            None => Err(AskTellError::ProtocolViolation {
                operation: "observe",
                state: State::Ready,
            }),
        }
    }

    fn cancel(&mut self) -> Option<Vec<Value>> {
        self.pending.take()
    }
}

// https://en.wikipedia.org/wiki/Rosenbrock_function
fn rosenbrock(point: &[Value]) -> f64 {
    let x = point.iter().filter_map(Value::as_f64).collect::<Vec<_>>();
    (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2)
}

fn run<A: AskTell>(optimizer: A) -> Result<f64, String> {
    let mut runner = Runner::builder(optimizer, infallible(rosenbrock))
        .with_max_samples(500)
        .build()
        .map_err(|error| format!("{error}"))?;

    let report = runner.run().map_err(|error| format!("{error}"))?;
    println!(
        "{}: f(x) = {:.3e}\tx = {:?}",
        runner.name(),
        report.best_value(),
        report.best_point()
    );

    Ok(report.best_value())
}

fn main() -> Result<(), String> {
    let bounds = Bounds::continuous(2, -2.0, 2.0).map_err(|error| format!("{error}"))?;

    run(Random::new(bounds.clone(), 1))?;

    let optimizer = LocalSearch::builder(bounds)
        .with_seed(1)
        .build()
        .map_err(|error| format!("{error}"))?;
    run(optimizer)?;

    Ok(())
}
