use askopt::{algo::LocalSearch, infallible, AskTell, Bounds, Runner, Value};

// https://en.wikipedia.org/wiki/Rosenbrock_function
struct Rosenbrock {
    a: f64,
    b: f64,
}

impl Rosenbrock {
    fn eval(&self, point: &[Value]) -> f64 {
        let x = point.iter().filter_map(Value::as_f64).collect::<Vec<_>>();
        (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
    }
}

fn main() -> Result<(), String> {
    let f = Rosenbrock { a: 1.0, b: 100.0 };
    let bounds = Bounds::continuous(2, -5.0, 5.0).map_err(|error| format!("{error}"))?;
    let optimizer = LocalSearch::builder(bounds)
        .with_seed(2024)
        .build()
        .map_err(|error| format!("{error}"))?;

    let tolerance = 1e-6;

    let mut runner = Runner::builder(optimizer, infallible(|x: &[Value]| f.eval(x)))
        .with_max_samples(2000)
        .with_target(tolerance)
        .build()
        .map_err(|error| format!("{error}"))?;

    loop {
        let (x, value) = runner.next().map_err(|error| format!("{error}"))?;
        let iter = runner.optimizer().iteration();

        if iter % 50 == 0 {
            println!(
                "iter = {}\tf(x) = {:.3e}\tbest = {:.3e}\tx = {:?}",
                iter,
                value,
                runner.best_value(),
                x
            );
        }

        if runner.best_value() <= tolerance || iter >= 2000 {
            break;
        }
    }

    println!("best = {:?}", runner.best_point());

    if runner.best_value() <= tolerance {
        Ok(())
    } else {
        Err("did not converge".to_string())
    }
}
