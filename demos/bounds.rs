use std::collections::HashMap;

use askopt::{
    algo::LocalSearch, AskTell, BoundsConfig, DimensionSpec, Runner, Transform, Value,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("parameter {0} has unexpected type")]
struct UnexpectedType(&'static str);

// Score of a made-up training run, lower is better.
fn validation_loss(params: &HashMap<&str, &Value>) -> Result<f64, UnexpectedType> {
    let lr = params["learning_rate"]
        .as_f64()
        .ok_or(UnexpectedType("learning_rate"))?;
    let layers = params["layers"].as_i64().ok_or(UnexpectedType("layers"))? as f64;
    let dropout = params["dropout"].as_f64().ok_or(UnexpectedType("dropout"))?;
    let penalty = match params["activation"]
        .as_str()
        .ok_or(UnexpectedType("activation"))?
    {
        "gelu" => 0.0,
        "relu" => 0.05,
        _ => 0.2,
    };
    let norm = if params["batch_norm"]
        .as_bool()
        .ok_or(UnexpectedType("batch_norm"))?
    {
        0.0
    } else {
        0.1
    };

    Ok((lr.log10() + 3.0).powi(2) + 0.1 * (layers - 4.0).powi(2) + (dropout - 0.2).powi(2)
        + penalty
        + norm)
}

fn main() -> Result<(), String> {
    let dropout = DimensionSpec {
        name: "dropout".to_string(),
        kind: "real".parse().map_err(|error| format!("{error}"))?,
        transform: Some(Transform::Logit),
        range: Some((0.01, 0.9)),
        categories: None,
    };

    let bounds = BoundsConfig::new()
        .add_continuous_with_transform("learning_rate", 1e-6, 1.0, Transform::Log)
        .add_discrete("layers", 1, 12)
        .add_spec(dropout)
        .add_categorical("activation", ["relu", "tanh", "gelu"])
        .add_boolean("batch_norm")
        .build()
        .map_err(|error| format!("{error}"))?;

    println!("search space:\n{}\n", bounds);

    let names = bounds.names().collect::<Vec<_>>();
    let optimizer = LocalSearch::builder(bounds.clone())
        .with_seed(7)
        .build()
        .map_err(|error| format!("{error}"))?;

    let objective = |point: &[Value]| {
        let params = names.iter().copied().zip(point.iter()).collect::<HashMap<_, _>>();
        validation_loss(&params)
    };

    let mut runner = Runner::builder(optimizer, objective)
        .with_max_samples(300)
        .with_target(0.0)
        .with_target_tol(1e-3)
        .build()
        .map_err(|error| format!("{error}"))?;

    let report = runner.run().map_err(|error| format!("{error}"))?;

    println!(
        "{} after {} evaluations ({:?}), best loss = {:.4}",
        report.termination(),
        report.evaluations(),
        report.elapsed(),
        report.best_value()
    );
    for (name, value) in names.iter().zip(report.best_point()) {
        println!("  {name} = {value}");
    }
    println!("optimizer iteration = {}", runner.optimizer().iteration());

    Ok(())
}
