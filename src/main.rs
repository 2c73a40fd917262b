// Trains a 2-2-1 sigmoid model on the OR gate and prints its predictions.
// An optional JSON TrainConfig path overrides the default run:
//   cargo run -- config.json
use anyhow::Context;
use log::info;

use densenet::{Dataset, Evaluate, Model, QuadraticLoss, Sgd, Sigmoid, TrainConfig, Trainer};

fn or_gate() -> Dataset {
    Dataset::from_pairs(
        vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
        vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]],
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => TrainConfig::load_json(&path)
            .with_context(|| format!("failed to load training config from {path}"))?,
        None => TrainConfig::new(10_000, 2.0),
    };

    let mut model = Model::new();
    model.add_layer(2, 2).add_layer(2, 1).init(config.seed);

    let dataset = or_gate();
    let mut trainer = Trainer::new(model, Sigmoid, QuadraticLoss, Sgd::new());
    trainer
        .fit(&dataset, &config)
        .context("training run rejected")?;

    let eval = trainer.evaluate(&dataset);
    info!("final cost {:.6}", eval.cost);
    for entry in dataset.iter() {
        println!(
            "{:?} -> {:.4}",
            entry.input.as_slice(),
            trainer.predict(&entry.input)[0]
        );
    }
    Ok(())
}
