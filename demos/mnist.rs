// 784-32-10 sigmoid network on MNIST, traced per epoch.
//   cargo run --release --example mnist -- <data dir> [out dir]
// The data dir must hold the four uncompressed IDX files.
use std::path::PathBuf;

use anyhow::{bail, Context};
use log::info;

use densenet::data::idx::load_idx_pair;
use densenet::{Model, QuadraticLoss, Sgd, Sigmoid, TrainConfig, Tracer, Trainer};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data".into()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".into()));

    let train = load_idx_pair(
        data_dir.join("train-images-idx3-ubyte"),
        data_dir.join("train-labels-idx1-ubyte"),
        10,
    );
    let test = load_idx_pair(
        data_dir.join("t10k-images-idx3-ubyte"),
        data_dir.join("t10k-labels-idx1-ubyte"),
        10,
    );
    if train.is_empty() || test.is_empty() {
        bail!("no MNIST data under {}", data_dir.display());
    }

    let config = TrainConfig::new(300, 3.0).with_minibatch(100).with_seed(1);

    let mut model = Model::new();
    model.input(784).push_layer(32).push_layer(10).init(0);
    let mut trainer = Trainer::new(model, Sigmoid, QuadraticLoss, Sgd::new());

    let mut tracer = Tracer::new(&train, &test);
    tracer.init(
        config.nb_epochs,
        config.minibatch_size.unwrap_or(0),
        config.learning_rate,
    );
    trainer.fit_with_trace(&train, &config, &mut tracer)?;

    if let Some(last) = tracer.stats().last() {
        info!(
            "test accuracy after {} epochs: {:.2} %",
            last.epoch + 1,
            last.test_accuracy
        );
    }
    let path = tracer.dump(&out_dir).context("failed to write the trace")?;
    println!("trace written to {}", path.display());
    Ok(())
}
