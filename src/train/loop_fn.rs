use std::time::Instant;

use log::{info, trace, warn};

use crate::{
    activation::Activation,
    data::{DatasetEntry, MinibatchGenerator},
    error::{NetError, Result},
    loss::Cost,
    optim::Optimizer,
};

use super::{tracer::TraceSink, train_config::TrainConfig, trainer::Trainer};

impl<A: Activation, C: Cost, O: Optimizer> Trainer<A, C, O> {
    // -----------------------------------------------------------------------
    // Full-batch
    // -----------------------------------------------------------------------

    /// Full-batch gradient descent: every epoch is one optimizer step over
    /// the whole dataset, in stored order.
    ///
    /// # Arguments
    /// - `dataset`:       samples, each input as wide as the first layer
    /// - `nb_epochs`:     number of optimizer steps
    /// - `learning_rate`: step size handed to the optimizer
    ///
    /// An empty dataset logs a warning and leaves the model as it is.
    ///
    /// # Panics
    /// Panics if an input or target does not match the model's widths.
    pub fn train(&mut self, dataset: &[DatasetEntry], nb_epochs: usize, learning_rate: f64) {
        self.run_full_batch(dataset, nb_epochs, learning_rate, None);
    }

    /// [`Trainer::train`], calling `sink` once after every epoch.
    ///
    /// # Panics
    /// Same conditions as [`Trainer::train`].
    pub fn train_with_trace(
        &mut self,
        dataset: &[DatasetEntry],
        nb_epochs: usize,
        learning_rate: f64,
        sink: &mut dyn TraceSink,
    ) {
        self.run_full_batch(dataset, nb_epochs, learning_rate, Some(sink));
    }

    // -----------------------------------------------------------------------
    // Minibatch
    // -----------------------------------------------------------------------

    /// Minibatch gradient descent: each of the `nb_epochs` iterations draws
    /// one window from a [`MinibatchGenerator`] seeded with `seed` and takes
    /// one optimizer step on it.
    ///
    /// # Panics
    /// Panics if `minibatch_size` is 0 or larger than a non-empty dataset,
    /// or if a sample does not match the model's widths.
    pub fn train_minibatch(
        &mut self,
        dataset: &[DatasetEntry],
        minibatch_size: usize,
        nb_epochs: usize,
        learning_rate: f64,
        seed: u64,
    ) {
        self.run_minibatch(dataset, minibatch_size, nb_epochs, learning_rate, seed, None);
    }

    /// [`Trainer::train_minibatch`], calling `sink` once after every epoch.
    ///
    /// # Panics
    /// Same conditions as [`Trainer::train_minibatch`].
    pub fn train_minibatch_with_trace(
        &mut self,
        dataset: &[DatasetEntry],
        minibatch_size: usize,
        nb_epochs: usize,
        learning_rate: f64,
        seed: u64,
        sink: &mut dyn TraceSink,
    ) {
        self.run_minibatch(
            dataset,
            minibatch_size,
            nb_epochs,
            learning_rate,
            seed,
            Some(sink),
        );
    }

    // -----------------------------------------------------------------------
    // Config-driven entry points
    // -----------------------------------------------------------------------

    /// Validates `config` against `dataset` and runs the matching loop.
    ///
    /// Returns `NetError::InvalidConfig` instead of panicking on a bad
    /// config or a minibatch wider than the dataset; nothing is trained in
    /// that case.
    pub fn fit(&mut self, dataset: &[DatasetEntry], config: &TrainConfig) -> Result<()> {
        self.dispatch(dataset, config, None)
    }

    pub fn fit_with_trace(
        &mut self,
        dataset: &[DatasetEntry],
        config: &TrainConfig,
        sink: &mut dyn TraceSink,
    ) -> Result<()> {
        self.dispatch(dataset, config, Some(sink))
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn dispatch(
        &mut self,
        dataset: &[DatasetEntry],
        config: &TrainConfig,
        sink: Option<&mut dyn TraceSink>,
    ) -> Result<()> {
        config.validate()?;
        match config.minibatch_size {
            None => self.run_full_batch(dataset, config.nb_epochs, config.learning_rate, sink),
            Some(size) => {
                if !dataset.is_empty() && size > dataset.len() {
                    return Err(NetError::InvalidConfig(format!(
                        "minibatch size {size} exceeds dataset length {}",
                        dataset.len()
                    )));
                }
                self.run_minibatch(
                    dataset,
                    size,
                    config.nb_epochs,
                    config.learning_rate,
                    config.seed,
                    sink,
                )
            }
        }
        Ok(())
    }

    fn run_full_batch(
        &mut self,
        dataset: &[DatasetEntry],
        nb_epochs: usize,
        learning_rate: f64,
        mut sink: Option<&mut dyn TraceSink>,
    ) {
        if dataset.is_empty() {
            warn!("training on an empty dataset, nothing to do");
            return;
        }
        info!(
            "full-batch training: {} samples, {nb_epochs} epochs, lr={learning_rate}",
            dataset.len()
        );
        let t_start = Instant::now();

        for epoch in 0..nb_epochs {
            self.update_minibatch(dataset, learning_rate);
            trace!("epoch {epoch} done");
            if let Some(sink) = sink.as_deref_mut() {
                sink.trace(epoch, &*self);
            }
        }

        info!("training finished in {} ms", t_start.elapsed().as_millis());
    }

    fn run_minibatch(
        &mut self,
        dataset: &[DatasetEntry],
        minibatch_size: usize,
        nb_epochs: usize,
        learning_rate: f64,
        seed: u64,
        mut sink: Option<&mut dyn TraceSink>,
    ) {
        if dataset.is_empty() {
            warn!("training on an empty dataset, nothing to do");
            return;
        }
        let mut minibatch = MinibatchGenerator::new(dataset, minibatch_size, seed);
        if dataset.len() % minibatch_size != 0 {
            warn!(
                "minibatch size {minibatch_size} does not divide {} samples; {} are skipped per pass",
                dataset.len(),
                dataset.len() % minibatch_size
            );
        }
        info!(
            "minibatch training: {} samples, batches of {minibatch_size}, {nb_epochs} epochs, lr={learning_rate}, seed={seed}",
            dataset.len()
        );
        let t_start = Instant::now();

        for epoch in 0..nb_epochs {
            minibatch.generate();
            self.update_minibatch(minibatch.iter(), learning_rate);
            trace!("epoch {epoch} done");
            if let Some(sink) = sink.as_deref_mut() {
                sink.trace(epoch, &*self);
            }
        }

        info!("training finished in {} ms", t_start.elapsed().as_millis());
    }
}
