use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// Hyperparameters for a [`Trainer::fit`](crate::train::Trainer::fit) run.
///
/// # Fields
/// - `nb_epochs`: number of optimizer steps (one per epoch)
/// - `minibatch_size`: `None` trains full-batch, `Some(n)` samples windows
///   of `n` entries
/// - `learning_rate`: step size handed to the optimizer
/// - `seed`: seeds the minibatch sampler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub nb_epochs: usize,
    #[serde(default)]
    pub minibatch_size: Option<usize>,
    pub learning_rate: f64,
    #[serde(default)]
    pub seed: u64,
}

impl TrainConfig {
    /// Full-batch config with seed 0.
    pub fn new(nb_epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            nb_epochs,
            minibatch_size: None,
            learning_rate,
            seed: 0,
        }
    }

    pub fn with_minibatch(mut self, size: usize) -> Self {
        self.minibatch_size = Some(size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.nb_epochs == 0 {
            return Err(NetError::InvalidConfig("nb_epochs must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetError::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if self.minibatch_size == Some(0) {
            return Err(NetError::InvalidConfig("minibatch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Reads and validates a config from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
        let file = File::open(path)?;
        let config: TrainConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
