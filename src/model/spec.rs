use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::model::model::Model;

/// Describes one layer in a model specification.
///
/// `input_size` may be omitted; it is then inferred from the previous layer
/// (or from `ModelSpec::input_size` for the first one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    #[serde(default)]
    pub input_size: Option<usize>,
}

/// A serializable architecture description: input width, layer widths and
/// the initialization seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub input_size: usize,
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub seed: u64,
}

impl ModelSpec {
    /// Builds and initializes the model. Chaining errors are returned, not
    /// fatal.
    pub fn build(&self) -> Result<Model> {
        if self.layers.is_empty() {
            return Err(NetError::InvalidConfig("a model needs at least one layer".into()));
        }
        let mut model = Model::new();
        model.input(self.input_size);
        for layer in &self.layers {
            match layer.input_size {
                Some(nb_inputs) => model.try_add_layer(nb_inputs, layer.size)?,
                None => model.try_push_layer(layer.size)?,
            }
        }
        model.init(self.seed);
        Ok(model)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Deserializes a `ModelSpec` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<ModelSpec> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
