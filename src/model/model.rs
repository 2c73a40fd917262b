use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, error};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{NetError, Result},
    layers::Layer,
};

/// An ordered stack of dense layers. Each layer's `nb_inputs` equals the
/// previous layer's `nb_nodes`; the first one matches the declared input
/// width when there is one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    input_width: Option<usize>,
    layers: Vec<Layer>,
}

impl Model {
    pub fn new() -> Model {
        Model::default()
    }

    /// Declares the width of the input vectors, so that layers can be added
    /// with [`Model::push_layer`].
    pub fn input(&mut self, width: usize) -> &mut Model {
        if let Some(first) = self.layers.first() {
            assert_eq!(
                first.nb_inputs(),
                width,
                "first layer already takes {} inputs",
                first.nb_inputs()
            );
        }
        self.input_width = Some(width);
        self
    }

    /// Appends a zero-filled `nb_nodes x nb_inputs` layer. On a chaining
    /// mismatch the model is cleared and an error is returned.
    pub fn try_add_layer(&mut self, nb_inputs: usize, nb_nodes: usize) -> Result<()> {
        if let Some(expected) = self.output_width() {
            if expected != nb_inputs {
                let index = self.layers.len();
                self.clear();
                return Err(NetError::LayerMismatch {
                    index,
                    next: index + 1,
                    nb_nodes: expected,
                    nb_inputs,
                });
            }
        }
        self.layers.push(Layer::new(nb_inputs, nb_nodes));
        Ok(())
    }

    /// Same as [`Model::try_add_layer`] but a mismatch is fatal.
    pub fn add_layer(&mut self, nb_inputs: usize, nb_nodes: usize) -> &mut Model {
        if let Err(e) = self.try_add_layer(nb_inputs, nb_nodes) {
            error!("{e}");
            panic!("cannot add layer: {e}");
        }
        self
    }

    /// Appends a layer whose input width is inferred from the previous layer
    /// or from the declared input width.
    pub fn try_push_layer(&mut self, nb_nodes: usize) -> Result<()> {
        let nb_inputs = self.output_width().ok_or(NetError::MissingInputWidth)?;
        self.try_add_layer(nb_inputs, nb_nodes)
    }

    pub fn push_layer(&mut self, nb_nodes: usize) -> &mut Model {
        if let Err(e) = self.try_push_layer(nb_nodes) {
            error!("{e}");
            panic!("cannot add layer: {e}");
        }
        self
    }

    /// Draws every weight then every bias of each layer, in order, from
    /// N(0, 1). The same seed always yields the same parameters.
    pub fn init(&mut self, seed: u64) -> &mut Model {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for layer in &mut self.layers {
            for w in layer.weights.as_mut_slice() {
                *w = rng.sample(StandardNormal);
            }
            for b in layer.biases.as_mut_slice() {
                *b = rng.sample(StandardNormal);
            }
        }
        debug!("initialized {} layers with seed {seed}", self.layers.len());
        self
    }

    /// Drops every layer. The declared input width is kept.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to the parameters. The slice cannot grow or shrink, so
    /// the chaining invariant only depends on callers keeping shapes intact.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn input_width(&self) -> Option<usize> {
        self.layers
            .first()
            .map(Layer::nb_inputs)
            .or(self.input_width)
    }

    /// Width produced by the last layer, or the declared input width if the
    /// model has no layers yet.
    pub fn output_width(&self) -> Option<usize> {
        self.layers.last().map(Layer::nb_nodes).or(self.input_width)
    }

    /// Re-validates every invariant, for models that were not built through
    /// `add_layer`.
    pub fn check_shape(&self) -> Result<()> {
        let mut expected = self.input_width;
        for (index, layer) in self.layers.iter().enumerate() {
            layer.check_shape()?;
            if let Some(width) = expected {
                if width != layer.nb_inputs() {
                    return Err(NetError::LayerMismatch {
                        index,
                        next: index + 1,
                        nb_nodes: width,
                        nb_inputs: layer.nb_inputs(),
                    });
                }
            }
            expected = Some(layer.nb_nodes());
        }
        Ok(())
    }

    /// Serializes the model parameters to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Deserializes a model written by `save_json` and checks its shapes.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Model> {
        let file = File::open(path)?;
        let model: Model = serde_json::from_reader(BufReader::new(file))?;
        model.check_shape()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_layer_chains_shapes() {
        let mut m = Model::new();
        m.add_layer(3, 4).add_layer(4, 2);
        assert_eq!(m.len(), 2);
        assert_eq!(m.layers()[0].weights.shape(), (4, 3));
        assert_eq!(m.layers()[1].weights.shape(), (2, 4));
        assert_eq!(m.input_width(), Some(3));
        assert_eq!(m.output_width(), Some(2));
    }

    #[test]
    fn push_layer_infers_inputs() {
        let mut m = Model::new();
        m.input(784).push_layer(32).push_layer(10);
        assert_eq!(m.layers()[0].nb_inputs(), 784);
        assert_eq!(m.layers()[1].nb_inputs(), 32);
        assert_eq!(m.layers()[1].nb_nodes(), 10);
    }

    #[test]
    fn mismatch_clears_model() {
        let mut m = Model::new();
        m.add_layer(2, 3);
        let err = m.try_add_layer(4, 1).unwrap_err();
        assert!(matches!(
            err,
            NetError::LayerMismatch { index: 1, next: 2, nb_nodes: 3, nb_inputs: 4 }
        ));
        assert!(m.is_empty());
    }

    #[test]
    fn first_layer_must_match_declared_input() {
        let mut m = Model::new();
        m.input(5);
        assert!(m.try_add_layer(4, 2).is_err());
        assert!(m.is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot add layer")]
    fn add_layer_mismatch_is_fatal() {
        let mut m = Model::new();
        m.add_layer(2, 3).add_layer(2, 1);
    }

    #[test]
    fn push_layer_without_input_width_fails() {
        let mut m = Model::new();
        assert!(matches!(m.try_push_layer(3), Err(NetError::MissingInputWidth)));
    }

    #[test]
    fn init_is_reproducible() {
        let mut a = Model::new();
        a.add_layer(3, 4).add_layer(4, 2).init(7);
        let mut b = Model::new();
        b.add_layer(3, 4).add_layer(4, 2).init(7);
        assert_eq!(a, b);

        let mut c = b.clone();
        c.init(8);
        assert_ne!(b, c);
    }

    #[test]
    fn init_fills_every_parameter() {
        let mut m = Model::new();
        m.add_layer(10, 10).init(0);
        let layer = &m.layers()[0];
        assert!(layer.weights.as_slice().iter().all(|w| *w != 0.0));
        assert!(layer.biases.iter().all(|b| *b != 0.0));
    }

    #[test]
    fn clear_drops_layers() {
        let mut m = Model::new();
        m.add_layer(2, 2).add_layer(2, 1);
        m.clear();
        assert!(m.is_empty());
    }

    #[test]
    fn json_round_trip_revalidates() {
        let mut m = Model::new();
        m.add_layer(2, 3).add_layer(3, 1).init(3);
        let path = std::env::temp_dir().join(format!("densenet-model-{}.json", std::process::id()));
        m.save_json(&path).unwrap();
        let loaded = Model::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, m);
    }
}
