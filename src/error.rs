use thiserror::Error;

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, NetError>;

/// Recoverable failures. Shape violations inside the numeric core are not
/// represented here: they panic at the call site.
#[derive(Debug, Error)]
pub enum NetError {
    /// A new layer's input width does not chain onto the previous layer.
    #[error("layer {index} has {nb_nodes} nodes and layer {next} has {nb_inputs} inputs")]
    LayerMismatch {
        index: usize,
        next: usize,
        nb_nodes: usize,
        nb_inputs: usize,
    },

    /// `push_layer` was called before any input width was declared.
    #[error("cannot infer the input width of the first layer; declare it with Model::input")]
    MissingInputWidth,

    /// A persisted buffer does not match the shape it claims to have.
    #[error("shape mismatch for {what}: got {got}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid IDX data: {0}")]
    InvalidIdx(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
