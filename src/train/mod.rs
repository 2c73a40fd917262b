pub mod epoch_stats;
pub mod evaluation;
pub mod loop_fn;
pub mod tracer;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use evaluation::{Evaluate, Evaluation};
pub use tracer::{TraceSink, Tracer};
pub use train_config::TrainConfig;
pub use trainer::{ForwardPass, Trainer};
