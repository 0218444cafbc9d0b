pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{Dense, Dropout, Layer};
pub use network::network::Network;
pub use network::spec::NetworkSpec;
pub use loss::{CategoricalCrossEntropyLoss, LossType};
pub use optim::{Adam, Optimizer, Sgd};
pub use train::{evaluate, train_loop, EpochStats, TrainConfig};
pub use data::{Dataset, LabelEncoder, SampleMode};
pub use config::PipelineConfig;
pub use error::{GlyphError, Result};
