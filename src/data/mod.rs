pub mod dataset;
pub mod encoder;
pub mod sampler;

pub use dataset::Dataset;
pub use encoder::LabelEncoder;
pub use sampler::{holdout_size, sample_holdout, training_indices, SampleMode};
