pub mod mse;
pub mod categorical_cross_entropy;
pub mod loss_type;

pub use mse::MseLoss;
pub use categorical_cross_entropy::CategoricalCrossEntropyLoss;
pub use loss_type::LossType;
