use crate::loss::loss_type::LossType;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`          — number of epochs to run
/// - `steps_per_epoch` — mini-batch updates per epoch; fixed, not derived
///                       from the dataset size
/// - `batch_size`      — samples per mini-batch; use `1` for online updates
/// - `loss_type`       — which loss function to use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub steps_per_epoch: usize,
    pub batch_size: usize,
    pub loss_type: LossType,
}

impl TrainConfig {
    pub fn new(epochs: usize, steps_per_epoch: usize, batch_size: usize, loss_type: LossType) -> Self {
        TrainConfig {
            epochs,
            steps_per_epoch,
            batch_size,
            loss_type,
        }
    }
}
