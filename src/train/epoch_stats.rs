use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// The loop hands one `EpochStats` to its callback at the end of every
/// epoch and also returns the full history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over every sample seen in this epoch.
    pub train_loss: f64,
    /// Fraction in [0, 1] of samples seen in this epoch whose argmax output
    /// matched the target (measured with dropout active).
    pub train_accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
