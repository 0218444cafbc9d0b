use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::layers::{Gradients, Layer};
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::optim::Optimizer;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of `config.steps_per_epoch`
/// mini-batch updates each and returns the per-epoch history.
///
/// Batches are drawn from a shuffled permutation of the samples; when the
/// permutation is used up it is reshuffled, so an epoch may see some rows
/// several times or not at all depending on the dataset size.
///
/// `on_epoch` is called with each epoch's stats as soon as it finishes.
///
/// # Panics
/// Panics if `inputs` is empty, lengths mismatch, or `batch_size == 0`.
pub fn train_loop<O, R, F>(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    optimizer: &mut O,
    config: &TrainConfig,
    rng: &mut R,
    mut on_epoch: F,
) -> Vec<EpochStats>
where
    O: Optimizer + ?Sized,
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    assert!(!inputs.is_empty(), "inputs must not be empty");
    assert_eq!(inputs.len(), labels.len(), "inputs and labels must have equal length");
    assert!(config.batch_size > 0, "batch_size must be at least 1");

    let mut batches = BatchCursor::new(inputs.len(), rng);
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();
        let mut running = StepTotals::default();

        for _ in 0..config.steps_per_epoch {
            let batch = batches.next_batch(config.batch_size, rng);
            let step = run_one_step(network, inputs, labels, &batch, optimizer, config.loss_type, rng);
            running.add(&step);
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: running.mean_loss(),
            train_accuracy: running.accuracy(),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            epoch,
            loss = stats.train_loss,
            accuracy = stats.train_accuracy,
            samples = running.samples,
            "epoch finished"
        );

        on_epoch(&stats);
        history.push(stats);
    }

    history
}

/// Loss and categorical accuracy of a network on a labelled set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loss: f64,
    /// Fraction in [0, 1].
    pub accuracy: f64,
}

/// Evaluates in inference mode (dropout disabled). An empty set yields zero
/// loss and zero accuracy.
pub fn evaluate(
    network: &Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    loss_type: LossType,
) -> Evaluation {
    let mut totals = StepTotals::default();
    for (input, label) in inputs.iter().zip(labels.iter()) {
        let output = network.predict(input);
        totals.loss += loss_type.loss(&output, label);
        totals.correct += usize::from(argmax(&output) == argmax(label));
        totals.samples += 1;
    }
    Evaluation { loss: totals.mean_loss(), accuracy: totals.accuracy() }
}

/// Index of the maximum element in a slice; the first one wins on ties.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct StepTotals {
    loss: f64,
    correct: usize,
    samples: usize,
}

impl StepTotals {
    fn add(&mut self, other: &StepTotals) {
        self.loss += other.loss;
        self.correct += other.correct;
        self.samples += other.samples;
    }

    fn mean_loss(&self) -> f64 {
        if self.samples == 0 { 0.0 } else { self.loss / self.samples as f64 }
    }

    fn accuracy(&self) -> f64 {
        if self.samples == 0 { 0.0 } else { self.correct as f64 / self.samples as f64 }
    }
}

/// Walks a shuffled permutation of sample indices, reshuffling on wrap.
struct BatchCursor {
    order: Vec<usize>,
    position: usize,
}

impl BatchCursor {
    fn new<R: Rng + ?Sized>(n: usize, rng: &mut R) -> BatchCursor {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        BatchCursor { order, position: 0 }
    }

    /// Next `batch_size` indices; the last batch of a pass may be shorter.
    fn next_batch<R: Rng + ?Sized>(&mut self, batch_size: usize, rng: &mut R) -> Vec<usize> {
        if self.position >= self.order.len() {
            self.order.shuffle(rng);
            self.position = 0;
        }
        let end = (self.position + batch_size).min(self.order.len());
        let batch = self.order[self.position..end].to_vec();
        self.position = end;
        batch
    }
}

/// Forward and backward pass over one mini-batch, then a single optimizer
/// update with the batch-averaged gradients.
fn run_one_step<O, R>(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    batch: &[usize],
    optimizer: &mut O,
    loss_type: LossType,
    rng: &mut R,
) -> StepTotals
where
    O: Optimizer + ?Sized,
    R: Rng + ?Sized,
{
    let mut totals = StepTotals::default();
    // Zero-initialize accumulated gradient storage.
    let mut acc_grads: Vec<Option<Gradients>> = network.layers.iter()
        .map(|layer| layer.as_dense().map(Gradients::zeros_like))
        .collect();

    for &idx in batch {
        let expected = &labels[idx];
        let output = network.forward(&inputs[idx], rng);

        totals.loss += loss_type.loss(&output, expected);
        totals.correct += usize::from(argmax(&output) == argmax(expected));
        totals.samples += 1;

        let error = loss_type.derivative(&output, expected);
        for (acc, grads) in acc_grads.iter_mut().zip(network.backward(&error)) {
            if let (Some(acc), Some(grads)) = (acc.as_mut(), grads) {
                acc.accumulate(&grads);
            }
        }
    }

    // Average and apply.
    let inv_batch = 1.0 / batch.len() as f64;
    for (i, (layer, grads)) in network.layers.iter_mut().zip(acc_grads).enumerate() {
        if let (Layer::Dense(dense), Some(grads)) = (layer, grads) {
            optimizer.step(i, dense, &grads.scale(inv_batch));
        }
    }

    totals
}
