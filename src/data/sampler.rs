use rand::Rng;
use serde::{Serialize, Deserialize};

/// How the held-out evaluation rows relate to the training rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMode {
    /// Held-out rows are also trained on, so the reported accuracy is
    /// measured partly on training data.
    #[default]
    Overlapping,
    /// Held-out rows are removed from the training set.
    Disjoint,
}

/// Number of held-out rows: ⌊fraction × row_count⌋.
pub fn holdout_size(row_count: usize, fraction: f64) -> usize {
    ((fraction * row_count as f64).floor() as usize).min(row_count)
}

/// Draws `holdout_size(row_count, fraction)` distinct row indices uniformly
/// at random, without replacement.
pub fn sample_holdout<R: Rng + ?Sized>(row_count: usize, fraction: f64, rng: &mut R) -> Vec<usize> {
    let amount = holdout_size(row_count, fraction);
    rand::seq::index::sample(rng, row_count, amount).into_vec()
}

/// Row indices to train on, in ascending order.
pub fn training_indices(row_count: usize, holdout: &[usize], mode: SampleMode) -> Vec<usize> {
    match mode {
        SampleMode::Overlapping => (0..row_count).collect(),
        SampleMode::Disjoint => {
            let mut held = vec![false; row_count];
            for &i in holdout {
                held[i] = true;
            }
            (0..row_count).filter(|&i| !held[i]).collect()
        }
    }
}
