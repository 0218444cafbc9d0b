/// Categorical cross-entropy over an arbitrary non-negative output layer
/// (e.g. independent sigmoids).
///
/// Predictions are first normalized to sum to one and clipped to
/// [ε, 1 − ε], so the loss is well defined even when the output layer is not
/// a softmax.
pub struct CategoricalCrossEntropyLoss;

const EPS: f64 = 1e-7;

impl CategoricalCrossEntropyLoss {
    /// L = -Σ y_i · log(clip(p_i / Σp))
    ///
    /// `predicted` — output activations, shape [n_classes]
    /// `expected`  — one-hot target distribution, shape [n_classes]
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let total = predicted.iter().sum::<f64>().max(EPS);
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| -y * (p / total).clamp(EPS, 1.0 - EPS).ln())
            .sum()
    }

    /// Gradient w.r.t. the output activations (before the sigmoid derivative):
    ///   ∂L/∂p_k = Σy / Σp − y_k / p_k
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let total = predicted.iter().sum::<f64>().max(EPS);
        let target_mass: f64 = expected.iter().sum();
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| target_mass / total - y / p.max(EPS))
            .collect()
    }
}
