use serde::{Serialize, Deserialize};

use crate::loss::categorical_cross_entropy::CategoricalCrossEntropyLoss;
use crate::loss::mse::MseLoss;

/// Selects which loss function the training loop uses.
///
/// - `Mse`                     — Mean-squared error; pair with Identity or Sigmoid output.
/// - `CategoricalCrossEntropy` — Cross-entropy against one-hot targets on
///   normalized outputs; pair with a Sigmoid output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    CategoricalCrossEntropy,
}

impl LossType {
    /// Scalar loss for one sample.
    pub fn loss(self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            LossType::Mse                     => MseLoss::loss(predicted, expected),
            LossType::CategoricalCrossEntropy => CategoricalCrossEntropyLoss::loss(predicted, expected),
        }
    }

    /// ∂L/∂output for one sample.
    pub fn derivative(self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        match self {
            LossType::Mse                     => MseLoss::derivative(predicted, expected),
            LossType::CategoricalCrossEntropy => CategoricalCrossEntropyLoss::derivative(predicted, expected),
        }
    }
}
