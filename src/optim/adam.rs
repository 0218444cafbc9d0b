use std::collections::HashMap;

use crate::layers::{Dense, Gradients};
use crate::math::matrix::Matrix;
use crate::optim::Optimizer;

/// Adam optimizer (Kingma & Ba, "Adam: A Method for Stochastic Optimization").
///
/// Keeps first and second moment estimates per dense layer, keyed by the
/// layer's index in the network, and applies bias correction on every step.
pub struct Adam {
    pub learning_rate: f64,
    pub beta_1: f64,
    pub beta_2: f64,
    /// Added to the denominator for numerical stability.
    pub epsilon: f64,
    states: HashMap<usize, AdamState>,
}

struct AdamState {
    time: i32,
    weights: Moments,
    biases: Moments,
}

struct Moments {
    first: Matrix,
    second: Matrix,
}

impl Moments {
    fn zeros_like(m: &Matrix) -> Moments {
        Moments {
            first: Matrix::zeros(m.rows, m.cols),
            second: Matrix::zeros(m.rows, m.cols),
        }
    }

    /// Folds `grad` into the moving averages and returns the bias-corrected
    /// update lr · m̂ / (√v̂ + ε).
    fn update(&mut self, grad: &Matrix, adam: &Adam, time: i32) -> Matrix {
        let (b1, b2) = (adam.beta_1, adam.beta_2);
        self.first = self.first.zip_map(grad, |m, g| b1 * m + (1.0 - b1) * g);
        self.second = self.second.zip_map(grad, |v, g| b2 * v + (1.0 - b2) * g * g);

        let correction_1 = 1.0 - b1.powi(time);
        let correction_2 = 1.0 - b2.powi(time);
        let (lr, eps) = (adam.learning_rate, adam.epsilon);
        self.first.zip_map(&self.second, |m, v| {
            lr * (m / correction_1) / ((v / correction_2).sqrt() + eps)
        })
    }
}

impl Adam {
    /// β1 = 0.9, β2 = 0.999, ε = 1e-7.
    pub fn new(learning_rate: f64) -> Adam {
        Adam {
            learning_rate,
            beta_1: 0.9,
            beta_2: 0.999,
            epsilon: 1e-7,
            states: HashMap::new(),
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, index: usize, layer: &mut Dense, grads: &Gradients) {
        let mut state = self.states.remove(&index).unwrap_or_else(|| AdamState {
            time: 0,
            weights: Moments::zeros_like(&layer.weights),
            biases: Moments::zeros_like(&layer.biases),
        });
        state.time += 1;

        let weights_update = state.weights.update(&grads.weights, self, state.time);
        let biases_update = state.biases.update(&grads.biases, self, state.time);
        layer.apply_update(&weights_update, &biases_update);

        self.states.insert(index, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;

    fn one_weight_layer(w: f64) -> Dense {
        Dense::from_parameters(Matrix::row(&[w]), Matrix::row(&[0.0]), ActivationFunction::Identity)
    }

    #[test]
    fn first_step_moves_by_learning_rate() {
        // With bias correction the first update is lr · g / (|g| + ε) ≈ lr · sign(g).
        let mut adam = Adam::new(0.001);
        let mut layer = one_weight_layer(1.0);
        let grads = Gradients { weights: Matrix::row(&[4.0]), biases: Matrix::row(&[-2.0]) };
        adam.step(0, &mut layer, &grads);
        assert!((layer.weights.data[0][0] - 0.999).abs() < 1e-9);
        assert!((layer.biases.data[0][0] - 0.001).abs() < 1e-9);
    }

    #[test]
    fn state_is_kept_per_layer() {
        let mut adam = Adam::new(0.01);
        let mut a = one_weight_layer(0.0);
        let mut b = one_weight_layer(0.0);
        let grads = Gradients { weights: Matrix::row(&[1.0]), biases: Matrix::row(&[0.0]) };
        adam.step(0, &mut a, &grads);
        adam.step(0, &mut a, &grads);
        adam.step(2, &mut b, &grads);
        assert_eq!(adam.states[&0].time, 2);
        assert_eq!(adam.states[&2].time, 1);
        assert!(a.weights.data[0][0] < b.weights.data[0][0]);
    }

    #[test]
    fn minimizes_a_quadratic() {
        // f(w) = (w - 3)², gradient 2(w - 3).
        let mut adam = Adam::new(0.1);
        let mut layer = one_weight_layer(0.0);
        for _ in 0..500 {
            let w = layer.weights.data[0][0];
            let grads = Gradients { weights: Matrix::row(&[2.0 * (w - 3.0)]), biases: Matrix::row(&[0.0]) };
            adam.step(0, &mut layer, &grads);
        }
        assert!((layer.weights.data[0][0] - 3.0).abs() < 0.1);
    }
}
