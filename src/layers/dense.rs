use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    /// Shape (input_size, size).
    pub weights: Matrix,
    /// Shape (1, size).
    pub biases: Matrix,
    pub activator: ActivationFunction,
    #[serde(skip)]
    inputs: Matrix,
    #[serde(skip)]
    pre_neurons: Matrix,  // pre-activation values (z = xW + b) needed for correct derivative
}

/// Parameter gradients of one dense layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl Gradients {
    pub fn zeros_like(layer: &Dense) -> Gradients {
        Gradients {
            weights: Matrix::zeros(layer.weights.rows, layer.weights.cols),
            biases: Matrix::zeros(layer.biases.rows, layer.biases.cols),
        }
    }

    pub fn accumulate(&mut self, other: &Gradients) {
        self.weights = &self.weights + &other.weights;
        self.biases = &self.biases + &other.biases;
    }

    pub fn scale(&self, factor: f64) -> Gradients {
        Gradients {
            weights: self.weights.scale(factor),
            biases: self.biases.scale(factor),
        }
    }
}

impl Dense {
    /// Glorot-uniform weights (He for ReLU) and zero biases.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Dense {
        let weights = match activation {
            ActivationFunction::ReLU => Matrix::he(input_size, size, rng),
            _ => Matrix::glorot_uniform(input_size, size, rng),
        };

        Dense::from_parameters(weights, Matrix::zeros(1, size), activation)
    }

    pub fn from_parameters(weights: Matrix, biases: Matrix, activation: ActivationFunction) -> Dense {
        Dense {
            weights,
            biases,
            activator: activation,
            inputs: Matrix::default(),
            pre_neurons: Matrix::default(),
        }
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Training-mode forward pass; caches the input and z for `backward`.
    pub fn forward(&mut self, input: Matrix) -> Matrix {
        let z = &(&input * &self.weights) + &self.biases;
        let a = z.map(|x| self.activator.function(x));
        self.inputs = input;
        self.pre_neurons = z;
        a
    }

    /// Inference forward pass; leaves the cache untouched.
    pub fn infer(&self, input: &Matrix) -> Matrix {
        let z = &(input * &self.weights) + &self.biases;
        z.map(|x| self.activator.function(x))
    }

    /// `delta` is ∂L/∂a for this layer's output. Returns ∂L/∂x for the
    /// layer input along with the parameter gradients.
    pub fn backward(&self, delta: &Matrix) -> (Matrix, Gradients) {
        // Use pre-activation z so that derivative(z) = σ'(z) is computed correctly
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        // δ = error ⊙ σ'(z)
        let layer_delta = delta.hadamard(&act_derivative);

        let weights_grad = &self.inputs.transpose() * &layer_delta;
        let input_delta = &layer_delta * &self.weights.transpose();

        (input_delta, Gradients { weights: weights_grad, biases: layer_delta })
    }

    /// Subtracts already-scaled updates from the parameters.
    pub fn apply_update(&mut self, weights_update: &Matrix, biases_update: &Matrix) {
        self.weights = &self.weights - weights_update;
        self.biases = &self.biases - biases_update;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_layer() -> Dense {
        Dense::from_parameters(
            Matrix::from_data(vec![vec![1.0, -1.0], vec![0.5, 2.0]]),
            Matrix::row(&[0.5, 0.0]),
            ActivationFunction::Identity,
        )
    }

    #[test]
    fn forward_applies_weights_and_bias() {
        let mut layer = fixed_layer();
        let out = layer.forward(Matrix::row(&[2.0, 1.0]));
        assert_eq!(out.data[0], vec![3.0, 0.0]);
        assert_eq!(layer.infer(&Matrix::row(&[2.0, 1.0])), out);
    }

    #[test]
    fn backward_shapes_match_parameters() {
        let mut layer = fixed_layer();
        layer.forward(Matrix::row(&[2.0, 1.0]));
        let (input_delta, grads) = layer.backward(&Matrix::row(&[1.0, 1.0]));
        assert_eq!((grads.weights.rows, grads.weights.cols), (2, 2));
        assert_eq!((grads.biases.rows, grads.biases.cols), (1, 2));
        assert_eq!(grads.weights.data, vec![vec![2.0, 2.0], vec![1.0, 1.0]]);
        assert_eq!(input_delta.data[0], vec![0.0, 2.5]);
    }

    #[test]
    fn new_layer_starts_with_zero_biases() {
        let mut rng = rand::thread_rng();
        let layer = Dense::new(10, 27, ActivationFunction::Identity, &mut rng);
        assert_eq!((layer.input_size(), layer.size()), (27, 10));
        assert!(layer.biases.data[0].iter().all(|&b| b == 0.0));
    }
}
