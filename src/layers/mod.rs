pub mod dense;
pub mod dropout;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

pub use dense::{Dense, Gradients};
pub use dropout::Dropout;

/// One stage of a sequential network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Dense(Dense),
    Dropout(Dropout),
}

impl Layer {
    pub fn forward<R: Rng + ?Sized>(&mut self, input: Matrix, rng: &mut R) -> Matrix {
        match self {
            Layer::Dense(dense) => dense.forward(input),
            Layer::Dropout(dropout) => dropout.forward(input, rng),
        }
    }

    pub fn infer(&self, input: Matrix) -> Matrix {
        match self {
            Layer::Dense(dense) => dense.infer(&input),
            Layer::Dropout(_) => input,
        }
    }

    /// Returns ∂L/∂input and, for layers with parameters, their gradients.
    pub fn backward(&self, delta: &Matrix) -> (Matrix, Option<Gradients>) {
        match self {
            Layer::Dense(dense) => {
                let (input_delta, grads) = dense.backward(delta);
                (input_delta, Some(grads))
            }
            Layer::Dropout(dropout) => (dropout.backward(delta), None),
        }
    }

    pub fn as_dense(&self) -> Option<&Dense> {
        match self {
            Layer::Dense(dense) => Some(dense),
            Layer::Dropout(_) => None,
        }
    }
}
