use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Inverted dropout: during training each activation is zeroed with
/// probability `rate` and the survivors are scaled by 1 / (1 - rate).
/// At inference the layer is the identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dropout {
    pub rate: f64,
    #[serde(skip)]
    mask: Matrix,
}

impl Dropout {
    pub fn new(rate: f64) -> Dropout {
        Dropout { rate, mask: Matrix::default() }
    }

    pub fn forward<R: Rng + ?Sized>(&mut self, input: Matrix, rng: &mut R) -> Matrix {
        let keep_scale = 1.0 / (1.0 - self.rate);
        self.mask = input.map(|_| if rng.gen::<f64>() < self.rate { 0.0 } else { keep_scale });
        input.hadamard(&self.mask)
    }

    pub fn backward(&self, delta: &Matrix) -> Matrix {
        delta.hadamard(&self.mask)
    }
}
