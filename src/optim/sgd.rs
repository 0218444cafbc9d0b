use crate::layers::{Dense, Gradients};
use crate::optim::Optimizer;

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, _index: usize, layer: &mut Dense, grads: &Gradients) {
        let update = grads.scale(self.learning_rate);
        layer.apply_update(&update.weights, &update.biases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::math::Matrix;

    #[test]
    fn steps_against_the_gradient() {
        let mut layer = Dense::from_parameters(
            Matrix::row(&[1.0]).transpose(),
            Matrix::row(&[0.0]),
            ActivationFunction::Identity,
        );
        let grads = Gradients { weights: Matrix::row(&[2.0]).transpose(), biases: Matrix::row(&[-1.0]) };
        Sgd::new(0.5).step(0, &mut layer, &grads);
        assert_eq!(layer.weights.data, vec![vec![0.0]]);
        assert_eq!(layer.biases.data, vec![vec![0.5]]);
    }
}
