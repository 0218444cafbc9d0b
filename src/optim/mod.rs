pub mod adam;
pub mod sgd;

use crate::layers::{Dense, Gradients};

pub use adam::Adam;
pub use sgd::Sgd;

/// Applies averaged gradients to the parameters of a dense layer.
pub trait Optimizer {
    /// `index` is the layer's position in its network; stateful optimizers
    /// key their per-layer state on it.
    fn step(&mut self, index: usize, layer: &mut Dense, grads: &Gradients);
}
