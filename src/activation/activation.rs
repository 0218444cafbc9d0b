use serde::{Serialize, Deserialize};
use std::f64::consts::E;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
    /// Linear pass-through; what a dense layer does when no activation is set.
    Identity,
    Tanh,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
            ActivationFunction::Tanh => x.tanh(),
        }
    }

    /// Derivative evaluated at the pre-activation value `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centered_at_half() {
        let s = ActivationFunction::Sigmoid;
        assert!((s.function(0.0) - 0.5).abs() < 1e-12);
        assert!((s.derivative(0.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn identity_passes_values_through() {
        let id = ActivationFunction::Identity;
        assert_eq!(id.function(-3.5), -3.5);
        assert_eq!(id.derivative(-3.5), 1.0);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ActivationFunction::ReLU).unwrap();
        assert_eq!(json, "\"relu\"");
    }

    #[test]
    fn model_files_name_only_elementwise_activations() {
        for (name, expected) in [
            ("\"sigmoid\"", ActivationFunction::Sigmoid),
            ("\"relu\"", ActivationFunction::ReLU),
            ("\"identity\"", ActivationFunction::Identity),
            ("\"tanh\"", ActivationFunction::Tanh),
        ] {
            assert_eq!(serde_json::from_str::<ActivationFunction>(name).unwrap(), expected);
        }
        assert!(serde_json::from_str::<ActivationFunction>("\"softmax\"").is_err());
    }
}
