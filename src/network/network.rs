use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{GlyphError, Result};
use crate::layers::{Gradients, Layer};
use crate::math::matrix::Matrix;
use crate::network::metadata::ModelMetadata;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: ModelMetadata,
}

impl Network {
    pub fn new(layers: Vec<Layer>) -> Network {
        Network { layers, metadata: ModelMetadata::default() }
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Network {
        self.metadata = metadata;
        self
    }

    /// Input size of the first dense layer.
    pub fn input_width(&self) -> Option<usize> {
        self.layers.iter().find_map(Layer::as_dense).map(|dense| dense.input_size())
    }

    /// Size of the last dense layer.
    pub fn output_width(&self) -> Option<usize> {
        self.layers.iter().rev().find_map(Layer::as_dense).map(|dense| dense.size())
    }

    /// Training-mode forward pass; dropout is active and every layer caches
    /// what `backward` needs.
    pub fn forward<R: Rng + ?Sized>(&mut self, input: &[f64], rng: &mut R) -> Vec<f64> {
        let mut current = Matrix::row(input);
        for layer in &mut self.layers {
            current = layer.forward(current, rng);
        }
        current.into_row()
    }

    /// Inference-mode forward pass; dropout is the identity.
    pub fn predict(&self, input: &[f64]) -> Vec<f64> {
        self.layers
            .iter()
            .fold(Matrix::row(input), |current, layer| layer.infer(current))
            .into_row()
    }

    /// Backpropagates ∂L/∂output through the layers cached by the last
    /// `forward` call. The result is indexed like `layers`; entries for
    /// layers without parameters are `None`.
    pub fn backward(&self, output_delta: &[f64]) -> Vec<Option<Gradients>> {
        let mut grads = vec![None; self.layers.len()];
        let mut delta = Matrix::row(output_delta);
        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (input_delta, layer_grads) = layer.backward(&delta);
            grads[i] = layer_grads;
            delta = input_delta;
        }
        grads
    }

    /// Serializes the network (architecture, weights, metadata) to a
    /// pretty-printed JSON file, replacing any existing file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| GlyphError::io(path, e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| GlyphError::json(path, e))
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &Path) -> Result<Network> {
        let file = File::open(path).map_err(|e| GlyphError::io(path, e))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| GlyphError::json(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::layers::{Dense, Dropout};
    use rand::{rngs::StdRng, SeedableRng};

    fn small_network(rng: &mut StdRng) -> Network {
        Network::new(vec![
            Layer::Dense(Dense::new(4, 3, ActivationFunction::Identity, rng)),
            Layer::Dropout(Dropout::new(0.5)),
            Layer::Dense(Dense::new(2, 4, ActivationFunction::Sigmoid, rng)),
        ])
    }

    #[test]
    fn reports_input_and_output_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let net = small_network(&mut rng);
        assert_eq!(net.input_width(), Some(3));
        assert_eq!(net.output_width(), Some(2));
    }

    #[test]
    fn predict_is_deterministic_despite_dropout() {
        let mut rng = StdRng::seed_from_u64(2);
        let net = small_network(&mut rng);
        let input = [0.2, -0.4, 0.9];
        assert_eq!(net.predict(&input), net.predict(&input));
    }

    #[test]
    fn backward_yields_gradients_only_for_dense_layers() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut net = small_network(&mut rng);
        let out = net.forward(&[1.0, 0.5, -0.5], &mut rng);
        assert_eq!(out.len(), 2);
        let grads = net.backward(&[0.1, -0.1]);
        assert!(grads[0].is_some());
        assert!(grads[1].is_none());
        assert!(grads[2].is_some());
    }

    #[test]
    fn json_round_trip_preserves_predictions() {
        let mut rng = StdRng::seed_from_u64(4);
        let net = small_network(&mut rng).with_metadata(ModelMetadata {
            output_labels: Some(vec!["a".into(), "b".into()]),
            ..ModelMetadata::default()
        });
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        net.save_json(&path).unwrap();

        let loaded = Network::load_json(&path).unwrap();
        let input = [0.3, 0.1, -0.2];
        for (a, b) in loaded.predict(&input).iter().zip(net.predict(&input)) {
            assert!((a - b).abs() < 1e-9);
        }
        assert_eq!(loaded.metadata, net.metadata);
    }

    #[test]
    fn load_reports_missing_file_path() {
        let err = Network::load_json(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, GlyphError::Io { .. }));
    }
}
