use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{GlyphError, Result};
use crate::layers::{Dense, Dropout, Layer};
use crate::loss::loss_type::LossType;
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields of `Dense`:
/// - `size`       — number of neurons in this layer
/// - `input_size` — number of values feeding into this layer (the size of the
///                  previous dense layer, or the raw input dimension for the
///                  first one)
/// - `activation` — activation function applied after the linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
    },
    Dropout {
        rate: f64,
    },
}

/// A serializable description of a network architecture plus its training
/// loss type and optional metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    pub loss: LossType,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl NetworkSpec {
    /// The glyph classifier topology:
    /// `n_input → 10 → drop → 50 → drop → 25 → drop → n_classes (sigmoid)`.
    /// Hidden layers are linear.
    pub fn glyph_classifier(n_input: usize, n_classes: usize, dropout_rate: f64) -> NetworkSpec {
        let hidden = [10, 50, 25];
        let mut layers = Vec::with_capacity(hidden.len() * 2 + 1);
        let mut input_size = n_input;
        for size in hidden {
            layers.push(LayerSpec::Dense { size, input_size, activation: ActivationFunction::Identity });
            layers.push(LayerSpec::Dropout { rate: dropout_rate });
            input_size = size;
        }
        layers.push(LayerSpec::Dense {
            size: n_classes,
            input_size,
            activation: ActivationFunction::Sigmoid,
        });

        NetworkSpec {
            name: "glyph-classifier".to_string(),
            layers,
            loss: LossType::CategoricalCrossEntropy,
            metadata: None,
        }
    }

    /// Checks that consecutive dense layers agree on their sizes and that
    /// dropout rates lie in [0, 1).
    pub fn validate(&self) -> Result<()> {
        let mut previous: Option<usize> = None;
        for (i, layer) in self.layers.iter().enumerate() {
            match *layer {
                LayerSpec::Dense { size, input_size, .. } => {
                    if size == 0 || input_size == 0 {
                        return Err(GlyphError::InvalidSpec(format!("layer {i} has a zero dimension")));
                    }
                    if let Some(prev) = previous {
                        if prev != input_size {
                            return Err(GlyphError::InvalidSpec(format!(
                                "layer {i} expects {input_size} inputs but the previous dense layer has {prev} neurons"
                            )));
                        }
                    }
                    previous = Some(size);
                }
                LayerSpec::Dropout { rate } => {
                    if !(0.0..1.0).contains(&rate) {
                        return Err(GlyphError::InvalidSpec(format!(
                            "layer {i} dropout rate {rate} is outside [0, 1)"
                        )));
                    }
                }
            }
        }
        if previous.is_none() {
            return Err(GlyphError::InvalidSpec("no dense layers".into()));
        }
        Ok(())
    }

    /// Instantiates the layers with freshly initialized parameters.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;
        let layers = self.layers.iter()
            .map(|layer| match *layer {
                LayerSpec::Dense { size, input_size, activation } => {
                    Layer::Dense(Dense::new(size, input_size, activation, rng))
                }
                LayerSpec::Dropout { rate } => Layer::Dropout(Dropout::new(rate)),
            })
            .collect();

        let network = Network::new(layers);
        Ok(match &self.metadata {
            Some(metadata) => network.with_metadata(metadata.clone()),
            None => network,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn glyph_classifier_has_fixed_topology() {
        let spec = NetworkSpec::glyph_classifier(27, 3, 0.2);
        let dense_sizes: Vec<(usize, usize)> = spec.layers.iter()
            .filter_map(|l| match l {
                LayerSpec::Dense { size, input_size, .. } => Some((*input_size, *size)),
                LayerSpec::Dropout { .. } => None,
            })
            .collect();
        assert_eq!(dense_sizes, vec![(27, 10), (10, 50), (50, 25), (25, 3)]);
        assert_eq!(spec.layers.len(), 7);
        assert_eq!(
            spec.layers.last(),
            Some(&LayerSpec::Dense { size: 3, input_size: 25, activation: ActivationFunction::Sigmoid })
        );
    }

    #[test]
    fn build_produces_matching_network() {
        let mut rng = StdRng::seed_from_u64(9);
        let net = NetworkSpec::glyph_classifier(27, 4, 0.2).build(&mut rng).unwrap();
        assert_eq!(net.input_width(), Some(27));
        assert_eq!(net.output_width(), Some(4));
        assert_eq!(net.predict(&[0.5; 27]).len(), 4);
    }

    #[test]
    fn rejects_disconnected_layers() {
        let spec = NetworkSpec {
            name: "broken".into(),
            layers: vec![
                LayerSpec::Dense { size: 4, input_size: 2, activation: ActivationFunction::ReLU },
                LayerSpec::Dense { size: 1, input_size: 3, activation: ActivationFunction::Sigmoid },
            ],
            loss: LossType::Mse,
            metadata: None,
        };
        assert!(matches!(spec.validate(), Err(GlyphError::InvalidSpec(_))));
    }

    #[test]
    fn rejects_full_dropout() {
        let spec = NetworkSpec::glyph_classifier(27, 3, 1.0);
        assert!(spec.validate().is_err());
    }
}
