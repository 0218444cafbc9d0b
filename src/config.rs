use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::SampleMode;
use crate::error::{GlyphError, Result};

/// Hyperparameters and data options of a training run.
///
/// Also defines the JSON config file format: every field is optional in the
/// file and falls back to the value in `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Feature values per row; the width of the network input.
    pub input_width: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    /// Mini-batch updates per epoch, independent of dataset size.
    pub steps_per_epoch: usize,
    pub batch_size: usize,
    /// Fraction of rows drawn as the held-out evaluation sample.
    pub test_fraction: f64,
    pub dropout_rate: f64,
    pub sample_mode: SampleMode,
    /// Use only the first `limit` rows of the dataset.
    pub limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_width: 27,
            learning_rate: 0.001,
            epochs: 20,
            steps_per_epoch: 100,
            batch_size: 32,
            test_fraction: 0.4,
            dropout_rate: 0.2,
            sample_mode: SampleMode::Overlapping,
            limit: None,
        }
    }
}

impl PipelineConfig {
    pub fn load_json(path: &Path) -> Result<PipelineConfig> {
        let file = File::open(path).map_err(|e| GlyphError::io(path, e))?;
        let config: PipelineConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| GlyphError::json(path, e))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GlyphError::InvalidConfig(msg.to_string()));
        if self.input_width == 0 {
            return invalid("input_width must be positive");
        }
        if !(self.learning_rate > 0.0) {
            return invalid("learning_rate must be positive");
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be at least 1");
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return invalid("test_fraction must lie in [0, 1)");
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return invalid("dropout_rate must lie in [0, 1)");
        }
        if self.limit == Some(0) {
            return invalid("limit must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_glyph_run() {
        let c = PipelineConfig::default();
        assert_eq!((c.input_width, c.epochs, c.steps_per_epoch), (27, 20, 100));
        assert_eq!(c.learning_rate, 0.001);
        assert_eq!(c.test_fraction, 0.4);
        assert_eq!(c.sample_mode, SampleMode::Overlapping);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: PipelineConfig =
            serde_json::from_str(r#"{ "epochs": 3, "sample_mode": "disjoint" }"#).unwrap();
        assert_eq!(c.epochs, 3);
        assert_eq!(c.sample_mode, SampleMode::Disjoint);
        assert_eq!(c.steps_per_epoch, 100);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<PipelineConfig>(r#"{ "epoch": 3 }"#).is_err());
    }

    #[test]
    fn load_json_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        std::fs::write(&path, r#"{ "batch_size": 8 }"#).unwrap();
        assert_eq!(PipelineConfig::load_json(&path).unwrap().batch_size, 8);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let c = PipelineConfig { test_fraction: 1.0, ..PipelineConfig::default() };
        assert!(matches!(c.validate(), Err(GlyphError::InvalidConfig(_))));
        let c = PipelineConfig { batch_size: 0, ..PipelineConfig::default() };
        assert!(c.validate().is_err());
    }
}
