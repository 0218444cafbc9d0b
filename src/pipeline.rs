//! The glyph training pipeline: load → encode → sample → build → fit →
//! evaluate → save, plus the checker that replays a saved model over a
//! dataset.
//!
//! The stages are separate functions so the binaries can interleave their
//! own console output; `run` chains them for callers that only want the
//! result.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::config::PipelineConfig;
use crate::data::{sample_holdout, training_indices, Dataset, LabelEncoder};
use crate::error::{GlyphError, Result};
use crate::network::{ModelMetadata, Network, NetworkSpec};
use crate::optim::Adam;
use crate::train::{argmax, evaluate, train_loop, EpochStats, Evaluation, TrainConfig};

/// Directory dataset names are resolved against unless overridden.
pub const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fontData");

/// File the trained model is written to unless overridden.
pub const DEFAULT_MODEL_FILE: &str = "model.json";

/// Resolves the dataset name given on the command line inside `data_dir`.
pub fn resolve_dataset(name: Option<&str>, data_dir: &Path) -> Result<PathBuf> {
    let name = name.ok_or(GlyphError::MissingArgument)?;
    let path = data_dir.join(name);
    if !path.is_file() {
        return Err(GlyphError::DatasetNotFound { path });
    }
    Ok(path)
}

/// Encoded dataset with its held-out sample.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub encoder: LabelEncoder,
    pub inputs: Vec<Vec<f64>>,
    /// One-hot targets, parallel to `inputs`.
    pub targets: Vec<Vec<f64>>,
    /// Held-out row indices, in sampling order.
    pub holdout: Vec<usize>,
    /// Row indices the network is fitted on.
    pub train: Vec<usize>,
}

impl PreparedData {
    pub fn train_set(&self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        self.select(&self.train)
    }

    pub fn holdout_set(&self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        self.select(&self.holdout)
    }

    fn select(&self, rows: &[usize]) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        rows.iter()
            .map(|&i| (self.inputs[i].clone(), self.targets[i].clone()))
            .unzip()
    }
}

/// Checks the dataset against the config, encodes labels and draws the
/// held-out sample.
pub fn prepare<R: Rng + ?Sized>(
    mut dataset: Dataset,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<PreparedData> {
    config.validate()?;
    if let Some(limit) = config.limit {
        dataset.truncate(limit);
    }
    if dataset.width() != config.input_width {
        return Err(GlyphError::InputWidthMismatch {
            expected: config.input_width,
            found: dataset.width(),
        });
    }

    let encoder = LabelEncoder::fit(&dataset.labels);
    if encoder.n_classes() < 2 {
        return Err(GlyphError::TooFewClasses { found: encoder.n_classes() });
    }
    let codes = encoder.transform(&dataset.labels)?;
    let targets = encoder.one_hot(&codes);

    let rows = dataset.len();
    let holdout = sample_holdout(rows, config.test_fraction, rng);
    let train = training_indices(rows, &holdout, config.sample_mode);
    if train.is_empty() {
        return Err(GlyphError::InvalidConfig(
            "held-out sample leaves no rows to train on".into(),
        ));
    }

    tracing::info!(
        rows,
        classes = encoder.n_classes(),
        train_rows = train.len(),
        test_rows = holdout.len(),
        mode = ?config.sample_mode,
        "prepared dataset"
    );

    Ok(PreparedData { encoder, inputs: dataset.features, targets, holdout, train })
}

/// The glyph classifier for the prepared label set, labels recorded in its
/// metadata so saved models can be decoded later.
pub fn build_network<R: Rng + ?Sized>(
    data: &PreparedData,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<(NetworkSpec, Network)> {
    let mut spec = NetworkSpec::glyph_classifier(
        config.input_width,
        data.encoder.n_classes(),
        config.dropout_rate,
    );
    spec.metadata = Some(ModelMetadata {
        description: Some(format!("{} trained on {} rows", spec.name, data.inputs.len())),
        input_width: Some(config.input_width),
        output_labels: Some(data.encoder.classes().to_vec()),
    });
    let network = spec.build(rng)?;
    Ok((spec, network))
}

/// Fits with Adam for the configured epochs and steps.
pub fn fit<R, F>(
    network: &mut Network,
    spec: &NetworkSpec,
    data: &PreparedData,
    config: &PipelineConfig,
    rng: &mut R,
    on_epoch: F,
) -> Vec<EpochStats>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    let (inputs, targets) = data.train_set();
    let mut optimizer = Adam::new(config.learning_rate);
    let train_config = TrainConfig::new(
        config.epochs,
        config.steps_per_epoch,
        config.batch_size,
        spec.loss,
    );
    train_loop(network, &inputs, &targets, &mut optimizer, &train_config, rng, on_epoch)
}

/// Loss and categorical accuracy on the held-out sample.
pub fn evaluate_holdout(network: &Network, spec: &NetworkSpec, data: &PreparedData) -> Evaluation {
    let (inputs, targets) = data.holdout_set();
    if inputs.is_empty() {
        tracing::warn!("held-out sample is empty; reporting zero accuracy");
    }
    evaluate(network, &inputs, &targets, spec.loss)
}

/// Saves the model, replacing whatever is at `path`.
pub fn save(network: &Network, path: &Path) -> Result<()> {
    network.save_json(path)?;
    tracing::info!(path = %path.display(), "saved model");
    Ok(())
}

/// Outcome of a full `run`.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub classes: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub history: Vec<EpochStats>,
    pub test: Evaluation,
}

/// Runs every stage on the dataset at `dataset_path` and writes the model
/// to `output`.
///
/// For library callers that only want the outcome; `glyph-train` calls the
/// stages itself so it can print between them.
pub fn run<R, F>(
    dataset_path: &Path,
    output: &Path,
    config: &PipelineConfig,
    rng: &mut R,
    on_epoch: F,
) -> Result<TrainingReport>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    let data = prepare(Dataset::load(dataset_path)?, config, rng)?;
    let (spec, mut network) = build_network(&data, config, rng)?;
    let history = fit(&mut network, &spec, &data, config, rng, on_epoch);
    let test = evaluate_holdout(&network, &spec, &data);
    save(&network, output)?;

    Ok(TrainingReport {
        classes: data.encoder.classes().to_vec(),
        train_rows: data.train.len(),
        test_rows: data.holdout.len(),
        history,
        test,
    })
}

/// One classified row from `check`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPrediction {
    pub expected: String,
    pub predicted: String,
    /// Output position of the prediction.
    pub index: usize,
}

impl RowPrediction {
    pub fn is_correct(&self) -> bool {
        self.expected == self.predicted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub rows: Vec<RowPrediction>,
}

impl CheckReport {
    pub fn correct(&self) -> usize {
        self.rows.iter().filter(|r| r.is_correct()).count()
    }
}

/// Classifies every row of `dataset` with a saved model, decoding outputs
/// through the labels stored in the model's metadata.
pub fn check(network: &Network, dataset: &Dataset) -> Result<CheckReport> {
    let labels = network.metadata.output_labels.clone().ok_or(GlyphError::UnlabeledModel)?;
    let encoder = LabelEncoder::from_classes(labels);
    if let Some(expected) = network.input_width() {
        if dataset.width() != expected {
            return Err(GlyphError::InputWidthMismatch { expected, found: dataset.width() });
        }
    }

    let rows = dataset.features.iter()
        .zip(dataset.labels.iter())
        .map(|(features, expected)| {
            let scores = network.predict(features);
            let predicted = encoder.decode(&scores).ok_or(GlyphError::UnlabeledModel)?;
            let index = argmax(&scores);
            Ok(RowPrediction {
                expected: expected.clone(),
                predicted: predicted.to_string(),
                index,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CheckReport { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{holdout_size, SampleMode};
    use rand::{rngs::StdRng, SeedableRng};

    fn synthetic(rows: usize, width: usize, labels: &[&str]) -> Dataset {
        let mut rng = StdRng::seed_from_u64(99);
        Dataset {
            features: (0..rows).map(|_| (0..width).map(|_| rng.gen_range(-1.0..1.0)).collect()).collect(),
            labels: (0..rows).map(|i| labels[i % labels.len()].to_string()).collect(),
        }
    }

    #[test]
    fn resolve_requires_an_argument() {
        let err = resolve_dataset(None, Path::new(".")).unwrap_err();
        assert_eq!(err.to_string(), "Specify fontData file name");
        assert!(err.is_usage());
    }

    #[test]
    fn resolve_requires_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_dataset(Some("missing.data"), dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "Given filename for fontData doesn't exist");

        std::fs::write(dir.path().join("present.data"), "1 a\n").unwrap();
        let path = resolve_dataset(Some("present.data"), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("present.data"));
    }

    #[test]
    fn prepare_encodes_and_samples() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = prepare(synthetic(10, 27, &["a", "b", "c"]), &PipelineConfig::default(), &mut rng).unwrap();
        assert_eq!(data.inputs.len(), 10);
        assert!(data.inputs.iter().all(|r| r.len() == 27));
        assert_eq!(data.encoder.classes(), &["a", "b", "c"]);
        assert!(data.targets.iter().all(|t| t.len() == 3 && t.iter().sum::<f64>() == 1.0));
        assert_eq!(data.holdout.len(), holdout_size(10, 0.4));
        assert_eq!(data.train.len(), 10);
    }

    #[test]
    fn disjoint_mode_separates_holdout() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = PipelineConfig { sample_mode: SampleMode::Disjoint, ..PipelineConfig::default() };
        let data = prepare(synthetic(10, 27, &["a", "b"]), &config, &mut rng).unwrap();
        assert_eq!(data.train.len(), 6);
        assert!(data.holdout.iter().all(|h| !data.train.contains(h)));
    }

    #[test]
    fn single_class_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = prepare(synthetic(5, 27, &["a"]), &PipelineConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, GlyphError::TooFewClasses { found: 1 }));
    }

    #[test]
    fn wrong_width_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let err = prepare(synthetic(5, 26, &["a", "b"]), &PipelineConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, GlyphError::InputWidthMismatch { expected: 27, found: 26 }));
    }

    #[test]
    fn limit_truncates_before_sampling() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = PipelineConfig { limit: Some(5), ..PipelineConfig::default() };
        let data = prepare(synthetic(20, 27, &["a", "b"]), &config, &mut rng).unwrap();
        assert_eq!(data.inputs.len(), 5);
        assert_eq!(data.holdout.len(), 2);
    }

    #[test]
    fn built_network_records_labels() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = PipelineConfig::default();
        let data = prepare(synthetic(10, 27, &["x", "y", "z"]), &config, &mut rng).unwrap();
        let (_, network) = build_network(&data, &config, &mut rng).unwrap();
        assert_eq!(network.output_width(), Some(3));
        assert_eq!(network.metadata.output_labels, Some(vec!["x".into(), "y".into(), "z".into()]));
    }

    #[test]
    fn check_decodes_with_saved_labels() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = PipelineConfig { epochs: 1, steps_per_epoch: 2, ..PipelineConfig::default() };
        let dataset = synthetic(6, 27, &["a", "b"]);
        let data = prepare(dataset.clone(), &config, &mut rng).unwrap();
        let (_, network) = build_network(&data, &config, &mut rng).unwrap();

        let report = check(&network, &dataset).unwrap();
        assert_eq!(report.rows.len(), 6);
        assert!(report.rows.iter().all(|r| r.predicted == "a" || r.predicted == "b"));
        for (row, features) in report.rows.iter().zip(&dataset.features) {
            assert_eq!(data.encoder.classes()[row.index], row.predicted);
            assert_eq!(data.encoder.decode(&network.predict(features)), Some(row.predicted.as_str()));
        }
        assert!(report.correct() <= 6);
    }

    #[test]
    fn check_needs_labels() {
        let mut rng = StdRng::seed_from_u64(8);
        let network = NetworkSpec::glyph_classifier(27, 2, 0.2).build(&mut rng).unwrap();
        let err = check(&network, &synthetic(2, 27, &["a", "b"])).unwrap_err();
        assert!(matches!(err, GlyphError::UnlabeledModel));
    }
}
