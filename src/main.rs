//! glyph-train
//!
//! Trains the glyph classifier on a fontData file and saves the model.
//!
//! Run with:
//!   cargo run --release --bin glyph-train -- sample.data

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use glyph_nn::data::{Dataset, SampleMode};
use glyph_nn::logging::init_logging;
use glyph_nn::pipeline::{self, DEFAULT_DATA_DIR, DEFAULT_MODEL_FILE};
use glyph_nn::{EpochStats, PipelineConfig, Result};

#[derive(Parser, Debug)]
#[command(name = "glyph-train", version, about = "Train the glyph classifier on a fontData file.")]
struct Cli {
    /// Dataset file name, resolved inside the data directory
    dataset: Option<String>,

    /// Directory holding the fontData files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Where to write the trained model
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_MODEL_FILE)]
    output: PathBuf,

    /// JSON file with training hyperparameters
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for weight init, sampling and dropout
    #[arg(long)]
    seed: Option<u64>,

    /// Leave the held-out rows out of the training set
    #[arg(long)]
    disjoint: bool,

    /// Use only the first N rows of the dataset
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Override the number of epochs
    #[arg(long, value_name = "N")]
    epochs: Option<usize>,
}

impl Cli {
    /// File config first, flags on top.
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load_json(path)?,
            None => PipelineConfig::default(),
        };
        if self.disjoint {
            config.sample_mode = SampleMode::Disjoint;
        }
        if let Some(limit) = self.limit {
            config.limit = Some(limit);
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        Ok(config)
    }
}

fn print_epoch(stats: &EpochStats) {
    println!(
        "Epoch {}/{} - {}ms - loss: {:.4} - categorical_accuracy: {:.4}",
        stats.epoch, stats.total_epochs, stats.elapsed_ms, stats.train_loss, stats.train_accuracy
    );
}

fn run(cli: Cli) -> Result<()> {
    let dataset_path = pipeline::resolve_dataset(cli.dataset.as_deref(), &cli.data_dir)?;
    let config = cli.pipeline_config()?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let data = pipeline::prepare(Dataset::load(&dataset_path)?, &config, &mut rng)?;
    let (spec, mut network) = pipeline::build_network(&data, &config, &mut rng)?;

    pipeline::fit(&mut network, &spec, &data, &config, &mut rng, print_epoch);

    println!("Performing tests");
    let test = pipeline::evaluate_holdout(&network, &spec, &data);
    println!("Test accuracy: {:?} %", test.accuracy * 100.0);

    pipeline::save(&network, &cli.output)
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_usage() => {
            println!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
