//! glyph-check
//!
//! Replays a saved glyph model over a fontData file and reports, row by row,
//! the expected and predicted character.
//!
//! Run with:
//!   cargo run --bin glyph-check -- model.json fontData/sample.data

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use glyph_nn::data::Dataset;
use glyph_nn::logging::init_logging;
use glyph_nn::pipeline::{self, CheckReport};
use glyph_nn::{Network, Result};

#[derive(Parser, Debug)]
#[command(name = "glyph-check", version, about = "Classify every row of a fontData file with a saved model.")]
struct Cli {
    /// Model file written by glyph-train
    model: PathBuf,

    /// Dataset file to classify
    dataset: PathBuf,

    /// Print only the summary line
    #[arg(short, long)]
    quiet: bool,
}

fn print_report(report: &CheckReport, quiet: bool) {
    if !quiet {
        for row in &report.rows {
            println!("\n  Expected: {}\nPrediction: {}\n     Index: {}", row.expected, row.predicted, row.index);
            if row.is_correct() {
                println!("\tCorrect!! {}", row.predicted);
            }
        }
    }
    println!("Num correct: {} out of {}", report.correct(), report.rows.len());
}

fn run(cli: &Cli) -> Result<()> {
    let network = Network::load_json(&cli.model)?;
    let dataset = Dataset::load(&cli.dataset)?;
    let report = pipeline::check(&network, &dataset)?;
    print_report(&report, cli.quiet);
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
