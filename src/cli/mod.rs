// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands off to the application layer; results are
// printed as JSON so they can be piped into other tools.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::collections::HashMap;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, GenerateArgs, PredictArgs, SimulateArgs, TrainArgs};

use crate::domain::prediction::{PredictionResult, PredictionSource};

#[derive(Parser, Debug)]
#[command(
    name = "growth-predictor",
    version,
    about = "Predict student score, burnout risk and improvement trend from a daily activity journal."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Generate(args) => run_generate(args),
            Commands::Train(args)    => run_train(args),
            Commands::Predict(args)  => run_predict(args),
            Commands::Simulate(args) => run_simulate(args),
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    use crate::data::{loader::save_corpus, synthetic::SyntheticCorpus};

    let corpus = SyntheticCorpus::new(args.seed).generate(args.subjects, args.days);
    save_corpus(&args.output, &corpus)?;
    println!("Wrote {} subjects × {} days to {}", args.subjects, args.days, args.output);
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on corpus: {}", args.corpus);

    match TrainUseCase::from_config(args.into()).execute()? {
        Some(report) => println!(
            "Training complete: {} windows from {} subjects, final loss {:.5}. Checkpoint saved.",
            report.windows, report.subjects, report.final_loss
        ),
        None => println!("No subject has more than 14 days of history. Nothing was trained."),
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let result = PredictUseCase::from_checkpoint(&args.checkpoint_dir).predict_file(&args.history)?;
    print_result(&result)
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let adjustments: HashMap<String, f64> = args.adjustments.into_iter().collect();
    let result = PredictUseCase::from_checkpoint(&args.checkpoint_dir)
        .simulate_file(&args.history, &adjustments)?;
    print_result(&result)
}

fn print_result(result: &PredictionResult) -> Result<()> {
    if result.source == PredictionSource::UntrainedModel {
        eprintln!("warning: no trained checkpoint found, this prediction comes from random weights");
    }
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
