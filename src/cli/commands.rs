// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Four subcommands:
//
//   generate — write a synthetic training corpus
//   train    — fit the model and overwrite the checkpoint
//   predict  — predict for one subject's journal
//   simulate — predict after shifting journal fields
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a synthetic multi-subject corpus
    Generate(GenerateArgs),

    /// Train the growth model on a corpus of journals
    Train(TrainArgs),

    /// Predict score, burnout risk and trend for one journal
    Predict(PredictArgs),

    /// Predict after applying uniform what-if adjustments
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of subjects; learning styles are assigned round-robin
    #[arg(long, default_value_t = 20)]
    pub subjects: usize,

    /// Days of journal per subject
    #[arg(long, default_value_t = 30)]
    pub days: usize,

    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    #[arg(long, default_value = "data/corpus.json")]
    pub output: String,
}

/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Corpus JSON: [{ "subject_id": ..., "records": [...] }, ...]
    #[arg(long, default_value = "data/corpus.json")]
    pub corpus: String,

    /// Directory holding the single model checkpoint
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, default_value_t = 50, value_parser = parse_positive)]
    pub epochs: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Initial learning rate; halved when the loss plateaus
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    #[arg(long, default_value_t = 1e-4)]
    pub weight_decay: f64,

    /// Max gradient norm per optimiser step
    #[arg(long, default_value_t = 1.0)]
    pub grad_clip_norm: f64,

    /// Stagnant epochs tolerated before the LR is reduced
    #[arg(long, default_value_t = 5)]
    pub plateau_patience: usize,

    #[arg(long, default_value_t = 0.5)]
    pub plateau_factor: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_path:      a.corpus,
            checkpoint_dir:   a.checkpoint_dir,
            epochs:           a.epochs,
            batch_size:       a.batch_size,
            lr:               a.lr,
            weight_decay:     a.weight_decay,
            grad_clip_norm:   a.grad_clip_norm,
            plateau_patience: a.plateau_patience,
            plateau_factor:   a.plateau_factor,
            seed:             a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// History JSON: array of daily records, oldest first
    #[arg(long)]
    pub history: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[arg(long)]
    pub history: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// FIELD=DELTA added to that field on every day, e.g. study_hours=1.5
    #[arg(long = "adjust", value_parser = parse_adjustment)]
    pub adjustments: Vec<(String, f64)>,
}

/// Parse `name=delta`.
pub fn parse_adjustment(s: &str) -> Result<(String, f64), String> {
    let (name, delta) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=DELTA, got '{s}'"))?;
    let delta: f64 = delta
        .trim()
        .parse()
        .map_err(|e| format!("invalid delta '{}': {e}", delta.trim()))?;
    Ok((name.trim().to_string(), delta))
}

/// Parse a count that must be at least 1.
pub fn parse_positive(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0)  => Err("must be at least 1".to_string()),
        Ok(n)  => Ok(n),
        Err(e) => Err(format!("invalid count '{}': {e}", s.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adjustment() {
        assert_eq!(parse_adjustment("study_hours=1.5"), Ok(("study_hours".to_string(), 1.5)));
        assert_eq!(parse_adjustment(" mood = -1 "), Ok(("mood".to_string(), -1.0)));
        assert!(parse_adjustment("mood").is_err());
        assert!(parse_adjustment("mood=lots").is_err());
    }

    #[test]
    fn test_zero_epochs_rejected_on_command_line() {
        assert_eq!(parse_positive("50"), Ok(50));
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-3").is_err());
    }
}
