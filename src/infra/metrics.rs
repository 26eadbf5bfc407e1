// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records the training curve to a CSV file, one row per epoch:
//
//   epoch,train_loss,learning_rate
//   1,0.084512,0.001000
//   2,0.061230,0.001000
//   ...
//
// The file is recreated at the start of every training run,
// matching the checkpoint it sits next to.
//
// How to read it:
//   - train_loss should fall; a long flat stretch is followed
//     by learning_rate halving (plateau schedule)
//   - a loss that never moves usually means the corpus is tiny

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean MSE over the epoch's batches
    pub train_loss: f64,

    /// Learning rate in effect during the epoch
    pub learning_rate: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, learning_rate: f64) -> Self {
        Self { epoch, train_loss, learning_rate }
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh metrics file in `dir`, replacing any previous run's.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,learning_rate")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{:.6}", m.epoch, m.train_loss, m.learning_rate)?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_appended_after_header() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::create(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 1e-3)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.25, 5e-4)).unwrap();

        let text  = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,learning_rate");
        assert_eq!(lines[1], "1,0.500000,0.001000");
        assert_eq!(lines[2], "2,0.250000,0.000500");
    }

    #[test]
    fn test_new_run_truncates() {
        let dir = tempfile::tempdir().unwrap();
        MetricsLogger::create(dir.path()).unwrap()
            .log(&EpochMetrics::new(1, 0.5, 1e-3)).unwrap();
        let logger = MetricsLogger::create(dir.path()).unwrap();
        let text   = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
