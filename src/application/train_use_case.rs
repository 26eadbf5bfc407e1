// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the training pipeline in order:
//
//   Step 1: Load subject histories    (Layer 4 - data)
//   Step 2: Open checkpoint directory (Layer 6 - infra)
//   Step 3: Run training loop         (Layer 5 - ml)
//
// Windowing and label synthesis happen inside the trainer so
// that training and inference share one code path for both.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::loader::JsonHistoryLoader;
use crate::domain::traits::HistorySource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::trainer::{run_training, TrainingReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// Hyperparameters for one training run. Architecture lives in
// GrowthModelConfig and is recorded in the checkpoint manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_path:      String,
    pub checkpoint_dir:   String,
    pub epochs:           usize,
    pub batch_size:       usize,
    pub lr:               f64,
    pub weight_decay:     f64,
    pub grad_clip_norm:   f64,
    pub plateau_patience: usize,
    pub plateau_factor:   f64,
    /// Seeds weight init and batch shuffling
    pub seed:             u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_path:      "data/corpus.json".to_string(),
            checkpoint_dir:   "checkpoints".to_string(),
            epochs:           50,
            batch_size:       32,
            lr:               1e-3,
            weight_decay:     1e-4,
            grad_clip_norm:   1.0,
            plateau_patience: 5,
            plateau_factor:   0.5,
            seed:             42,
        }
    }
}

pub struct TrainUseCase<S: HistorySource> {
    config: TrainConfig,
    source: S,
}

impl TrainUseCase<JsonHistoryLoader> {
    /// Train from the corpus file named in the config.
    pub fn from_config(config: TrainConfig) -> Self {
        let source = JsonHistoryLoader::new(&config.corpus_path);
        Self { config, source }
    }
}

impl<S: HistorySource> TrainUseCase<S> {
    pub fn new(config: TrainConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Returns None when the corpus was too short to train on.
    pub fn execute(&self) -> Result<Option<TrainingReport>> {
        let cfg = &self.config;

        // ── Step 1: Load histories ────────────────────────────────────────────
        let histories = self.source.load_histories()?;
        tracing::info!("Loaded {} subject histories", histories.len());

        // ── Step 2: Checkpoint location ───────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);

        // ── Step 3: Train and persist ─────────────────────────────────────────
        let outcome = run_training(cfg, &histories, &ckpt_manager)?;
        Ok(outcome.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::SubjectHistory;

    struct FixedSource(Vec<SubjectHistory>);

    impl HistorySource for FixedSource {
        fn load_histories(&self) -> Result<Vec<SubjectHistory>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_defaults_match_documented_hyperparameters() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.epochs, 50);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.lr, 1e-3);
        assert_eq!(cfg.weight_decay, 1e-4);
        assert_eq!(cfg.plateau_patience, 5);
    }

    #[test]
    fn test_short_corpus_reports_untrained() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            checkpoint_dir: dir.path().display().to_string(),
            epochs: 1,
            ..TrainConfig::default()
        };
        let source = FixedSource(vec![SubjectHistory::new("s", vec![Default::default(); 5])]);

        let report = TrainUseCase::new(cfg, source).execute().unwrap();
        assert!(report.is_none());
        assert!(!CheckpointManager::new(dir.path()).exists());
    }
}
