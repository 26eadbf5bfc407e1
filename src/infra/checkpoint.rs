// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores GrowthModel weights using Burn's
// CompactRecorder, next to a JSON manifest describing them.
//
// Files in the checkpoint directory:
//   growth_model.mpk   ← weights (MessagePack, half precision)
//   growth_model.json  ← manifest: format version, architecture,
//                        window length, feature order, training
//                        summary, timestamp
//
// There is exactly one checkpoint. A retrain overwrites it:
// each file is first written under a staging name and then
// renamed over the old one, so a reader never sees a half
// written file. There is no history and no rollback.
//
// The manifest is checked before any weights are read. A file
// written by an incompatible build is rejected with an error
// instead of loading garbage into the wrong tensor shapes.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::data::{targets::NUM_TARGETS, windows::SEQUENCE_LENGTH};
use crate::domain::prediction::{FEATURE_NAMES, NUM_FEATURES};
use crate::ml::model::{GrowthModel, GrowthModelConfig};

/// Bump whenever the saved layout or model architecture changes.
pub const CHECKPOINT_FORMAT_VERSION: u32 = 1;

const MODEL_STEM:       &str = "growth_model";
const MODEL_STAGING:    &str = "growth_model-staging";
const MODEL_EXTENSION:  &str = "mpk";
const MANIFEST_FILE:    &str = "growth_model.json";
const MANIFEST_STAGING: &str = "growth_model-staging.json";

/// Everything needed to rebuild and trust a saved model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointManifest {
    pub format_version:  u32,
    pub model:           GrowthModelConfig,
    pub sequence_length: usize,
    pub feature_names:   Vec<String>,
    /// Training windows the weights were fitted on
    pub windows:         usize,
    pub epochs:          usize,
    pub final_loss:      f64,
    pub saved_at:        DateTime<Utc>,
}

impl CheckpointManifest {
    pub fn new(model: GrowthModelConfig, windows: usize, epochs: usize, final_loss: f64) -> Self {
        Self {
            format_version:  CHECKPOINT_FORMAT_VERSION,
            model,
            sequence_length: SEQUENCE_LENGTH,
            feature_names:   FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            windows,
            epochs,
            final_loss,
            saved_at:        Utc::now(),
        }
    }

    /// Reject checkpoints this build cannot interpret.
    pub fn validate(&self) -> Result<()> {
        if self.format_version != CHECKPOINT_FORMAT_VERSION {
            bail!(
                "Checkpoint format version {} is not supported (expected {}). Retrain the model.",
                self.format_version,
                CHECKPOINT_FORMAT_VERSION
            );
        }
        if self.sequence_length != SEQUENCE_LENGTH {
            bail!(
                "Checkpoint was trained on {}-day windows, this build uses {}",
                self.sequence_length,
                SEQUENCE_LENGTH
            );
        }
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
            bail!("Checkpoint feature order {:?} does not match {:?}", self.feature_names, FEATURE_NAMES);
        }
        if self.model.input_size != NUM_FEATURES || self.model.output_size != NUM_TARGETS {
            bail!(
                "Checkpoint architecture {}→{} does not match {}→{}",
                self.model.input_size,
                self.model.output_size,
                NUM_FEATURES,
                NUM_TARGETS
            );
        }
        Ok(())
    }
}

/// Manages the single model checkpoint in one directory.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Touches nothing on disk; the directory is created on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn weights_path(&self) -> PathBuf {
        self.dir.join(MODEL_STEM).with_extension(MODEL_EXTENSION)
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// True once a training run has written both files.
    pub fn exists(&self) -> bool {
        self.weights_path().exists() && self.manifest_path().exists()
    }

    /// Save weights and manifest, replacing any previous checkpoint.
    pub fn save_model<B: Backend>(
        &self,
        model:    &GrowthModel<B>,
        manifest: &CheckpointManifest,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", self.dir.display()))?;

        // Recorder appends the extension itself
        let staging = self.dir.join(MODEL_STAGING);
        CompactRecorder::new()
            .record(model.clone().into_record(), staging.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", staging.display()))?;
        let staged_weights = staging.with_extension(MODEL_EXTENSION);
        fs::rename(&staged_weights, self.weights_path())
            .with_context(|| format!("Cannot move '{}' into place", staged_weights.display()))?;

        let staged_manifest = self.dir.join(MANIFEST_STAGING);
        fs::write(&staged_manifest, serde_json::to_string_pretty(manifest)?)
            .with_context(|| format!("Cannot write manifest '{}'", staged_manifest.display()))?;
        fs::rename(&staged_manifest, self.manifest_path())
            .with_context(|| "Cannot move checkpoint manifest into place")?;

        tracing::debug!(
            "Saved checkpoint to '{}' ({} windows, loss {:.5})",
            self.dir.display(),
            manifest.windows,
            manifest.final_loss
        );
        Ok(())
    }

    /// Read and validate the manifest. `Ok(None)` means no model has
    /// been trained yet; a manifest from an incompatible build is an error.
    pub fn load_manifest(&self) -> Result<Option<CheckpointManifest>> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read manifest '{}'", path.display()))?;
        let manifest: CheckpointManifest = serde_json::from_str(&json)
            .with_context(|| format!("Malformed checkpoint manifest '{}'", path.display()))?;
        manifest.validate()?;
        Ok(Some(manifest))
    }

    /// Restore saved weights into `model`, which must have the
    /// architecture recorded in the manifest.
    pub fn load_model<B: Backend>(
        &self,
        model:  GrowthModel<B>,
        device: &B::Device,
    ) -> Result<GrowthModel<B>> {
        let path = self.dir.join(MODEL_STEM);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;
        Ok(model.load_record(record))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    fn tiny() -> GrowthModelConfig {
        GrowthModelConfig::new().with_hidden_size(8)
    }

    #[test]
    fn test_empty_dir_has_no_checkpoint() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert!(!ckpt.exists());
        assert!(ckpt.load_manifest().unwrap().is_none());
    }

    #[test]
    fn test_reading_never_creates_the_directory() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-yet");
        let ckpt = CheckpointManager::new(&path);

        assert!(ckpt.load_manifest().unwrap().is_none());
        assert!(!path.exists());

        let model: GrowthModel<NdArray> = tiny().init(&Default::default());
        ckpt.save_model(&model, &CheckpointManifest::new(tiny(), 1, 1, 1.0)).unwrap();
        assert!(ckpt.exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path());
        let device = Default::default();
        let model: GrowthModel<NdArray> = tiny().init(&device);

        ckpt.save_model(&model, &CheckpointManifest::new(tiny(), 12, 3, 0.25)).unwrap();
        assert!(ckpt.exists());
        assert!(!dir.path().join("growth_model-staging.mpk").exists());

        let manifest = ckpt.load_manifest().unwrap().unwrap();
        assert_eq!(manifest.windows, 12);
        assert_eq!(manifest.model.hidden_size, 8);

        let fresh: GrowthModel<NdArray> = manifest.model.init(&device);
        assert!(ckpt.load_model(fresh, &device).is_ok());
    }

    #[test]
    fn test_retrain_overwrites() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path());
        let device = Default::default();
        let model: GrowthModel<NdArray> = tiny().init(&device);

        ckpt.save_model(&model, &CheckpointManifest::new(tiny(), 1, 1, 1.0)).unwrap();
        ckpt.save_model(&model, &CheckpointManifest::new(tiny(), 2, 2, 0.5)).unwrap();
        assert_eq!(ckpt.load_manifest().unwrap().unwrap().windows, 2);
    }

    #[test]
    fn test_rejects_future_format_version() {
        let mut manifest = CheckpointManifest::new(tiny(), 1, 1, 1.0);
        manifest.format_version = CHECKPOINT_FORMAT_VERSION + 1;
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_rejects_reordered_features() {
        let mut manifest = CheckpointManifest::new(tiny(), 1, 1, 1.0);
        manifest.feature_names.swap(0, 1);
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_rejects_other_window_length() {
        let mut manifest = CheckpointManifest::new(tiny(), 1, 1, 1.0);
        manifest.sequence_length = 7;
        assert!(manifest.validate().is_err());
    }
}
