// ============================================================
// Layer 5 — Inference Service
// ============================================================
// Owns the model used to answer predict / simulate calls.
//
//   - constructed once with a checkpoint directory
//   - loads the checkpoint lazily on first use and keeps it
//   - each predict clones the cached model (parameters are
//     shared, not copied) and runs without holding the lock,
//     so concurrent predicts on one service overlap
//   - `reload()` must be called after a retrain for this
//     process to see the new weights; nothing reloads itself
//
// Journals shorter than one window go to the heuristic
// fallback. With no checkpoint on disk the service still
// answers, from randomly initialised weights, but tags every
// result `untrained_model` and logs a warning so callers can
// tell it apart from a real prediction.
//
// Feature importance is the gradient of the predicted score
// with respect to the input window: mean |∂score/∂x| over the
// 14 days, L1-normalised over the 8 features. That is why the
// inference backend is an autodiff backend too.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use burn::prelude::*;

use crate::data::{
    batcher::sequence_tensor,
    features::{encode_history, FeatureVector},
    windows::{last_window, SEQUENCE_LENGTH},
};
use crate::data::targets::{NUM_TARGETS, VELOCITY_SCALE};
use crate::domain::activity::DailyActivityRecord;
use crate::domain::prediction::{
    round_to, FeatureImportance, PredictionResult, PredictionSource, NUM_FEATURES,
};
use crate::domain::traits::GrowthPredictor;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{GrowthModel, GrowthModelConfig};
use crate::ml::{fallback, simulator, InferBackend};

type InferDevice = <InferBackend as Backend>::Device;

struct LoadedModel {
    model:   GrowthModel<InferBackend>,
    trained: bool,
}

pub struct InferenceService {
    ckpt_manager: CheckpointManager,
    device:       InferDevice,
    slot:         Mutex<Option<LoadedModel>>,
}

impl InferenceService {
    pub fn new(checkpoint_dir: impl AsRef<Path>) -> Self {
        Self::from_manager(CheckpointManager::new(checkpoint_dir))
    }

    pub fn from_manager(ckpt_manager: CheckpointManager) -> Self {
        Self {
            ckpt_manager,
            device: Default::default(),
            slot:   Mutex::new(None),
        }
    }

    /// Re-read the checkpoint now, replacing whatever is cached.
    pub fn reload(&self) -> Result<()> {
        let loaded = self.load()?;
        *self.lock()? = Some(loaded);
        Ok(())
    }

    /// Whether predictions come from trained weights. Loads on first call.
    pub fn is_trained(&self) -> Result<bool> {
        let mut slot = self.lock()?;
        Ok(self.cached(&mut slot)?.trained)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<LoadedModel>>> {
        self.slot.lock().map_err(|_| anyhow!("Model cache lock poisoned"))
    }

    fn cached<'a>(&self, slot: &'a mut Option<LoadedModel>) -> Result<&'a LoadedModel> {
        if slot.is_none() {
            *slot = Some(self.load()?);
        }
        slot.as_ref().ok_or_else(|| anyhow!("Model cache is empty after loading"))
    }

    fn load(&self) -> Result<LoadedModel> {
        // Dropout off: the autodiff backend would otherwise apply it.
        match self.ckpt_manager.load_manifest()? {
            Some(manifest) => {
                let skeleton = manifest.model.clone().with_dropout(0.0).init(&self.device);
                let model    = self.ckpt_manager.load_model(skeleton, &self.device)?;
                tracing::info!(
                    "Model loaded from checkpoint ({} windows, saved {})",
                    manifest.windows,
                    manifest.saved_at
                );
                Ok(LoadedModel { model, trained: true })
            }
            None => {
                tracing::warn!(
                    "No trained model found in '{}', using an untrained model",
                    self.ckpt_manager.dir().display()
                );
                let model = GrowthModelConfig::new().with_dropout(0.0).init(&self.device);
                Ok(LoadedModel { model, trained: false })
            }
        }
    }

    pub fn predict(&self, history: &[DailyActivityRecord]) -> Result<PredictionResult> {
        if history.len() < SEQUENCE_LENGTH {
            tracing::debug!(
                "{} day(s) of history, below the {}-day window: using heuristic",
                history.len(),
                SEQUENCE_LENGTH
            );
            return Ok(fallback::estimate(history));
        }

        let features = encode_history(history);
        let window   = last_window(&features, SEQUENCE_LENGTH)
            .context("History shorter than one window")?;

        let (model, trained) = {
            let mut slot = self.lock()?;
            let loaded   = self.cached(&mut slot)?;
            (loaded.model.clone(), loaded.trained)
        };
        let (raw, feature_importance) = forward_with_attribution(&model, &window, &self.device)?;

        let source = if trained {
            PredictionSource::Model
        } else {
            PredictionSource::UntrainedModel
        };

        Ok(PredictionResult {
            predicted_score:      round_to(raw[0] as f64 * 100.0, 2),
            burnout_risk:         round_to(raw[1] as f64, 3),
            improvement_velocity: round_to(raw[2] as f64 * VELOCITY_SCALE, 2),
            confidence_lower:     round_to(raw[3] as f64 * 100.0, 2),
            confidence_upper:     round_to(raw[4] as f64 * 100.0, 2),
            feature_importance,
            source,
        })
    }

    pub fn simulate(
        &self,
        history:     &[DailyActivityRecord],
        adjustments: &HashMap<String, f64>,
    ) -> Result<PredictionResult> {
        simulator::simulate(self, history, adjustments)
    }
}

impl GrowthPredictor for InferenceService {
    fn predict(&self, history: &[DailyActivityRecord]) -> Result<PredictionResult> {
        InferenceService::predict(self, history)
    }

    fn simulate(
        &self,
        history:     &[DailyActivityRecord],
        adjustments: &HashMap<String, f64>,
    ) -> Result<PredictionResult> {
        InferenceService::simulate(self, history, adjustments)
    }
}

/// One forward pass, then backprop the summed score head to the input.
fn forward_with_attribution(
    model:  &GrowthModel<InferBackend>,
    window: &[FeatureVector],
    device: &InferDevice,
) -> Result<([f32; NUM_TARGETS], FeatureImportance)> {
    let input  = sequence_tensor::<InferBackend>(window, device).require_grad();
    let output = model.forward(input.clone());

    let values: Vec<f32> = output
        .stacked()
        .into_data()
        .to_vec()
        .map_err(|e| anyhow!("Cannot read model output: {e:?}"))?;
    let raw: [f32; NUM_TARGETS] = values
        .try_into()
        .map_err(|v: Vec<f32>| anyhow!("Expected {} outputs, got {}", NUM_TARGETS, v.len()))?;

    let grads = output.score.sum().backward();
    let importance = match input.grad(&grads) {
        Some(grad) => {
            // [1, seq, F] → [1, 1, F]
            let per_feature: Vec<f32> = grad
                .abs()
                .mean_dim(1)
                .into_data()
                .to_vec()
                .unwrap_or_default();
            match <[f32; NUM_FEATURES]>::try_from(per_feature) {
                Ok(weights) => FeatureImportance::normalised(weights.map(f64::from)),
                Err(_)      => FeatureImportance::uniform(),
            }
        }
        None => {
            tracing::debug!("No input gradient available, using uniform importance");
            FeatureImportance::uniform()
        }
    };

    Ok((raw, importance))
}
