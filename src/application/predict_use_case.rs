// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads one subject's journal and asks the inference service
// for a prediction, optionally after a what-if shift.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

use crate::data::loader::load_history;
use crate::domain::prediction::PredictionResult;
use crate::domain::traits::GrowthPredictor;
use crate::ml::inferencer::InferenceService;

pub struct PredictUseCase<P: GrowthPredictor> {
    predictor: P,
}

impl PredictUseCase<InferenceService> {
    pub fn from_checkpoint(checkpoint_dir: impl AsRef<Path>) -> Self {
        Self::new(InferenceService::new(checkpoint_dir))
    }
}

impl<P: GrowthPredictor> PredictUseCase<P> {
    pub fn new(predictor: P) -> Self {
        Self { predictor }
    }

    pub fn predict_file(&self, history_path: impl AsRef<Path>) -> Result<PredictionResult> {
        let history = load_history(history_path)?;
        tracing::info!("Predicting from {} day(s) of history", history.len());
        self.predictor.predict(&history)
    }

    pub fn simulate_file(
        &self,
        history_path: impl AsRef<Path>,
        adjustments:  &HashMap<String, f64>,
    ) -> Result<PredictionResult> {
        let history = load_history(history_path)?;
        tracing::info!(
            "Simulating {} adjustment(s) over {} day(s) of history",
            adjustments.len(),
            history.len()
        );
        self.predictor.simulate(&history, adjustments)
    }
}
