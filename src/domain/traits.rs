// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two seams between the core and its collaborators:
//
//   HistorySource   — where ordered journals come from
//                     (the persistence collaborator, or the
//                     JSON loader used by the CLI)
//   GrowthPredictor — what the HTTP collaborator calls to get
//                     a prediction or run a what-if query
//
// Programming against these keeps the application layer
// ignorant of whether histories come from a database or a
// file, and of whether predictions come from a trained model.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::collections::HashMap;

use anyhow::Result;

use crate::domain::activity::{DailyActivityRecord, SubjectHistory};
use crate::domain::prediction::PredictionResult;

// ─── HistorySource ────────────────────────────────────────────────────────────
/// Anything that can supply per-subject journals, oldest day first.
///
/// Implementations:
///   - JsonHistoryLoader → reads a corpus file
///   - (external) the persistence collaborator
pub trait HistorySource {
    fn load_histories(&self) -> Result<Vec<SubjectHistory>>;
}

// ─── GrowthPredictor ──────────────────────────────────────────────────────────
/// Anything that can turn a journal into a prediction.
///
/// Implementations:
///   - InferenceService → sequence model with heuristic fallback
pub trait GrowthPredictor {
    fn predict(&self, history: &[DailyActivityRecord]) -> Result<PredictionResult>;

    /// Shift the named fields by the given deltas on every day, then predict.
    fn simulate(
        &self,
        history:     &[DailyActivityRecord],
        adjustments: &HashMap<String, f64>,
    ) -> Result<PredictionResult>;
}
