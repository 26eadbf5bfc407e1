// ============================================================
// Layer 3 — Prediction Result
// ============================================================
// What the core hands back for one subject: next-day score,
// burnout risk, improvement velocity, a ±band around the score,
// and which journal features drove the prediction.
//
// `source` tells the caller how much to trust the numbers:
//   model            — trained sequence model
//   untrained_model  — no checkpoint on disk, random weights
//   heuristic        — history too short, closed-form estimate

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Feature names in encoder order.
pub const FEATURE_NAMES: [&str; 8] = [
    "study_hours",
    "topics_completed",
    "problems_solved",
    "mock_score",
    "confidence",
    "mood",
    "revision_done",
    "skill_practiced",
];

pub const NUM_FEATURES: usize = FEATURE_NAMES.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Model,
    UntrainedModel,
    Heuristic,
}

/// Per-feature attribution weights. Non-negative, summing to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureImportance(BTreeMap<String, f64>);

impl FeatureImportance {
    /// Build from weights in encoder order.
    pub fn from_weights(weights: [f64; NUM_FEATURES]) -> Self {
        Self(
            FEATURE_NAMES
                .iter()
                .zip(weights)
                .map(|(name, w)| (name.to_string(), w))
                .collect(),
        )
    }

    pub fn uniform() -> Self {
        Self::from_weights([1.0 / NUM_FEATURES as f64; NUM_FEATURES])
    }

    /// L1-normalise raw attribution magnitudes, rounded to 4 places.
    /// Falls back to uniform when nothing is left to normalise.
    pub fn normalised(raw: [f64; NUM_FEATURES]) -> Self {
        let total: f64 = raw.iter().map(|v| v.abs()).sum();
        if !total.is_finite() || total <= 0.0 {
            return Self::uniform();
        }
        Self::from_weights(raw.map(|v| round_to(v.abs() / total, 4)))
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.0.get(feature).copied()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Expected mock score, 0–100
    pub predicted_score: f64,
    /// 0.0–1.0
    pub burnout_risk: f64,
    /// Score points per day; negative means declining
    pub improvement_velocity: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    pub feature_importance: FeatureImportance,
    pub source: PredictionSource,
}

impl PredictionResult {
    pub fn is_trained(&self) -> bool {
        self.source == PredictionSource::Model
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sums_to_one() {
        let fi = FeatureImportance::uniform();
        assert!((fi.total() - 1.0).abs() < 1e-9);
        assert_eq!(fi.get("mood"), Some(0.125));
    }

    #[test]
    fn test_normalised_zero_is_uniform() {
        assert_eq!(FeatureImportance::normalised([0.0; 8]), FeatureImportance::uniform());
    }

    #[test]
    fn test_normalised_uses_magnitudes() {
        let fi = FeatureImportance::normalised([-1.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(fi.get("study_hours"), Some(0.25));
        assert_eq!(fi.get("problems_solved"), Some(0.5));
        assert!(fi.iter().all(|(_, w)| w >= 0.0));
        assert!((fi.total() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_source_serialises_snake_case() {
        let json = serde_json::to_string(&PredictionSource::UntrainedModel).unwrap();
        assert_eq!(json, r#""untrained_model""#);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.12367, 3), 0.124);
    }
}
