// ============================================================
// Layer 5 — Heuristic Fallback
// ============================================================
// Closed-form estimate used whenever a journal is shorter than
// one model window. No learning involved; every number below
// is a design constant.
//
//   empty journal → score 50, burnout 0.3, velocity 0,
//                   band 42–58, uniform importance
//
//   otherwise, over the last min(7, n) days:
//     score    = mean mock score (absent days count as 50)
//     burnout  = clamp01((mean hours / 12)
//                        · (1 − mean mood / 5)
//                        · (1 − mean confidence / 5))
//     velocity = (last score − first score) / days, 0 for one day
//     band     = score ∓ 8
//     importance = fixed hand-tuned weights

use crate::data::targets::{burnout_risk, CONFIDENCE_BAND};
use crate::domain::activity::DailyActivityRecord;
use crate::domain::prediction::{
    round_to, FeatureImportance, PredictionResult, PredictionSource, NUM_FEATURES,
};

/// How many recent days the heuristic averages over.
pub const RECENT_DAYS: usize = 7;

/// Hand-tuned weights in encoder order; they sum to 1.
pub const HEURISTIC_IMPORTANCE: [f64; NUM_FEATURES] =
    [0.20, 0.10, 0.18, 0.22, 0.12, 0.08, 0.05, 0.05];

pub fn estimate(history: &[DailyActivityRecord]) -> PredictionResult {
    if history.is_empty() {
        return PredictionResult {
            predicted_score:      50.0,
            burnout_risk:         0.3,
            improvement_velocity: 0.0,
            confidence_lower:     42.0,
            confidence_upper:     58.0,
            feature_importance:   FeatureImportance::uniform(),
            source:               PredictionSource::Heuristic,
        };
    }

    let recent = &history[history.len() - history.len().min(RECENT_DAYS)..];
    let n      = recent.len() as f64;
    let mean   = |f: fn(&DailyActivityRecord) -> f64| recent.iter().map(f).sum::<f64>() / n;

    let avg_score = mean(|d| d.score_or_default());
    let avg_hours = mean(|d| d.study_hours);
    let avg_mood  = mean(|d| d.mood as f64);
    let avg_conf  = mean(|d| d.confidence as f64);

    let velocity = match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if recent.len() > 1 => {
            (last.score_or_default() - first.score_or_default()) / n
        }
        _ => 0.0,
    };

    PredictionResult {
        predicted_score:      round_to(avg_score, 2),
        burnout_risk:         round_to(burnout_risk(avg_hours, avg_mood, avg_conf), 3),
        improvement_velocity: round_to(velocity, 2),
        confidence_lower:     round_to(avg_score - CONFIDENCE_BAND, 2),
        confidence_upper:     round_to(avg_score + CONFIDENCE_BAND, 2),
        feature_importance:   FeatureImportance::from_weights(HEURISTIC_IMPORTANCE),
        source:               PredictionSource::Heuristic,
    }
}
