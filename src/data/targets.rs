// ============================================================
// Layer 4 — Target Computer
// ============================================================
// There is no ground truth for "how will this student do
// tomorrow", so training labels are synthesised from the
// journal itself. One TargetVector per day:
//
//   0 score      mock_score (default 50) / 100
//   1 burnout    clamp01((hours/12) · (1 − mood/5) · (1 − conf/5))
//   2 velocity   (score − mean of the 3 previous scores) / 20,
//                0 for the first three days
//   3 lower      max(0, score − 8) / 100
//   4 upper      min(100, score + 8) / 100
//
// The model can only ever be as accurate as these formulas.
// That ceiling is inherent to self-supervision and the formulas
// are deliberately left exactly as they are.

use crate::domain::activity::DailyActivityRecord;

pub const NUM_TARGETS: usize = 5;

/// Half-width of the fixed confidence band, in score points.
pub const CONFIDENCE_BAND: f64 = 8.0;

/// Velocity labels are divided by this to keep them near unit scale.
pub const VELOCITY_SCALE: f64 = 20.0;

const VELOCITY_LOOKBACK: usize = 3;

pub type TargetVector = [f32; NUM_TARGETS];

/// Study load combined with low mood and confidence, clamped to [0, 1].
pub fn burnout_risk(study_hours: f64, mood: f64, confidence: f64) -> f64 {
    ((study_hours / 12.0) * (1.0 - mood / 5.0) * (1.0 - confidence / 5.0)).clamp(0.0, 1.0)
}

pub fn compute_targets(history: &[DailyActivityRecord]) -> Vec<TargetVector> {
    history
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let score   = day.score_or_default();
            let burnout = burnout_risk(day.study_hours, day.mood as f64, day.confidence as f64);

            let velocity = if i >= VELOCITY_LOOKBACK {
                let recent = &history[i - VELOCITY_LOOKBACK..i];
                let mean   = recent.iter().map(|d| d.score_or_default()).sum::<f64>()
                    / VELOCITY_LOOKBACK as f64;
                score - mean
            } else {
                0.0
            };

            [
                (score / 100.0) as f32,
                burnout as f32,
                (velocity / VELOCITY_SCALE) as f32,
                ((score - CONFIDENCE_BAND).max(0.0) / 100.0) as f32,
                ((score + CONFIDENCE_BAND).min(100.0) / 100.0) as f32,
            ]
        })
        .collect()
}
