// ============================================================
// Layer 4 — Feature Encoder
// ============================================================
// Turns one DailyActivityRecord into the 8 numbers the model
// sees for that day, always in the order of FEATURE_NAMES:
//
//   0 study_hours        raw
//   1 topics_completed   raw
//   2 problems_solved    raw
//   3 mock_score / 100   (0 when absent)
//   4 confidence / 5
//   5 mood / 5
//   6 revision_done      1.0 / 0.0
//   7 skill_index / 9    (position in the skill table)
//
// Nothing is clamped and nothing errors: out-of-range input is
// passed straight through. The learned input normalisation in
// the model absorbs the different scales of the raw columns.

use crate::domain::activity::{DailyActivityRecord, Skill};
use crate::domain::prediction::NUM_FEATURES;

pub type FeatureVector = [f32; NUM_FEATURES];

/// Encode one day.
pub fn encode(record: &DailyActivityRecord) -> FeatureVector {
    let skill_scale = (Skill::ALL.len() - 1) as f64;
    [
        record.study_hours as f32,
        record.topics_completed as f32,
        record.problems_solved as f32,
        (record.mock_score.unwrap_or(0.0) / 100.0) as f32,
        record.confidence as f32 / 5.0,
        record.mood as f32 / 5.0,
        if record.revision_done { 1.0 } else { 0.0 },
        (record.skill_practiced.index() as f64 / skill_scale) as f32,
    ]
}

/// Encode a whole journal, preserving day order.
pub fn encode_history(history: &[DailyActivityRecord]) -> Vec<FeatureVector> {
    history.iter().map(encode).collect()
}
