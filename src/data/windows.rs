// ============================================================
// Layer 4 — Sequence Windower
// ============================================================
// Slides a fixed-length window over a subject's encoded days.
// Window [i, i + len) is paired with the label of day i + len,
// i.e. "given the last two weeks, predict tomorrow".
//
//   n days  →  max(0, n − len) windows
//
// A journal of exactly `len` days has no "tomorrow" to learn
// from and yields nothing. Short journals are never padded.
// Training and inference both go through this module so the
// two can never disagree about what a window is.

use crate::data::features::FeatureVector;
use crate::data::targets::TargetVector;

/// Days per model input.
pub const SEQUENCE_LENGTH: usize = 14;

/// `length` consecutive days of features, oldest first.
pub type Sequence = Vec<FeatureVector>;

pub fn make_windows(
    features: &[FeatureVector],
    targets:  &[TargetVector],
    length:   usize,
) -> (Vec<Sequence>, Vec<TargetVector>) {
    let n = features.len().min(targets.len());
    if length == 0 || n <= length {
        return (Vec::new(), Vec::new());
    }

    (0..n - length)
        .map(|i| (features[i..i + length].to_vec(), targets[i + length]))
        .unzip()
}

/// The most recent `length` days, or None if the journal is shorter.
pub fn last_window(features: &[FeatureVector], length: usize) -> Option<Sequence> {
    if length == 0 || features.len() < length {
        return None;
    }
    Some(features[features.len() - length..].to_vec())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{features::encode_history, targets::compute_targets};
    use crate::domain::activity::DailyActivityRecord;

    fn history(days: usize) -> Vec<DailyActivityRecord> {
        (0..days)
            .map(|d| DailyActivityRecord {
                study_hours: d as f64,
                mock_score:  Some(40.0 + d as f64),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_exactly_sequence_length_yields_nothing() {
        let h = history(SEQUENCE_LENGTH);
        let (x, y) = make_windows(&encode_history(&h), &compute_targets(&h), SEQUENCE_LENGTH);
        assert!(x.is_empty());
        assert!(y.is_empty());
    }

    #[test]
    fn test_one_extra_day_yields_one_window() {
        let h        = history(SEQUENCE_LENGTH + 1);
        let features = encode_history(&h);
        let targets  = compute_targets(&h);
        let (x, y)   = make_windows(&features, &targets, SEQUENCE_LENGTH);

        assert_eq!(x.len(), 1);
        assert_eq!(x[0], features[0..SEQUENCE_LENGTH].to_vec());
        assert_eq!(y[0], targets[SEQUENCE_LENGTH]);
    }

    #[test]
    fn test_window_count() {
        let h = history(30);
        let (x, y) = make_windows(&encode_history(&h), &compute_targets(&h), SEQUENCE_LENGTH);
        assert_eq!(x.len(), 16);
        assert_eq!(y.len(), 16);
        assert!(x.iter().all(|w| w.len() == SEQUENCE_LENGTH));
    }

    #[test]
    fn test_last_window_takes_most_recent_days() {
        let features = encode_history(&history(20));
        let w = last_window(&features, SEQUENCE_LENGTH).unwrap();
        assert_eq!(w.len(), SEQUENCE_LENGTH);
        assert_eq!(w[0], features[6]);
        assert_eq!(w[SEQUENCE_LENGTH - 1], features[19]);
        assert!(last_window(&features[..5], SEQUENCE_LENGTH).is_none());
    }
}
