// ============================================================
// Layer 5 — What-if Simulator
// ============================================================
// "What if I studied an hour more every day?" Each adjustment
// is an additive delta applied to the named field on EVERY day
// of the journal, then the shifted journal is predicted exactly
// like a real one (model or heuristic, by the same length rule).
//
// Adjustable fields:
//   study_hours, topics_completed, problems_solved,
//   mock_score (only on days that have one), confidence, mood
//
// Integer fields move by the rounded delta and never go below
// zero. Unknown keys, non-additive fields and non-finite deltas
// are ignored. An empty or all-zero adjustment set leaves the
// journal untouched, so the result equals a plain predict.

use std::collections::HashMap;

use anyhow::Result;

use crate::domain::activity::DailyActivityRecord;
use crate::domain::prediction::PredictionResult;
use crate::domain::traits::GrowthPredictor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustableField {
    StudyHours,
    TopicsCompleted,
    ProblemsSolved,
    MockScore,
    Confidence,
    Mood,
}

impl AdjustableField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "study_hours"      => Some(Self::StudyHours),
            "topics_completed" => Some(Self::TopicsCompleted),
            "problems_solved"  => Some(Self::ProblemsSolved),
            "mock_score"       => Some(Self::MockScore),
            "confidence"       => Some(Self::Confidence),
            "mood"             => Some(Self::Mood),
            _                  => None,
        }
    }

    fn apply(self, day: &mut DailyActivityRecord, delta: f64) {
        match self {
            Self::StudyHours      => day.study_hours += delta,
            Self::TopicsCompleted => day.topics_completed = shift_count(day.topics_completed, delta),
            Self::ProblemsSolved  => day.problems_solved = shift_count(day.problems_solved, delta),
            Self::MockScore       => {
                if let Some(score) = day.mock_score.as_mut() {
                    *score += delta;
                }
            }
            Self::Confidence      => day.confidence = shift_rating(day.confidence, delta),
            Self::Mood            => day.mood = shift_rating(day.mood, delta),
        }
    }
}

fn shift_count(value: u32, delta: f64) -> u32 {
    (value as f64 + delta).round().clamp(0.0, u32::MAX as f64) as u32
}

fn shift_rating(value: u8, delta: f64) -> u8 {
    (value as f64 + delta).round().clamp(0.0, u8::MAX as f64) as u8
}

/// Copy of `history` with every recognised adjustment applied to every day.
pub fn apply_adjustments(
    history:     &[DailyActivityRecord],
    adjustments: &HashMap<String, f64>,
) -> Vec<DailyActivityRecord> {
    let mut fields = Vec::with_capacity(adjustments.len());
    for (name, &delta) in adjustments {
        match AdjustableField::parse(name) {
            Some(field) if delta.is_finite() => fields.push((field, delta)),
            Some(_) => tracing::warn!("Ignoring non-finite adjustment for '{}'", name),
            None    => tracing::debug!("Ignoring unknown adjustment key '{}'", name),
        }
    }

    history
        .iter()
        .map(|day| {
            let mut day = day.clone();
            for &(field, delta) in &fields {
                field.apply(&mut day, delta);
            }
            day
        })
        .collect()
}

pub fn simulate<P: GrowthPredictor + ?Sized>(
    predictor:   &P,
    history:     &[DailyActivityRecord],
    adjustments: &HashMap<String, f64>,
) -> Result<PredictionResult> {
    let shifted = apply_adjustments(history, adjustments);
    predictor.predict(&shifted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::PredictionSource;
    use crate::ml::inferencer::InferenceService;

    fn journal(days: usize) -> Vec<DailyActivityRecord> {
        (0..days)
            .map(|d| DailyActivityRecord {
                study_hours:      4.0,
                topics_completed: 2,
                problems_solved:  10,
                mock_score:       if d % 2 == 0 { Some(60.0) } else { None },
                confidence:       3,
                mood:             3,
                ..Default::default()
            })
            .collect()
    }

    fn adjust(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_shift_applies_to_every_day() {
        let shifted = apply_adjustments(&journal(5), &adjust(&[("study_hours", 1.5), ("mood", 1.0)]));
        assert!(shifted.iter().all(|d| d.study_hours == 5.5 && d.mood == 4));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let shifted = apply_adjustments(&journal(4), &adjust(&[("mock_score", 5.0)]));
        assert_eq!(shifted[0].mock_score, Some(65.0));
        assert_eq!(shifted[1].mock_score, None);
    }

    #[test]
    fn test_unknown_and_non_additive_keys_are_ignored() {
        let original = journal(3);
        let shifted  = apply_adjustments(
            &original,
            &adjust(&[("sleep_hours", 2.0), ("revision_done", 1.0), ("mood", f64::NAN)]),
        );
        assert_eq!(shifted, original);
    }

    #[test]
    fn test_counts_never_go_negative() {
        let shifted = apply_adjustments(&journal(2), &adjust(&[("problems_solved", -50.0)]));
        assert!(shifted.iter().all(|d| d.problems_solved == 0));
    }

    #[test]
    fn test_empty_adjustments_match_plain_predict() {
        let dir     = tempfile::tempdir().unwrap();
        let service = InferenceService::new(dir.path());
        for days in [0, 5, 20] {
            let history = journal(days);
            assert_eq!(
                service.simulate(&history, &HashMap::new()).unwrap(),
                service.predict(&history).unwrap()
            );
            assert_eq!(
                service.simulate(&history, &adjust(&[("study_hours", 0.0)])).unwrap(),
                service.predict(&history).unwrap()
            );
        }
    }

    #[test]
    fn test_full_window_simulates_through_model() {
        let dir         = tempfile::tempdir().unwrap();
        let service     = InferenceService::new(dir.path());
        let history     = journal(20);
        let adjustments = adjust(&[("study_hours", 3.0)]);

        let simulated = service.simulate(&history, &adjustments).unwrap();
        let expected  = service.predict(&apply_adjustments(&history, &adjustments)).unwrap();

        assert_eq!(simulated, expected);
        assert_eq!(simulated.source, PredictionSource::UntrainedModel);
    }

    #[test]
    fn test_short_history_simulates_through_fallback() {
        let dir     = tempfile::tempdir().unwrap();
        let service = InferenceService::new(dir.path());
        let history = vec![
            DailyActivityRecord { mock_score: Some(60.0), ..Default::default() };
            3
        ];

        let base    = service.predict(&history).unwrap();
        let shifted = service.simulate(&history, &adjust(&[("mock_score", 10.0)])).unwrap();
        assert_eq!(shifted.predicted_score, base.predicted_score + 10.0);
    }
}
