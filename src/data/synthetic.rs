// ============================================================
// Layer 4 — Synthetic Corpus Generator
// ============================================================
// Real journals are private, so demos and end-to-end tests run
// on generated ones. Each subject follows one of four learning
// styles that shape hours, problems, scores, mood and confidence
// over time:
//
//   FastImprover  — rising hours and scores, confidence grows
//   Consistent    — steady moderate effort, slow score drift
//   Crammer       — low effort, spikes every ~10 days
//   BurnoutProne  — very long days, mood and confidence decay
//
// All values are clamped to the ranges of DailyActivityRecord.
// A fixed seed reproduces the same corpus.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::activity::{DailyActivityRecord, Skill, SubjectHistory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningStyle {
    FastImprover,
    Consistent,
    Crammer,
    BurnoutProne,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 4] = [
        LearningStyle::FastImprover,
        LearningStyle::Consistent,
        LearningStyle::Crammer,
        LearningStyle::BurnoutProne,
    ];
}

pub struct SyntheticCorpus {
    rng: StdRng,
}

impl SyntheticCorpus {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// `subjects` journals of `days` days, styles assigned round-robin.
    pub fn generate(&mut self, subjects: usize, days: usize) -> Vec<SubjectHistory> {
        (0..subjects)
            .map(|i| {
                let style = LearningStyle::ALL[i % LearningStyle::ALL.len()];
                SubjectHistory::new(format!("subject-{:03}", i + 1), self.journal(style, days))
            })
            .collect()
    }

    pub fn journal(&mut self, style: LearningStyle, days: usize) -> Vec<DailyActivityRecord> {
        let base_score: f64 = self.rng.gen_range(35.0..65.0);
        (0..days).map(|day| self.day(style, day, base_score)).collect()
    }

    fn day(&mut self, style: LearningStyle, day: usize, base_score: f64) -> DailyActivityRecord {
        let rng = &mut self.rng;
        let d   = day as f64;

        let (hours, problems, score, confidence, mood): (f64, i64, f64, i64, i64) = match style {
            LearningStyle::FastImprover => (
                rng.gen_range(5.0..9.0) + d * 0.05,
                rng.gen_range(10..=25) + (day / 3) as i64,
                base_score + d * 0.8 + rng.gen_range(-3.0..5.0),
                3 + (day / 10) as i64 + rng.gen_range(-1..=1),
                3 + rng.gen_range(0..=1),
            ),
            LearningStyle::Consistent => (
                rng.gen_range(4.0..6.0),
                rng.gen_range(8..=15),
                base_score + d * 0.3 + rng.gen_range(-2.0..2.0),
                rng.gen_range(3..=4),
                rng.gen_range(3..=5),
            ),
            LearningStyle::Crammer => {
                let near_exam = day % 10 > 6;
                if near_exam {
                    (
                        rng.gen_range(6.0..12.0),
                        rng.gen_range(15..=30),
                        base_score + rng.gen_range(-5.0..10.0),
                        rng.gen_range(2..=4),
                        rng.gen_range(2..=4),
                    )
                } else {
                    (
                        rng.gen_range(1.0..3.0),
                        rng.gen_range(0..=5),
                        base_score + rng.gen_range(-5.0..2.0),
                        rng.gen_range(1..=3),
                        rng.gen_range(2..=4),
                    )
                }
            }
            LearningStyle::BurnoutProne => (
                rng.gen_range(8.0..14.0) - d * 0.1,
                rng.gen_range(15..=25) - (day / 5) as i64,
                base_score + d * 0.1 + rng.gen_range(-3.0..3.0),
                4 - (day / 8) as i64,
                4 - (day / 6) as i64,
            ),
        };

        DailyActivityRecord {
            study_hours:      round1(hours.clamp(0.0, 24.0)),
            topics_completed: rng.gen_range(1..=5),
            problems_solved:  problems.max(0) as u32,
            mock_score:       Some(round1(score.clamp(0.0, 100.0))),
            confidence:       confidence.clamp(1, 5) as u8,
            mood:             mood.clamp(1, 5) as u8,
            revision_done:    rng.gen_bool(0.6),
            skill_practiced:  Skill::ALL[rng.gen_range(0..Skill::ALL.len())],
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_requested_shape() {
        let corpus = SyntheticCorpus::new(7).generate(5, 30);
        assert_eq!(corpus.len(), 5);
        assert!(corpus.iter().all(|s| s.days() == 30));
        assert_eq!(corpus[0].subject_id, "subject-001");
    }

    #[test]
    fn test_values_stay_in_range() {
        let corpus = SyntheticCorpus::new(11).generate(8, 60);
        for rec in corpus.iter().flat_map(|s| &s.records) {
            assert!((0.0..=24.0).contains(&rec.study_hours));
            assert!((1..=5).contains(&rec.confidence));
            assert!((1..=5).contains(&rec.mood));
            let score = rec.mock_score.unwrap();
            assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn test_same_seed_same_corpus() {
        let a = SyntheticCorpus::new(3).generate(4, 20);
        let b = SyntheticCorpus::new(3).generate(4, 20);
        assert_eq!(a, b);
    }
}
