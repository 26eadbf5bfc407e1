// ============================================================
// Layer 3 — Daily Activity Record
// ============================================================
// One journal entry: what a student did on one day and how
// they felt about it. Owned by the persistence collaborator;
// the core only ever reads it.
//
// `study_hours` is the one required key: a day without it is
// rejected when the journal is read. Every other missing key
// falls back to a documented default, so a sparse journal
// still produces a prediction:
//
//   topics_completed  0
//   problems_solved   0
//   mock_score        absent (None)
//   confidence        3  (neutral midpoint of 1..=5)
//   mood              3  (1 = stressed … 5 = great)
//   revision_done     false
//   skill_practiced   Other
//
// Reference: Rust Book §5 (Structs), serde field attributes

use serde::{Deserialize, Serialize};

/// Neutral midpoint of the 1..=5 self-report scales.
pub const NEUTRAL_RATING: u8 = 3;

/// Mock score assumed by the label and heuristic formulas when a day has none.
pub const DEFAULT_MOCK_SCORE: f64 = 50.0;

fn neutral_rating() -> u8 {
    NEUTRAL_RATING
}

/// The fixed skill table. Position in `Skill::ALL` is the index the
/// feature encoder divides by 9, so the order must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Skill {
    Dsa,
    Ml,
    Dbms,
    Os,
    Cn,
    WebDev,
    Math,
    Aptitude,
    SoftSkills,
    #[default]
    Other,
}

impl Skill {
    pub const ALL: [Skill; 10] = [
        Skill::Dsa,
        Skill::Ml,
        Skill::Dbms,
        Skill::Os,
        Skill::Cn,
        Skill::WebDev,
        Skill::Math,
        Skill::Aptitude,
        Skill::SoftSkills,
        Skill::Other,
    ];

    /// Position in the skill table (0..=9).
    pub fn index(self) -> usize {
        Skill::ALL.iter().position(|s| *s == self).unwrap_or(Skill::ALL.len() - 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Skill::Dsa        => "DSA",
            Skill::Ml         => "ML",
            Skill::Dbms       => "DBMS",
            Skill::Os         => "OS",
            Skill::Cn         => "CN",
            Skill::WebDev     => "Web Dev",
            Skill::Math       => "Math",
            Skill::Aptitude   => "Aptitude",
            Skill::SoftSkills => "Soft Skills",
            Skill::Other      => "Other",
        }
    }

    /// Parse a skill label. Anything outside the table maps to `Other`.
    pub fn from_label(label: &str) -> Self {
        Skill::ALL
            .iter()
            .copied()
            .find(|s| s.label() == label.trim())
            .unwrap_or(Skill::Other)
    }
}

impl From<String> for Skill {
    fn from(label: String) -> Self {
        Skill::from_label(&label)
    }
}

impl From<Skill> for String {
    fn from(skill: Skill) -> Self {
        skill.label().to_string()
    }
}

/// One subject-day of journal data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivityRecord {
    /// Hours studied, nominally 0–24. Required in incoming JSON.
    pub study_hours: f64,

    #[serde(default)]
    pub topics_completed: u32,

    #[serde(default)]
    pub problems_solved: u32,

    /// Mock test score 0–100, if the student sat one that day
    #[serde(default)]
    pub mock_score: Option<f64>,

    /// Self-reported confidence, 1–5
    #[serde(default = "neutral_rating")]
    pub confidence: u8,

    /// Self-reported mood, 1 = stressed … 5 = great
    #[serde(default = "neutral_rating")]
    pub mood: u8,

    #[serde(default)]
    pub revision_done: bool,

    #[serde(default)]
    pub skill_practiced: Skill,
}

impl Default for DailyActivityRecord {
    fn default() -> Self {
        Self {
            study_hours:      0.0,
            topics_completed: 0,
            problems_solved:  0,
            mock_score:       None,
            confidence:       NEUTRAL_RATING,
            mood:             NEUTRAL_RATING,
            revision_done:    false,
            skill_practiced:  Skill::Other,
        }
    }
}

impl DailyActivityRecord {
    /// Mock score as read by the label and heuristic formulas
    /// (absent days count as 50).
    pub fn score_or_default(&self) -> f64 {
        self.mock_score.unwrap_or(DEFAULT_MOCK_SCORE)
    }
}

/// One subject's ordered journal, oldest day first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectHistory {
    pub subject_id: String,
    pub records:    Vec<DailyActivityRecord>,
}

impl SubjectHistory {
    pub fn new(subject_id: impl Into<String>, records: Vec<DailyActivityRecord>) -> Self {
        Self { subject_id: subject_id.into(), records }
    }

    pub fn days(&self) -> usize {
        self.records.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_table_order() {
        assert_eq!(Skill::Dsa.index(), 0);
        assert_eq!(Skill::WebDev.index(), 5);
        assert_eq!(Skill::Other.index(), 9);
    }

    #[test]
    fn test_unknown_skill_label_is_other() {
        assert_eq!(Skill::from_label("Underwater Basket Weaving"), Skill::Other);
        assert_eq!(Skill::from_label("Soft Skills"), Skill::SoftSkills);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let rec: DailyActivityRecord = serde_json::from_str(r#"{"study_hours": 4.5}"#).unwrap();
        assert_eq!(rec.study_hours, 4.5);
        assert_eq!(rec.mock_score, None);
        assert_eq!(rec.confidence, 3);
        assert_eq!(rec.mood, 3);
        assert_eq!(rec.skill_practiced, Skill::Other);
        assert_eq!(rec.score_or_default(), 50.0);
    }

    #[test]
    fn test_missing_study_hours_is_rejected() {
        let err = serde_json::from_str::<DailyActivityRecord>(r#"{"mood": 4, "mock_score": 70}"#)
            .unwrap_err();
        assert!(err.to_string().contains("study_hours"));
    }

    #[test]
    fn test_skill_serialises_as_label() {
        let rec = DailyActivityRecord {
            skill_practiced: Skill::WebDev,
            ..Default::default()
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains(r#""skill_practiced":"Web Dev""#));
        let back: DailyActivityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
