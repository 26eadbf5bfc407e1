// ============================================================
// Layer 4 — History Loader
// ============================================================
// Reads journals from JSON files for the CLI. In production the
// persistence collaborator implements HistorySource instead.
//
// Two shapes are accepted:
//
//   corpus file  — [{ "subject_id": "...", "records": [ ... ] }, ...]
//                  used by `train`
//   history file — [ { record }, { record }, ... ]
//                  one subject, oldest day first; used by
//                  `predict` and `simulate`
//
// Reference: serde_json documentation, Rust Book §9

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::activity::{DailyActivityRecord, SubjectHistory};
use crate::domain::traits::HistorySource;

/// Loads a multi-subject corpus from a JSON file.
pub struct JsonHistoryLoader {
    path: PathBuf,
}

impl JsonHistoryLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl HistorySource for JsonHistoryLoader {
    fn load_histories(&self) -> Result<Vec<SubjectHistory>> {
        // A missing corpus is an empty corpus; training then degrades
        // to an untrained model with a warning instead of failing.
        if !self.path.exists() {
            tracing::warn!(
                "Corpus file '{}' does not exist, returning empty corpus",
                self.path.display()
            );
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;
        let histories: Vec<SubjectHistory> = serde_json::from_str(&json)
            .with_context(|| format!("Malformed corpus JSON in '{}'", self.path.display()))?;

        tracing::debug!("Loaded {} subject histories", histories.len());
        Ok(histories)
    }
}

/// Load a single subject's journal.
pub fn load_history(path: impl AsRef<Path>) -> Result<Vec<DailyActivityRecord>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read history '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Malformed history JSON in '{}'", path.display()))
}

/// Write a corpus in the shape `JsonHistoryLoader` reads back.
pub fn save_corpus(path: impl AsRef<Path>, histories: &[SubjectHistory]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(histories)?;
    fs::write(path, json).with_context(|| format!("Cannot write corpus '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_corpus_is_empty() {
        let dir    = tempfile::tempdir().unwrap();
        let loader = JsonHistoryLoader::new(dir.path().join("nope.json"));
        assert!(loader.load_histories().unwrap().is_empty());
    }

    #[test]
    fn test_corpus_round_trips_through_disk() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let corpus = vec![SubjectHistory::new("s1", vec![DailyActivityRecord::default(); 3])];

        save_corpus(&path, &corpus).unwrap();
        let back = JsonHistoryLoader::new(&path).load_histories().unwrap();
        assert_eq!(back, corpus);
    }

    #[test]
    fn test_malformed_history_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_history(&path).is_err());
    }

    #[test]
    fn test_sparse_history_records_parse() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.json");
        fs::write(&path, r#"[{"study_hours": 3}, {"study_hours": 0, "mood": 5, "skill_practiced": "DSA"}]"#).unwrap();
        let h = load_history(&path).unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h[1].mood, 5);
    }
}
