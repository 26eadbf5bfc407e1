use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::{
    features::{encode_history, FeatureVector},
    targets::{compute_targets, TargetVector},
    windows::make_windows,
};
use crate::domain::activity::SubjectHistory;

/// One window of days and the label of the day after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSample {
    pub sequence: Vec<FeatureVector>,
    pub target:   TargetVector,
}

/// Pooled windows from every subject long enough to contribute.
pub struct GrowthDataset {
    samples: Vec<GrowthSample>,
}

impl GrowthDataset {
    pub fn new(samples: Vec<GrowthSample>) -> Self { Self { samples } }

    /// Window every history longer than `length` days. Shorter ones
    /// contribute nothing and are only counted.
    pub fn from_histories(histories: &[SubjectHistory], length: usize) -> Self {
        let mut samples = Vec::new();
        let mut skipped = 0usize;

        for subject in histories {
            if subject.days() <= length {
                skipped += 1;
                continue;
            }
            let features = encode_history(&subject.records);
            let targets  = compute_targets(&subject.records);
            let (xs, ys) = make_windows(&features, &targets, length);
            samples.extend(
                xs.into_iter()
                    .zip(ys)
                    .map(|(sequence, target)| GrowthSample { sequence, target }),
            );
        }

        if skipped > 0 {
            tracing::debug!("{} subject(s) had ≤ {} days and were skipped", skipped, length);
        }
        Self { samples }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
}

impl Dataset<GrowthSample> for GrowthDataset {
    fn get(&self, index: usize) -> Option<GrowthSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
