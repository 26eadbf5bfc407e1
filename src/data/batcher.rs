// ============================================================
// Layer 4 — Growth Batcher
// ============================================================
// Implements Burn's Batcher trait to stack GrowthSamples into
// tensors the model can consume in one forward pass.
//
//   Input:  Vec of N samples, each a [S, F] window + 5 labels
//   Output: sequences [N, S, F], targets [N, 5]
//
// Every window already has the same length, so batching is a
// flatten followed by a reshape, no padding.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::GrowthSample;
use crate::data::features::FeatureVector;
use crate::data::targets::NUM_TARGETS;
use crate::domain::prediction::NUM_FEATURES;

#[derive(Debug, Clone)]
pub struct GrowthBatch<B: Backend> {
    /// [batch_size, seq_len, 8]
    pub sequences: Tensor<B, 3>,

    /// [batch_size, 5] in the order score, burnout, velocity, lower, upper
    pub targets: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct GrowthBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> GrowthBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

/// Build a [1, seq_len, 8] tensor from a single window.
pub fn sequence_tensor<B: Backend>(sequence: &[FeatureVector], device: &B::Device) -> Tensor<B, 3> {
    let flat: Vec<f32> = sequence.iter().flat_map(|day| day.iter().copied()).collect();
    Tensor::from_data(TensorData::new(flat, [1, sequence.len(), NUM_FEATURES]), device)
}

impl<B: Backend> Batcher<GrowthSample, GrowthBatch<B>> for GrowthBatcher<B> {
    fn batch(&self, items: Vec<GrowthSample>) -> GrowthBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map(|s| s.sequence.len()).unwrap_or(0);

        let seq_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.sequence.iter().flat_map(|day| day.iter().copied()))
            .collect();

        let target_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.target.iter().copied())
            .collect();

        let sequences = Tensor::from_data(
            TensorData::new(seq_flat, [batch_size, seq_len, NUM_FEATURES]),
            &self.device,
        );
        let targets = Tensor::from_data(
            TensorData::new(target_flat, [batch_size, NUM_TARGETS]),
            &self.device,
        );

        GrowthBatch { sequences, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let sample = GrowthSample {
            sequence: vec![[1.0; NUM_FEATURES]; 14],
            target:   [0.5, 0.1, 0.0, 0.42, 0.58],
        };
        let batcher = GrowthBatcher::<NdArray>::new(Default::default());
        let batch   = batcher.batch(vec![sample.clone(), sample.clone(), sample]);

        assert_eq!(batch.sequences.dims(), [3, 14, NUM_FEATURES]);
        assert_eq!(batch.targets.dims(), [3, NUM_TARGETS]);

        let targets: Vec<f32> = batch.targets.into_data().to_vec().unwrap();
        assert_eq!(&targets[0..5], &[0.5, 0.1, 0.0, 0.42, 0.58]);
    }

    #[test]
    fn test_single_sequence_tensor() {
        let window = vec![[0.25; NUM_FEATURES]; 14];
        let t = sequence_tensor::<NdArray>(&window, &Default::default());
        assert_eq!(t.dims(), [1, 14, NUM_FEATURES]);
    }
}
