// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Everything that touches Burn lives here (plus the batcher
// in the data layer). The domain and application layers never
// see a tensor.
//
//   model.rs      — recurrent encoder + self-attention + four
//                   regression heads
//   trainer.rs    — AdamW training loop over pooled windows,
//                   plateau LR schedule, checkpoint on finish
//   inferencer.rs — InferenceService: lazy checkpoint cache,
//                   forward pass, input-gradient attribution
//   fallback.rs   — closed-form estimate for short journals
//   simulator.rs  — "what if" shifts applied before predicting
//
// Backend choice is made once, below. Inference also runs on
// an autodiff backend because feature attribution needs the
// gradient of the score with respect to the input.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Hochreiter & Schmidhuber (1997) LSTM
//            Vaswani et al. (2017) Attention Is All You Need

#[cfg(not(feature = "wgpu"))]
pub type ComputeBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type ComputeBackend = burn::backend::Wgpu;

/// Gradients for optimisation.
pub type TrainBackend = burn::backend::Autodiff<ComputeBackend>;

/// Gradients for attribution only; weights are never updated.
pub type InferBackend = burn::backend::Autodiff<ComputeBackend>;

/// Sequence model architecture
pub mod model;

/// Training loop and LR scheduling
pub mod trainer;

/// Checkpoint-backed prediction service
pub mod inferencer;

/// Heuristic estimate for short histories
pub mod fallback;

/// What-if perturbation of histories
pub mod simulator;
