// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw journal entries and model-ready
// tensor batches. The pipeline flows in this order:
//
//   DailyActivityRecord (JSON / persistence)
//       │
//       ▼
//   features   → 8 numbers per day
//   targets    → 5 synthetic labels per day (training only)
//       │
//       ▼
//   windows    → 14-day sliding windows + next-day label
//       │
//       ▼
//   dataset    → implements Burn's Dataset trait
//       │
//       ▼
//   batcher    → stacks windows into [batch, 14, 8] tensors
//
// Training and inference share features + windows, so the
// model always sees data encoded the same way.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads corpora and single journals from JSON files
pub mod loader;

/// Seeded synthetic corpora for demos and tests
pub mod synthetic;

/// One record → one FeatureVector
pub mod features;

/// Self-supervised training labels
pub mod targets;

/// Sliding-window sequence construction
pub mod windows;

/// Implements Burn's Dataset trait for windows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
