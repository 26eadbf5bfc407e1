// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file handling used by both training and
// inference:
//
//   checkpoint.rs — the single versioned model checkpoint
//                   (Burn CompactRecorder weights + JSON
//                   manifest, atomic overwrite on retrain)
//
//   metrics.rs    — per-epoch training curve as CSV
//
// Reference: Burn Book §5 (Checkpointing)
//            Rust Book §9 (Error Handling with anyhow)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
