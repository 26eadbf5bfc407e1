// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal
// (training a model, or predicting for one journal).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The predict / what-if workflow
pub mod predict_use_case;
