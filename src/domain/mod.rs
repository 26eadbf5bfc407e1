// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define what the system
// talks about: a student's daily journal entries and the
// prediction we hand back for them.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Every other layer speaks in these types, so the persistence
// collaborator and the CLI can exchange data with the ML layer
// without ever touching a tensor.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// One subject-day of journal data
pub mod activity;

// The prediction handed back to callers
pub mod prediction;

// Collaborator abstractions (history source, predictor)
pub mod traits;
