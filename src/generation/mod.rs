//! Animation generation: seeds, prompt presets and the per-animation pipeline.

/// Frame-by-frame generation of whole animations.
pub mod pipeline;
/// Entity and pose presets.
pub mod presets;
/// Deterministic seed derivation.
pub mod seed;
