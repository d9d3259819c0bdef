//! Deterministic image work: normalization, packing, scoring and persistence.

pub(crate) mod composite;
/// Fit-and-center onto a fixed canvas.
pub mod normalize;
/// Grid sprite sheets and their metadata.
pub mod pack;
/// On-disk layout.
pub mod store;
/// Cross-frame consistency checks.
pub mod validate;
