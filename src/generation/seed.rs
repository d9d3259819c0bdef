use crate::foundation::math::{fnv1a64_str, fold_u64_to_u32};

/// Width of one animation's seed band. Every `u32` frame index fits inside it, so for a
/// fixed entity two different `(band, frame)` pairs never produce the same seed.
pub const SEED_BAND_WIDTH: u64 = 1 << 32;

/// Animation kinds with a reserved seed band, in band order.
pub const KNOWN_ANIMATIONS: [&str; 6] = ["idle", "walk", "attack", "run", "hurt", "death"];

// Unknown names hash into bands [KNOWN, KNOWN + 2^31).
const CUSTOM_BAND_SPAN: u64 = 1 << 31;

/// Seed band index for an animation name.
///
/// Known kinds get fixed, ordered bands. Any other name lands in a band derived from its
/// own hash, above all known bands.
pub fn animation_band(animation_id: &str) -> u64 {
    if let Some(pos) = KNOWN_ANIMATIONS.iter().position(|k| *k == animation_id) {
        return pos as u64;
    }
    KNOWN_ANIMATIONS.len() as u64 + fnv1a64_str(animation_id) % CUSTOM_BAND_SPAN
}

/// 32-bit entity base derived from a 64-bit FNV-1a hash of the entity id.
pub fn entity_base(entity_id: &str) -> u64 {
    u64::from(fold_u64_to_u32(fnv1a64_str(entity_id)))
}

/// Deterministic seed for one frame of one animation of one entity.
///
/// `base(entity) + band(animation) * 2^32 + frame_index`. Pure and stable across
/// processes; no input is rejected.
pub fn derive_seed(entity_id: &str, animation_id: &str, frame_index: u32) -> u64 {
    entity_base(entity_id) + animation_band(animation_id) * SEED_BAND_WIDTH + u64::from(frame_index)
}

#[cfg(test)]
#[path = "../../tests/unit/generation/seed.rs"]
mod tests;
