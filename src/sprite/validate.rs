use crate::foundation::{
    core::{Frame, SpriteSize},
    error::{SpriteError, SpriteResult},
};

/// Minimum adjacent-frame similarity required to pass.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

const BINS_PER_CHANNEL: usize = 256;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Cross-frame consistency verdict for one animation.
pub struct ValidationResult {
    /// All frames share the first frame's dimensions.
    pub size_consistent: bool,
    /// Every frame carries an alpha channel.
    pub has_transparency: bool,
    /// Number of frames inspected.
    pub frame_count: usize,
    /// Mean adjacent-pair histogram intersection, in `[0, 1]`.
    pub visual_similarity: f64,
    /// Overall verdict.
    pub passes: bool,
}

/// Per-channel RGBA histogram: 256 bins for each of R, G, B, A in that order.
pub fn rgba_histogram(frame: &Frame) -> Vec<u64> {
    let mut hist = vec![0u64; BINS_PER_CHANNEL * 4];
    for px in frame.to_rgba8().pixels() {
        for (c, &v) in px.0.iter().enumerate() {
            hist[c * BINS_PER_CHANNEL + usize::from(v)] += 1;
        }
    }
    hist
}

/// Normalized histogram intersection `sum(min(a, b)) / sum(a)`.
///
/// An empty `a` scores `1.0` against an empty `b` and `0.0` otherwise.
pub fn histogram_intersection(a: &[u64], b: &[u64]) -> f64 {
    let total: u64 = a.iter().sum();
    let overlap: u64 = a.iter().zip(b).map(|(x, y)| (*x).min(*y)).sum();
    if total == 0 {
        return if b.iter().all(|v| *v == 0) { 1.0 } else { 0.0 };
    }
    overlap as f64 / total as f64
}

/// Score the consistency of an animation's frames.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn validate_frames(frames: &[Frame]) -> SpriteResult<ValidationResult> {
    let first = frames
        .first()
        .ok_or_else(|| SpriteError::empty_frame_set("cannot validate an empty frame list"))?;
    let size = SpriteSize::of(first);

    let size_consistent = frames.iter().all(|f| SpriteSize::of(f) == size);
    let has_transparency = frames.iter().all(|f| f.color().has_alpha());

    let visual_similarity = if frames.len() < 2 {
        1.0
    } else {
        let histograms: Vec<Vec<u64>> = frames.iter().map(rgba_histogram).collect();
        let sum: f64 = histograms
            .windows(2)
            .map(|pair| histogram_intersection(&pair[0], &pair[1]))
            .sum();
        sum / (histograms.len() - 1) as f64
    };

    let passes = size_consistent && has_transparency && visual_similarity > SIMILARITY_THRESHOLD;
    tracing::debug!(
        size_consistent,
        has_transparency,
        visual_similarity,
        passes,
        "validated frames"
    );

    Ok(ValidationResult {
        size_consistent,
        has_transparency,
        frame_count: frames.len(),
        visual_similarity,
        passes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/validate.rs"]
mod tests;
