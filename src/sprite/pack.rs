use std::collections::BTreeMap;

use image::{RgbaImage, imageops::FilterType};

use crate::foundation::{
    core::{Frame, SpriteSize},
    error::{SpriteError, SpriteResult},
};

/// Display duration assigned to every packed frame, in milliseconds.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Location of one frame inside a packed sheet.
pub struct FrameMetadata {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Frame width in pixels.
    pub w: u32,
    /// Frame height in pixels.
    pub h: u32,
    /// Display duration in milliseconds.
    pub duration: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Ordered frames of a single animation.
pub struct AnimationFrames {
    /// Frames in playback order.
    pub frames: Vec<FrameMetadata>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Frame-location metadata emitted alongside a sheet image.
pub struct SpriteSheetMetadata {
    /// Animations keyed by name.
    pub animations: BTreeMap<String, AnimationFrames>,
    /// Entity the sheet belongs to.
    pub entity_type: String,
    /// Size of every frame.
    pub sprite_size: SpriteSize,
    /// Number of frames across all animations.
    pub total_frames: usize,
}

impl SpriteSheetMetadata {
    /// Frames of `animation`, if present.
    pub fn frames(&self, animation: &str) -> Option<&[FrameMetadata]> {
        self.animations.get(animation).map(|a| a.frames.as_slice())
    }
}

/// Grid shape used for `frame_count` frames: `(columns, rows)`.
pub fn grid_shape(frame_count: usize) -> (u32, u32) {
    let columns: u32 = if frame_count > 1 { 2 } else { 1 };
    let rows = (frame_count as u32).div_ceil(columns);
    (columns, rows)
}

#[derive(Clone, Copy, Debug)]
/// Packs equal-size frames row-major into a two-column grid.
pub struct SheetPacker {
    frame_duration_ms: u32,
}

impl Default for SheetPacker {
    fn default() -> Self {
        Self {
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
        }
    }
}

impl SheetPacker {
    /// Packer that stamps `frame_duration_ms` on every frame.
    pub fn with_frame_duration(frame_duration_ms: u32) -> Self {
        Self { frame_duration_ms }
    }

    /// Pack `frames` into one sheet.
    ///
    /// The first frame fixes the cell size; frames of any other size are plainly resized to
    /// it before placement. Frame `i` lands at `((i % cols) * w, (i / cols) * h)`.
    #[tracing::instrument(skip(self, frames), fields(frames = frames.len()))]
    pub fn pack(
        &self,
        frames: &[Frame],
        entity_id: &str,
        animation_id: &str,
    ) -> SpriteResult<(RgbaImage, SpriteSheetMetadata)> {
        let first = frames.first().ok_or_else(|| {
            SpriteError::empty_frame_set(format!(
                "cannot pack '{entity_id}/{animation_id}' without frames"
            ))
        })?;
        let size = SpriteSize::of(first);
        if size.w == 0 || size.h == 0 {
            return Err(SpriteError::validation(format!(
                "first frame of '{entity_id}/{animation_id}' has zero size"
            )));
        }

        let (columns, rows) = grid_shape(frames.len());
        let mut sheet = RgbaImage::new(columns * size.w, rows * size.h);
        let mut placed = Vec::with_capacity(frames.len());

        for (i, frame) in frames.iter().enumerate() {
            let mut cell = frame.to_rgba8();
            if cell.dimensions() != (size.w, size.h) {
                tracing::debug!(
                    index = i,
                    from = %SpriteSize::of(frame),
                    to = %size,
                    "resizing mismatched frame"
                );
                cell = image::imageops::resize(&cell, size.w, size.h, FilterType::Lanczos3);
            }

            let i = i as u32;
            let x = (i % columns) * size.w;
            let y = (i / columns) * size.h;
            image::imageops::replace(&mut sheet, &cell, i64::from(x), i64::from(y));

            placed.push(FrameMetadata {
                x,
                y,
                w: size.w,
                h: size.h,
                duration: self.frame_duration_ms,
            });
        }

        let total_frames = placed.len();
        let mut animations = BTreeMap::new();
        animations.insert(animation_id.to_string(), AnimationFrames { frames: placed });

        Ok((
            sheet,
            SpriteSheetMetadata {
                animations,
                entity_type: entity_id.to_string(),
                sprite_size: size,
                total_frames,
            },
        ))
    }
}

/// Pack with the default frame duration.
pub fn pack_frames(
    frames: &[Frame],
    entity_id: &str,
    animation_id: &str,
) -> SpriteResult<(RgbaImage, SpriteSheetMetadata)> {
    SheetPacker::default().pack(frames, entity_id, animation_id)
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/pack.rs"]
mod tests;
