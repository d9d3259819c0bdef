use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::{
    foundation::core::{Frame, SpriteSize},
    sprite::composite::blit_over,
};

/// Fit `image` into a transparent `target` canvas, preserving aspect ratio.
///
/// Images that already match `target` are copied verbatim (converted to RGBA8). Anything
/// else is scaled by `min(tw / w, th / h)` with a Lanczos3 filter and composited at the
/// floor-centered offset, so an odd remainder biases toward the top/left.
pub fn normalize_sprite(image: &Frame, target: SpriteSize) -> Frame {
    let source = image.to_rgba8();
    let (sw, sh) = source.dimensions();
    if (sw, sh) == (target.w, target.h) {
        return DynamicImage::ImageRgba8(source);
    }

    let mut canvas = RgbaImage::new(target.w, target.h);
    if sw == 0 || sh == 0 {
        return DynamicImage::ImageRgba8(canvas);
    }

    let (nw, nh) = fitted_size(sw, sh, target);
    let scaled = if (nw, nh) == (sw, sh) {
        source
    } else {
        image::imageops::resize(&source, nw, nh, FilterType::Lanczos3)
    };

    let (ox, oy) = centered_offset(target, nw, nh);
    blit_over(&mut canvas, &scaled, i64::from(ox), i64::from(oy));
    DynamicImage::ImageRgba8(canvas)
}

/// Scaled size for a `w x h` source fitted into `target`. Each side is at least one pixel
/// and never exceeds the target.
pub(crate) fn fitted_size(w: u32, h: u32, target: SpriteSize) -> (u32, u32) {
    let scale = f64::min(
        f64::from(target.w) / f64::from(w),
        f64::from(target.h) / f64::from(h),
    );
    let nw = (f64::from(w) * scale).round().clamp(1.0, f64::from(target.w)) as u32;
    let nh = (f64::from(h) * scale).round().clamp(1.0, f64::from(target.h)) as u32;
    (nw, nh)
}

pub(crate) fn centered_offset(target: SpriteSize, w: u32, h: u32) -> (u32, u32) {
    (target.w.saturating_sub(w) / 2, target.h.saturating_sub(h) / 2)
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/normalize.rs"]
mod tests;
