use image::{Rgb, RgbImage, Rgba};

use super::*;

fn size(w: u32, h: u32) -> SpriteSize {
    SpriteSize { w, h }
}

/// Bounding box of non-transparent pixels: (min_x, min_y, max_x, max_y).
fn opaque_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut b: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in img.enumerate_pixels() {
        if p.0[3] == 0 {
            continue;
        }
        b = Some(match b {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    b
}

#[test]
fn output_is_always_target_size() {
    for (w, h) in [(128, 128), (200, 100), (10, 40), (1, 1), (32, 32), (33, 7)] {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255])));
        let out = normalize_sprite(&src, size(32, 32));
        assert_eq!((out.width(), out.height()), (32, 32), "source {w}x{h}");
        assert!(out.color().has_alpha());
    }
}

#[test]
fn equal_size_is_identity() {
    let mut src = RgbaImage::new(4, 4);
    for (x, y, p) in src.enumerate_pixels_mut() {
        *p = Rgba([x as u8 * 10, y as u8 * 20, 7, (x * y) as u8 * 15]);
    }
    let out = normalize_sprite(&DynamicImage::ImageRgba8(src.clone()), size(4, 4));
    assert_eq!(out.to_rgba8(), src);
}

#[test]
fn wide_source_is_letterboxed_and_centered() {
    let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([255, 0, 0, 255])));
    let out = normalize_sprite(&src, size(32, 32)).to_rgba8();
    let (x0, y0, x1, y1) = opaque_bounds(&out).unwrap();
    assert_eq!((x0, x1), (0, 31));
    // 32x16 content centered vertically: rows 8..=23.
    assert_eq!((y0, y1), (8, 23));
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
}

#[test]
fn content_is_centered_within_one_pixel() {
    for (w, h) in [(100, 37), (37, 100), (45, 45), (7, 3)] {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([9, 9, 9, 255])));
        let out = normalize_sprite(&src, size(32, 32)).to_rgba8();
        let (x0, y0, x1, y1) = opaque_bounds(&out).unwrap();
        let cx = f64::from(x0 + x1 + 1) / 2.0;
        let cy = f64::from(y0 + y1 + 1) / 2.0;
        assert!((cx - 16.0).abs() <= 1.0, "{w}x{h}: cx={cx}");
        assert!((cy - 16.0).abs() <= 1.0, "{w}x{h}: cy={cy}");
    }
}

#[test]
fn odd_remainder_biases_top_left() {
    assert_eq!(centered_offset(size(32, 32), 31, 29), (0, 1));
    assert_eq!(fitted_size(128, 64, size(32, 32)), (32, 16));
    assert_eq!(fitted_size(1000, 1, size(32, 32)), (32, 1));
}

#[test]
fn upscales_small_sources_to_fit() {
    assert_eq!(fitted_size(8, 16, size(32, 32)), (16, 32));
}

#[test]
fn rgb_source_becomes_opaque_rgba() {
    let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([0, 255, 0])));
    let out = normalize_sprite(&src, size(32, 32)).to_rgba8();
    assert_eq!(out.get_pixel(16, 16).0[3], 255);
}

#[test]
fn transparent_source_stays_transparent() {
    let src = DynamicImage::ImageRgba8(RgbaImage::new(64, 64));
    let out = normalize_sprite(&src, size(32, 32)).to_rgba8();
    assert!(opaque_bounds(&out).is_none());
}
