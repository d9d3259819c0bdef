use image::RgbaImage;

use crate::foundation::math::mul_div255_u16;

pub(crate) type StraightRgba8 = [u8; 4];

/// Source-over for straight (non-premultiplied) RGBA8.
pub(crate) fn over_straight(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = mul_div255_u16(u16::from(dst[3]), 255 - sa);
    let out_a = u32::from(sa + da);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * u32::from(sa) + u32::from(dst[i]) * u32::from(da);
        out[i] = ((num + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

/// Composite `src` onto `dst` at `(x, y)`, honouring the source alpha. Pixels that fall
/// outside `dst` are skipped.
pub(crate) fn blit_over(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for (sx, sy, px) in src.enumerate_pixels() {
        let tx = x + i64::from(sx);
        let ty = y + i64::from(sy);
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let d = dst.get_pixel_mut(tx as u32, ty as u32);
        d.0 = over_straight(d.0, px.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/composite.rs"]
mod tests;
