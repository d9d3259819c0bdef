use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over_straight(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let src = [255, 0, 0, 255];
    assert_eq!(over_straight([0, 0, 255, 255], src), src);
}

#[test]
fn over_transparent_dst_keeps_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over_straight([0, 0, 0, 0], src), src);
}

#[test]
fn over_half_red_on_opaque_blue() {
    let out = over_straight([0, 0, 255, 255], [255, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert!((i32::from(out[0]) - 128).abs() <= 1, "{out:?}");
    assert!((i32::from(out[2]) - 127).abs() <= 1, "{out:?}");
}

#[test]
fn blit_clips_to_destination() {
    let mut dst = RgbaImage::new(2, 2);
    let src = RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]));
    blit_over(&mut dst, &src, 1, 1);
    assert_eq!(dst.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(dst.get_pixel(1, 1).0, [9, 9, 9, 255]);

    blit_over(&mut dst, &src, -1, -1);
    assert_eq!(dst.get_pixel(0, 0).0, [9, 9, 9, 255]);
}
