use image::{DynamicImage, Rgba};

use super::*;
use crate::sprite::pack::pack_frames;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "spritegen_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn solid(w: u32, h: u32, v: u8) -> Frame {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([v, v, v, 255])))
}

#[test]
fn writes_layout_and_round_trips_metadata() {
    let tmp = temp_dir("store_layout");
    let store = SpriteStore::new(&tmp);

    let frames = vec![solid(4, 4, 1), solid(4, 4, 2)];
    for (i, f) in frames.iter().enumerate() {
        let p = store.save_frame("goblin", i, f).unwrap();
        assert_eq!(p, tmp.join("goblin").join(format!("frame_{i}.png")));
        assert!(p.is_file());
    }

    let (sheet, meta) = pack_frames(&frames, "goblin", "walk").unwrap();
    let (sheet_path, meta_path) = store.save_sprite_sheet("goblin", &sheet, &meta).unwrap();
    assert_eq!(sheet_path, tmp.join("goblin").join("spritesheet.png"));
    assert_eq!(meta_path, tmp.join("goblin").join("metadata.json"));
    assert_eq!(store.load_metadata("goblin").unwrap(), meta);

    let decoded = image::open(&sheet_path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 4));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn loads_frames_in_natural_order_and_skips_sheet() {
    let tmp = temp_dir("store_natural");
    let store = SpriteStore::new(&tmp);
    for i in [10usize, 2, 1] {
        store.save_frame("e", i, &solid(2, 2, i as u8)).unwrap();
    }
    let (sheet, meta) = pack_frames(&[solid(2, 2, 0)], "e", "idle").unwrap();
    store.save_sprite_sheet("e", &sheet, &meta).unwrap();

    let frames = load_frames_from_dir(&tmp.join("e")).unwrap();
    let firsts: Vec<u8> = frames.iter().map(|f| f.to_rgba8().get_pixel(0, 0).0[0]).collect();
    assert_eq!(firsts, vec![1, 2, 10]);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn rejects_path_like_entity_names() {
    let store = SpriteStore::new("out");
    for bad in ["", " ", "..", "a/b", "a\\b"] {
        assert!(store.entity_dir(bad).is_err(), "{bad:?}");
    }
    assert_eq!(
        store.entity_dir("skeleton").unwrap(),
        PathBuf::from("out").join("skeleton")
    );
}

#[test]
fn natural_key_orders_numeric_runs() {
    assert!(natural_key("frame_2.png") < natural_key("frame_10.png"));
    assert!(natural_key("a.png") < natural_key("b.png"));
}

#[test]
fn decode_frame_rejects_garbage() {
    assert!(decode_frame(b"not an image").is_err());
}
