use super::*;

#[test]
fn sprite_size_rejects_zero() {
    assert!(SpriteSize::new(0, 32).is_err());
    assert!(SpriteSize::new(32, 0).is_err());
    assert_eq!(SpriteSize::new(32, 16).unwrap(), SpriteSize { w: 32, h: 16 });
}

#[test]
fn sprite_size_parses_wxh() {
    assert_eq!(
        "128x64".parse::<SpriteSize>().unwrap(),
        SpriteSize { w: 128, h: 64 }
    );
    assert_eq!(
        "32X32".parse::<SpriteSize>().unwrap(),
        SpriteSize { w: 32, h: 32 }
    );
    assert!("32".parse::<SpriteSize>().is_err());
    assert!("0x32".parse::<SpriteSize>().is_err());
    assert!("ax32".parse::<SpriteSize>().is_err());
}

#[test]
fn sprite_size_serializes_as_w_h() {
    let json = serde_json::to_value(SpriteSize { w: 32, h: 48 }).unwrap();
    assert_eq!(json, serde_json::json!({"w": 32, "h": 48}));
    assert_eq!(SpriteSize { w: 32, h: 48 }.to_string(), "32x48");
}

#[test]
fn sprite_size_of_frame() {
    let frame = Frame::new_rgba8(7, 9);
    assert_eq!(SpriteSize::of(&frame), SpriteSize { w: 7, h: 9 });
}
