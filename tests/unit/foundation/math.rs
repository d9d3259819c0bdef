use super::*;

#[test]
fn incremental_writes_match_one_shot_hash() {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(b"gob");
    h.write_bytes(b"lin");
    assert_eq!(h.finish(), fnv1a64_str("goblin"));
}

#[test]
fn fnv_matches_reference_vectors() {
    // Published FNV-1a 64 test vectors.
    assert_eq!(fnv1a64_str(""), 0xcbf2_9ce4_8422_2325);
    assert_eq!(fnv1a64_str("a"), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn fold_mixes_both_halves() {
    assert_eq!(fold_u64_to_u32(0), 0);
    assert_eq!(fold_u64_to_u32(0x0000_0001_0000_0000), 1);
    assert_eq!(fold_u64_to_u32(0x0000_0001_0000_0001), 0);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
    assert_eq!(mul_div255_u16(1, 127), 0);
    assert_eq!(mul_div255_u16(1, 128), 1);
}
