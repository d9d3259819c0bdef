use super::*;

#[test]
fn prompt_keeps_template_structure() {
    let prompt = build_prompt("a goblin", "mid-stride walking", DEFAULT_STYLE);
    assert!(prompt.starts_with("isometric pixel art sprite, a goblin,\n"));
    assert!(prompt.contains("\nmid-stride walking,\n"));
    assert!(prompt.contains("16-bit SNES pixel art, clean pixel art"));
    assert!(prompt.ends_with("clear silhouette"));
}

#[test]
fn walk_cycle_has_four_frames() {
    let walk = AnimationSpec::walk();
    assert_eq!(walk.name, "walk");
    assert_eq!(walk.frame_count(), 4);
    assert_eq!(walk.poses[0], walk.poses[2]);
}

#[test]
fn selects_demo_entities_by_name() {
    let picked = select_entities(&["skeleton".to_string(), "goblin".to_string()]).unwrap();
    let names: Vec<&str> = picked.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["skeleton", "goblin"]);

    let err = select_entities(&["dragon".to_string()]).unwrap_err();
    assert!(err.to_string().contains("dragon"));
    assert!(err.to_string().contains("fighter"));
}
