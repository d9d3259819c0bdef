use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SpriteError::submission("x")
            .to_string()
            .contains("submission error:")
    );
    assert!(
        SpriteError::tracking("x")
            .to_string()
            .contains("tracking error:")
    );
    assert!(SpriteError::timeout("x").to_string().contains("timeout error:"));
    assert!(
        SpriteError::artifact_not_found("x")
            .to_string()
            .contains("artifact not found:")
    );
    assert!(
        SpriteError::artifact_fetch("x")
            .to_string()
            .contains("artifact fetch error:")
    );
    assert!(
        SpriteError::empty_frame_set("x")
            .to_string()
            .contains("empty frame set:")
    );
    assert!(
        SpriteError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SpriteError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SpriteError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn job_failures_are_classified() {
    assert!(SpriteError::submission("x").is_job_failure());
    assert!(SpriteError::timeout("x").is_job_failure());
    assert!(SpriteError::artifact_fetch("x").is_job_failure());
    assert!(!SpriteError::empty_frame_set("x").is_job_failure());
    assert!(!SpriteError::validation("x").is_job_failure());
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: SpriteError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, SpriteError::Serde(_)));
}
