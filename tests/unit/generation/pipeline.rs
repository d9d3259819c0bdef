use super::*;

fn report(entity: &str, millis: &[u64], passes: bool) -> AnimationReport {
    AnimationReport {
        entity: entity.to_string(),
        animation: "walk".to_string(),
        frame_paths: (0..millis.len())
            .map(|i| PathBuf::from(format!("frame_{i}.png")))
            .collect(),
        sheet_path: PathBuf::from("spritesheet.png"),
        metadata_path: PathBuf::from("metadata.json"),
        frame_times: millis.iter().map(|m| Duration::from_millis(*m)).collect(),
        validation: ValidationResult {
            size_consistent: true,
            has_transparency: true,
            frame_count: millis.len(),
            visual_similarity: if passes { 0.9 } else { 0.2 },
            passes,
        },
    }
}

#[test]
fn default_settings_match_demo_run() {
    let s = GenerationSettings::default();
    assert_eq!((s.source_width, s.source_height), (128, 128));
    assert_eq!(s.sprite_size, SpriteSize { w: 32, h: 32 });
    s.validate().unwrap();

    let bad = GenerationSettings {
        source_width: 0,
        ..GenerationSettings::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn report_timings() {
    let r = report("goblin", &[100, 200, 300, 400], true);
    assert_eq!(r.frame_count(), 4);
    assert_eq!(r.total_time(), Duration::from_millis(1000));
    assert_eq!(r.avg_frame_time(), Duration::from_millis(250));

    let empty = report("ghost", &[], true);
    assert_eq!(empty.avg_frame_time(), Duration::ZERO);
}

#[test]
fn summary_aggregates_reports_and_failures() {
    let mut summary = RunSummary {
        reports: vec![
            report("goblin", &[100, 100], true),
            report("fighter", &[300, 300], true),
        ],
        failures: vec![],
        elapsed: Duration::from_secs(1),
    };
    assert_eq!(summary.attempted(), 2);
    assert_eq!(summary.total_frames(), 4);
    assert_eq!(summary.avg_frame_time(), Duration::from_millis(200));
    assert!(summary.all_passed());

    summary.failures.push(EntityFailure {
        entity: "skeleton".to_string(),
        error: "timeout error: job 'x' did not finish within 10 ms".to_string(),
    });
    assert_eq!(summary.attempted(), 3);
    assert!(!summary.all_passed());
}

#[test]
fn failing_validation_fails_the_run() {
    let summary = RunSummary {
        reports: vec![report("goblin", &[100], false)],
        ..RunSummary::default()
    };
    assert!(!summary.all_passed());
}
