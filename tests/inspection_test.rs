//! 解析テキスト → サブミッション → バッチ の統合テスト

use fod_inspect_common::{
    build_batch, build_submission, classify_status, parse_defects, to_submissions, ImageMeta,
    InspectionStatus, Location, Severity,
};

const MAJOR_ONLY: &str = "MAJOR ISSUES:\n• Debris detected at center\n";
const CRITICAL_WITH_LOCATION: &str =
    "CRITICAL FAILURES:\n• Foreign object detected\n  - Location: Upper-left quadrant\n";

#[test]
fn test_major_issue_example() {
    let defects = parse_defects(MAJOR_ONLY);

    assert_eq!(defects.len(), 1);
    assert_eq!(defects[0].id, "DEF-001");
    assert_eq!(defects[0].severity, Severity::Major);
    assert_eq!(defects[0].location, Location::new(25.0, 30.0));
    assert_eq!(defects[0].description, "Debris detected at center");
}

#[test]
fn test_critical_location_example() {
    let defects = parse_defects(CRITICAL_WITH_LOCATION);

    assert_eq!(defects.len(), 1);
    assert_eq!(defects[0].severity, Severity::Critical);
    assert_eq!(defects[0].description, "Foreign object detected (Upper-left quadrant)");
}

#[test]
fn test_unrecognized_text() {
    assert!(parse_defects("All good.").is_empty());
    assert_eq!(classify_status("All good."), InspectionStatus::Fail);
}

#[test]
fn test_pass_phrase_beats_fail_phrase() {
    assert_eq!(classify_status("no defect found"), InspectionStatus::Pass);
}

#[test]
fn test_plain_text_without_keywords_has_no_defects() {
    let texts = [
        "The component surface looks uniform.",
        "Inspection complete.\nNothing else to add.",
        "Status: PASS",
    ];
    for text in texts {
        assert!(parse_defects(text).is_empty(), "defects found in {:?}", text);
    }
}

#[test]
fn test_parse_deterministic_on_mixed_input() {
    let text = "CRITICAL FAILURES:\n• Foreign object detected\n  - Recommended Action: Reject\nMINOR ISSUES:\n- Light scuffing near edge\n* Dust on lens cover\n";
    let runs: Vec<_> = (0..5).map(|_| parse_defects(text)).collect();
    for run in &runs[1..] {
        assert_eq!(run, &runs[0]);
    }
}

#[test]
fn test_batch_of_mixed_results() {
    let images = ["a.jpg", "b.jpg", "c.jpg"];
    let texts = [
        "No FOD detected. Surface clear.",
        MAJOR_ONLY,
        CRITICAL_WITH_LOCATION,
    ];

    let submissions: Vec<_> = images
        .iter()
        .zip(texts.iter())
        .map(|(name, text)| build_submission(&ImageMeta::new(*name, *name), text, Some("qwen-vl"), Some(500.0)))
        .collect();

    assert_eq!(submissions[0].status, InspectionStatus::Pass);
    assert_eq!(submissions[1].status, InspectionStatus::Fail);
    assert_eq!(submissions[2].status, InspectionStatus::Fail);

    let batch = build_batch("batch-42", submissions, None).unwrap();
    assert_eq!(batch.status(), InspectionStatus::Fail);

    let subs = to_submissions(&batch);
    let ids: Vec<&str> = subs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["batch-42-sub-0", "batch-42-sub-1", "batch-42-sub-2"]);
    assert_eq!(batch.response, "No FOD detected. Surface clear.");
}
