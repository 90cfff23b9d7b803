// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for tagbot

use std::path::Path;
use tagbot::config::AnalyzerConfig;
use tagbot::remediation::{FixAction, RemediationPlan};
use tagbot::report::{render, render_batch, IssueContext, OutputFormat};
use tagbot::{scanner, verify, Analyzer, IssueKind, Location, TagbotError};

fn analyzer() -> Analyzer {
    Analyzer::new(AnalyzerConfig::default()).expect("default config is valid")
}

fn advisory_analyzer() -> Analyzer {
    Analyzer::new(AnalyzerConfig {
        advisory_checks: true,
        ..AnalyzerConfig::default()
    })
    .expect("config is valid")
}

#[test]
fn test_accessible_fixture_passes() {
    let report = scanner::scan_file(Path::new("tests/fixtures/accessible.json"), &advisory_analyzer())
        .expect("scan should succeed");

    assert!(
        report.is_empty(),
        "Accessible fixture should have no issues, got {:?}",
        report.issues.iter().map(|i| i.kind).collect::<Vec<_>>()
    );
    assert_eq!(report.totals.words, 6);
    assert!(render(&report, OutputFormat::Text).contains("RESULT: PASS"));
}

#[test]
fn test_inaccessible_fixture_end_to_end() {
    let report = scanner::scan_file(Path::new("tests/fixtures/inaccessible.json"), &analyzer())
        .expect("scan should succeed");

    assert_eq!(report.len(), 3);
    assert_eq!(
        (report.critical_count, report.high_count, report.medium_count, report.low_count),
        (1, 2, 0, 0)
    );
    assert_eq!(report.issues[0].kind, IssueKind::ImageMissingAltText);
    assert_eq!(report.issues[1].kind, IssueKind::MissingDocumentTitle);
    assert_eq!(report.issues[1].location, Location::Document);
    assert_eq!(report.issues[2].kind, IssueKind::UntaggedHeading);

    let text = render(&report, OutputFormat::Text);
    assert!(text.contains("RESULT: BLOCKED"));
}

#[test]
fn test_inaccessible_fixture_with_advisory_checks() {
    let report = scanner::scan_file(Path::new("tests/fixtures/inaccessible.json"), &advisory_analyzer())
        .expect("scan should succeed");

    assert_eq!(report.len(), 5);
    assert_eq!(report.medium_count, 1);
    assert_eq!(report.low_count, 1);
    assert!(report.counts_consistent());
}

#[test]
fn test_two_column_fixture() {
    let report = scanner::scan_file(Path::new("tests/fixtures/two_column.json"), &analyzer())
        .expect("scan should succeed");

    let anomalies = report.by_kind(IssueKind::ReadingOrderAnomaly);
    assert_eq!(anomalies.len(), 2);

    assert_eq!(anomalies[0].location, Location::Page(1));
    assert!(!anomalies[0].auto_fixable, "two-column page cannot be reordered automatically");

    assert_eq!(anomalies[1].location, Location::Page(2));
    assert!(anomalies[1].auto_fixable);
    assert!(matches!(
        &anomalies[1].context,
        Some(IssueContext::ReadingOrder { first_word, simple_layout: true, .. }) if first_word == "First"
    ));
}

#[test]
fn test_malformed_fixture_rejected() {
    let err = scanner::scan_file(Path::new("tests/fixtures/malformed.json"), &analyzer()).unwrap_err();
    assert!(matches!(err, TagbotError::MalformedInput(_)), "got {:?}", err);
}

#[test]
fn test_scan_fixtures_directory() {
    let batch = scanner::scan_directory(Path::new("tests/fixtures"), &analyzer())
        .expect("directory scan should succeed");

    assert_eq!(batch.reports.len(), 3);
    assert_eq!(batch.failures.len(), 1);
    assert!(batch.failures[0].path.ends_with("malformed.json"));
    assert!(batch.has_critical());

    let text = render_batch(&batch, OutputFormat::Text);
    assert!(text.contains("Scanned 4 document(s): 3 analyzed, 1 failed"));

    let sarif: serde_json::Value =
        serde_json::from_str(&render_batch(&batch, OutputFormat::Sarif)).expect("valid SARIF");
    let results = sarif["runs"][0]["results"].as_array().expect("results array");
    assert_eq!(results.len(), batch.total_issues());
}

#[test]
fn test_json_output_is_deterministic() {
    let path = Path::new("tests/fixtures/inaccessible.json");
    let first = render(&scanner::scan_file(path, &analyzer()).unwrap(), OutputFormat::Json);
    let second = render(&scanner::scan_file(path, &analyzer()).unwrap(), OutputFormat::Json);
    assert_eq!(first, second);
}

#[test]
fn test_plan_and_verify_round() {
    let report = scanner::scan_file(Path::new("tests/fixtures/inaccessible.json"), &analyzer()).unwrap();
    let plan = RemediationPlan::from_report(&report);
    assert_eq!(plan.fixes.len(), 3);
    assert!(matches!(&plan.fixes[1].action, FixAction::SetTitle { title } if title == "Overview"));

    // Apply the plan by hand, as the remediation driver would
    let mut fixed = tagbot::Extraction::from_path(Path::new("tests/fixtures/inaccessible.json")).unwrap();
    for fix in &plan.fixes {
        match &fix.action {
            FixAction::GenerateAltText { image, .. } => {
                for page in &mut fixed.pages {
                    for img in page.images.iter_mut().filter(|i| &i.name == image) {
                        img.ai_description = Some("A photo of the office".to_string());
                    }
                }
            }
            FixAction::SetTitle { title } => fixed.metadata.title = Some(title.clone()),
            FixAction::TagHeading { page, text, level, bbox } => {
                for p in fixed.pages.iter_mut().filter(|p| p.number() == *page) {
                    for word in p.words.iter_mut().filter(|w| &w.text == text && w.bbox == *bbox) {
                        word.structure_role = Some(format!("H{}", level));
                    }
                }
            }
            _ => {}
        }
    }

    let after = analyzer().analyze(&fixed).unwrap();
    let summary = verify::compare(&report, &after);
    assert_eq!(summary.resolved.len(), 3);
    assert!(summary.introduced.is_empty());
    assert!(summary.improved());
    assert!(after.is_empty());
}
