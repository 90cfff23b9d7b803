// SPDX-License-Identifier: PMPL-1.0-or-later
//! Human-readable text output.

use super::{Issue, IssueContext, Report};
use crate::scanner::BatchReport;
use crate::taxonomy::{IssueKind, Severity};
use std::collections::BTreeMap;

/// Issues shown per type in the summary before eliding the rest
const SUMMARY_ISSUES_PER_TYPE: usize = 3;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------------";

pub(super) fn render_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("=== Tagbot PDF Accessibility Report ===\n\n");
    output.push_str(&format!("File: {}\n", report.file_path.display()));
    output.push_str(&format!("Taxonomy: {}\n", report.taxonomy_version));
    output.push_str(&format!(
        "Pages: {}  Words: {}  Images: {}\n\n",
        report.totals.pages, report.totals.words, report.totals.images
    ));

    if report.is_empty() {
        output.push_str("No accessibility issues found. All checks passed.\n\n");
        output.push_str("RESULT: PASS\n");
        return output;
    }

    output.push_str(&format!("Total issues: {}\n", report.len()));
    for severity in Severity::ALL {
        output.push_str(&format!("  {}: {}\n", capitalize(severity), report.count(severity)));
    }
    output.push_str(&format!(
        "  Auto-fixable: {}\n\n",
        report.auto_fixable().count()
    ));

    output.push_str(RULE);
    output.push_str("\nIssues by type\n");
    output.push_str(THIN_RULE);
    output.push('\n');

    let mut by_kind: BTreeMap<IssueKind, Vec<_>> = BTreeMap::new();
    for issue in &report.issues {
        by_kind.entry(issue.kind).or_default().push(issue);
    }

    for (kind, issues) in &by_kind {
        output.push_str(&format!("\n{} ({}):\n", kind, issues.len()));
        for issue in issues.iter().take(SUMMARY_ISSUES_PER_TYPE) {
            output.push_str(&format!("  [{}] {}\n", position(issue), issue.message));
            output.push_str(&format!("    WCAG: {}\n", issue.wcag));
            output.push_str(&format!("    Fix: {}\n", issue.recommendation));
        }
        if issues.len() > SUMMARY_ISSUES_PER_TYPE {
            output.push_str(&format!(
                "  ... and {} more\n",
                issues.len() - SUMMARY_ISSUES_PER_TYPE
            ));
        }
    }

    output.push('\n');
    output.push_str(RULE);
    output.push_str("\nDetailed issues\n");
    output.push_str(THIN_RULE);
    output.push_str("\n\n");

    for (i, issue) in report.issues.iter().enumerate() {
        output.push_str(&format!("{}. {} [{}]\n", i + 1, issue.name, issue.severity));
        output.push_str(&format!("   Location: {}\n", position(issue)));
        output.push_str(&format!("   WCAG: {}\n", issue.wcag));
        output.push_str(&format!("   Description: {}\n", issue.message));
        output.push_str(&format!("   Recommendation: {}\n", issue.recommendation));
        output.push_str(&format!(
            "   Auto-fixable: {}\n\n",
            if issue.auto_fixable { "yes" } else { "no" }
        ));
    }

    output.push_str(result_line(report));
    output.push('\n');
    output
}

pub(super) fn render_batch(batch: &BatchReport) -> String {
    let mut output = String::new();

    for document in &batch.reports {
        output.push_str(&render_report(&document.report));
        output.push('\n');
    }

    output.push_str(RULE);
    output.push_str(&format!(
        "\nScanned {} document(s): {} analyzed, {} failed\n",
        batch.reports.len() + batch.failures.len(),
        batch.reports.len(),
        batch.failures.len()
    ));

    for failure in &batch.failures {
        output.push_str(&format!("  FAILED {}: {}\n", failure.path.display(), failure.error));
    }

    let blocked = batch.reports.iter().filter(|d| d.report.has_critical()).count();
    if blocked > 0 {
        output.push_str(&format!("{} document(s) have critical issues\n", blocked));
    }

    output
}

/// Location plus the top-left corner of the image or heading, if any.
fn position(issue: &Issue) -> String {
    let bbox = match &issue.context {
        Some(IssueContext::Image { bbox, .. }) | Some(IssueContext::Heading { bbox, .. }) => bbox,
        _ => return issue.location.to_string(),
    };
    format!("{} at ({:.0}, {:.0})", issue.location, bbox.x0, bbox.y0)
}

fn result_line(report: &Report) -> &'static str {
    if report.critical_count > 0 {
        "RESULT: BLOCKED (critical accessibility issues found)"
    } else if report.high_count > 0 {
        "RESULT: NEEDS ATTENTION (high-severity issues found)"
    } else if !report.is_empty() {
        "RESULT: PASS WITH WARNINGS"
    } else {
        "RESULT: PASS"
    }
}

fn capitalize(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Critical",
        Severity::High => "High",
        Severity::Medium => "Medium",
        Severity::Low => "Low",
    }
}
