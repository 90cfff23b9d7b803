// SPDX-License-Identifier: PMPL-1.0-or-later
//! SARIF 2.1.0 output.

use super::{Issue, Report};
use crate::taxonomy::{Severity, Taxonomy};
use serde::Serialize;

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
struct SarifRule {
    id: String,
    name: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    properties: SarifRuleProperties,
}

#[derive(Debug, Serialize)]
struct SarifRuleProperties {
    wcag: String,
    severity: Severity,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
    properties: SarifResultProperties,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
    #[serde(rename = "logicalLocations")]
    logical_locations: Vec<SarifLogicalLocation>,
}

#[derive(Debug, Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
struct SarifLogicalLocation {
    name: String,
    kind: String,
}

#[derive(Debug, Serialize)]
struct SarifResultProperties {
    page: Option<u32>,
    wcag: String,
    #[serde(rename = "autoFixable")]
    auto_fixable: bool,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low => "note",
    }
}

fn sarif_result(report: &Report, issue: &Issue) -> SarifResult {
    let logical_kind = match issue.location.page() {
        Some(_) => "page",
        None => "document",
    };

    SarifResult {
        rule_id: issue.kind.id().to_string(),
        level: sarif_level(issue.severity).to_string(),
        message: SarifMessage { text: issue.message.clone() },
        locations: vec![SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifactLocation {
                    uri: report.file_path.display().to_string(),
                },
            },
            logical_locations: vec![SarifLogicalLocation {
                name: issue.location.to_string(),
                kind: logical_kind.to_string(),
            }],
        }],
        properties: SarifResultProperties {
            page: issue.location.page(),
            wcag: issue.wcag.clone(),
            auto_fixable: issue.auto_fixable,
        },
    }
}

/// Generate a SARIF log with one run covering every report
pub(super) fn render<'a>(reports: impl IntoIterator<Item = &'a Report>) -> String {
    let results: Vec<SarifResult> = reports
        .into_iter()
        .flat_map(|report| report.issues.iter().map(move |issue| sarif_result(report, issue)))
        .collect();

    let rules = Taxonomy::standard()
        .entries()
        .map(|entry| SarifRule {
            id: entry.kind.id().to_string(),
            name: entry.name.to_string(),
            short_description: SarifMessage { text: entry.recommendation.to_string() },
            properties: SarifRuleProperties {
                wcag: entry.wcag.to_string(),
                severity: entry.severity,
            },
        })
        .collect();

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "tagbot".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}
