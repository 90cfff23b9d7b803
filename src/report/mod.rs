// SPDX-License-Identifier: PMPL-1.0-or-later
//! Accessibility report and report generation.
//!
//! A [`Report`] is the ordered issue sequence produced by one analysis plus
//! the four severity counts derived from it. It carries no timestamps or
//! random identifiers, so the same extraction always serializes to the same
//! bytes.
//!
//! Supports multiple output formats:
//! - Text: human-readable summary grouped by issue type, then every issue
//! - JSON: the lossless serialization of the report
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

mod sarif;
mod text;

use crate::extraction::BoundingBox;
use crate::scanner::BatchReport;
use crate::taxonomy::{IssueKind, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where an issue applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Document-wide, e.g. missing title
    Document,
    /// A 1-indexed page
    Page(u32),
}

impl Location {
    pub fn page(&self) -> Option<u32> {
        match self {
            Location::Document => None,
            Location::Page(n) => Some(*n),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Document => write!(f, "document"),
            Location::Page(n) => write!(f, "page {}", n),
        }
    }
}

/// Structured detail attached to an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueContext {
    Image {
        name: String,
        width: u32,
        height: u32,
        bbox: BoundingBox,
    },
    Title {
        current: Option<String>,
        suggested: String,
    },
    Heading {
        text: String,
        font_size: f64,
        suggested_level: u8,
        bbox: BoundingBox,
    },
    ReadingOrder {
        inversions: usize,
        first_word: String,
        simple_layout: bool,
    },
    Contrast {
        failing_words: usize,
        worst_ratio: Option<f64>,
        words_without_color: usize,
    },
    Metadata {
        missing: Vec<String>,
        derivable: Vec<String>,
        detected_language: Option<String>,
    },
}

/// A single detected accessibility issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    /// Taxonomy name, e.g. "Image Missing Alt Text"
    pub name: String,
    pub severity: Severity,
    pub location: Location,
    /// WCAG criterion, or "best-practice"
    pub wcag: String,
    pub message: String,
    pub recommendation: String,
    pub auto_fixable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<IssueContext>,
}

/// Size of the analyzed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub pages: usize,
    pub words: usize,
    pub images: usize,
}

/// Result of analyzing one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub file_path: PathBuf,
    pub taxonomy_version: String,
    pub totals: DocumentTotals,
    /// Issues in detection order
    pub issues: Vec<Issue>,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
}

impl Report {
    /// Build a report from a complete issue sequence. Counts are derived here,
    /// once, from the finished sequence.
    pub fn new(
        file_path: PathBuf,
        taxonomy_version: &str,
        totals: DocumentTotals,
        issues: Vec<Issue>,
    ) -> Self {
        let tally = |sev: Severity| issues.iter().filter(|i| i.severity == sev).count();
        let critical_count = tally(Severity::Critical);
        let high_count = tally(Severity::High);
        let medium_count = tally(Severity::Medium);
        let low_count = tally(Severity::Low);

        Self {
            file_path,
            taxonomy_version: taxonomy_version.to_string(),
            totals,
            issues,
            critical_count,
            high_count,
            medium_count,
            low_count,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical_count,
            Severity::High => self.high_count,
            Severity::Medium => self.medium_count,
            Severity::Low => self.low_count,
        }
    }

    /// Whether the stored counts match the issue sequence. Always true for
    /// reports built with [`Report::new`]; useful for deserialized reports.
    pub fn counts_consistent(&self) -> bool {
        Severity::ALL
            .iter()
            .all(|s| self.count(*s) == self.issues.iter().filter(|i| i.severity == *s).count())
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    pub fn by_kind(&self, kind: IssueKind) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.kind == kind).collect()
    }

    pub fn auto_fixable(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.auto_fixable)
    }

    pub fn has_critical(&self) -> bool {
        self.critical_count > 0
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render a single report
pub fn render(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::render_report(report),
        OutputFormat::Json => to_json(report),
        OutputFormat::Sarif => sarif::render(std::iter::once(report)),
    }
}

/// Render the results of a directory scan
pub fn render_batch(batch: &BatchReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::render_batch(batch),
        OutputFormat::Json => to_json(batch),
        OutputFormat::Sarif => sarif::render(batch.reports.iter().map(|d| &d.report)),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize report: {}\"}}", e)
    })
}
