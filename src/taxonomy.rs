// SPDX-License-Identifier: PMPL-1.0-or-later
//! Issue taxonomy: the catalogue of accessibility issue kinds.
//!
//! Every detection rule is paired with exactly one row here. The row is the
//! single source of truth for severity, WCAG criterion, recommendation text
//! and default auto-fixability. Rules may only override auto-fixability per
//! issue instance.

use crate::error::{Result, TagbotError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version of the built-in taxonomy table. Bumped whenever a row changes.
pub const TAXONOMY_VERSION: &str = "2024.1";

/// Severity of an accessibility issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Content is unusable for assistive technology
    Critical,
    /// Major barrier
    High,
    /// Should be addressed
    Medium,
    /// Best practice
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// Issue kinds known to the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    ImageMissingAltText,
    MissingDocumentTitle,
    UntaggedHeading,
    ReadingOrderAnomaly,
    LowColorContrast,
    MissingMetadata,
}

impl IssueKind {
    /// Stable identifier used in reports and SARIF rule ids.
    pub fn id(&self) -> &'static str {
        match self {
            IssueKind::ImageMissingAltText => "image-missing-alt-text",
            IssueKind::MissingDocumentTitle => "missing-document-title",
            IssueKind::UntaggedHeading => "untagged-heading",
            IssueKind::ReadingOrderAnomaly => "reading-order-anomaly",
            IssueKind::LowColorContrast => "low-color-contrast",
            IssueKind::MissingMetadata => "missing-metadata",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One row of the taxonomy table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyEntry {
    pub kind: IssueKind,
    pub name: &'static str,
    pub severity: Severity,
    /// WCAG success criterion, or "best-practice"
    pub wcag: &'static str,
    pub recommendation: &'static str,
    pub auto_fixable: bool,
}

const STANDARD_ENTRIES: &[TaxonomyEntry] = &[
    TaxonomyEntry {
        kind: IssueKind::ImageMissingAltText,
        name: "Image Missing Alt Text",
        severity: Severity::Critical,
        wcag: "1.1.1",
        recommendation: "Add descriptive alt text (AI-generated description) or mark the image as decorative",
        auto_fixable: true,
    },
    TaxonomyEntry {
        kind: IssueKind::MissingDocumentTitle,
        name: "Missing Document Title",
        severity: Severity::High,
        wcag: "2.4.2",
        recommendation: "Set a descriptive title in the document metadata, derived from the first heading or the file name",
        auto_fixable: true,
    },
    TaxonomyEntry {
        kind: IssueKind::UntaggedHeading,
        name: "Untagged Heading",
        severity: Severity::High,
        wcag: "1.3.1",
        recommendation: "Tag the text with a heading level (H1, H2, ...) matching its font-size tier",
        auto_fixable: true,
    },
    TaxonomyEntry {
        kind: IssueKind::ReadingOrderAnomaly,
        name: "Reading Order Anomaly",
        severity: Severity::Medium,
        wcag: "1.3.2",
        recommendation: "Verify and reorder the content so that assistive technology reads it top-to-bottom, left-to-right",
        auto_fixable: true,
    },
    TaxonomyEntry {
        kind: IssueKind::LowColorContrast,
        name: "Low Color Contrast",
        severity: Severity::Medium,
        wcag: "1.4.3",
        recommendation: "Ensure text has a 4.5:1 contrast ratio (3:1 for large text); verify manually where colors are unknown",
        auto_fixable: false,
    },
    TaxonomyEntry {
        kind: IssueKind::MissingMetadata,
        name: "Missing Metadata",
        severity: Severity::Low,
        wcag: "best-practice",
        recommendation: "Add author, creation date and document language to the metadata",
        auto_fixable: false,
    },
];

/// Lookup table from issue kind to taxonomy row.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    version: String,
    entries: HashMap<IssueKind, TaxonomyEntry>,
    order: Vec<IssueKind>,
}

impl Taxonomy {
    /// The built-in table.
    pub fn standard() -> Self {
        Self {
            version: TAXONOMY_VERSION.to_string(),
            entries: STANDARD_ENTRIES.iter().map(|e| (e.kind, e.clone())).collect(),
            order: STANDARD_ENTRIES.iter().map(|e| e.kind).collect(),
        }
    }

    /// Build a custom table. Duplicate rows are rejected.
    pub fn from_entries(version: &str, entries: Vec<TaxonomyEntry>) -> Result<Self> {
        let mut map = HashMap::new();
        let mut order = Vec::new();
        for entry in entries {
            let kind = entry.kind;
            if map.insert(kind, entry).is_some() {
                return Err(TagbotError::configuration(format!(
                    "taxonomy {} defines '{}' more than once",
                    version, kind
                )));
            }
            order.push(kind);
        }
        Ok(Self {
            version: version.to_string(),
            entries: map,
            order,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn get(&self, kind: IssueKind) -> Option<&TaxonomyEntry> {
        self.entries.get(&kind)
    }

    /// Like [`Taxonomy::get`], but a missing row is a configuration error.
    pub fn lookup(&self, kind: IssueKind) -> Result<&TaxonomyEntry> {
        self.get(kind).ok_or_else(|| {
            TagbotError::configuration(format!(
                "issue kind '{}' has no entry in taxonomy {}",
                kind, self.version
            ))
        })
    }

    /// Rows in table order.
    pub fn entries(&self) -> impl Iterator<Item = &TaxonomyEntry> {
        self.order.iter().filter_map(move |k| self.entries.get(k))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}
