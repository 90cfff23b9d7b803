// SPDX-License-Identifier: PMPL-1.0-or-later
//! Tagbot - PDF Accessibility Analyzer
//!
//! Tagbot inspects the structured content of a PDF (words with positions and
//! fonts, images, metadata) as produced by an external extractor, and
//! classifies WCAG issues into a fixed, versioned taxonomy. Reports are
//! deterministic: the same extraction always yields the same issues in the
//! same order.
//!
//! ## Rules
//!
//! - **Alt Text** (1.1.1): Images without alt text, description or OCR text
//! - **Title** (2.4.2): Missing title, or a title that is just the file name
//! - **Headings** (1.3.1): Large text not tagged as a heading
//! - **Reading Order** (1.3.2): Content extracted out of visual sequence
//! - **Contrast** (1.4.3): Text below the WCAG contrast minimum (advisory)
//! - **Metadata**: Missing author, creation date or language (advisory)
//!
//! ## Around the analyzer
//!
//! Reports render as text, JSON or SARIF. A [`remediation::RemediationPlan`]
//! lists the fixes for an external remediation driver, and
//! [`verify::compare`] diffs the reports before and after remediation.

pub mod analyzers;
pub mod config;
pub mod error;
pub mod extraction;
pub mod language;
pub mod remediation;
pub mod report;
pub mod scanner;
pub mod taxonomy;
pub mod verify;

pub use analyzers::{analyze, Analyzer};
pub use config::AnalyzerConfig;
pub use error::{Result, TagbotError};
pub use extraction::Extraction;
pub use report::{Issue, Location, Report};
pub use taxonomy::{IssueKind, Severity, Taxonomy};
