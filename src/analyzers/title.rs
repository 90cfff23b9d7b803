// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document title rule - WCAG 2.4.2 Page Titled (Level A)
//!
//! Screen readers announce the metadata title when a document opens. An empty
//! title, or one that is just the file name, tells the user nothing.

use super::headings::large_words;
use super::{Detection, Rule};
use crate::config::AnalyzerConfig;
use crate::extraction::Extraction;
use crate::report::IssueContext;
use crate::taxonomy::IssueKind;

/// Rule for a meaningful document title
pub struct TitleRule;

impl Rule for TitleRule {
    fn name(&self) -> &str {
        "Title Rule"
    }

    fn description(&self) -> &str {
        "Checks that the document has a descriptive title (WCAG 2.4.2)"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::MissingDocumentTitle
    }

    fn check(&self, extraction: &Extraction, config: &AnalyzerConfig) -> Vec<Detection> {
        let current = extraction.metadata.title();

        let message = match current {
            None => "Document has no title in its metadata".to_string(),
            Some(title) if is_file_name(extraction, title) => {
                format!("Document title \"{}\" is just the file name", title)
            }
            Some(_) => return Vec::new(),
        };

        vec![Detection::document(message).with_context(IssueContext::Title {
            current: current.map(str::to_string),
            suggested: suggest_title(extraction, config),
        })]
    }
}

fn is_file_name(extraction: &Extraction, title: &str) -> bool {
    extraction.file_name() == Some(title) || extraction.file_stem() == Some(title)
}

/// Title to propose: the first large-text line of the document, or the
/// humanized file stem when there is none.
pub fn suggest_title(extraction: &Extraction, config: &AnalyzerConfig) -> String {
    for page in &extraction.pages {
        let candidates = large_words(page, config.heading_threshold);
        let Some(first) = candidates.first() else {
            continue;
        };

        let mut line: Vec<_> = candidates
            .iter()
            .filter(|w| (w.bbox.y0 - first.bbox.y0).abs() <= config.reading_order_tolerance)
            .collect();
        line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let text = line
            .iter()
            .map(|w| w.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            return text;
        }
    }

    humanize(extraction.file_stem().unwrap_or_default())
}

/// `annual_report-2024` -> `Annual Report 2024`
fn humanize(stem: &str) -> String {
    let words: Vec<String> = stem
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "Untitled Document".to_string()
    } else {
        words.join(" ")
    }
}
