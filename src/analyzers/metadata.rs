// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document metadata rule (best practice)
//!
//! Author, creation date and language help users find and identify the
//! document. The language also drives screen reader pronunciation
//! (WCAG 3.1.1), and it is the one field that can be derived from the text.

use super::{Detection, Rule};
use crate::config::AnalyzerConfig;
use crate::extraction::Extraction;
use crate::language::detect_language;
use crate::report::IssueContext;
use crate::taxonomy::IssueKind;

/// Rule for descriptive document metadata
pub struct MetadataRule;

impl Rule for MetadataRule {
    fn name(&self) -> &str {
        "Metadata Rule"
    }

    fn description(&self) -> &str {
        "Checks author, creation date and language metadata"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::MissingMetadata
    }

    fn is_advisory(&self) -> bool {
        true
    }

    fn check(&self, extraction: &Extraction, _config: &AnalyzerConfig) -> Vec<Detection> {
        let metadata = &extraction.metadata;
        let mut missing = Vec::new();

        if metadata.author().is_none() {
            missing.push("author".to_string());
        }
        if metadata.creation_date().is_none() {
            missing.push("creation_date".to_string());
        }

        let mut detected_language = None;
        if metadata.language().is_none() {
            missing.push("language".to_string());
            detected_language = detect_language(extraction.words().map(|w| w.text.as_str()));
        }

        if missing.is_empty() {
            return Vec::new();
        }

        let derivable: Vec<String> = detected_language
            .iter()
            .map(|_| "language".to_string())
            .collect();

        let mut message = format!("Document metadata is missing: {}", missing.join(", "));
        if let Some(lang) = detected_language {
            message.push_str(&format!(" (language detected from text: {})", lang));
        }

        vec![Detection::document(message)
            .fixable(!derivable.is_empty())
            .with_context(IssueContext::Metadata {
                missing,
                derivable,
                detected_language: detected_language.map(str::to_string),
            })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{BoundingBox, DocumentMetadata, Page, Word};

    fn complete() -> DocumentMetadata {
        DocumentMetadata {
            author: Some("Finance Team".to_string()),
            creation_date: Some("D:20240101120000".to_string()),
            language: Some("en".to_string()),
            ..DocumentMetadata::default()
        }
    }

    fn english_page() -> Page {
        let text = "The report covers the results of the year and the plans for the team in this region";
        text.split_whitespace()
            .enumerate()
            .fold(Page::new(1, 612.0, 792.0), |page, (i, t)| {
                let x0 = 72.0 + (i % 8) as f64 * 60.0;
                let y0 = 100.0 + (i / 8) as f64 * 14.0;
                page.with_word(Word::new(t, 1, BoundingBox::new(x0, y0, x0 + 50.0, y0 + 12.0), 12.0))
            })
    }

    fn run(extraction: &Extraction) -> Vec<Detection> {
        MetadataRule.check(extraction, &AnalyzerConfig::default())
    }

    #[test]
    fn test_complete_metadata_passes() {
        let extraction = Extraction::new("doc.pdf").with_metadata(complete());
        assert!(run(&extraction).is_empty());
    }

    #[test]
    fn test_blank_author_is_missing() {
        let mut metadata = complete();
        metadata.author = Some("   ".to_string());
        let detections = run(&Extraction::new("doc.pdf").with_metadata(metadata));
        assert_eq!(detections.len(), 1);
        assert!(detections[0].message.contains("author"));
        assert_eq!(detections[0].auto_fixable, Some(false));
    }

    #[test]
    fn test_language_derived_from_text() {
        let mut metadata = complete();
        metadata.language = None;
        let extraction = Extraction::new("doc.pdf")
            .with_metadata(metadata)
            .with_page(english_page());

        let detections = run(&extraction);
        assert_eq!(detections[0].auto_fixable, Some(true));
        match &detections[0].context {
            Some(IssueContext::Metadata { missing, derivable, detected_language }) => {
                assert_eq!(missing, &vec!["language".to_string()]);
                assert_eq!(derivable, &vec!["language".to_string()]);
                assert_eq!(detected_language.as_deref(), Some("en"));
            }
            other => panic!("unexpected context: {:?}", other),
        }
    }

    #[test]
    fn test_empty_document_reports_all_fields() {
        let detections = run(&Extraction::new("empty.pdf"));
        match &detections[0].context {
            Some(IssueContext::Metadata { missing, derivable, .. }) => {
                assert_eq!(missing.len(), 3);
                assert!(derivable.is_empty());
            }
            other => panic!("unexpected context: {:?}", other),
        }
    }
}
