// SPDX-License-Identifier: PMPL-1.0-or-later
//! Heading structure rule - WCAG 1.3.1 Info and Relationships (Level A)
//!
//! Text set noticeably larger than body text reads as a heading to sighted
//! users. Unless it is tagged as one, assistive technology presents it as
//! plain text and the document outline is lost.

use super::{reading_position, Detection, Rule};
use crate::config::AnalyzerConfig;
use crate::extraction::{Extraction, Page, Word};
use crate::report::IssueContext;
use crate::taxonomy::IssueKind;

/// Rule for untagged visual headings
pub struct HeadingRule;

impl Rule for HeadingRule {
    fn name(&self) -> &str {
        "Heading Rule"
    }

    fn description(&self) -> &str {
        "Checks that large text is tagged as a heading (WCAG 1.3.1)"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::UntaggedHeading
    }

    fn check(&self, extraction: &Extraction, config: &AnalyzerConfig) -> Vec<Detection> {
        let threshold = config.heading_threshold;
        let mut detections = Vec::new();

        for page in &extraction.pages {
            for word in large_words(page, threshold) {
                if word.is_tagged_heading() {
                    continue;
                }

                let level = heading_level(word.font_size, threshold);
                detections.push(
                    Detection::on_page(
                        page.number(),
                        format!(
                            "Text \"{}\" ({:.1}pt) looks like a heading but is not tagged; suggested H{}",
                            word.text, word.font_size, level
                        ),
                    )
                    .with_context(IssueContext::Heading {
                        text: word.text.clone(),
                        font_size: word.font_size,
                        suggested_level: level,
                        bbox: word.bbox,
                    }),
                );
            }
        }

        detections
    }
}

/// Words strictly larger than `threshold`, in reading position.
pub(crate) fn large_words(page: &Page, threshold: f64) -> Vec<&Word> {
    let mut words: Vec<&Word> = page
        .words
        .iter()
        .filter(|w| w.font_size > threshold)
        .collect();
    words.sort_by(|a, b| reading_position(&a.bbox, &b.bbox));
    words
}

/// Heading level for a font size, by its ratio to the threshold.
///
/// 1.5x and above is H1, 1.25x and above is H2, anything else is H3.
pub fn heading_level(font_size: f64, threshold: f64) -> u8 {
    let ratio = font_size / threshold;
    if ratio >= 1.5 {
        1
    } else if ratio >= 1.25 {
        2
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::BoundingBox;

    fn word(text: &str, x0: f64, y0: f64, size: f64) -> Word {
        Word::new(text, 1, BoundingBox::new(x0, y0, x0 + 50.0, y0 + size), size)
    }

    fn run(page: Page) -> Vec<Detection> {
        let extraction = Extraction::new("doc.pdf").with_page(page);
        HeadingRule.check(&extraction, &AnalyzerConfig::default())
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let page = Page::new(1, 612.0, 792.0)
            .with_word(word("Equal", 72.0, 72.0, 16.0))
            .with_word(word("Above", 72.0, 120.0, 17.0));
        let detections = run(page);
        assert_eq!(detections.len(), 1);
        assert!(detections[0].message.contains("Above"));
    }

    #[test]
    fn test_tagged_heading_not_flagged() {
        let page = Page::new(1, 612.0, 792.0)
            .with_word(word("Introduction", 72.0, 72.0, 24.0).with_role("H1"));
        assert!(run(page).is_empty());
    }

    #[test]
    fn test_other_roles_still_flagged() {
        let page = Page::new(1, 612.0, 792.0)
            .with_word(word("Introduction", 72.0, 72.0, 24.0).with_role("P"));
        assert_eq!(run(page).len(), 1);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading_level(24.0, 16.0), 1);
        assert_eq!(heading_level(20.0, 16.0), 2);
        assert_eq!(heading_level(17.0, 16.0), 3);
    }

    #[test]
    fn test_context_carries_suggested_level() {
        let page = Page::new(1, 612.0, 792.0).with_word(word("Overview", 72.0, 72.0, 24.0));
        let detections = run(page);
        match &detections[0].context {
            Some(IssueContext::Heading { text, suggested_level, font_size, .. }) => {
                assert_eq!(text, "Overview");
                assert_eq!(*suggested_level, 1);
                assert_eq!(*font_size, 24.0);
            }
            other => panic!("unexpected context: {:?}", other),
        }
    }

    #[test]
    fn test_detections_in_reading_position() {
        let page = Page::new(1, 612.0, 792.0)
            .with_word(word("Second", 72.0, 300.0, 20.0))
            .with_word(word("Right", 300.0, 72.0, 20.0))
            .with_word(word("Left", 72.0, 72.0, 20.0));
        let order: Vec<_> = run(page)
            .into_iter()
            .filter_map(|d| match d.context {
                Some(IssueContext::Heading { text, .. }) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec!["Left", "Right", "Second"]);
    }
}
