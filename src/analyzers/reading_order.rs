// SPDX-License-Identifier: PMPL-1.0-or-later
//! Reading order rule - WCAG 1.3.2 Meaningful Sequence (Level A)
//!
//! Words are expected in extraction order to run top-to-bottom and, within a
//! line, left-to-right. A jump back up the page, or leftward along the same
//! line, means assistive technology will read the content out of sequence.
//!
//! Rebuilding the order is only safe on simple layouts. Overlapping text or a
//! column gutter means the correct order cannot be derived from position alone.

use super::{Detection, Rule};
use crate::config::AnalyzerConfig;
use crate::extraction::{Extraction, Word};
use crate::report::IssueContext;
use crate::taxonomy::IssueKind;

/// Rule for out-of-sequence content
pub struct ReadingOrderRule;

impl Rule for ReadingOrderRule {
    fn name(&self) -> &str {
        "Reading Order Rule"
    }

    fn description(&self) -> &str {
        "Checks that content order follows visual position (WCAG 1.3.2)"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::ReadingOrderAnomaly
    }

    fn check(&self, extraction: &Extraction, config: &AnalyzerConfig) -> Vec<Detection> {
        let tolerance = config.reading_order_tolerance;
        let mut detections = Vec::new();

        for page in &extraction.pages {
            if page.words.len() < 2 {
                continue;
            }

            let mut inversions = 0;
            let mut first_word: Option<&str> = None;
            for pair in page.words.windows(2) {
                if is_inversion(&pair[0], &pair[1], tolerance) {
                    inversions += 1;
                    if first_word.is_none() {
                        first_word = Some(pair[1].text.as_str());
                    }
                }
            }

            let Some(first_word) = first_word else {
                continue;
            };

            let simple_layout = is_simple_layout(&page.words, tolerance, config.column_gutter);
            let mut message = format!(
                "Content order jumps backwards {} time(s), first at \"{}\"",
                inversions, first_word
            );
            if !simple_layout {
                message.push_str("; layout is complex, manual reordering required");
            }

            detections.push(
                Detection::on_page(page.number(), message)
                    .fixable(simple_layout)
                    .with_context(IssueContext::ReadingOrder {
                        inversions,
                        first_word: first_word.to_string(),
                        simple_layout,
                    }),
            );
        }

        detections
    }
}

/// Whether moving from `a` to `b` goes backwards in reading position.
///
/// Words on the same line may differ in size, so lines are compared by
/// baseline (`y1`) and vertical overlap rather than by top edge.
fn is_inversion(a: &Word, b: &Word, tolerance: f64) -> bool {
    if same_line(a, b, tolerance) {
        return b.bbox.x0 < a.bbox.x0 - tolerance;
    }
    b.bbox.y1 < a.bbox.y1 - tolerance
}

/// Shared baseline, or vertical extents overlapping by at least half the
/// shorter word.
fn same_line(a: &Word, b: &Word, tolerance: f64) -> bool {
    if (b.bbox.y1 - a.bbox.y1).abs() <= tolerance {
        return true;
    }
    let overlap = a.bbox.y1.min(b.bbox.y1) - a.bbox.y0.max(b.bbox.y0);
    let shorter = a.bbox.height().min(b.bbox.height());
    overlap > 0.0 && overlap >= shorter / 2.0
}

/// A page is simple when nothing overlaps and there is a single column.
pub fn is_simple_layout(words: &[Word], tolerance: f64, gutter: f64) -> bool {
    !has_overlap(words, tolerance) && !has_column_gutter(words, tolerance, gutter)
}

fn has_overlap(words: &[Word], tolerance: f64) -> bool {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            // Sorted by top edge, so nothing further down can overlap `a`
            if b.bbox.y0 >= a.bbox.y1 - tolerance {
                break;
            }
            if a.bbox.overlaps(&b.bbox, tolerance) {
                return true;
            }
        }
    }
    false
}

/// Whether two or more lines share an empty vertical band at least
/// `gutter` wide. Lines that span the band (titles, footers) do not close
/// it; only lines that are themselves split count.
fn has_column_gutter(words: &[Word], tolerance: f64, gutter: f64) -> bool {
    let lines = group_lines(words, tolerance);

    let gaps: Vec<(usize, f64, f64)> = lines
        .iter()
        .enumerate()
        .flat_map(|(i, line)| line_gaps(line, gutter).into_iter().map(move |(l, r)| (i, l, r)))
        .collect();

    gaps.iter().enumerate().any(|(n, (line_a, left_a, right_a))| {
        gaps[n + 1..].iter().any(|(line_b, left_b, right_b)| {
            line_a != line_b && right_a.min(*right_b) - left_a.max(*left_b) >= gutter
        })
    })
}

/// Group words into lines: sorted top-down, a word joins the current line
/// while its top edge is above the line's bottom edge.
fn group_lines(words: &[Word], tolerance: f64) -> Vec<Vec<&Word>> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

    let mut lines: Vec<Vec<&Word>> = Vec::new();
    let mut bottom = f64::NEG_INFINITY;

    for word in sorted {
        if word.bbox.y0 < bottom - tolerance {
            if let Some(line) = lines.last_mut() {
                line.push(word);
            }
            bottom = bottom.max(word.bbox.y1);
        } else {
            bottom = word.bbox.y1;
            lines.push(vec![word]);
        }
    }
    lines
}

/// Empty horizontal intervals at least `gutter` wide between the words of one line.
fn line_gaps(line: &[&Word], gutter: f64) -> Vec<(f64, f64)> {
    let mut spans: Vec<(f64, f64)> = line.iter().map(|w| (w.bbox.x0, w.bbox.x1)).collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut gaps = Vec::new();
    let mut right_edge = f64::NEG_INFINITY;
    for (i, (x0, x1)) in spans.iter().enumerate() {
        if i > 0 && x0 - right_edge >= gutter {
            gaps.push((right_edge, *x0));
        }
        right_edge = right_edge.max(*x1);
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{BoundingBox, Page};

    fn word(text: &str, x0: f64, y0: f64) -> Word {
        Word::new(text, 1, BoundingBox::new(x0, y0, x0 + 50.0, y0 + 12.0), 12.0)
    }

    fn run(words: Vec<Word>) -> Vec<Detection> {
        let page = words
            .into_iter()
            .fold(Page::new(1, 612.0, 792.0), |page, w| page.with_word(w));
        let extraction = Extraction::new("doc.pdf").with_page(page);
        ReadingOrderRule.check(&extraction, &AnalyzerConfig::default())
    }

    #[test]
    fn test_natural_order_passes() {
        let detections = run(vec![
            word("The", 72.0, 100.0),
            word("quick", 130.0, 100.0),
            word("fox", 72.0, 120.0),
        ]);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_single_word_page_skipped() {
        assert!(run(vec![word("Alone", 72.0, 100.0)]).is_empty());
    }

    #[test]
    fn test_upward_jump_in_single_column_is_fixable() {
        let detections = run(vec![
            word("Second", 72.0, 120.0),
            word("First", 72.0, 100.0),
            word("line", 130.0, 100.0),
        ]);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].auto_fixable, Some(true));
        match &detections[0].context {
            Some(IssueContext::ReadingOrder { inversions, first_word, simple_layout }) => {
                assert_eq!(*inversions, 1);
                assert_eq!(first_word, "First");
                assert!(*simple_layout);
            }
            other => panic!("unexpected context: {:?}", other),
        }
    }

    #[test]
    fn test_leftward_jump_on_same_line() {
        let detections = run(vec![word("world", 130.0, 100.0), word("Hello", 72.0, 101.0)]);
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn test_jitter_within_tolerance_ignored() {
        let detections = run(vec![word("a", 72.0, 100.0), word("b", 130.0, 98.0), word("c", 70.0, 120.0)]);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_two_column_page_not_fixable() {
        let detections = run(vec![
            word("R1", 320.0, 100.0),
            word("R2", 320.0, 120.0),
            word("L1", 72.0, 100.0),
            word("L2", 72.0, 120.0),
        ]);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].auto_fixable, Some(false));
        assert!(detections[0].message.contains("manual"));
    }

    #[test]
    fn test_two_columns_under_spanning_title_not_fixable() {
        let title = |text: &str, x0: f64, x1: f64| {
            Word::new(text, 1, BoundingBox::new(x0, 60.0, x1, 84.0), 24.0)
        };
        let detections = run(vec![
            title("Annual", 72.0, 200.0),
            title("Review", 210.0, 420.0),
            word("R1", 320.0, 100.0),
            word("R2", 320.0, 120.0),
            word("L1", 72.0, 100.0),
            word("L2", 72.0, 120.0),
        ]);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].auto_fixable, Some(false));
        match &detections[0].context {
            Some(IssueContext::ReadingOrder { first_word, simple_layout, .. }) => {
                assert_eq!(first_word, "L1");
                assert!(!*simple_layout);
            }
            other => panic!("unexpected context: {:?}", other),
        }
    }

    #[test]
    fn test_single_split_line_is_not_a_column() {
        let words = vec![
            word("Name", 72.0, 100.0),
            word("Value", 320.0, 100.0),
            word("Body", 72.0, 120.0),
            word("text", 130.0, 120.0),
        ];
        assert!(is_simple_layout(&words, 3.0, 18.0));
    }

    #[test]
    fn test_larger_word_on_shared_baseline_is_same_line() {
        let small = Word::new("Read", 1, BoundingBox::new(72.0, 112.0, 100.0, 124.0), 12.0);
        let large = Word::new("THIS", 1, BoundingBox::new(104.0, 100.0, 170.0, 124.0), 24.0);
        assert!(run(vec![small.clone(), large.clone()]).is_empty());

        // The same pair read right-to-left is still an inversion
        assert_eq!(run(vec![large, small]).len(), 1);
    }

    #[test]
    fn test_overlapping_words_make_layout_complex() {
        let words = vec![word("a", 72.0, 100.0), word("b", 80.0, 102.0)];
        assert!(!is_simple_layout(&words, 3.0, 18.0));
    }

    #[test]
    fn test_narrow_gap_is_not_a_gutter() {
        let words = vec![
            word("a", 72.0, 100.0),
            word("b", 72.0, 120.0),
            word("c", 130.0, 100.0),
            word("d", 130.0, 120.0),
        ];
        assert!(is_simple_layout(&words, 3.0, 18.0));
    }
}
