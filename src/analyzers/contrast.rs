// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast rule - WCAG 1.4.3 Contrast Minimum (Level AA)
//!
//! Computes the WCAG contrast ratio for every word that carries both a text
//! and a background color.
//! - Normal text: 4.5:1
//! - Large text (18pt, or 14pt bold): 3:1
//!
//! Extractors often cannot recover colors. When a page has words without
//! color data and no computed failure, the page is flagged for manual review.

use super::{Detection, Rule};
use crate::config::AnalyzerConfig;
use crate::extraction::{Extraction, Word};
use crate::report::IssueContext;
use crate::taxonomy::IssueKind;

/// Minimum ratio for normal text
pub const NORMAL_TEXT_RATIO: f64 = 4.5;

/// Minimum ratio for large text
pub const LARGE_TEXT_RATIO: f64 = 3.0;

/// Rule for text/background contrast
pub struct ContrastRule;

impl Rule for ContrastRule {
    fn name(&self) -> &str {
        "Color Contrast Rule"
    }

    fn description(&self) -> &str {
        "Checks text contrast ratios meet WCAG requirements (1.4.3)"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::LowColorContrast
    }

    fn is_advisory(&self) -> bool {
        true
    }

    fn check(&self, extraction: &Extraction, _config: &AnalyzerConfig) -> Vec<Detection> {
        let mut detections = Vec::new();

        for page in &extraction.pages {
            if page.words.is_empty() {
                continue;
            }

            let mut failing_words = 0;
            let mut worst_ratio: Option<f64> = None;
            let mut words_without_color = 0;

            for word in &page.words {
                let Some(ratio) = word_contrast(word) else {
                    words_without_color += 1;
                    continue;
                };
                if ratio < required_ratio(word) {
                    failing_words += 1;
                    worst_ratio = Some(worst_ratio.map_or(ratio, |w: f64| w.min(ratio)));
                }
            }

            let message = match worst_ratio {
                Some(worst) => format!(
                    "{} word(s) fall below the minimum contrast ratio; worst is {:.2}:1",
                    failing_words, worst
                ),
                None if words_without_color > 0 => format!(
                    "Color data unavailable for {} word(s); verify contrast manually",
                    words_without_color
                ),
                None => continue,
            };

            detections.push(Detection::on_page(page.number(), message).with_context(
                IssueContext::Contrast {
                    failing_words,
                    worst_ratio: worst_ratio.map(|r| (r * 100.0).round() / 100.0),
                    words_without_color,
                },
            ));
        }

        detections
    }
}

/// Contrast ratio of a word against its background, if both colors parse.
fn word_contrast(word: &Word) -> Option<f64> {
    let fg = parse_color(word.color.as_deref()?)?;
    let bg = parse_color(word.background_color.as_deref()?)?;
    Some(contrast_ratio(fg, bg))
}

fn required_ratio(word: &Word) -> f64 {
    if is_large_text(word) {
        LARGE_TEXT_RATIO
    } else {
        NORMAL_TEXT_RATIO
    }
}

/// 18pt and above, or 14pt and above when bold
pub fn is_large_text(word: &Word) -> bool {
    word.font_size >= 18.0 || (word.is_bold && word.font_size >= 14.0)
}

/// Parse a hex color (#rgb, #rrggbb) into (r, g, b) components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some((r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Parse an extractor color value: hex, or one of the basic named colors
pub fn parse_color(value: &str) -> Option<(u8, u8, u8)> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.starts_with('#') {
        return parse_hex_color(&trimmed);
    }
    match trimmed.as_str() {
        "white" => Some((255, 255, 255)),
        "black" => Some((0, 0, 0)),
        "red" => Some((255, 0, 0)),
        "green" => Some((0, 128, 0)),
        "blue" => Some((0, 0, 255)),
        "yellow" => Some((255, 255, 0)),
        "gray" | "grey" => Some((128, 128, 128)),
        "silver" => Some((192, 192, 192)),
        _ => None,
    }
}

/// Calculate relative luminance per WCAG 2.x
/// <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let srgb = [r, g, b].map(|c| {
        let v = c as f64 / 255.0;
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    });
    0.2126 * srgb[0] + 0.7152 * srgb[1] + 0.0722 * srgb[2]
}

/// Calculate contrast ratio between two colors
/// Returns a ratio >= 1.0 (e.g., 4.5, 7.0, 21.0)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}
