// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alt text rule - WCAG 1.1.1 Non-text Content (Level A)
//!
//! An image passes when it carries alt text, an AI-generated description,
//! or OCR text. Anything else is invisible to a screen reader.

use super::{reading_position, Detection, Rule};
use crate::config::AnalyzerConfig;
use crate::extraction::{Extraction, Image};
use crate::report::IssueContext;
use crate::taxonomy::IssueKind;

/// Images below this many pixels on either side are treated as decorative
const DECORATIVE_MAX_SIDE: u32 = 20;

/// Images below this pixel area are treated as decorative
const DECORATIVE_MAX_AREA: u64 = 400;

/// Images wider or taller than this are full-page backgrounds
const BACKGROUND_MIN_SIDE: u32 = 1500;

/// Rule for image text alternatives
pub struct AltTextRule;

impl Rule for AltTextRule {
    fn name(&self) -> &str {
        "Alt Text Rule"
    }

    fn description(&self) -> &str {
        "Checks that images have alt text, a description or OCR text (WCAG 1.1.1)"
    }

    fn kind(&self) -> IssueKind {
        IssueKind::ImageMissingAltText
    }

    fn check(&self, extraction: &Extraction, config: &AnalyzerConfig) -> Vec<Detection> {
        let mut detections = Vec::new();

        for page in &extraction.pages {
            let mut images: Vec<&Image> = page.images.iter().collect();
            images.sort_by(|a, b| reading_position(&a.bbox, &b.bbox));

            for image in images {
                if image.alternative_text().is_some() || image.ocr().is_some() {
                    continue;
                }
                if config.skip_decorative_images && is_decorative(image) {
                    continue;
                }

                detections.push(
                    Detection::on_page(
                        page.number(),
                        format!(
                            "Image '{}' ({}x{}) has no alt text, description or OCR text",
                            image.name, image.width, image.height
                        ),
                    )
                    .with_context(IssueContext::Image {
                        name: image.name.clone(),
                        width: image.width,
                        height: image.height,
                        bbox: image.bbox,
                    }),
                );
            }
        }

        detections
    }
}

/// Tiny images are almost always bullets, rules or spacers; very large ones
/// are page backgrounds or watermarks.
pub fn is_decorative(image: &Image) -> bool {
    let area = image.width as u64 * image.height as u64;
    let tiny = image.width < DECORATIVE_MAX_SIDE
        || image.height < DECORATIVE_MAX_SIDE
        || area < DECORATIVE_MAX_AREA;
    let background = image.width > BACKGROUND_MIN_SIDE || image.height > BACKGROUND_MIN_SIDE;
    tiny || background
}
