// SPDX-License-Identifier: PMPL-1.0-or-later
//! Extraction data model.
//!
//! Structured content of one PDF as produced by the external extractor:
//! document metadata, pages, positioned words with font information, and
//! images with their alternative-text fields. The JSON layout matches the
//! extractor's output, with metadata keys at the root of the object.
//!
//! Coordinates are page points with the origin at the top-left corner and
//! y growing downward (the extractor's `top`/`bottom` convention).

use crate::error::{Result, TagbotError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Axis-aligned box in page points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Whether the two boxes overlap by more than `tolerance` on both axes.
    pub fn overlaps(&self, other: &BoundingBox, tolerance: f64) -> bool {
        let dx = self.x1.min(other.x1) - self.x0.max(other.x0);
        let dy = self.y1.min(other.y1) - self.y0.max(other.y0);
        dx > tolerance && dy > tolerance
    }

    fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    fn is_ordered(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }
}

/// Document information dictionary plus language.
///
/// Missing keys and whitespace-only values are both treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub producer: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub modification_date: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl DocumentMetadata {
    pub fn title(&self) -> Option<&str> {
        present(&self.title)
    }

    pub fn author(&self) -> Option<&str> {
        present(&self.author)
    }

    pub fn creation_date(&self) -> Option<&str> {
        present(&self.creation_date)
    }

    pub fn language(&self) -> Option<&str> {
        present(&self.language)
    }
}

/// Trimmed, non-empty view of an optional text field.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A single word with position and font information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub page: i64,
    #[serde(flatten)]
    pub bbox: BoundingBox,
    #[serde(default)]
    pub font_name: String,
    #[serde(default)]
    pub font_size: f64,
    #[serde(default)]
    pub is_bold: bool,
    #[serde(default)]
    pub is_italic: bool,
    /// Structure tag already assigned to this word, e.g. "H1" or "P"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_role: Option<String>,
    /// Foreground color as `#rrggbb`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Background color as `#rrggbb`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl Word {
    pub fn new(text: &str, page: i64, bbox: BoundingBox, font_size: f64) -> Self {
        Self {
            text: text.to_string(),
            page,
            bbox,
            font_name: String::new(),
            font_size,
            is_bold: false,
            is_italic: false,
            structure_role: None,
            color: None,
            background_color: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.structure_role = Some(role.to_string());
        self
    }

    pub fn with_colors(mut self, color: &str, background: &str) -> Self {
        self.color = Some(color.to_string());
        self.background_color = Some(background.to_string());
        self
    }

    /// Whether the word is already tagged as a heading (H, H1..H6).
    pub fn is_tagged_heading(&self) -> bool {
        match self.structure_role.as_deref().map(str::trim) {
            Some(role) => {
                let role = role.trim_start_matches('/');
                let mut chars = role.chars();
                matches!(chars.next(), Some('H') | Some('h'))
                    && chars.all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }
}

/// An image placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub page: i64,
    #[serde(default)]
    pub index: usize,
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(flatten)]
    pub bbox: BoundingBox,
    #[serde(default = "default_image_format")]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
}

fn default_image_format() -> String {
    "unknown".to_string()
}

impl Image {
    pub fn new(name: &str, page: i64, width: u32, height: u32, bbox: BoundingBox) -> Self {
        Self {
            page,
            index: 0,
            name: name.to_string(),
            width,
            height,
            bbox,
            format: default_image_format(),
            alt_text: None,
            ai_description: None,
            ocr_text: None,
        }
    }

    pub fn with_alt_text(mut self, alt: &str) -> Self {
        self.alt_text = Some(alt.to_string());
        self
    }

    pub fn with_ocr_text(mut self, text: &str) -> Self {
        self.ocr_text = Some(text.to_string());
        self
    }

    /// Alt text or an AI-generated description, if non-empty.
    pub fn alternative_text(&self) -> Option<&str> {
        present(&self.alt_text).or_else(|| present(&self.ai_description))
    }

    pub fn ocr(&self) -> Option<&str> {
        present(&self.ocr_text)
    }
}

/// One page of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_number: i64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Page {
    pub fn new(page_number: i64, width: f64, height: f64) -> Self {
        Self {
            page_number,
            width,
            height,
            rotation: 0,
            words: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn with_word(mut self, word: Word) -> Self {
        self.words.push(word);
        self
    }

    pub fn with_image(mut self, mut image: Image) -> Self {
        image.index = self.images.len();
        self.images.push(image);
        self
    }

    /// Page number as an unsigned value. Only meaningful after validation.
    pub fn number(&self) -> u32 {
        self.page_number.clamp(0, u32::MAX as i64) as u32
    }
}

/// Complete extraction of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub file_path: PathBuf,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub num_pages: usize,
    #[serde(default)]
    pub total_words: usize,
    #[serde(default)]
    pub total_images: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_date: Option<String>,
    #[serde(flatten)]
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Extraction {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            file_size: 0,
            num_pages: 0,
            total_words: 0,
            total_images: 0,
            extraction_date: None,
            metadata: DocumentMetadata::default(),
            pages: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.metadata.title = Some(title.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Append a page and keep the totals in step.
    pub fn with_page(mut self, page: Page) -> Self {
        self.total_words += page.words.len();
        self.total_images += page.images.len();
        self.pages.push(page);
        self.num_pages = self.pages.len();
        self
    }

    /// Parse an extraction from the extractor's JSON output.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an extraction JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extraction = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            pages = extraction.pages.len(),
            "Loaded extraction"
        );
        Ok(extraction)
    }

    /// File name of the source document, e.g. `report.pdf`.
    pub fn file_name(&self) -> Option<&str> {
        self.file_path.file_name().and_then(|n| n.to_str())
    }

    /// File stem of the source document, e.g. `report`.
    pub fn file_stem(&self) -> Option<&str> {
        self.file_path.file_stem().and_then(|n| n.to_str())
    }

    /// All words in page order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.pages.iter().flat_map(|p| p.words.iter())
    }

    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }

    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }

    /// Check the structural invariants the analyzer depends on.
    pub fn validate(&self) -> Result<()> {
        let mut previous: Option<i64> = None;
        let mut image_names = HashSet::new();

        for page in &self.pages {
            let number = page.page_number;
            if number < 1 || number > u32::MAX as i64 {
                return Err(TagbotError::malformed(format!(
                    "page number {} is out of range",
                    number
                )));
            }
            if let Some(prev) = previous {
                if number <= prev {
                    return Err(TagbotError::malformed(format!(
                        "page {} follows page {}; page numbers must be unique and increasing",
                        number, prev
                    )));
                }
            }
            previous = Some(number);

            if !page.width.is_finite() || !page.height.is_finite() || page.width < 0.0 || page.height < 0.0 {
                return Err(TagbotError::malformed(format!(
                    "page {} has invalid dimensions {}x{}",
                    number, page.width, page.height
                )));
            }

            for word in &page.words {
                if word.page != number {
                    return Err(TagbotError::malformed(format!(
                        "word \"{}\" references page {} but is stored on page {}",
                        word.text, word.page, number
                    )));
                }
                check_bbox(&word.bbox, number, &format!("word \"{}\"", word.text))?;
                if !word.font_size.is_finite() || word.font_size < 0.0 {
                    return Err(TagbotError::malformed(format!(
                        "word \"{}\" on page {} has invalid font size {}",
                        word.text, number, word.font_size
                    )));
                }
            }

            for image in &page.images {
                if image.page != number {
                    return Err(TagbotError::malformed(format!(
                        "image '{}' references page {} but is stored on page {}",
                        image.name, image.page, number
                    )));
                }
                check_bbox(&image.bbox, number, &format!("image '{}'", image.name))?;
                if !image_names.insert(image.name.as_str()) {
                    return Err(TagbotError::malformed(format!(
                        "image name '{}' is used more than once",
                        image.name
                    )));
                }
            }
        }

        Ok(())
    }
}

fn check_bbox(bbox: &BoundingBox, page: i64, what: &str) -> Result<()> {
    if !bbox.is_finite() {
        return Err(TagbotError::malformed(format!(
            "{} on page {} has a non-finite bounding box",
            what, page
        )));
    }
    if !bbox.is_ordered() {
        return Err(TagbotError::malformed(format!(
            "{} on page {} has an inverted bounding box ({}, {}, {}, {})",
            what, page, bbox.x0, bbox.y0, bbox.x1, bbox.y1
        )));
    }
    Ok(())
}
