// SPDX-License-Identifier: PMPL-1.0-or-later
//! Accessibility rules and the analyzer that runs them.
//!
//! Each rule module covers one taxonomy row. Rules only detect; severity,
//! WCAG criterion and recommendation come from the taxonomy when a
//! detection is turned into an [`Issue`]. The analyzer runs rules in a fixed
//! order (images, title, headings, reading order, contrast, metadata), so
//! the same extraction always yields the same issue sequence.

pub mod alt_text;
pub mod contrast;
pub mod headings;
pub mod metadata;
pub mod reading_order;
pub mod title;

use crate::config::AnalyzerConfig;
use crate::error::{Result, TagbotError};
use crate::extraction::{BoundingBox, Extraction};
use crate::report::{DocumentTotals, Issue, IssueContext, Location, Report};
use crate::taxonomy::{IssueKind, Taxonomy, TaxonomyEntry};
use std::cmp::Ordering;
use tracing::debug;

/// A rule hit before the taxonomy is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub location: Location,
    pub message: String,
    /// Per-instance override of the taxonomy's auto-fixable default
    pub auto_fixable: Option<bool>,
    pub context: Option<IssueContext>,
}

impl Detection {
    pub fn on_page(page: u32, message: impl Into<String>) -> Self {
        Self {
            location: Location::Page(page),
            message: message.into(),
            auto_fixable: None,
            context: None,
        }
    }

    pub fn document(message: impl Into<String>) -> Self {
        Self {
            location: Location::Document,
            message: message.into(),
            auto_fixable: None,
            context: None,
        }
    }

    pub fn with_context(mut self, context: IssueContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn fixable(mut self, auto_fixable: bool) -> Self {
        self.auto_fixable = Some(auto_fixable);
        self
    }

    fn into_issue(self, entry: &TaxonomyEntry) -> Issue {
        Issue {
            kind: entry.kind,
            name: entry.name.to_string(),
            severity: entry.severity,
            location: self.location,
            wcag: entry.wcag.to_string(),
            message: self.message,
            recommendation: entry.recommendation.to_string(),
            auto_fixable: self.auto_fixable.unwrap_or(entry.auto_fixable),
            context: self.context,
        }
    }
}

/// Trait implemented by all rules
pub trait Rule: Send + Sync {
    /// Human-readable name of this rule
    fn name(&self) -> &str;

    /// Short description of what this rule checks
    fn description(&self) -> &str;

    /// Taxonomy row this rule emits
    fn kind(&self) -> IssueKind;

    /// Advisory rules only run when `advisory_checks` is enabled
    fn is_advisory(&self) -> bool {
        false
    }

    /// Inspect a validated extraction
    fn check(&self, extraction: &Extraction, config: &AnalyzerConfig) -> Vec<Detection>;
}

/// The built-in rules in report order
pub fn standard_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(alt_text::AltTextRule),
        Box::new(title::TitleRule),
        Box::new(headings::HeadingRule),
        Box::new(reading_order::ReadingOrderRule),
        Box::new(contrast::ContrastRule),
        Box::new(metadata::MetadataRule),
    ]
}

/// Runs a registered rule set over extractions.
pub struct Analyzer {
    config: AnalyzerConfig,
    taxonomy: Taxonomy,
    rules: Vec<Box<dyn Rule>>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("taxonomy", &self.taxonomy.version())
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl Analyzer {
    /// Analyzer with the standard taxonomy and rules
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Self::with_rules(config, Taxonomy::standard(), standard_rules())
    }

    /// Register a custom rule set. Every rule must have a taxonomy row.
    pub fn with_rules(
        config: AnalyzerConfig,
        taxonomy: Taxonomy,
        rules: Vec<Box<dyn Rule>>,
    ) -> Result<Self> {
        config.validate()?;

        for rule in &rules {
            if taxonomy.get(rule.kind()).is_none() {
                return Err(TagbotError::configuration(format!(
                    "rule '{}' emits '{}', which taxonomy {} does not define",
                    rule.name(),
                    rule.kind(),
                    taxonomy.version()
                )));
            }
            debug!(rule = rule.name(), "Registered rule: {}", rule.description());
        }

        Ok(Self {
            config,
            taxonomy,
            rules,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Analyze one extraction. Fails without a report if the extraction is
    /// structurally invalid.
    pub fn analyze(&self, extraction: &Extraction) -> Result<Report> {
        extraction.validate()?;

        let mut issues = Vec::new();

        for rule in &self.rules {
            if rule.is_advisory() && !self.config.advisory_checks {
                debug!(rule = rule.name(), "Skipping advisory check");
                continue;
            }

            let entry = self.taxonomy.lookup(rule.kind())?;
            let detections = rule.check(extraction, &self.config);
            debug!(rule = rule.name(), count = detections.len(), "Check complete");

            issues.extend(detections.into_iter().map(|d| d.into_issue(entry)));
        }

        let totals = DocumentTotals {
            pages: extraction.pages.len(),
            words: extraction.word_count(),
            images: extraction.image_count(),
        };

        Ok(Report::new(
            extraction.file_path.clone(),
            self.taxonomy.version(),
            totals,
            issues,
        ))
    }
}

/// Analyze with the standard rules and the given configuration
pub fn analyze(extraction: &Extraction, config: &AnalyzerConfig) -> Result<Report> {
    Analyzer::new(config.clone())?.analyze(extraction)
}

/// Compare two boxes by reading position: top-to-bottom, then left-to-right.
pub(crate) fn reading_position(a: &BoundingBox, b: &BoundingBox) -> Ordering {
    a.y0.total_cmp(&b.y0).then(a.x0.total_cmp(&b.x0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{Image, Page, Word};
    use crate::taxonomy::Severity;

    fn bbox(x0: f64, y0: f64) -> BoundingBox {
        BoundingBox::new(x0, y0, x0 + 40.0, y0 + 12.0)
    }

    /// The worked example: one untitled page with an undescribed image and a large word.
    fn example() -> Extraction {
        let page = Page::new(1, 612.0, 792.0)
            .with_image(Image::new("page1_img0", 1, 640, 480, bbox(72.0, 200.0)))
            .with_word(Word::new("Overview", 1, bbox(72.0, 72.0), 24.0));
        Extraction::new("doc.pdf").with_title("doc.pdf").with_page(page)
    }

    #[test]
    fn test_worked_example() {
        let report = analyze(&example(), &AnalyzerConfig::default()).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report.critical_count, 1);
        assert_eq!(report.high_count, 2);
        assert_eq!(report.medium_count, 0);
        assert_eq!(report.low_count, 0);

        let kinds: Vec<_> = report.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::ImageMissingAltText,
                IssueKind::MissingDocumentTitle,
                IssueKind::UntaggedHeading,
            ]
        );
    }

    #[test]
    fn test_issue_fields_come_from_taxonomy() {
        let report = analyze(&example(), &AnalyzerConfig::default()).unwrap();
        let alt = &report.issues[0];
        assert_eq!(alt.severity, Severity::Critical);
        assert_eq!(alt.wcag, "1.1.1");
        assert!(alt.auto_fixable);
        assert_eq!(alt.location, Location::Page(1));
        assert_eq!(report.issues[1].location, Location::Document);
    }

    #[test]
    fn test_deterministic() {
        let analyzer = Analyzer::new(AnalyzerConfig {
            advisory_checks: true,
            ..AnalyzerConfig::default()
        })
        .unwrap();
        let first = analyzer.analyze(&example()).unwrap();
        let second = analyzer.analyze(&example()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_advisory_checks_are_opt_in() {
        let config = AnalyzerConfig {
            advisory_checks: true,
            ..AnalyzerConfig::default()
        };
        let report = analyze(&example(), &config).unwrap();
        assert!(!report.by_kind(IssueKind::LowColorContrast).is_empty());
        assert!(!report.by_kind(IssueKind::MissingMetadata).is_empty());
        assert!(report.counts_consistent());
    }

    #[test]
    fn test_malformed_input_yields_no_report() {
        let page = Page::new(0, 612.0, 792.0);
        let extraction = Extraction::new("bad.pdf").with_page(page);
        let err = analyze(&extraction, &AnalyzerConfig::default()).unwrap_err();
        assert!(matches!(err, TagbotError::MalformedInput(_)));
    }

    #[test]
    fn test_rule_without_taxonomy_row_is_configuration_error() {
        let partial: Vec<_> = Taxonomy::standard()
            .entries()
            .filter(|e| e.kind != IssueKind::UntaggedHeading)
            .cloned()
            .collect();
        let taxonomy = Taxonomy::from_entries("partial", partial).unwrap();

        let err = Analyzer::with_rules(AnalyzerConfig::default(), taxonomy, standard_rules())
            .unwrap_err();
        assert!(matches!(err, TagbotError::Configuration(_)));
    }

    #[test]
    fn test_invalid_config_rejected_at_registration() {
        let config = AnalyzerConfig {
            heading_threshold: -1.0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(Analyzer::new(config), Err(TagbotError::Configuration(_))));
    }

    #[test]
    fn test_empty_document_runs_document_checks_only() {
        let config = AnalyzerConfig {
            advisory_checks: true,
            ..AnalyzerConfig::default()
        };
        let report = analyze(&Extraction::new("empty.pdf"), &config).unwrap();
        assert!(report.issues.iter().all(|i| i.location == Location::Document));
        assert_eq!(report.by_kind(IssueKind::MissingDocumentTitle).len(), 1);
        assert_eq!(report.by_kind(IssueKind::MissingMetadata).len(), 1);
    }

    #[test]
    fn test_reading_position_order() {
        let top_right = bbox(300.0, 10.0);
        let top_left = bbox(10.0, 10.0);
        let lower = bbox(5.0, 50.0);
        assert_eq!(reading_position(&top_left, &top_right), Ordering::Less);
        assert_eq!(reading_position(&lower, &top_right), Ordering::Greater);
    }
}
