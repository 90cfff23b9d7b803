// SPDX-License-Identifier: PMPL-1.0-or-later
//! Remediation planning.
//!
//! Turns a report into the work list for the external remediation driver:
//! one concrete action per auto-fixable issue, and a manual-review item for
//! everything else. The plan only describes fixes; applying them (alt-text
//! generation, tagging, writing metadata) happens outside this crate.

use crate::extraction::BoundingBox;
use crate::report::{Issue, IssueContext, Location, Report};
use crate::taxonomy::{IssueKind, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A concrete fix the remediation driver can apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FixAction {
    GenerateAltText { page: u32, image: String },
    SetTitle { title: String },
    TagHeading { page: u32, text: String, level: u8, bbox: BoundingBox },
    RebuildReadingOrder { page: u32 },
    SetMetadata { language: String },
}

impl std::fmt::Display for FixAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixAction::GenerateAltText { page, image } => {
                write!(f, "generate alt text for image '{}' on page {}", image, page)
            }
            FixAction::SetTitle { title } => write!(f, "set document title to \"{}\"", title),
            FixAction::TagHeading { page, text, level, bbox } => write!(
                f,
                "tag \"{}\" on page {} at ({:.0}, {:.0}) as H{}",
                text, page, bbox.x0, bbox.y0, level
            ),
            FixAction::RebuildReadingOrder { page } => {
                write!(f, "rebuild reading order on page {}", page)
            }
            FixAction::SetMetadata { language } => write!(f, "set document language to {}", language),
        }
    }
}

/// An auto-fixable issue and the action that resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedFix {
    pub kind: IssueKind,
    pub severity: Severity,
    pub location: Location,
    pub action: FixAction,
}

/// An issue that needs a person to look at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualItem {
    pub kind: IssueKind,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
    pub recommendation: String,
}

impl ManualItem {
    fn from_issue(issue: &Issue, message: String) -> Self {
        Self {
            kind: issue.kind,
            severity: issue.severity,
            location: issue.location,
            message,
            recommendation: issue.recommendation.clone(),
        }
    }
}

/// Ordered fix list for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationPlan {
    pub file_path: PathBuf,
    pub fixes: Vec<PlannedFix>,
    pub manual: Vec<ManualItem>,
}

impl RemediationPlan {
    /// Build a plan. Both lists keep report order.
    pub fn from_report(report: &Report) -> Self {
        let mut fixes = Vec::new();
        let mut manual = Vec::new();

        for issue in &report.issues {
            match fix_action(issue) {
                Some(action) => {
                    fixes.push(PlannedFix {
                        kind: issue.kind,
                        severity: issue.severity,
                        location: issue.location,
                        action,
                    });
                    if let Some(rest) = unfixed_metadata(issue) {
                        manual.push(rest);
                    }
                }
                None => manual.push(ManualItem::from_issue(issue, issue.message.clone())),
            }
        }

        Self {
            file_path: report.file_path.clone(),
            fixes,
            manual,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty() && self.manual.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!("{{\"error\": \"Failed to serialize remediation plan: {}\"}}", e)
        })
    }
}

/// Action for an auto-fixable issue. Issues without enough context to act
/// on fall through to manual review.
fn fix_action(issue: &Issue) -> Option<FixAction> {
    if !issue.auto_fixable {
        return None;
    }

    let page = issue.location.page();
    match (issue.kind, issue.context.as_ref()?) {
        (IssueKind::ImageMissingAltText, IssueContext::Image { name, .. }) => {
            Some(FixAction::GenerateAltText { page: page?, image: name.clone() })
        }
        (IssueKind::MissingDocumentTitle, IssueContext::Title { suggested, .. }) => {
            Some(FixAction::SetTitle { title: suggested.clone() })
        }
        (IssueKind::UntaggedHeading, IssueContext::Heading { text, suggested_level, bbox, .. }) => {
            Some(FixAction::TagHeading {
                page: page?,
                text: text.clone(),
                level: *suggested_level,
                bbox: *bbox,
            })
        }
        (IssueKind::ReadingOrderAnomaly, IssueContext::ReadingOrder { .. }) => {
            Some(FixAction::RebuildReadingOrder { page: page? })
        }
        (IssueKind::MissingMetadata, IssueContext::Metadata { detected_language, .. }) => {
            detected_language
                .clone()
                .map(|language| FixAction::SetMetadata { language })
        }
        _ => None,
    }
}

/// Metadata fields the planned fix leaves missing, as a manual item.
fn unfixed_metadata(issue: &Issue) -> Option<ManualItem> {
    let Some(IssueContext::Metadata { missing, derivable, .. }) = &issue.context else {
        return None;
    };

    let rest: Vec<&str> = missing
        .iter()
        .filter(|field| !derivable.contains(field))
        .map(String::as_str)
        .collect();
    if rest.is_empty() {
        return None;
    }

    Some(ManualItem::from_issue(
        issue,
        format!("Metadata needs manual entry: {}", rest.join(", ")),
    ))
}
