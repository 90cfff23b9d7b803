// SPDX-License-Identifier: PMPL-1.0-or-later
//! Before/after comparison of two reports for the same document.
//!
//! Used after remediation to confirm what was fixed. Issues are matched on
//! kind, location and the detail that identifies them (image name, heading
//! text and position), so messages or counts changing between runs do not
//! break matching.

use crate::report::{Issue, IssueContext, Location, Report};
use crate::taxonomy::IssueKind;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Fingerprint {
    kind: IssueKind,
    location: Location,
    subject: Option<String>,
}

impl Fingerprint {
    fn of(issue: &Issue) -> Self {
        let subject = match &issue.context {
            Some(IssueContext::Image { name, .. }) => Some(name.clone()),
            // Repeated headings ("Summary" on every chapter) differ by position
            Some(IssueContext::Heading { text, bbox, .. }) => {
                Some(format!("{}@{:.1},{:.1}", text, bbox.x0, bbox.y0))
            }
            _ => None,
        };
        Self {
            kind: issue.kind,
            location: issue.location,
            subject,
        }
    }
}

/// Outcome of comparing two reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationSummary {
    pub before_total: usize,
    pub after_total: usize,
    pub before_critical: usize,
    pub after_critical: usize,
    /// Present before, gone after
    pub resolved: Vec<Issue>,
    /// Present in both
    pub remaining: Vec<Issue>,
    /// New in the after report
    pub introduced: Vec<Issue>,
}

impl VerificationSummary {
    /// Fewer issues overall and nothing new.
    pub fn improved(&self) -> bool {
        self.after_total < self.before_total && self.introduced.is_empty()
    }

    /// Share of the original issues that were resolved, 0.0 to 1.0.
    pub fn resolution_rate(&self) -> f64 {
        if self.before_total == 0 {
            return 1.0;
        }
        self.resolved.len() as f64 / self.before_total as f64
    }
}

/// Compare a report taken before remediation with one taken after.
///
/// Matching is multiset-aware: two identical fingerprints before and one
/// after count as one resolved and one remaining.
pub fn compare(before: &Report, after: &Report) -> VerificationSummary {
    let mut pending: HashMap<Fingerprint, usize> = HashMap::new();
    for issue in &after.issues {
        *pending.entry(Fingerprint::of(issue)).or_insert(0) += 1;
    }

    let mut resolved = Vec::new();
    let mut remaining = Vec::new();
    for issue in &before.issues {
        match pending.get_mut(&Fingerprint::of(issue)) {
            Some(count) if *count > 0 => {
                *count -= 1;
                remaining.push(issue.clone());
            }
            _ => resolved.push(issue.clone()),
        }
    }

    // Whatever is left unmatched in the after report is new, in after order
    let mut introduced = Vec::new();
    for issue in after.issues.iter().rev() {
        if let Some(count) = pending.get_mut(&Fingerprint::of(issue)) {
            if *count > 0 {
                *count -= 1;
                introduced.push(issue.clone());
            }
        }
    }
    introduced.reverse();

    VerificationSummary {
        before_total: before.len(),
        after_total: after.len(),
        before_critical: before.critical_count,
        after_critical: after.critical_count,
        resolved,
        remaining,
        introduced,
    }
}
