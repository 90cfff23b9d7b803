// SPDX-License-Identifier: PMPL-1.0-or-later
//! Directory scanner for running accessibility analysis over many documents.
//!
//! Walks directory trees, collects extraction files, and analyzes them in
//! parallel. One bad document never aborts the batch; it is recorded as a
//! failure next to the reports of the others.

use crate::analyzers::Analyzer;
use crate::error::Result;
use crate::extraction::Extraction;
use crate::report::Report;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extension of extraction files
const EXTRACTION_EXTENSION: &str = "json";

/// Directories to skip
const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", "target", "dist", "build",
    "_build", "vendor", "coverage",
];

/// Report for one scanned document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub report: Report,
}

/// A document that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Results of a directory scan, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub reports: Vec<DocumentReport>,
    pub failures: Vec<ScanFailure>,
}

impl BatchReport {
    pub fn has_critical(&self) -> bool {
        self.reports.iter().any(|d| d.report.has_critical())
    }

    pub fn total_issues(&self) -> usize {
        self.reports.iter().map(|d| d.report.len()).sum()
    }

    pub fn documents(&self) -> usize {
        self.reports.len() + self.failures.len()
    }
}

/// Scan a directory of extraction files
pub fn scan_directory(dir: &Path, analyzer: &Analyzer) -> Result<BatchReport> {
    info!("Scanning directory: {}", dir.display());

    let paths = collect_extractions(dir);
    debug!(count = paths.len(), "Collected extraction files");

    let outcomes: Vec<(PathBuf, Result<Report>)> = paths
        .into_par_iter()
        .map(|path| {
            let outcome = scan_file(&path, analyzer);
            (path, outcome)
        })
        .collect();

    let mut batch = BatchReport::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => batch.reports.push(DocumentReport { path, report }),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                batch.failures.push(ScanFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    batch.reports.sort_by(|a, b| a.path.cmp(&b.path));
    batch.failures.sort_by(|a, b| a.path.cmp(&b.path));

    info!(
        "Scanned {} documents, found {} issues ({} failed)",
        batch.reports.len(),
        batch.total_issues(),
        batch.failures.len()
    );

    Ok(batch)
}

/// Analyze a single extraction file
pub fn scan_file(path: &Path, analyzer: &Analyzer) -> Result<Report> {
    let extraction = Extraction::from_path(path)?;
    analyzer.analyze(&extraction)
}

fn collect_extractions(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden and excluded directories, but never the root itself
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !SKIP_DIRS.contains(&name) && !name.starts_with('.')
        })
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("Cannot read directory entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(EXTRACTION_EXTENSION))
                .unwrap_or(false)
        })
        .collect()
}
