//! Per-file update pipeline.
//!
//! Each target is processed independently: a failure is reported for that
//! file and the batch moves on.

use crate::badges::{BadgeStatus, BadgeUpdater};
use crate::document::{Document, DocumentKind};
use crate::error::{describe, Result};
use crate::project::{ProjectExtractor, ProjectRecord};
use badgesmith_markers::{MarkerPair, Rewrite};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Updated,
    /// Would be updated; only produced in check mode
    Pending,
    Unchanged,
    /// Processed, but there was nothing to rewrite
    Untouched(&'static str),
    Skipped(&'static str),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub project: Option<ProjectRecord>,
    /// Serialised document before and after, in check mode
    pub diff: Option<(String, String)>,
}

impl FileReport {
    fn new(path: &Path, status: FileStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            status,
            project: None,
            diff: None,
        }
    }
}

/// Updates badge regions and optionally collects project records.
pub struct Updater<'a> {
    badges: &'a BadgeUpdater,
    projects: Option<&'a ProjectExtractor>,
    check: bool,
}

impl<'a> Updater<'a> {
    pub fn new(badges: &'a BadgeUpdater) -> Self {
        Self {
            badges,
            projects: None,
            check: false,
        }
    }

    pub fn with_projects(mut self, extractor: &'a ProjectExtractor) -> Self {
        self.projects = Some(extractor);
        self
    }

    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn update_file(&self, path: &Path) -> FileReport {
        tracing::debug!("Processing {}", path.display());
        if !path.exists() {
            tracing::warn!("{}: not found, skipping", path.display());
            return FileReport::new(path, FileStatus::Skipped("not found"));
        }
        if DocumentKind::from_path(path).is_none() {
            tracing::debug!("{}: not a .md or .ipynb file, skipping", path.display());
            return FileReport::new(path, FileStatus::Skipped("unsupported file type"));
        }

        match self.update_document(path) {
            Ok(report) => report,
            Err(e) => {
                let message = describe(&e);
                tracing::error!("{}", message);
                FileReport::new(path, FileStatus::Failed(message))
            }
        }
    }

    fn update_document(&self, path: &Path) -> Result<FileReport> {
        let mut doc = Document::load(path)?;
        let before = self.check.then(|| doc.render()).transpose()?;

        let mut fragment = String::new();
        let mut statuses = Vec::new();
        let changed = doc.rewrite_texts(|text| {
            let update = self.badges.apply(text);
            if fragment.is_empty() {
                fragment = update.fragment;
            }
            statuses.push(update.status);
            Some(update.text)
        });

        if markers_missing(&statuses) {
            tracing::warn!(
                "{}: badge markers not found, add '{}' and '{}'",
                path.display(),
                self.badges.markers().start(),
                self.badges.markers().end()
            );
        }
        if statuses.contains(&BadgeStatus::NothingResolved) {
            tracing::warn!(
                "{}: none of the requested badges are in the catalog",
                path.display()
            );
        }

        let mut report = if changed {
            finish(&doc, before)?
        } else if statuses.contains(&BadgeStatus::Unchanged) {
            FileReport::new(path, FileStatus::Unchanged)
        } else if statuses.contains(&BadgeStatus::MarkersNotFound) {
            FileReport::new(path, FileStatus::Untouched("badge markers not found"))
        } else if statuses.contains(&BadgeStatus::NothingResolved) {
            FileReport::new(path, FileStatus::Untouched("no badges resolved"))
        } else {
            FileReport::new(path, FileStatus::Untouched("no badge request"))
        };

        if let Some(extractor) = self.projects {
            report.project = extractor.extract(&doc.full_text(), &fragment, path, doc.kind());
        }
        Ok(report)
    }
}

/// Some text wanted badges but no text of the document holds the region.
fn markers_missing(statuses: &[BadgeStatus]) -> bool {
    statuses.contains(&BadgeStatus::MarkersNotFound)
        && !statuses
            .iter()
            .any(|s| matches!(s, BadgeStatus::Updated | BadgeStatus::Unchanged))
}

/// Inject `grid` between `markers` in `readme`.
pub fn update_grid(readme: &Path, markers: &MarkerPair, grid: &str, check: bool) -> FileReport {
    match rewrite_grid(readme, markers, grid, check) {
        Ok(report) => report,
        Err(e) => {
            let message = describe(&e);
            tracing::error!("{}", message);
            FileReport::new(readme, FileStatus::Failed(message))
        }
    }
}

fn rewrite_grid(readme: &Path, markers: &MarkerPair, grid: &str, check: bool) -> Result<FileReport> {
    let mut doc = Document::load(readme)?;
    let before = check.then(|| doc.render()).transpose()?;

    let mut found = false;
    let changed = doc.rewrite_texts(|text| match markers.rewrite(text, grid) {
        Rewrite::Replaced { text, .. } => {
            found = true;
            Some(text)
        }
        Rewrite::MarkersNotFound => None,
    });

    if changed {
        return finish(&doc, before);
    }
    if !found {
        tracing::warn!(
            "{}: grid markers not found, add '{}' and '{}'",
            readme.display(),
            markers.start(),
            markers.end()
        );
        return Ok(FileReport::new(
            readme,
            FileStatus::Untouched("grid markers not found"),
        ));
    }
    Ok(FileReport::new(readme, FileStatus::Unchanged))
}

/// Write a changed document, or in check mode record the diff instead.
fn finish(doc: &Document, before: Option<String>) -> Result<FileReport> {
    match before {
        Some(before) => {
            let after = doc.render()?;
            let mut report = FileReport::new(&doc.path, FileStatus::Pending);
            report.diff = Some((before, after));
            Ok(report)
        }
        None => {
            doc.save()?;
            tracing::info!("Updated {}", doc.path.display());
            Ok(FileReport::new(&doc.path, FileStatus::Updated))
        }
    }
}
