use crate::document::DocumentKind;
use crate::error::{Error, Result};
use badgesmith_markers::{find_blurb, find_image_src, find_title, MarkerPair};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// A portfolio entry. Serialised field order is part of the `scan` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub blurb: String,
    /// Pre-rendered badge row, embedded verbatim in cards
    #[serde(default)]
    pub badges: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub url: String,
}

/// Read a JSON array of records, as printed by `scan`.
pub fn load_projects(path: &Path) -> Result<Vec<ProjectRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigMissing {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| Error::ConfigMalformed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Builds project records for documents of one GitHub repository.
pub struct ProjectExtractor {
    repo_name: String,
    branch: String,
    thumbnail_markers: MarkerPair,
}

impl ProjectExtractor {
    pub fn new(
        repo_name: impl Into<String>,
        branch: impl Into<String>,
        thumbnail_markers: MarkerPair,
    ) -> Self {
        Self {
            repo_name: repo_name.into(),
            branch: branch.into(),
            thumbnail_markers,
        }
    }

    /// Extract a record from `content`. Returns `None` when the document has
    /// no blurb, which marks it as not being a project.
    pub fn extract(
        &self,
        content: &str,
        badges: &str,
        path: &Path,
        kind: DocumentKind,
    ) -> Option<ProjectRecord> {
        let Some(blurb) = find_blurb(content) else {
            tracing::debug!("{}: no blurb, not a project", path.display());
            return None;
        };

        let title = find_title(content).unwrap_or_else(|| {
            tracing::warn!("{}: project has no '# ' title heading", path.display());
            String::new()
        });

        let thumbnail_url = self
            .thumbnail_markers
            .locate(content)
            .and_then(|region| find_image_src(region.inner(content)))
            .map(|src| self.raw_url(&src))
            .unwrap_or_default();

        Some(ProjectRecord {
            title,
            blurb,
            badges: badges.to_string(),
            thumbnail_url,
            url: self.page_url(path, kind),
        })
    }

    fn raw_url(&self, src: &str) -> String {
        if src.starts_with("http://") || src.starts_with("https://") {
            return src.to_string();
        }
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}",
            self.repo_name,
            self.branch,
            src.trim_start_matches("./")
        )
    }

    fn page_url(&self, path: &Path, kind: DocumentKind) -> String {
        if path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            tracing::warn!(
                "{}: path is not relative to the repository root, its link will not resolve",
                path.display()
            );
        }
        let posix = posix_path(path);
        match kind {
            DocumentKind::Markdown => format!(
                "https://github.com/{}/blob/{}/{}",
                self.repo_name, self.branch, posix
            ),
            DocumentKind::Notebook => format!(
                "https://nbviewer.org/github/{}/blob/{}/{}",
                self.repo_name, self.branch, posix
            ),
        }
    }
}

/// `path` with `/` separators. Only `.` components are dropped.
fn posix_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::CurDir => None,
            Component::RootDir => Some(String::new()),
            other => Some(other.as_os_str().to_string_lossy().into_owned()),
        })
        .collect();
    if parts.len() == 1 && parts[0].is_empty() {
        return "/".to_string();
    }
    parts.join("/")
}
