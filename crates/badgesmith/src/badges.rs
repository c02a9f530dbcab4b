use crate::catalog::BadgeCatalog;
use crate::error::{Error, Result};
use crate::render::render_badges;
use badgesmith_markers::{find_badge_request, MarkerPair, Rewrite};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStatus {
    /// No `<!-- Badges: ... -->` comment and no key list supplied
    NoRequest,
    /// None of the requested keys is in the catalog
    NothingResolved,
    MarkersNotFound,
    Unchanged,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeUpdate {
    pub text: String,
    /// The rendered badge row, also set when the region could not be found
    pub fragment: String,
    pub status: BadgeStatus,
}

/// Read a plain key list, one key per line. Blank lines are ignored.
pub fn read_keys(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigMissing {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Rewrites the badge region of a text from its badge request.
pub struct BadgeUpdater {
    catalog: BadgeCatalog,
    markers: MarkerPair,
    keys: Option<Vec<String>>,
}

impl BadgeUpdater {
    pub fn new(catalog: BadgeCatalog, markers: MarkerPair) -> Self {
        Self {
            catalog,
            markers,
            keys: None,
        }
    }

    /// Use a fixed key list for every text instead of in-document requests.
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn markers(&self) -> &MarkerPair {
        &self.markers
    }

    pub fn apply(&self, text: &str) -> BadgeUpdate {
        let unchanged = |fragment: String, status| BadgeUpdate {
            text: text.to_string(),
            fragment,
            status,
        };

        let request = find_badge_request(text);
        let keys = match (&self.keys, &request) {
            (Some(keys), _) => keys.as_slice(),
            (None, Some(request)) => request.keys.as_slice(),
            (None, None) => return unchanged(String::new(), BadgeStatus::NoRequest),
        };

        let fragment = render_badges(keys, &self.catalog);
        if fragment.is_empty() {
            return unchanged(fragment, BadgeStatus::NothingResolved);
        }

        let Some(region) = self.markers.locate(text) else {
            return unchanged(fragment, BadgeStatus::MarkersNotFound);
        };

        // A request inside the region would be wiped by the rewrite; carry it over.
        let body = match &request {
            Some(request) if region.encloses(request.span.clone()) => {
                format!("{}\n\n{}", request.comment, fragment)
            }
            _ => fragment.clone(),
        };

        match self.markers.rewrite(text, &body) {
            Rewrite::Replaced { text, changed } => BadgeUpdate {
                text,
                fragment,
                status: if changed {
                    BadgeStatus::Updated
                } else {
                    BadgeStatus::Unchanged
                },
            },
            Rewrite::MarkersNotFound => unchanged(fragment, BadgeStatus::MarkersNotFound),
        }
    }
}
