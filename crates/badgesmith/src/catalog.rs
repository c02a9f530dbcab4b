use crate::error::{describe, Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadgeEntry {
    pub badge_url: Option<String>,
}

/// Badge key to display metadata, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadgeCatalog {
    entries: HashMap<String, BadgeEntry>,
}

impl BadgeCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, BadgeEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Parse a catalog object. Only a non-object top level is an error; an
    /// entry without a string `badge_url` is dropped on its own.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: Map<String, Value> =
            serde_json::from_str(content).map_err(|e| Error::ConfigMalformed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            match value.get("badge_url") {
                Some(Value::String(url)) => {
                    entries.insert(
                        key,
                        BadgeEntry {
                            badge_url: Some(url.clone()),
                        },
                    );
                }
                _ => tracing::warn!(
                    "{}: badge '{}' has no string \"badge_url\", ignoring it",
                    path.display(),
                    key
                ),
            }
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigMissing {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Load the catalog, degrading to an empty one if it is missing or malformed.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                tracing::debug!("Loaded {} badges from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                tracing::warn!("No badges available: {}", describe(&e));
                Self::default()
            }
        }
    }

    /// The image URL for `key`, if the key exists and carries one.
    pub fn url(&self, key: &str) -> Option<&str> {
        self.entries.get(key)?.badge_url.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
