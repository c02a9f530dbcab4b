//! Run configuration.
//!
//! Every path, marker and style knob lives here so each component can be
//! constructed with an explicit value. A JSON file may override any subset
//! of the defaults:
//!
//! ```json
//! {
//!   "badges": { "catalog": "self/github_badges/badges.json" },
//!   "grid": { "style": { "card_width": "360px" } },
//!   "render": { "browser": "google-chrome", "timeout_secs": 10 }
//! }
//! ```

use crate::error::{Error, Result};
use badgesmith_markers::MarkerPair;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub badges: BadgeSettings,
    pub projects: ProjectSettings,
    pub grid: GridSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BadgeSettings {
    /// JSON catalog mapping badge keys to `{ "badge_url": ... }`
    pub catalog: PathBuf,
    pub start_marker: String,
    pub end_marker: String,
}

impl Default for BadgeSettings {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("badges.json"),
            start_marker: "<!--- Start of badges -->".to_string(),
            end_marker: "<!--- End of badges -->".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSettings {
    /// Branch used when building blob and raw-content links
    pub branch: String,
    pub thumbnail_start_marker: String,
    pub thumbnail_end_marker: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            thumbnail_start_marker: "<!--- Start of Thumbnail-->".to_string(),
            thumbnail_end_marker: "<!--- End of Thumbnail-->".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSettings {
    pub start_marker: String,
    pub end_marker: String,
    pub style: GridStyle,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            start_marker: "<!--- Start of project grid -->".to_string(),
            end_marker: "<!--- End of project grid -->".to_string(),
            style: GridStyle::default(),
        }
    }
}

/// CSS values interpolated into each portfolio card.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridStyle {
    pub card_width: String,
    pub card_height: String,
    pub card_margin: String,
    pub card_border_radius: String,
    pub card_background: String,
    pub badges_padding: String,
    pub blurb_padding: String,
    pub title_font_family: String,
    pub title_color: String,
    pub title_font_size: String,
    pub blurb_font_family: String,
    pub blurb_color: String,
    pub blurb_font_size: String,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            card_width: "400px".to_string(),
            card_height: "550px".to_string(),
            card_margin: "15px".to_string(),
            card_border_radius: "15px".to_string(),
            card_background: "rgba(245, 245, 245, 1)".to_string(),
            badges_padding: "15px".to_string(),
            blurb_padding: "30px".to_string(),
            title_font_family: "Arial".to_string(),
            title_color: "#424141".to_string(),
            title_font_size: "20px".to_string(),
            blurb_font_family: "Arial".to_string(),
            blurb_color: "#6e6e6e".to_string(),
            blurb_font_size: "14px".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Headless-capable Chromium or Chrome executable
    pub browser: String,
    /// Per-card limit; a card that exceeds it is dropped from the grid
    pub timeout_secs: u64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Where card images are written, relative to the README's directory
    pub image_dir: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            browser: "chromium".to_string(),
            timeout_secs: 30,
            viewport_width: 430,
            viewport_height: 580,
            image_dir: PathBuf::from("cards"),
        }
    }
}

impl RenderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load a config file. Unlike the badge catalog, an explicitly named
    /// config that cannot be read is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigMissing {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| Error::ConfigMalformed {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.badge_markers()?;
        self.thumbnail_markers()?;
        self.grid_markers()?;
        Ok(())
    }

    pub fn badge_markers(&self) -> Result<MarkerPair> {
        Ok(MarkerPair::new(
            &self.badges.start_marker,
            &self.badges.end_marker,
        )?)
    }

    pub fn thumbnail_markers(&self) -> Result<MarkerPair> {
        Ok(MarkerPair::new(
            &self.projects.thumbnail_start_marker,
            &self.projects.thumbnail_end_marker,
        )?)
    }

    pub fn grid_markers(&self) -> Result<MarkerPair> {
        Ok(MarkerPair::new(
            &self.grid.start_marker,
            &self.grid.end_marker,
        )?)
    }
}
