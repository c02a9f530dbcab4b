//! Keep README badge rows and project portfolio grids in sync.
//!
//! The text grammars live in `badgesmith-markers`; this crate adds the
//! catalog, document I/O, project extraction, grid composition and the CLI.

pub mod badges;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod discover;
pub mod document;
pub mod error;
pub mod grid;
pub mod logging;
pub mod output;
pub mod project;
pub mod raster;
pub mod render;
pub mod update;

pub use badges::{BadgeStatus, BadgeUpdate, BadgeUpdater};
pub use catalog::BadgeCatalog;
pub use config::Config;
pub use error::{Error, Result};
pub use project::{ProjectExtractor, ProjectRecord};
