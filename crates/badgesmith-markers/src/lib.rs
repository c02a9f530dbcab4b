//! Marker-delimited region scanning.
//!
//! Finds and rewrites machine-managed regions of a document, and extracts
//! the small comment-based annotations that drive them.
//!
//! # Example
//!
//! ```
//! use badgesmith_markers::{find_badge_request, MarkerPair, Rewrite};
//!
//! let markers = MarkerPair::new("<!--- Start of badges -->", "<!--- End of badges -->").unwrap();
//! let doc = "<!-- Badges: rust, go -->\n<!--- Start of badges -->\nold\n<!--- End of badges -->\n";
//!
//! let request = find_badge_request(doc).unwrap();
//! assert_eq!(request.keys, vec!["rust", "go"]);
//!
//! match markers.rewrite(doc, "new") {
//!     Rewrite::Replaced { text, changed } => {
//!         assert!(changed);
//!         assert!(text.contains("<!--- Start of badges -->\nnew\n<!--- End of badges -->"));
//!     }
//!     Rewrite::MarkersNotFound => unreachable!(),
//! }
//! ```

mod comments;
mod region;

pub use comments::{find_badge_request, find_blurb, find_image_src, find_title, BadgeRequest};
pub use region::{MarkerPair, Region, Rewrite};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("{0} marker must not be empty")]
    Empty(&'static str),
}
