use crate::MarkerError;

/// A pair of literal sentinel strings bounding a machine-managed region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    start: String,
    end: String,
}

/// Byte offsets of a located region. `start..end` covers both markers,
/// `inner_start..inner_end` only the text between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub inner_start: usize,
    pub inner_end: usize,
    pub end: usize,
}

impl Region {
    pub fn inner<'t>(&self, text: &'t str) -> &'t str {
        &text[self.inner_start..self.inner_end]
    }

    /// True if the byte range `span` lies completely between the markers.
    pub fn encloses(&self, span: std::ops::Range<usize>) -> bool {
        span.start >= self.inner_start && span.end <= self.inner_end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    Replaced { text: String, changed: bool },
    MarkersNotFound,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        matches!(self, Rewrite::Replaced { changed: true, .. })
    }
}

impl MarkerPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, MarkerError> {
        let start = start.into();
        let end = end.into();
        if start.is_empty() {
            return Err(MarkerError::Empty("start"));
        }
        if end.is_empty() {
            return Err(MarkerError::Empty("end"));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Locate the first start marker and the first end marker after it.
    pub fn locate(&self, text: &str) -> Option<Region> {
        let start = text.find(&self.start)?;
        let inner_start = start + self.start.len();
        let inner_end = inner_start + text[inner_start..].find(&self.end)?;
        Some(Region {
            start,
            inner_start,
            inner_end,
            end: inner_end + self.end.len(),
        })
    }

    /// The full replacement for a region: markers on their own lines around `body`.
    pub fn wrap(&self, body: &str) -> String {
        format!("{}\n{}\n{}", self.start, body, self.end)
    }

    /// Replace the first region of `text` (markers included) with `wrap(body)`.
    pub fn rewrite(&self, text: &str, body: &str) -> Rewrite {
        let Some(region) = self.locate(text) else {
            return Rewrite::MarkersNotFound;
        };

        let mut updated = String::with_capacity(text.len() + body.len());
        updated.push_str(&text[..region.start]);
        updated.push_str(&self.wrap(body));
        updated.push_str(&text[region.end..]);

        let changed = updated != text;
        Rewrite::Replaced {
            text: updated,
            changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn badges() -> MarkerPair {
        MarkerPair::new("<!--- Start of badges -->", "<!--- End of badges -->").unwrap()
    }

    #[test]
    fn test_empty_markers_rejected() {
        assert_eq!(MarkerPair::new("", "end"), Err(MarkerError::Empty("start")));
        assert_eq!(MarkerPair::new("start", ""), Err(MarkerError::Empty("end")));
    }

    #[test]
    fn test_locate_region() {
        let text = "intro\n<!--- Start of badges -->\nold\n<!--- End of badges -->\noutro";
        let region = badges().locate(text).unwrap();
        assert_eq!(region.inner(text), "\nold\n");
        assert_eq!(region.start, "intro\n".len());
        assert_eq!(region.end, text.len() - "\noutro".len());
    }

    #[test]
    fn test_rewrite_replaces_stale_content() {
        let text = "# Title\n<!--- Start of badges -->\nstale\nstuff\n<!--- End of badges -->\nrest\n";
        let Rewrite::Replaced { text: updated, changed } = badges().rewrite(text, "fresh") else {
            panic!("markers should be found");
        };
        assert!(changed);
        assert_eq!(
            updated,
            "# Title\n<!--- Start of badges -->\nfresh\n<!--- End of badges -->\nrest\n"
        );
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let text = "<!--- Start of badges --><!--- End of badges -->";
        let markers = badges();
        let Rewrite::Replaced { text: once, changed } = markers.rewrite(text, "x") else {
            panic!("markers should be found");
        };
        assert!(changed);
        let Rewrite::Replaced { text: twice, changed } = markers.rewrite(&once, "x") else {
            panic!("markers should be found");
        };
        assert!(!changed);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_markers_is_noop() {
        let markers = badges();
        assert_eq!(markers.rewrite("no markers here", "x"), Rewrite::MarkersNotFound);
        assert_eq!(
            markers.rewrite("<!--- Start of badges --> but no end", "x"),
            Rewrite::MarkersNotFound
        );
    }

    #[test]
    fn test_end_before_start_is_not_a_region() {
        let text = "<!--- End of badges -->\n<!--- Start of badges -->\n";
        assert_eq!(badges().locate(text), None);
    }

    #[test]
    fn test_only_first_region_rewritten() {
        let text = "<!--- Start of badges -->a<!--- End of badges -->\n<!--- Start of badges -->b<!--- End of badges -->";
        let Rewrite::Replaced { text: updated, .. } = badges().rewrite(text, "z") else {
            panic!("markers should be found");
        };
        assert!(updated.starts_with("<!--- Start of badges -->\nz\n<!--- End of badges -->\n"));
        assert!(updated.ends_with("<!--- Start of badges -->b<!--- End of badges -->"));
    }

    #[test]
    fn test_non_greedy_span() {
        let text = "S 1 E 2 E";
        let markers = MarkerPair::new("S", "E").unwrap();
        let region = markers.locate(text).unwrap();
        assert_eq!(region.inner(text), " 1 ");
    }
}
