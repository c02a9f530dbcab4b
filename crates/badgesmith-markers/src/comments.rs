//! Comment annotations embedded in project documents.
//!
//! ```text
//! # Project title
//! <!-- Badges: rust, unit_test -->
//! <!--- Blurb
//! One paragraph describing the project.
//! -->
//! <!--- Start of Thumbnail-->
//! <img src="assets/thumb.png" />
//! <!--- End of Thumbnail-->
//! ```

use std::ops::Range;
use winnow::combinator::delimited;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_until, take_while};

const BADGE_OPENER: &str = "<!-- Badges: ";
const BADGE_CLOSER: &str = " -->";
const BLURB_OPENER: &str = "<!--- Blurb";
const COMMENT_CLOSER: &str = "-->";
const SRC_OPENER: &str = "src=\"";

/// The badge keys requested by a `<!-- Badges: a, b -->` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeRequest {
    /// The comment exactly as written in the document
    pub comment: String,
    /// Keys in document order, trimmed, empty entries dropped
    pub keys: Vec<String>,
    /// Byte range of the comment within the scanned text
    pub span: Range<usize>,
}

// ============ Public API ============

/// Find the first badge request comment. The comment must open and close on one line.
pub fn find_badge_request(text: &str) -> Option<BadgeRequest> {
    let (span, body) = scan(text, BADGE_OPENER, true, badge_comment)?;
    let keys = body
        .trim()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    Some(BadgeRequest {
        comment: text[span.clone()].to_string(),
        keys,
        span,
    })
}

/// Body of the first `<!--- Blurb ... -->` comment, trimmed. May span several lines.
pub fn find_blurb(text: &str) -> Option<String> {
    scan(text, BLURB_OPENER, false, blurb_comment).map(|(_, body)| body.trim().to_string())
}

/// First top-level `# heading` line, without the hashes.
pub fn find_title(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let mut input = line.trim_start();
        heading_prefix.parse_next(&mut input).ok()?;
        Some(input.trim().to_string())
    })
}

/// Value of the first non-empty `src="..."` attribute.
pub fn find_image_src(text: &str) -> Option<String> {
    scan(text, SRC_OPENER, false, src_attribute).map(|(_, src)| src.to_string())
}

// ============ Winnow Parsers ============

fn badge_comment<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited(BADGE_OPENER, take_until(0.., BADGE_CLOSER), BADGE_CLOSER).parse_next(input)
}

fn blurb_comment<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        BLURB_OPENER,
        any.verify(|c: &char| c.is_whitespace()),
        take_until(0.., COMMENT_CLOSER),
        COMMENT_CLOSER,
    )
        .map(|(_, _, body, _)| body)
        .parse_next(input)
}

fn src_attribute<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited(SRC_OPENER, take_till(1.., '"'), '"').parse_next(input)
}

fn heading_prefix(input: &mut &str) -> ModalResult<()> {
    ('#', take_while(1.., char::is_whitespace))
        .void()
        .parse_next(input)
}

/// Try `parser` at every occurrence of `opener`, returning the first that parses.
/// With `single_line`, the parser only sees the rest of the opener's line.
fn scan<'a, O>(
    text: &'a str,
    opener: &str,
    single_line: bool,
    mut parser: impl Parser<&'a str, O, ErrMode<ContextError>>,
) -> Option<(Range<usize>, O)> {
    for (offset, _) in text.match_indices(opener) {
        let tail = &text[offset..];
        let window = if single_line {
            &tail[..tail.find('\n').unwrap_or(tail.len())]
        } else {
            tail
        };

        let mut input = window;
        if let Ok(output) = parser.parse_next(&mut input) {
            let consumed = window.len() - input.len();
            return Some((offset..offset + consumed, output));
        }
    }
    None
}
