//! Badge row rendering.

use crate::catalog::BadgeCatalog;

/// Human label for a badge key: separators become spaces, words are title-cased.
///
/// `"continuous-integration"` becomes `"Continuous Integration"`.
pub fn badge_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut previous_alpha = false;
    for c in key.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if previous_alpha {
                label.extend(c.to_lowercase());
            } else {
                label.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            label.push(c);
            previous_alpha = false;
        }
    }
    label
}

pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one `<img>` per resolvable key, sorted by key, inside a paragraph.
///
/// Keys missing from the catalog are logged and skipped. Returns an empty
/// string when nothing resolves.
pub fn render_badges<S: AsRef<str>>(keys: &[S], catalog: &BadgeCatalog) -> String {
    let mut sorted: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let images: Vec<String> = sorted
        .into_iter()
        .filter_map(|key| match catalog.url(key) {
            Some(url) => Some(format!(
                r#"<img alt="{}" src="{}" />"#,
                escape_attr(&badge_label(key)),
                escape_attr(url)
            )),
            None => {
                tracing::warn!("Unknown badge '{}', skipping", key);
                None
            }
        })
        .collect();

    if images.is_empty() {
        String::new()
    } else {
        format!(r#"<p align="left">{}</p>"#, images.join(" "))
    }
}
