//! Portfolio grid composition.

use crate::config::GridStyle;
use crate::error::Error;
use crate::project::ProjectRecord;
use crate::raster::Rasterizer;
use crate::render::escape_attr;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// A card that could not be rendered and was left out of the grid.
#[derive(Debug)]
pub struct CardFailure {
    pub title: String,
    pub error: Error,
}

pub struct GridComposer {
    style: GridStyle,
}

impl GridComposer {
    pub fn new(style: GridStyle) -> Self {
        Self { style }
    }

    /// One project card as a single line of inline-styled HTML.
    pub fn card(&self, project: &ProjectRecord) -> String {
        let s = &self.style;
        let title = collapse_whitespace(&project.title);
        let blurb = collapse_whitespace(&project.blurb);

        let mut parts = vec![format!(
            r#"<div style="width: {}; height: {}; margin: {}; background-color: {}; border-radius: {}; overflow: hidden; display: inline-block; text-align: left; vertical-align: top;">"#,
            s.card_width, s.card_height, s.card_margin, s.card_background, s.card_border_radius
        )];
        if !project.thumbnail_url.is_empty() {
            parts.push(format!(
                r#"<a href="{}" target="_blank">"#,
                escape_attr(&project.url)
            ));
            parts.push(format!(
                r#"<img src="{}" alt="{}" style="width: 100%; border-radius: {r} {r} 0 0;">"#,
                escape_attr(&project.thumbnail_url),
                escape_attr(&title),
                r = s.card_border_radius
            ));
            parts.push("</a>".to_string());
        }
        parts.push(format!(
            r#"<div style="padding: {p} {p} 0 {p};">"#,
            p = s.badges_padding
        ));
        if !project.badges.is_empty() {
            parts.push(project.badges.clone());
        }
        parts.push("</div>".to_string());
        parts.push(format!(
            r#"<div style="padding: 0 {p} 0 {p};">"#,
            p = s.blurb_padding
        ));
        parts.push(format!(
            r#"<h3 style="font-family: {}; color: {}; font-size: {};">{}</h3>"#,
            s.title_font_family, s.title_color, s.title_font_size, title
        ));
        parts.push(format!(
            r#"<p style="font-family: {}; color: {}; font-size: {};">{}</p>"#,
            s.blurb_font_family, s.blurb_color, s.blurb_font_size, blurb
        ));
        parts.push("</div>".to_string());
        parts.push("</div>".to_string());
        parts.join(" ")
    }

    /// All cards, inline, in the given order.
    pub fn compose(&self, projects: &[ProjectRecord]) -> String {
        let cards: String = projects.iter().map(|p| self.card(p)).collect();
        wrap_grid(&cards)
    }

    /// All cards rendered to PNG files under `image_dir`, referenced from the
    /// grid as `link_dir/<file>`. Cards that fail to render are left out.
    pub fn compose_images(
        &self,
        projects: &[ProjectRecord],
        rasterizer: &dyn Rasterizer,
        image_dir: &Path,
        link_dir: &str,
    ) -> (String, Vec<CardFailure>) {
        let mut cards = String::new();
        let mut failures = Vec::new();

        if let Err(e) = std::fs::create_dir_all(image_dir) {
            tracing::error!("Cannot create {}: {}", image_dir.display(), e);
            failures.extend(projects.iter().map(|p| CardFailure {
                title: p.title.clone(),
                error: Error::Render {
                    card: p.title.clone(),
                    message: format!("cannot create {}: {}", image_dir.display(), e),
                },
            }));
            return (wrap_grid(&cards), failures);
        }

        for (index, project) in projects.iter().enumerate() {
            let file_name = image_file_name(index, &project.title);
            let page = card_page(&self.card(project));
            match rasterizer.rasterize(&file_name, &page, &image_dir.join(&file_name)) {
                Ok(()) => {
                    let link = if link_dir.is_empty() {
                        file_name
                    } else {
                        format!("{}/{}", link_dir.trim_end_matches('/'), file_name)
                    };
                    cards.push_str(&format!(
                        r#"<a href="{}" target="_blank"><img src="{}" alt="{}" /></a>"#,
                        escape_attr(&project.url),
                        escape_attr(&link),
                        escape_attr(&collapse_whitespace(&project.title))
                    ));
                }
                Err(error) => {
                    tracing::error!("Skipping card '{}': {}", project.title, error);
                    failures.push(CardFailure {
                        title: project.title.clone(),
                        error,
                    });
                }
            }
        }

        (wrap_grid(&cards), failures)
    }
}

fn wrap_grid(cards: &str) -> String {
    format!("<div style=\"text-align: center;\">\n{}\n</div>", cards)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Standalone page around a card, for the rasteriser.
fn card_page(card: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>body {{ margin: 0; background: transparent; }}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        card
    )
}

fn image_file_name(index: usize, title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = NON_SLUG.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        format!("card-{:02}.png", index + 1)
    } else {
        format!("card-{:02}-{}.png", index + 1, slug)
    }
}
