use crate::models::GeneratedImage;
use colored::*;

pub const CAPTION_LIMIT: usize = 150;
pub const ELLIPSIS: &str = "...";

/// A rendered gallery entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    /// 1-based position, as shown to the user and used in file names.
    pub position: usize,
    pub url: String,
    pub caption: Option<String>,
}

/// First [`CAPTION_LIMIT`] characters of the revised prompt plus an ellipsis.
///
/// The ellipsis is always added, whether or not anything was cut. Counting is
/// by `char`, so multi-byte text is never split inside a code point.
pub fn caption(revised_prompt: &str) -> String {
    let mut out: String = revised_prompt.chars().take(CAPTION_LIMIT).collect();
    out.push_str(ELLIPSIS);
    out
}

pub fn cards(images: &[GeneratedImage]) -> Vec<GalleryCard> {
    images
        .iter()
        .enumerate()
        .map(|(i, image)| GalleryCard {
            position: i + 1,
            url: image.url.clone(),
            caption: image.revised_prompt.as_deref().map(caption),
        })
        .collect()
}

impl GalleryCard {
    pub fn render(&self, show_colors: bool) -> String {
        let url = display_url(&self.url);
        let mut out = if show_colors {
            format!(
                "[{}] {}\n    ⬇ download {}",
                self.position.to_string().bright_yellow().bold(),
                url.bright_blue(),
                self.position
            )
        } else {
            format!("[{}] {}\n    ⬇ download {}", self.position, url, self.position)
        };

        if let Some(caption) = &self.caption {
            out.push_str("\n    ");
            if show_colors {
                out.push_str(&caption.bright_black().to_string());
            } else {
                out.push_str(caption);
            }
        }
        out
    }
}

/// Inline images would flood the terminal; show only their header.
fn display_url(url: &str) -> String {
    if url.starts_with("data:") {
        let header = url.split(',').next().unwrap_or("data:");
        format!("{},… (inline image)", header)
    } else {
        url.to_string()
    }
}

pub fn render(images: &[GeneratedImage], show_colors: bool) -> String {
    if images.is_empty() {
        return "No images yet. Use `generate` to create one.".to_string();
    }

    cards(images)
        .iter()
        .map(|card| card.render(show_colors))
        .collect::<Vec<_>>()
        .join("\n")
}
