//! Heurística reel / vídeo largo.
//!
//! A video counts as short-form when any one of these holds:
//!
//! - its `standard` thumbnail is taller than wide,
//! - a tag mentions `reel` or `short` (case-insensitive),
//! - the description is under [`BRIEF_DESCRIPTION_CHARS`] characters and the
//!   duration is under [`BRIEF_DURATION_SECS`] seconds.

use super::Thumbnails;

pub const BRIEF_DESCRIPTION_CHARS: usize = 100;
pub const BRIEF_DURATION_SECS: u64 = 60;

const SHORT_TAG_MARKERS: [&str; 2] = ["reel", "short"];

pub fn is_short_form(
    thumbnails: &Thumbnails,
    tags: &[String],
    description: &str,
    duration_seconds: Option<u64>,
) -> bool {
    has_vertical_thumbnail(thumbnails)
        || has_short_tag(tags)
        || is_brief(description, duration_seconds)
}

/// Solo cuenta la variante `standard`
pub fn has_vertical_thumbnail(thumbnails: &Thumbnails) -> bool {
    thumbnails
        .standard
        .as_ref()
        .is_some_and(|thumb| thumb.is_vertical())
}

pub fn has_short_tag(tags: &[String]) -> bool {
    tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        SHORT_TAG_MARKERS.iter().any(|marker| tag.contains(marker))
    })
}

/// Sin duración conocida esta señal no aplica
pub fn is_brief(description: &str, duration_seconds: Option<u64>) -> bool {
    match duration_seconds {
        Some(seconds) => {
            description.chars().count() < BRIEF_DESCRIPTION_CHARS && seconds < BRIEF_DURATION_SECS
        }
        None => false,
    }
}
