pub mod classify;
pub mod duration;
pub mod transport;
pub mod wire;
pub mod youtube_api_v3;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use transport::{ApiTransport, ReqwestTransport};
pub use youtube_api_v3::YouTubeAPIv3Client;

/// Una variante de miniatura tal como la entrega la API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl Thumbnail {
    /// Taller than wide. Square and landscape thumbnails are not vertical.
    pub fn is_vertical(&self) -> bool {
        self.height > self.width
    }

    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Named thumbnail variants of a video or channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// Largest available variant, falling back by name order when sizes are missing.
    pub fn best(&self) -> Option<&Thumbnail> {
        // max_by_key se queda con el último empate: orden de menor a mayor
        [
            &self.default,
            &self.medium,
            &self.high,
            &self.standard,
            &self.maxres,
        ]
        .into_iter()
        .flatten()
        .max_by_key(|thumb| thumb.area())
    }
}

/// Contadores de interacción, como cadenas decimales sin parsear
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStatistics {
    pub view_count: Option<String>,
    pub subscriber_count: Option<String>,
    pub video_count: Option<String>,
}

/// Inputs needed to build a [`VideoRecord`].
///
/// The short-form flag is not part of this: [`VideoRecord::new`] derives it
/// from these fields, so two identical parts always give the same record.
/// Cached records are read back through here too.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoParts {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub thumbnails: Thumbnails,
    pub channel_title: String,
    pub tags: Option<Vec<String>>,
    pub duration_seconds: Option<u64>,
    pub statistics: Option<VideoStatistics>,
}

/// Metadata of one uploaded video, classified as reel or long-form.
///
/// Fields are read-only; a new fetch builds new records instead of mutating
/// the old ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VideoParts")]
pub struct VideoRecord {
    id: String,
    title: String,
    description: String,
    published_at: DateTime<Utc>,
    thumbnails: Thumbnails,
    channel_title: String,
    tags: Option<Vec<String>>,
    duration_seconds: Option<u64>,
    duration: Option<String>,
    statistics: Option<VideoStatistics>,
    is_short: bool,
}

impl VideoRecord {
    pub fn new(parts: VideoParts) -> Self {
        let is_short = classify::is_short_form(
            &parts.thumbnails,
            parts.tags.as_deref().unwrap_or_default(),
            &parts.description,
            parts.duration_seconds,
        );

        Self {
            duration: parts.duration_seconds.map(duration::format_duration),
            id: parts.id,
            title: parts.title,
            description: parts.description,
            published_at: parts.published_at,
            thumbnails: parts.thumbnails,
            channel_title: parts.channel_title,
            tags: parts.tags,
            duration_seconds: parts.duration_seconds,
            statistics: parts.statistics,
            is_short,
        }
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
    pub fn thumbnails(&self) -> &Thumbnails {
        &self.thumbnails
    }
    pub fn channel_title(&self) -> &str {
        &self.channel_title
    }
    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }
    pub fn duration_seconds(&self) -> Option<u64> {
        self.duration_seconds
    }
    /// Display form, `H:MM:SS` or `M:SS`.
    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }
    pub fn statistics(&self) -> Option<&VideoStatistics> {
        self.statistics.as_ref()
    }
    pub fn is_short(&self) -> bool {
        self.is_short
    }

    pub fn best_thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnails.best()
    }

    /// Public link; reels open in the shorts player.
    pub fn watch_url(&self) -> String {
        if self.is_short {
            format!("https://www.youtube.com/shorts/{}", self.id)
        } else {
            format!("https://www.youtube.com/watch?v={}", self.id)
        }
    }
}

impl From<VideoParts> for VideoRecord {
    fn from(parts: VideoParts) -> Self {
        Self::new(parts)
    }
}

/// Channel-level metadata for the configured channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Always `@`-prefixed when present
    pub handle: Option<String>,
    pub thumbnails: Thumbnails,
    pub statistics: ChannelStatistics,
}

impl ChannelRecord {
    pub fn url(&self) -> String {
        match &self.handle {
            Some(handle) => format!("https://www.youtube.com/{}", handle),
            None => format!("https://www.youtube.com/channel/{}", self.id),
        }
    }
}

/// Normaliza el `customUrl` de la API a la forma `@handle`
pub fn normalize_handle(custom_url: &str) -> Option<String> {
    let trimmed = custom_url.trim().trim_start_matches('@');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("@{}", trimmed))
    }
}
