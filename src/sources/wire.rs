//! Formas JSON de la YouTube Data API v3.
//!
//! Solo se declaran los campos que usamos; el resto se ignora. La conversión a
//! [`VideoRecord`] / [`ChannelRecord`] vive aquí para que el formato de la API
//! no se filtre al modelo del dominio.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::duration::parse_duration;
use super::{
    normalize_handle, ChannelRecord, ChannelStatistics, Thumbnails, VideoParts, VideoRecord,
    VideoStatistics,
};

#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

// search?part=snippet

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub video_id: Option<String>,
}

// videos?part=snippet,contentDetails,statistics

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    pub content_details: Option<ContentDetails>,
    pub statistics: Option<WireVideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub channel_title: String,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ContentDetails {
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

// channels?part=snippet,statistics

#[derive(Debug, Deserialize)]
pub struct ChannelItem {
    pub id: String,
    pub snippet: ChannelSnippet,
    pub statistics: Option<WireChannelStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub custom_url: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireChannelStatistics {
    pub view_count: Option<String>,
    pub subscriber_count: Option<String>,
    pub video_count: Option<String>,
}

impl VideoItem {
    pub fn into_record(self) -> VideoRecord {
        let duration_seconds = self
            .content_details
            .and_then(|details| details.duration)
            .and_then(|token| match parse_duration(&token) {
                Ok(seconds) => Some(seconds),
                Err(e) => {
                    debug!("Duración ignorada para {}: {}", self.id, e);
                    None
                }
            });

        VideoRecord::new(VideoParts {
            id: self.id,
            title: self.snippet.title,
            description: self.snippet.description,
            published_at: self.snippet.published_at,
            thumbnails: self.snippet.thumbnails,
            channel_title: self.snippet.channel_title,
            tags: self.snippet.tags,
            duration_seconds,
            statistics: self.statistics.map(|stats| VideoStatistics {
                view_count: stats.view_count,
                like_count: stats.like_count,
                comment_count: stats.comment_count,
            }),
        })
    }
}

impl ChannelItem {
    pub fn into_record(self) -> ChannelRecord {
        let statistics = self
            .statistics
            .map(|stats| ChannelStatistics {
                view_count: stats.view_count,
                subscriber_count: stats.subscriber_count,
                video_count: stats.video_count,
            })
            .unwrap_or_default();

        ChannelRecord {
            id: self.id,
            title: self.snippet.title,
            description: self.snippet.description,
            handle: self.snippet.custom_url.as_deref().and_then(normalize_handle),
            thumbnails: self.snippet.thumbnails,
            statistics,
        }
    }
}
