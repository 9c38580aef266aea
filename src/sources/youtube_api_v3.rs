use anyhow::Result;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::transport::{ApiTransport, ReqwestTransport};
use super::wire::{ChannelItem, ListResponse, SearchItem, VideoItem};
use super::{ChannelRecord, VideoRecord};
use crate::config::{Config, YouTubeCredentials, MAX_RESULTS_LIMIT};
use crate::error::FetchError;

/// Cliente de la YouTube Data API v3 para el canal configurado.
///
/// Las operaciones públicas nunca fallan: cualquier error (credenciales
/// ausentes, red, HTTP, JSON) se registra y se devuelve `None` o una lista
/// vacía. Quien llama debe leer "vacío" como "no disponible".
pub struct YouTubeAPIv3Client {
    credentials: Option<YouTubeCredentials>,
    transport: Arc<dyn ApiTransport>,
}

impl YouTubeAPIv3Client {
    pub fn new(credentials: Option<YouTubeCredentials>, transport: Arc<dyn ApiTransport>) -> Self {
        if credentials.is_none() {
            warn!("⚠️ YOUTUBE_API_KEY o YOUTUBE_CHANNEL_ID no configurados, YouTube deshabilitado");
        }

        Self {
            credentials,
            transport,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.api_base()?, config.http_timeout)?;
        Ok(Self::new(config.credentials(), Arc::new(transport)))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Metadata and statistics of the configured channel.
    pub async fn fetch_channel_info(&self) -> Option<ChannelRecord> {
        match self.try_fetch_channel_info().await {
            Ok(Some(channel)) => {
                info!("✅ Canal obtenido: {}", channel.title);
                Some(channel)
            }
            Ok(None) => {
                warn!("⚠️ La API no devolvió el canal configurado");
                None
            }
            Err(e) => {
                log_fetch_error("channel info", &e);
                None
            }
        }
    }

    /// Latest uploads of the channel, newest first, each one classified.
    ///
    /// `max_results` bounds the search page (clamped to `1..=50`); ids the
    /// detail lookup does not return are dropped.
    pub async fn fetch_videos(&self, max_results: u32) -> Vec<VideoRecord> {
        match self.try_fetch_videos(max_results).await {
            Ok(videos) => {
                info!(
                    "✅ YouTube API v3: {} vídeos ({} reels)",
                    videos.len(),
                    videos.iter().filter(|v| v.is_short()).count()
                );
                videos
            }
            Err(e) => {
                log_fetch_error("videos", &e);
                Vec::new()
            }
        }
    }

    pub async fn fetch_short_form(&self, max_results: u32) -> Vec<VideoRecord> {
        self.fetch_videos(max_results)
            .await
            .into_iter()
            .filter(|video| video.is_short())
            .collect()
    }

    pub async fn fetch_long_form(&self, max_results: u32) -> Vec<VideoRecord> {
        self.fetch_videos(max_results)
            .await
            .into_iter()
            .filter(|video| !video.is_short())
            .collect()
    }

    async fn try_fetch_channel_info(&self) -> Result<Option<ChannelRecord>, FetchError> {
        let credentials = self.credentials()?;

        let response: ListResponse<ChannelItem> = self
            .get_json(
                "channels",
                credentials,
                vec![
                    ("part", "snippet,statistics".to_string()),
                    ("id", credentials.channel_id().to_string()),
                ],
            )
            .await?;

        Ok(response.items.into_iter().next().map(ChannelItem::into_record))
    }

    async fn try_fetch_videos(&self, max_results: u32) -> Result<Vec<VideoRecord>, FetchError> {
        let credentials = self.credentials()?;
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);

        debug!("🔍 Búsqueda de vídeos del canal {}: {}", credentials.channel_id(), max_results);

        let search: ListResponse<SearchItem> = self
            .get_json(
                "search",
                credentials,
                vec![
                    ("part", "snippet".to_string()),
                    ("channelId", credentials.channel_id().to_string()),
                    ("order", "date".to_string()),
                    ("type", "video".to_string()),
                    ("maxResults", max_results.to_string()),
                ],
            )
            .await?;

        // Sin duplicados y en el orden de la búsqueda
        let mut seen = HashSet::new();
        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .filter(|id| seen.insert(id.clone()))
            .collect();

        if ids.is_empty() {
            debug!("La búsqueda no devolvió vídeos");
            return Ok(Vec::new());
        }

        let details: ListResponse<VideoItem> = self
            .get_json(
                "videos",
                credentials,
                vec![
                    ("part", "snippet,contentDetails,statistics".to_string()),
                    ("id", ids.join(",")),
                ],
            )
            .await?;

        let mut by_id: std::collections::HashMap<String, VideoItem> = details
            .items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        let videos: Vec<VideoRecord> = ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(VideoItem::into_record)
            .collect();

        if videos.len() < ids.len() {
            debug!("{} vídeos sin detalles (privados o eliminados)", ids.len() - videos.len());
        }

        Ok(videos)
    }

    fn credentials(&self) -> Result<&YouTubeCredentials, FetchError> {
        self.credentials.as_ref().ok_or(FetchError::MissingCredentials)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        credentials: &YouTubeCredentials,
        params: Vec<(&str, String)>,
    ) -> Result<T, FetchError> {
        let mut query: Vec<(String, String)> = params
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        query.push(("key".to_string(), credentials.api_key().as_str().to_string()));

        let body = self.transport.get(resource, query).await?;

        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            resource: resource.to_string(),
            source,
        })
    }
}

fn log_fetch_error(operation: &str, e: &FetchError) {
    match e {
        FetchError::MissingCredentials => warn!("⚠️ YouTube {} no disponible: {}", operation, e),
        _ => error!("❌ YouTube {} falló: {}", operation, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::transport::MockApiTransport;
    use mockall::predicate::eq;

    const SEARCH_BODY: &str = r#"{"items": [
        {"id": {"kind": "youtube#video", "videoId": "ep1"}},
        {"id": {"kind": "youtube#video", "videoId": "reel1"}},
        {"id": {"kind": "youtube#video", "videoId": "ep1"}},
        {"id": {"kind": "youtube#video", "videoId": "gone"}}
    ]}"#;

    const VIDEOS_BODY: &str = r#"{"items": [
        {
            "id": "reel1",
            "snippet": {
                "publishedAt": "2024-05-02T09:00:00Z",
                "title": "Best moment",
                "description": "A clip from the show",
                "channelTitle": "The Podcast",
                "thumbnails": {"standard": {"url": "https://i.ytimg.com/vi/reel1/sd.jpg", "width": 360, "height": 640}},
                "tags": ["podcast"]
            },
            "contentDetails": {"duration": "PT2M"}
        },
        {
            "id": "ep1",
            "snippet": {
                "publishedAt": "2024-05-03T09:00:00Z",
                "title": "Episode 1",
                "description": "Full episode. Full episode. Full episode. Full episode. Full episode. Full episode. Full episode. Full episode.",
                "channelTitle": "The Podcast",
                "thumbnails": {"standard": {"url": "https://i.ytimg.com/vi/ep1/sd.jpg", "width": 640, "height": 480}},
                "tags": ["podcast", "interview"]
            },
            "contentDetails": {"duration": "PT1H2M3S"},
            "statistics": {"viewCount": "1000"}
        }
    ]}"#;

    const CHANNEL_BODY: &str = r#"{"items": [{
        "id": "UC123",
        "snippet": {"title": "The Podcast", "description": "", "customUrl": "@thepodcast"},
        "statistics": {"viewCount": "10", "subscriberCount": "2", "videoCount": "3"}
    }]}"#;

    fn credentials() -> Option<YouTubeCredentials> {
        YouTubeCredentials::from_parts(Some("test-key".into()), Some("UC123".into()))
    }

    fn client(transport: MockApiTransport) -> YouTubeAPIv3Client {
        YouTubeAPIv3Client::new(credentials(), Arc::new(transport))
    }

    fn has_param(query: &[(String, String)], name: &str, value: &str) -> bool {
        query.iter().any(|(k, v)| k == name && v == value)
    }

    #[tokio::test]
    async fn test_unconfigured_client_makes_no_calls() {
        let mut transport = MockApiTransport::new();
        transport.expect_get().times(0);

        let client = YouTubeAPIv3Client::new(None, Arc::new(transport));

        assert!(!client.is_configured());
        assert!(client.fetch_channel_info().await.is_none());
        assert!(client.fetch_videos(10).await.is_empty());
        assert!(client.fetch_short_form(10).await.is_empty());
        assert!(client.fetch_long_form(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_search_skips_detail_call() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_get()
            .with(eq("search"), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(r#"{"items": []}"#.to_string()));
        transport.expect_get().with(eq("videos"), mockall::predicate::always()).times(0);

        assert!(client(transport).fetch_videos(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_videos_classifies_in_search_order() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_get()
            .withf(|resource, query| {
                resource == "search"
                    && has_param(query, "channelId", "UC123")
                    && has_param(query, "order", "date")
                    && has_param(query, "type", "video")
                    && has_param(query, "maxResults", "4")
                    && has_param(query, "key", "test-key")
            })
            .times(1)
            .returning(|_, _| Ok(SEARCH_BODY.to_string()));
        transport
            .expect_get()
            .withf(|resource, query| resource == "videos" && has_param(query, "id", "ep1,reel1,gone"))
            .times(1)
            .returning(|_, _| Ok(VIDEOS_BODY.to_string()));

        let videos = client(transport).fetch_videos(4).await;

        let ids: Vec<&str> = videos.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["ep1", "reel1"]);
        assert!(!videos[0].is_short());
        assert_eq!(videos[0].duration(), Some("1:02:03"));
        assert!(videos[1].is_short());
    }

    #[tokio::test]
    async fn test_short_and_long_form_filters() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_get()
            .withf(|resource, _| resource == "search")
            .times(2)
            .returning(|_, _| Ok(SEARCH_BODY.to_string()));
        transport
            .expect_get()
            .withf(|resource, _| resource == "videos")
            .times(2)
            .returning(|_, _| Ok(VIDEOS_BODY.to_string()));

        let client = client(transport);
        let reels = client.fetch_short_form(10).await;
        let long = client.fetch_long_form(10).await;

        assert_eq!(reels.len(), 1);
        assert_eq!(reels[0].id(), "reel1");
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].id(), "ep1");
    }

    #[tokio::test]
    async fn test_max_results_is_clamped() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_get()
            .withf(|resource, query| resource == "search" && has_param(query, "maxResults", "50"))
            .times(1)
            .returning(|_, _| Ok(r#"{"items": []}"#.to_string()));

        assert!(client(transport).fetch_videos(500).await.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_degrades_to_empty() {
        let mut transport = MockApiTransport::new();
        transport.expect_get().times(1).returning(|resource, _| {
            Err(FetchError::Status {
                resource: resource.to_string(),
                status: 403,
                body: "quotaExceeded".to_string(),
            })
        });

        assert!(client(transport).fetch_videos(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_detail_body_degrades_to_empty() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_get()
            .withf(|resource, _| resource == "search")
            .returning(|_, _| Ok(SEARCH_BODY.to_string()));
        transport
            .expect_get()
            .withf(|resource, _| resource == "videos")
            .returning(|_, _| Ok("<html>oops</html>".to_string()));

        assert!(client(transport).fetch_videos(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_channel_info() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_get()
            .withf(|resource, query| {
                resource == "channels"
                    && has_param(query, "id", "UC123")
                    && has_param(query, "part", "snippet,statistics")
            })
            .times(1)
            .returning(|_, _| Ok(CHANNEL_BODY.to_string()));

        let channel = client(transport).fetch_channel_info().await.unwrap();
        assert_eq!(channel.id, "UC123");
        assert_eq!(channel.handle.as_deref(), Some("@thepodcast"));
        assert_eq!(channel.statistics.subscriber_count.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_channel_not_found_is_absent() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _| Ok(r#"{"kind": "youtube#channelListResponse", "items": []}"#.to_string()));

        assert!(client(transport).fetch_channel_info().await.is_none());
    }
}
