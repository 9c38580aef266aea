//! Read-through feed: cache first, live API on a miss.
//!
//! A failed or empty search and a missing channel are never written back:
//! either may mean "the call failed", and caching that would hide the
//! channel for a whole TTL.
//!
//! Both video lists come from the same search. When that search returns
//! uploads, both lists are written, even if one of them ends up empty.
//! A cached list is only served for the bound it was fetched with.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use crate::cache::{CacheKey, JsonCacheStore};
use crate::config::{Config, MAX_RESULTS_LIMIT};
use crate::sources::{ChannelRecord, VideoRecord, YouTubeAPIv3Client};

pub struct ChannelFeed {
    client: YouTubeAPIv3Client,
    cache: JsonCacheStore,
}

impl ChannelFeed {
    pub fn new(client: YouTubeAPIv3Client, cache: JsonCacheStore) -> Self {
        Self { client, cache }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = YouTubeAPIv3Client::from_config(config)?;
        let cache = JsonCacheStore::new(&config.cache_dir, config.cache_ttl);
        Ok(Self::new(client, cache))
    }

    pub fn client(&self) -> &YouTubeAPIv3Client {
        &self.client
    }

    pub fn cache(&self) -> &JsonCacheStore {
        &self.cache
    }

    /// Channel metadata; `refresh` skips the cached copy.
    pub async fn channel(&self, refresh: bool) -> Option<ChannelRecord> {
        if !refresh {
            if let Some(channel) = self.cache.read::<ChannelRecord>(CacheKey::Channel).await {
                return Some(channel);
            }
        }

        let channel = self.client.fetch_channel_info().await?;
        self.cache.write(CacheKey::Channel, &channel).await;
        Some(channel)
    }

    /// Long-form uploads, newest first, at most `max_results`.
    pub async fn long_form(&self, max_results: u32, refresh: bool) -> Vec<VideoRecord> {
        self.list(CacheKey::Videos, max_results, refresh).await
    }

    /// Reels among the latest `max_results` uploads, so possibly fewer.
    pub async fn short_form(&self, max_results: u32, refresh: bool) -> Vec<VideoRecord> {
        self.list(CacheKey::Reels, max_results, refresh).await
    }

    async fn list(&self, key: CacheKey, max_results: u32, refresh: bool) -> Vec<VideoRecord> {
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);

        if !refresh {
            if let Some(videos) = self.cached_list(key, max_results).await {
                return videos;
            }
        }

        let (long_form, reels) = self.refresh_lists(max_results).await;
        match key {
            CacheKey::Reels => reels,
            _ => long_form,
        }
    }

    /// Cached list fetched with exactly `max_results`.
    ///
    /// A larger cached window can't be cut down: the reels among the latest
    /// 10 uploads are not the reels among the latest 1.
    async fn cached_list(&self, key: CacheKey, max_results: u32) -> Option<Vec<VideoRecord>> {
        let entry = self
            .cache
            .read_entry_at::<Vec<VideoRecord>>(key, Utc::now())
            .await?;

        if entry.max_results == Some(max_results) {
            Some(entry.payload)
        } else {
            debug!(
                "Caché {} obtenida con otro límite ({:?} != {}), se ignora",
                key, entry.max_results, max_results
            );
            None
        }
    }

    async fn refresh_lists(&self, max_results: u32) -> (Vec<VideoRecord>, Vec<VideoRecord>) {
        let videos = self.client.fetch_videos(max_results).await;
        if videos.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let (reels, long_form): (Vec<_>, Vec<_>) = videos.into_iter().partition(|v| v.is_short());

        // La búsqueda funcionó: una lista vacía aquí sí es un cero confirmado
        self.cache.write_bounded(CacheKey::Videos, &long_form, max_results).await;
        self.cache.write_bounded(CacheKey::Reels, &reels, max_results).await;

        info!(
            "🔄 Feed actualizado: {} vídeos, {} reels",
            long_form.len(),
            reels.len()
        );

        (long_form, reels)
    }
}
