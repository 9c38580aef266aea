//! # Cache Module
//!
//! File-backed cache for YouTube API results.
//!
//! Each logical key is stored as one JSON file under `<cache_dir>/youtube/`.
//! Entries carry their capture time and are only served while younger than
//! the TTL (7 days by default); an expired entry reads exactly like a missing
//! one.
//!
//! ## Keys
//!
//! There are exactly three:
//!
//! - [`CacheKey::Channel`]: channel metadata
//! - [`CacheKey::Videos`]: long-form uploads
//! - [`CacheKey::Reels`]: short-form uploads
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use channel_reels::cache::{CacheKey, JsonCacheStore};
//! use channel_reels::sources::VideoRecord;
//! use std::time::Duration;
//!
//! # async fn example(videos: Vec<VideoRecord>) {
//! let cache = JsonCacheStore::new("./cache", Duration::from_secs(7 * 24 * 3600));
//!
//! cache.write(CacheKey::Videos, &videos).await;
//!
//! if let Some(cached) = cache.read::<Vec<VideoRecord>>(CacheKey::Videos).await {
//!     println!("{} cached videos", cached.len());
//! }
//! # }
//! ```

pub mod json_store;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::sources::{ChannelRecord, VideoRecord};

pub use json_store::{CacheStats, JsonCacheStore, KeyStatus};

/// Logical cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Channel,
    Videos,
    Reels,
}

impl CacheKey {
    pub const ALL: [CacheKey; 3] = [CacheKey::Channel, CacheKey::Videos, CacheKey::Reels];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Channel => "channel",
            CacheKey::Videos => "videos",
            CacheKey::Reels => "reels",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot persisted for one key.
///
/// `newest_item_date` is informational only. `max_results` records the page
/// bound the payload was fetched with, `None` when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub captured_at: DateTime<Utc>,
    pub newest_item_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl<T> CacheEntry<T> {
    /// Valid while `now - captured_at < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.captured_at).to_std() {
            Ok(age) => age < ttl,
            // capturada "en el futuro" (reloj ajustado): se considera fresca
            Err(_) => true,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.captured_at).to_std().unwrap_or_default()
    }
}

/// Anything that can be stored under a [`CacheKey`].
pub trait CachePayload: Serialize + DeserializeOwned {
    /// Publish date of the newest item, if the payload has one.
    fn newest_item_date(&self) -> Option<DateTime<Utc>>;
}

impl CachePayload for Vec<VideoRecord> {
    fn newest_item_date(&self) -> Option<DateTime<Utc>> {
        self.iter().map(|video| video.published_at()).max()
    }
}

impl CachePayload for ChannelRecord {
    fn newest_item_date(&self) -> Option<DateTime<Utc>> {
        None
    }
}
