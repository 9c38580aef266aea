use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, warn};

use super::{CacheEntry, CacheKey, CachePayload};
use crate::error::CacheError;

/// Caché basada en archivos JSON, un archivo por clave.
///
/// Lecturas y escrituras nunca fallan hacia quien llama: los errores se
/// registran y cuentan como "no hay entrada".
#[derive(Debug, Clone)]
pub struct JsonCacheStore {
    dir: PathBuf,
    ttl: Duration,
}

impl JsonCacheStore {
    /// Subdirectorio propio dentro de `CACHE_DIR`
    pub const NAMESPACE: &'static str = "youtube";

    /// The namespace directory is created lazily on the first write.
    pub fn new(cache_root: impl AsRef<Path>, ttl: Duration) -> Self {
        Self {
            dir: cache_root.as_ref().join(Self::NAMESPACE),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn read<T: CachePayload>(&self, key: CacheKey) -> Option<T> {
        self.read_at(key, Utc::now()).await
    }

    pub async fn read_at<T: CachePayload>(&self, key: CacheKey, now: DateTime<Utc>) -> Option<T> {
        self.read_entry_at(key, now).await.map(|entry| entry.payload)
    }

    /// Fresh entry for `key` with its metadata, or `None`.
    pub async fn read_entry_at<T: DeserializeOwned>(
        &self,
        key: CacheKey,
        now: DateTime<Utc>,
    ) -> Option<CacheEntry<T>> {
        match self.load_entry::<T>(key).await {
            Ok(Some(entry)) if entry.is_fresh(now, self.ttl) => {
                debug!("💾 Cache hit: {}", key);
                Some(entry)
            }
            Ok(Some(entry)) => {
                debug!(
                    "⌛ Cache expirada: {} (capturada {})",
                    key,
                    entry.captured_at.to_rfc3339()
                );
                None
            }
            Ok(None) => {
                debug!("Cache miss: {}", key);
                None
            }
            Err(e) => {
                warn!("⚠️ Entrada de caché ilegible, se ignora: {}", e);
                None
            }
        }
    }

    pub async fn write<T: CachePayload>(&self, key: CacheKey, payload: &T) {
        self.write_at(key, payload, None, Utc::now()).await
    }

    /// Like [`write`](Self::write), recording the page bound used to fetch it.
    pub async fn write_bounded<T: CachePayload>(&self, key: CacheKey, payload: &T, max_results: u32) {
        self.write_at(key, payload, Some(max_results), Utc::now()).await
    }

    pub async fn write_at<T: CachePayload>(
        &self,
        key: CacheKey,
        payload: &T,
        max_results: Option<u32>,
        now: DateTime<Utc>,
    ) {
        let entry = CacheEntry {
            payload,
            captured_at: now,
            newest_item_date: payload.newest_item_date(),
            max_results,
        };

        match self.save_entry(key, &entry).await {
            Ok(()) => info!("💾 Caché actualizada: {}", key),
            Err(e) => warn!("⚠️ No se pudo escribir la caché {}: {}", key, e),
        }
    }

    /// Removes every entry in the namespace, returning how many files went.
    pub async fn clear(&self) -> Result<usize, CacheError> {
        let mut files = match fs::read_dir(&self.dir).await {
            Ok(files) => files,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut removed_count = 0;

        while let Some(entry) = files.next_entry().await.map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })? {
            let path = entry.path();
            let is_cache_file = path
                .extension()
                .is_some_and(|ext| ext == "json" || ext == "tmp");

            if !is_cache_file {
                continue;
            }

            fs::remove_file(&path)
                .await
                .map_err(|source| CacheError::Io {
                    path: path.clone(),
                    source,
                })?;
            removed_count += 1;
        }

        info!("🗑️ Caché limpiada: {} archivos eliminados", removed_count);
        Ok(removed_count)
    }

    /// Obtiene estadísticas de la caché
    pub async fn stats(&self) -> CacheStats {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> CacheStats {
        let mut keys = Vec::with_capacity(CacheKey::ALL.len());
        let mut total_size_bytes = 0;

        for key in CacheKey::ALL {
            let path = self.path_for(key);
            let size_bytes = match fs::metadata(&path).await {
                Ok(metadata) => metadata.len(),
                Err(_) => {
                    keys.push(KeyStatus::missing(key));
                    continue;
                }
            };
            total_size_bytes += size_bytes;

            let status = match self.load_entry::<serde_json::Value>(key).await {
                Ok(Some(entry)) => KeyStatus {
                    key,
                    present: true,
                    corrupt: false,
                    fresh: entry.is_fresh(now, self.ttl),
                    age: Some(entry.age(now)),
                    newest_item_date: entry.newest_item_date,
                    size_bytes,
                },
                _ => KeyStatus {
                    key,
                    present: true,
                    corrupt: true,
                    fresh: false,
                    age: None,
                    newest_item_date: None,
                    size_bytes,
                },
            };
            keys.push(status);
        }

        CacheStats {
            dir: self.dir.clone(),
            ttl: self.ttl,
            keys,
            total_size_bytes,
        }
    }

    // Métodos privados

    async fn load_entry<T: DeserializeOwned>(
        &self,
        key: CacheKey,
    ) -> Result<Option<CacheEntry<T>>, CacheError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let entry = serde_json::from_str(&content).map_err(|source| CacheError::Corrupt { path, source })?;
        Ok(Some(entry))
    }

    /// Escribe a un temporal y renombra: el reemplazo es atómico
    async fn save_entry<T: CachePayload>(
        &self,
        key: CacheKey,
        entry: &CacheEntry<&T>,
    ) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| CacheError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let content = serde_json::to_string_pretty(entry).map_err(CacheError::Encode)?;

        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", key.as_str()));

        fs::write(&tmp_path, content)
            .await
            .map_err(|source| CacheError::Io {
                path: tmp_path.clone(),
                source,
            })?;

        if let Err(source) = fs::rename(&tmp_path, &path).await {
            return Err(CacheError::Io { path, source });
        }

        Ok(())
    }

    fn path_for(&self, key: CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

/// Estado de una clave de la caché
#[derive(Debug, Clone, PartialEq)]
pub struct KeyStatus {
    pub key: CacheKey,
    pub present: bool,
    pub corrupt: bool,
    pub fresh: bool,
    pub age: Option<Duration>,
    pub newest_item_date: Option<DateTime<Utc>>,
    pub size_bytes: u64,
}

impl KeyStatus {
    fn missing(key: CacheKey) -> Self {
        Self {
            key,
            present: false,
            corrupt: false,
            fresh: false,
            age: None,
            newest_item_date: None,
            size_bytes: 0,
        }
    }
}

/// Estadísticas de la caché
#[derive(Debug)]
pub struct CacheStats {
    pub dir: PathBuf,
    pub ttl: Duration,
    pub keys: Vec<KeyStatus>,
    pub total_size_bytes: u64,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Cache Stats:")?;
        writeln!(f, "📁 Directory: {}", self.dir.display())?;
        writeln!(f, "⏳ TTL: {}", humantime::format_duration(self.ttl))?;

        for status in &self.keys {
            let state = match (status.present, status.corrupt, status.fresh) {
                (false, _, _) => "missing".to_string(),
                (true, true, _) => "corrupt".to_string(),
                (true, false, fresh) => format!(
                    "{}, age {}",
                    if fresh { "fresh" } else { "expired" },
                    humantime::format_duration(status.age.unwrap_or_default())
                ),
            };
            writeln!(f, "  • {:<8} {}", status.key.as_str(), state)?;
        }

        write!(
            f,
            "📦 Total Size: {} bytes ({:.2} KB)",
            self.total_size_bytes,
            self.total_size_bytes as f64 / 1024.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::fixtures::parts;
    use crate::sources::{ChannelRecord, ChannelStatistics, Thumbnails, VideoRecord};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 3600);

    fn store(dir: &TempDir) -> JsonCacheStore {
        JsonCacheStore::new(dir.path(), WEEK)
    }

    fn videos() -> Vec<VideoRecord> {
        vec![VideoRecord::new(parts("a")), VideoRecord::new(parts("b"))]
    }

    fn channel() -> ChannelRecord {
        ChannelRecord {
            id: "UC123".to_string(),
            title: "The Podcast".to_string(),
            description: "Weekly".to_string(),
            handle: Some("@thepodcast".to_string()),
            thumbnails: Thumbnails::default(),
            statistics: ChannelStatistics {
                view_count: Some("100".to_string()),
                subscriber_count: None,
                video_count: Some("3".to_string()),
            },
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_within_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache.write_at(CacheKey::Videos, &videos(), Some(12), t0()).await;
        cache.write_at(CacheKey::Channel, &channel(), None, t0()).await;

        let later = t0() + chrono::Duration::days(6);
        assert_eq!(cache.read_at::<Vec<VideoRecord>>(CacheKey::Videos, later).await, Some(videos()));
        assert_eq!(cache.read_at::<ChannelRecord>(CacheKey::Channel, later).await, Some(channel()));

        let entry = cache
            .read_entry_at::<Vec<VideoRecord>>(CacheKey::Videos, later)
            .await
            .unwrap();
        assert_eq!(entry.captured_at, t0());
        assert_eq!(entry.max_results, Some(12));
        assert_eq!(entry.newest_item_date, Some(parts("a").published_at));
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache.write_at(CacheKey::Reels, &videos(), None, t0()).await;

        let expired = t0() + chrono::Duration::days(7);
        assert_eq!(cache.read_at::<Vec<VideoRecord>>(CacheKey::Reels, expired).await, None);
        assert_eq!(cache.read_at::<Vec<VideoRecord>>(CacheKey::Videos, expired).await, None);
    }

    #[tokio::test]
    async fn test_write_replaces_whole_entry() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache.write_at(CacheKey::Videos, &videos(), Some(20), t0()).await;
        let newer = vec![VideoRecord::new(parts("c"))];
        let t1 = t0() + chrono::Duration::hours(1);
        cache.write_at(CacheKey::Videos, &newer, None, t1).await;

        let entry = cache
            .read_entry_at::<Vec<VideoRecord>>(CacheKey::Videos, t1)
            .await
            .unwrap();
        assert_eq!(entry.payload, newer);
        assert_eq!(entry.captured_at, t1);
        assert_eq!(entry.max_results, None);
        assert!(!cache.dir().join("videos.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_clear_removes_every_key() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache.write(CacheKey::Videos, &videos()).await;
        cache.write(CacheKey::Reels, &videos()).await;
        cache.write(CacheKey::Channel, &channel()).await;

        assert_eq!(cache.clear().await.unwrap(), 3);

        assert_eq!(cache.read::<Vec<VideoRecord>>(CacheKey::Videos).await, None);
        assert_eq!(cache.read::<Vec<VideoRecord>>(CacheKey::Reels).await, None);
        assert_eq!(cache.read::<ChannelRecord>(CacheKey::Channel).await, None);
    }

    #[tokio::test]
    async fn test_clear_without_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).clear().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        std::fs::create_dir_all(cache.dir()).unwrap();
        std::fs::write(cache.dir().join("channel.json"), "{not json").unwrap();

        assert_eq!(cache.read::<ChannelRecord>(CacheKey::Channel).await, None);

        // un payload con otra forma también es un miss
        cache.write(CacheKey::Videos, &videos()).await;
        assert_eq!(cache.read::<ChannelRecord>(CacheKey::Videos).await, None);
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        // la raíz de la caché es un archivo: create_dir_all falla
        let cache = JsonCacheStore::new(&blocker, WEEK);
        cache.write(CacheKey::Videos, &videos()).await;

        assert_eq!(cache.read::<Vec<VideoRecord>>(CacheKey::Videos).await, None);
    }

    #[tokio::test]
    async fn test_stats_reports_each_key() {
        let dir = TempDir::new().unwrap();
        let cache = store(&dir);

        cache.write_at(CacheKey::Videos, &videos(), None, t0()).await;
        cache.write_at(CacheKey::Channel, &channel(), None, t0() - chrono::Duration::days(8)).await;
        std::fs::write(cache.dir().join("reels.json"), "garbage").unwrap();

        let stats = cache.stats_at(t0() + chrono::Duration::hours(2)).await;

        let videos = &stats.keys[1];
        assert_eq!(videos.key, CacheKey::Videos);
        assert!(videos.present && videos.fresh && !videos.corrupt);
        assert_eq!(videos.age, Some(Duration::from_secs(2 * 3600)));

        let channel = &stats.keys[0];
        assert!(channel.present && !channel.fresh);

        let reels = &stats.keys[2];
        assert!(reels.corrupt);

        assert!(stats.total_size_bytes > 0);
        assert!(stats.to_string().contains("corrupt"));
    }
}
