//! File-backed semantic cache store
//!
//! Entries are persisted as a JSON array in a single file that is rewritten
//! in full on every mutation. An async mutex serializes each
//! read-modify-write sequence, and a modification-time check before every
//! search or mutation picks up writes made by other processes.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::embedding::cosine_similarity;
use crate::domain::semantic_cache::{
    CacheEntry, CacheStats, SemanticCache, SemanticCacheConfig, SimilarityMatch,
};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<CacheEntry>,
    last_modified: Option<SystemTime>,
}

/// File-backed semantic cache
#[derive(Debug)]
pub struct FileSemanticCache {
    path: PathBuf,
    similarity_threshold: f32,
    max_entries: usize,
    state: Mutex<StoreState>,
}

impl FileSemanticCache {
    /// Open the store, loading any existing entries.
    ///
    /// A missing or malformed file yields an empty store; opening never
    /// fails on cache contents.
    pub async fn open(config: SemanticCacheConfig) -> Self {
        let state = load_state(&config.store_path).await;

        debug!(
            "Semantic cache opened with {} entries from {}",
            state.entries.len(),
            config.store_path.display()
        );

        Self {
            path: config.store_path,
            similarity_threshold: config.similarity_threshold,
            max_entries: config.max_entries,
            state: Mutex::new(state),
        }
    }

    /// Re-read the file when another writer changed it since our last load
    /// or persist.
    async fn refresh_if_stale(&self, state: &mut StoreState) {
        let modified = file_modified(&self.path).await;

        if modified != state.last_modified {
            debug!("Cache file changed on disk, reloading {}", self.path.display());
            *state = load_state(&self.path).await;
        }
    }

    /// Rewrite the whole file. On failure the in-memory entries stand and
    /// only durability is lost, so errors are logged rather than returned.
    async fn persist(&self, state: &mut StoreState) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent).await {
                    warn!(
                        "Failed to create cache directory {}: {}",
                        parent.display(),
                        e
                    );
                }
            }
        }

        match serde_json::to_vec(&state.entries) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json).await {
                    warn!(
                        "Failed to write cache file {}, entries kept in memory: {}",
                        self.path.display(),
                        e
                    );
                }
            }
            Err(e) => warn!("Failed to serialize cache entries: {}", e),
        }

        // Record the file time of our own write attempt so the staleness
        // check does not mistake it for an external change
        state.last_modified = file_modified(&self.path).await;
    }
}

async fn load_state(path: &Path) -> StoreState {
    let last_modified = file_modified(path).await;

    let entries = match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Cache file {} is malformed, starting empty: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            warn!(
                "Failed to read cache file {}, starting empty: {}",
                path.display(),
                e
            );
            Vec::new()
        }
    };

    StoreState {
        entries,
        last_modified,
    }
}

async fn file_modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).await.ok().and_then(|m| m.modified().ok())
}

/// Drop the oldest entries until the store fits its capacity. Usually one
/// entry, but a staleness re-read can pull in a file already holding more
/// than `max_entries` (another process with a larger configured size). The
/// stable sort keeps insertion order among equal timestamps, so the
/// earliest-inserted of a tie goes first.
fn evict_to_capacity(entries: &mut Vec<CacheEntry>, max_entries: usize) {
    if entries.len() <= max_entries {
        return;
    }

    entries.sort_by_key(|entry| entry.timestamp());

    let excess = entries.len() - max_entries;
    for evicted in entries.drain(..excess) {
        debug!("Evicted oldest cache entry: {}", evicted.question());
    }
}

#[async_trait]
impl SemanticCache for FileSemanticCache {
    async fn find_similar(
        &self,
        embedding: &[f32],
    ) -> Result<Option<SimilarityMatch>, DomainError> {
        let mut state = self.state.lock().await;
        self.refresh_if_stale(&mut state).await;

        let mut best: Option<(&CacheEntry, f32)> = None;

        for entry in &state.entries {
            let similarity = cosine_similarity(embedding, entry.embedding());

            // Strictly greater, so ties keep the earliest stored entry
            if best.map_or(true, |(_, s)| similarity > s) {
                best = Some((entry, similarity));
            }
        }

        Ok(best
            .filter(|(_, similarity)| *similarity >= self.similarity_threshold)
            .map(|(entry, similarity)| {
                SimilarityMatch::new(entry.question(), entry.sql(), similarity)
            }))
    }

    async fn append(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        self.refresh_if_stale(&mut state).await;

        state.entries.push(entry);
        evict_to_capacity(&mut state.entries, self.max_entries);

        self.persist(&mut state).await;

        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats, DomainError> {
        let state = self.state.lock().await;

        Ok(CacheStats {
            entry_count: state.entries.len(),
            storage_location: self.path.display().to_string(),
            max_entries: self.max_entries,
            similarity_threshold: self.similarity_threshold,
        })
    }

    async fn clear(&self) -> Result<usize, DomainError> {
        let mut state = self.state.lock().await;
        self.refresh_if_stale(&mut state).await;

        let removed = state.entries.len();
        state.entries.clear();
        self.persist(&mut state).await;

        info!("Semantic cache cleared, {} entries removed", removed);

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_at(dir: &TempDir, threshold: f32, max_entries: usize) -> SemanticCacheConfig {
        SemanticCacheConfig::new()
            .with_similarity_threshold(threshold)
            .with_max_entries(max_entries)
            .with_store_path(dir.path().join("cache.json"))
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSemanticCache::open(config_at(&dir, 0.9, 10)).await;

        let stats = store.stats().await.unwrap();

        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.max_entries, 10);
    }

    #[tokio::test]
    async fn test_append_then_find_exact_match() {
        let dir = TempDir::new().unwrap();
        let store = FileSemanticCache::open(config_at(&dir, 0.9, 10)).await;

        store
            .append(CacheEntry::new(
                "how many users signed up",
                vec![1.0, 0.0, 0.0],
                "SELECT COUNT(*) FROM users",
            ))
            .await
            .unwrap();

        let found = store.find_similar(&[1.0, 0.0, 0.0]).await.unwrap().unwrap();

        assert_eq!(found.sql, "SELECT COUNT(*) FROM users");
        assert_eq!(found.question, "how many users signed up");
        assert!((found.similarity - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_find_below_threshold_is_miss() {
        let dir = TempDir::new().unwrap();
        let store = FileSemanticCache::open(config_at(&dir, 0.9, 10)).await;

        store
            .append(CacheEntry::new("q", vec![1.0, 0.0, 0.0], "SELECT 1"))
            .await
            .unwrap();

        let found = store.find_similar(&[0.0, 1.0, 0.0]).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_threshold_boundary_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let store = FileSemanticCache::open(config_at(&dir, 1.0, 10)).await;

        store
            .append(CacheEntry::new("q", vec![1.0, 0.0], "SELECT 1"))
            .await
            .unwrap();

        let found = store.find_similar(&[1.0, 0.0]).await.unwrap();

        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_find_on_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FileSemanticCache::open(config_at(&dir, 0.9, 10)).await;

        let found = store.find_similar(&[1.0, 0.0, 0.0]).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_first_stored_entry_wins_ties() {
        let dir = TempDir::new().unwrap();
        let store = FileSemanticCache::open(config_at(&dir, 0.9, 10)).await;

        store
            .append(CacheEntry::new("first", vec![1.0, 0.0], "SELECT 'first'"))
            .await
            .unwrap();
        store
            .append(CacheEntry::new("second", vec![1.0, 0.0], "SELECT 'second'"))
            .await
            .unwrap();

        let found = store.find_similar(&[1.0, 0.0]).await.unwrap().unwrap();

        assert_eq!(found.sql, "SELECT 'first'");
    }

    #[tokio::test]
    async fn test_duplicate_questions_are_kept() {
        let dir = TempDir::new().unwrap();
        let store = FileSemanticCache::open(config_at(&dir, 0.9, 10)).await;

        store
            .append(CacheEntry::new("same", vec![1.0, 0.0], "SELECT 1"))
            .await
            .unwrap();
        store
            .append(CacheEntry::new("same", vec![1.0, 0.0], "SELECT 2"))
            .await
            .unwrap();

        assert_eq!(store.stats().await.unwrap().entry_count, 2);
    }

    #[tokio::test]
    async fn test_eviction_drops_oldest_by_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = FileSemanticCache::open(config_at(&dir, 0.9, 3)).await;

        let basis = |i: usize| {
            let mut v = vec![0.0; 5];
            v[i] = 1.0;
            v
        };

        for i in 0..5 {
            store
                .append(
                    CacheEntry::new(format!("q{}", i), basis(i), format!("SELECT {}", i))
                        .with_timestamp(i as i64 + 1),
                )
                .await
                .unwrap();
        }

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.entry_count, 3);

        // The two earliest timestamps were evicted
        assert!(store.find_similar(&basis(0)).await.unwrap().is_none());
        assert!(store.find_similar(&basis(1)).await.unwrap().is_none());
        assert!(store.find_similar(&basis(2)).await.unwrap().is_some());
        assert!(store.find_similar(&basis(3)).await.unwrap().is_some());
        assert!(store.find_similar(&basis(4)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_append_trims_overfull_external_file_to_capacity() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, 0.9, 3);

        // Another process with a larger configured capacity left five
        // entries behind; the staleness re-read pulls them all in
        let seeded: Vec<CacheEntry> = (0..5)
            .map(|i| {
                let mut v = vec![0.0; 6];
                v[i] = 1.0;
                CacheEntry::new(format!("q{}", i), v, format!("SELECT {}", i))
                    .with_timestamp(i as i64 + 1)
            })
            .collect();
        std::fs::write(&config.store_path, serde_json::to_vec(&seeded).unwrap()).unwrap();

        let store = FileSemanticCache::open(config).await;

        let mut newest = vec![0.0; 6];
        newest[5] = 1.0;
        store
            .append(CacheEntry::new("q5", newest.clone(), "SELECT 5").with_timestamp(6))
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.entry_count, 3);

        // Exactly the three most recent by timestamp survive
        let basis = |i: usize| {
            let mut v = vec![0.0; 6];
            v[i] = 1.0;
            v
        };
        assert!(store.find_similar(&basis(0)).await.unwrap().is_none());
        assert!(store.find_similar(&basis(1)).await.unwrap().is_none());
        assert!(store.find_similar(&basis(2)).await.unwrap().is_none());
        assert!(store.find_similar(&basis(3)).await.unwrap().is_some());
        assert!(store.find_similar(&basis(4)).await.unwrap().is_some());
        assert!(store.find_similar(&newest).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_entries_persist_across_instances() {
        let dir = TempDir::new().unwrap();

        {
            let store = FileSemanticCache::open(config_at(&dir, 0.9, 10)).await;
            store
                .append(CacheEntry::new("q", vec![0.0, 1.0], "SELECT 42"))
                .await
                .unwrap();
        }

        let reopened = FileSemanticCache::open(config_at(&dir, 0.9, 10)).await;

        assert_eq!(reopened.stats().await.unwrap().entry_count, 1);

        let found = reopened.find_similar(&[0.0, 1.0]).await.unwrap().unwrap();
        assert_eq!(found.sql, "SELECT 42");
    }

    #[tokio::test]
    async fn test_reloads_file_written_after_open() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, 0.9, 10);
        let path = config.store_path.clone();

        // Opened against a missing file
        let store = FileSemanticCache::open(config).await;

        let entries = vec![CacheEntry::new("external", vec![1.0, 0.0], "SELECT 'ext'")];
        std::fs::write(&path, serde_json::to_vec(&entries).unwrap()).unwrap();

        let found = store.find_similar(&[1.0, 0.0]).await.unwrap().unwrap();

        assert_eq!(found.sql, "SELECT 'ext'");
    }

    #[tokio::test]
    async fn test_reloads_external_overwrite() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, 0.9, 10);
        let path = config.store_path.clone();

        let store = FileSemanticCache::open(config).await;
        store
            .append(CacheEntry::new("mine", vec![1.0, 0.0], "SELECT 'mine'"))
            .await
            .unwrap();

        // Give the file a distinguishable modification time
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let entries = vec![CacheEntry::new("theirs", vec![1.0, 0.0], "SELECT 'theirs'")];
        std::fs::write(&path, serde_json::to_vec(&entries).unwrap()).unwrap();

        let found = store.find_similar(&[1.0, 0.0]).await.unwrap().unwrap();

        assert_eq!(found.sql, "SELECT 'theirs'");
    }

    #[tokio::test]
    async fn test_malformed_file_starts_empty_and_recovers() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, 0.9, 10);
        std::fs::write(&config.store_path, b"not json at all {{{").unwrap();

        let store = FileSemanticCache::open(config).await;

        assert_eq!(store.stats().await.unwrap().entry_count, 0);

        store
            .append(CacheEntry::new("q", vec![1.0], "SELECT 1"))
            .await
            .unwrap();

        assert_eq!(store.stats().await.unwrap().entry_count, 1);
    }

    #[tokio::test]
    async fn test_clear_empties_store_and_file() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, 0.9, 10);

        let store = FileSemanticCache::open(config.clone()).await;
        store
            .append(CacheEntry::new("a", vec![1.0, 0.0], "SELECT 1"))
            .await
            .unwrap();
        store
            .append(CacheEntry::new("b", vec![0.0, 1.0], "SELECT 2"))
            .await
            .unwrap();

        let removed = store.clear().await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.stats().await.unwrap().entry_count, 0);

        let reopened = FileSemanticCache::open(config).await;
        assert_eq!(reopened.stats().await.unwrap().entry_count, 0);
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let config = SemanticCacheConfig::new()
            .with_store_path(dir.path().join("nested/data/cache.json"));

        let store = FileSemanticCache::open(config).await;
        store
            .append(CacheEntry::new("q", vec![1.0], "SELECT 1"))
            .await
            .unwrap();

        assert!(dir.path().join("nested/data/cache.json").exists());
    }
}
