//! Data access capability and its memoizing decorator.
//!
//! The engine never owns transport: master tables, user state and music meta
//! arrive through the [`DataProvider`] trait as raw JSON and are decoded into
//! the typed records of [`crate::master`] / [`crate::user`] on first use.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::{DeckForgeError, DfResult};
use crate::music::MusicMeta;

/// Asynchronous source of game data. Implemented by the embedding
/// application (in-memory, file-backed, HTTP-backed, ...).
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// A master table (JSON array of rows), keyed by table name.
    async fn get_master_data(&self, key: &str) -> DfResult<Value>;

    /// One slice of the player's own data, keyed by suite entry name.
    async fn get_user_data(&self, key: &str) -> DfResult<Value>;

    /// The whole player data suite (JSON object).
    async fn get_user_data_all(&self) -> DfResult<Value>;

    /// Precomputed per-(song, difficulty) score-model coefficients.
    async fn get_music_meta(&self) -> DfResult<Value>;
}

type CacheCell = Arc<OnceCell<Arc<Value>>>;

/// Memoized values plus the in-flight registry.
///
/// "Shared" means shared across every provider instance that was constructed
/// with the same `Arc<SharedCache>`, not process-global: callers needing
/// isolation build their own cache object.
#[derive(Default)]
pub struct SharedCache {
    cells: Mutex<HashMap<String, CacheCell>>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// At most one fetch per key is ever in flight: concurrent callers for
    /// an uncached key all await the same `OnceCell` initialization.
    async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> DfResult<Arc<Value>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = DfResult<Value>>,
    {
        let cell = {
            let mut cells = self
                .cells
                .lock()
                .map_err(|_| DeckForgeError::Provider("cache mutex poisoned".into()))?;
            cells.entry(key.to_string()).or_default().clone()
        };
        cell.get_or_try_init(|| async { fetch().await.map(Arc::new) })
            .await
            .cloned()
    }
}

/// Memoizing decorator over a raw [`DataProvider`].
///
/// Master data and music meta live in the shared cache (typically one per
/// process); user data is cached per decorator instance since it is usually
/// per-user-session.
pub struct CachedDataProvider {
    inner: Arc<dyn DataProvider>,
    master_cache: Arc<SharedCache>,
    user_cache: SharedCache,
    typed: Mutex<HashMap<(TypeId, String), Arc<dyn Any + Send + Sync>>>,
}

const USER_DATA_KEY: &str = "userData";
const MUSIC_META_KEY: &str = "musicMeta";

impl CachedDataProvider {
    pub fn new(inner: Arc<dyn DataProvider>, master_cache: Arc<SharedCache>) -> Self {
        Self {
            inner,
            master_cache,
            user_cache: SharedCache::new(),
            typed: Mutex::new(HashMap::new()),
        }
    }

    pub async fn raw_master_data(&self, key: &str) -> DfResult<Arc<Value>> {
        let inner = &self.inner;
        self.master_cache
            .get_or_fetch(key, || async move { inner.get_master_data(key).await })
            .await
    }

    pub async fn raw_user_data_all(&self) -> DfResult<Arc<Value>> {
        let inner = &self.inner;
        self.user_cache
            .get_or_fetch(USER_DATA_KEY, || async move {
                inner.get_user_data_all().await
            })
            .await
    }

    pub async fn raw_music_meta(&self) -> DfResult<Arc<Value>> {
        let inner = &self.inner;
        self.master_cache
            .get_or_fetch(MUSIC_META_KEY, || async move {
                inner.get_music_meta().await
            })
            .await
    }

    /// Warms the master cache; duplicate keys collapse onto the same
    /// in-flight fetch, independent keys fetch concurrently.
    pub async fn preload_master_data(&self, keys: &[&str]) -> DfResult<()> {
        let unique: HashSet<&str> = keys.iter().copied().collect();
        futures::future::try_join_all(unique.into_iter().map(|key| self.raw_master_data(key)))
            .await?;
        Ok(())
    }

    fn typed_get(&self, slot: &(TypeId, String)) -> Option<Arc<dyn Any + Send + Sync>> {
        self.typed.lock().ok()?.get(slot).cloned()
    }

    fn typed_put(&self, slot: (TypeId, String), value: Arc<dyn Any + Send + Sync>) {
        if let Ok(mut typed) = self.typed.lock() {
            typed.insert(slot, value);
        }
    }

    /// A master table decoded into typed rows, memoized per (table, type).
    pub async fn master<T>(&self, key: &str) -> DfResult<Arc<Vec<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let slot = (TypeId::of::<Vec<T>>(), format!("master:{key}"));
        if let Some(hit) = self.typed_get(&slot) {
            if let Ok(rows) = hit.downcast::<Vec<T>>() {
                return Ok(rows);
            }
        }
        let raw = self.raw_master_data(key).await?;
        let rows: Arc<Vec<T>> = Arc::new(serde_json::from_value(raw.as_ref().clone())?);
        self.typed_put(slot, rows.clone());
        Ok(rows)
    }

    /// One user-data entry, or `None` when the suite does not carry it.
    pub async fn user_opt<T>(&self, key: &str) -> DfResult<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let slot = (TypeId::of::<T>(), format!("user:{key}"));
        if let Some(hit) = self.typed_get(&slot) {
            if let Ok(value) = hit.downcast::<T>() {
                return Ok(Some(value));
            }
        }
        let all = self.raw_user_data_all().await?;
        let entry = match all.get(key) {
            Some(v) if !v.is_null() => v.clone(),
            _ => return Ok(None),
        };
        let value: Arc<T> = Arc::new(serde_json::from_value(entry)?);
        self.typed_put(slot, value.clone());
        Ok(Some(value))
    }

    pub async fn user<T>(&self, key: &str) -> DfResult<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.user_opt(key)
            .await?
            .ok_or_else(|| DeckForgeError::NotFound(format!("user data '{key}'")))
    }

    pub async fn music_meta(&self) -> DfResult<Arc<Vec<MusicMeta>>> {
        let slot = (TypeId::of::<Vec<MusicMeta>>(), MUSIC_META_KEY.to_string());
        if let Some(hit) = self.typed_get(&slot) {
            if let Ok(metas) = hit.downcast::<Vec<MusicMeta>>() {
                return Ok(metas);
            }
        }
        let raw = self.raw_music_meta().await?;
        let metas: Arc<Vec<MusicMeta>> = Arc::new(serde_json::from_value(raw.as_ref().clone())?);
        self.typed_put(slot, metas.clone());
        Ok(metas)
    }
}

#[async_trait]
impl DataProvider for CachedDataProvider {
    async fn get_master_data(&self, key: &str) -> DfResult<Value> {
        Ok(self.raw_master_data(key).await?.as_ref().clone())
    }

    async fn get_user_data(&self, key: &str) -> DfResult<Value> {
        let all = self.raw_user_data_all().await?;
        all.get(key)
            .cloned()
            .ok_or_else(|| DeckForgeError::NotFound(format!("user data '{key}'")))
    }

    async fn get_user_data_all(&self) -> DfResult<Value> {
        Ok(self.raw_user_data_all().await?.as_ref().clone())
    }

    async fn get_music_meta(&self) -> DfResult<Value> {
        Ok(self.raw_music_meta().await?.as_ref().clone())
    }
}
