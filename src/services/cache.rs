use crate::models::{Profile, ProfileUpdate};
use crate::services::store::{ProfileStore, StoreContext, StoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager
///
/// L1 is an in-process moka cache. L2 is Redis, shared across instances, and
/// optional: without a Redis URL the manager runs L1-only.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager
    pub async fn new(redis_url: Option<&str>, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let redis = match redis_url {
            Some(url) => {
                let client = redis::Client::open(url)?;
                let manager = ConnectionManager::new(client).await?;
                Some(Arc::new(tokio::sync::Mutex::new(manager)))
            }
            None => None,
        };

        Ok(Self::build(redis, l1_size, ttl_secs))
    }

    /// In-process cache only
    pub fn local(l1_size: u64, ttl_secs: u64) -> Self {
        Self::build(None, l1_size, ttl_secs)
    }

    fn build(
        redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
        l1_size: u64,
        ttl_secs: u64,
    ) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            redis,
            l1_cache,
            ttl_secs,
        }
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let value: Option<String> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);

                // Populate L1 cache
                self.l1_cache
                    .insert(key.to_string(), json.as_bytes().to_vec())
                    .await;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both tiers)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache
            .insert(key.to_string(), json.as_bytes().to_vec())
            .await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("DEL")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            redis_enabled: self.redis.is_some(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub redis_enabled: bool,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a single profile
    pub fn profile(user_id: &str) -> String {
        format!("profile:{}", user_id)
    }
}

/// Profile store decorator caching single-profile reads
///
/// Candidate pools are never cached; every match request lists fresh. Cache
/// failures degrade to a direct read and are only logged.
pub struct CachedProfileStore {
    inner: Arc<dyn ProfileStore>,
    cache: Arc<CacheManager>,
}

impl CachedProfileStore {
    pub fn new(inner: Arc<dyn ProfileStore>, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl ProfileStore for CachedProfileStore {
    async fn get_profile(&self, ctx: &StoreContext, id: &str) -> Result<Profile, StoreError> {
        let key = CacheKey::profile(id);

        match self.cache.get::<Profile>(&key).await {
            Ok(profile) => return Ok(profile),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Profile cache read failed for {}: {}", id, e),
        }

        let profile = self.inner.get_profile(ctx, id).await?;

        if let Err(e) = self.cache.set(&key, &profile).await {
            tracing::warn!("Failed to cache profile {}: {}", id, e);
        }

        Ok(profile)
    }

    async fn list_candidates(
        &self,
        ctx: &StoreContext,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Profile>, StoreError> {
        self.inner.list_candidates(ctx, exclude_id, limit).await
    }

    async fn upsert_profile(
        &self,
        ctx: &StoreContext,
        id: &str,
        fields: ProfileUpdate,
    ) -> Result<Profile, StoreError> {
        let profile = self.inner.upsert_profile(ctx, id, fields).await?;

        // Invalidate cache for this user
        if let Err(e) = self.cache.delete(&CacheKey::profile(id)).await {
            tracing::warn!("Failed to invalidate cache: {}", e);
        }

        Ok(profile)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.inner.health_check().await
    }
}
