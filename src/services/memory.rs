use crate::models::{Profile, ProfileUpdate};
use crate::services::store::{merge_for_upsert, ProfileStore, StoreContext, StoreError};
use async_trait::async_trait;
use std::path::Path;
use tokio::sync::RwLock;

/// Process-local profile store
///
/// Keeps insertion order so candidate pools are deterministic. Used for local
/// development (optionally seeded from a JSON file) and in tests.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Load a JSON array of profiles
    pub async fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            StoreError::Unavailable(format!("Failed to read seed file {}: {}", path.display(), e))
        })?;
        let profiles: Vec<Profile> = serde_json::from_str(&raw).map_err(|e| {
            StoreError::InvalidResponse(format!("Failed to parse seed file {}: {}", path.display(), e))
        })?;

        tracing::info!("Seeded {} profiles from {}", profiles.len(), path.display());

        Ok(Self::with_profiles(profiles))
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, _ctx: &StoreContext, id: &str) -> Result<Profile, StoreError> {
        self.profiles
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Profile not found for user {}", id)))
    }

    async fn list_candidates(
        &self,
        _ctx: &StoreContext,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Profile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .filter(|p| p.id != exclude_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn upsert_profile(
        &self,
        _ctx: &StoreContext,
        id: &str,
        fields: ProfileUpdate,
    ) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.write().await;
        let position = profiles.iter().position(|p| p.id == id);
        let existing = position.map(|i| profiles[i].clone());

        let profile = merge_for_upsert(existing, id, fields)?;
        match position {
            Some(i) => profiles[i] = profile.clone(),
            None => profiles.push(profile.clone()),
        }

        Ok(profile)
    }
}
