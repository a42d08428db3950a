use crate::models::{Profile, ProfileUpdate};
use async_trait::async_trait;
use thiserror::Error;

/// Default number of candidates fetched per match request
pub const DEFAULT_POOL_LIMIT: usize = 100;

/// Errors that can occur when talking to a profile store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Unauthorized: invalid API key or access token")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Whether a caller may reasonably retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return StoreError::InvalidResponse(format!("Failed to decode response: {}", err));
        }
        StoreError::Unavailable(format!("HTTP request failed: {}", err))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
            other => StoreError::Unavailable(format!("Database error: {}", other)),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unavailable(format!("Migration error: {}", err))
    }
}

/// Caller credentials for a single store call
///
/// Passed explicitly on every call instead of living in a global session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreContext {
    access_token: Option<String>,
}

impl StoreContext {
    /// Context with no end-user credential; adapters fall back to their own key
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

/// Read/write interface to stored profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch one profile.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no profile has this id
    async fn get_profile(&self, ctx: &StoreContext, id: &str) -> Result<Profile, StoreError>;

    /// Fetch up to `limit` profiles other than `exclude_id`, in no particular order
    async fn list_candidates(
        &self,
        ctx: &StoreContext,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Profile>, StoreError>;

    /// Create the profile or overlay `fields` on the existing one.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the resulting budget range is inverted
    async fn upsert_profile(
        &self,
        ctx: &StoreContext,
        id: &str,
        fields: ProfileUpdate,
    ) -> Result<Profile, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Build the row an upsert will write
///
/// Merges `fields` over `existing` (or a fresh profile) and enforces
/// `price_range_min <= price_range_max` on the merged result.
pub fn merge_for_upsert(
    existing: Option<Profile>,
    id: &str,
    fields: ProfileUpdate,
) -> Result<Profile, StoreError> {
    if id.is_empty() {
        return Err(StoreError::InvalidInput("profile id must not be empty".to_string()));
    }

    let mut profile = existing.unwrap_or_else(|| Profile::new(id));
    profile.apply(fields);

    if let Some(budget) = profile.budget() {
        if budget.min > budget.max {
            return Err(StoreError::InvalidInput(format!(
                "price_range_min ({}) exceeds price_range_max ({})",
                budget.min, budget.max
            )));
        }
    }

    profile.updated_at = Some(chrono::Utc::now());
    Ok(profile)
}
