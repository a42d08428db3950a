use crate::core::{MatchResult, Matcher};
use crate::services::store::{ProfileStore, StoreContext, StoreError, DEFAULT_POOL_LIMIT};
use std::sync::Arc;
use thiserror::Error;

/// Why a match computation could not produce a result
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Cannot compute matches: no profile for user {0}")]
    ProfileNotFound(String),

    #[error("Profile store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

impl MatchError {
    /// Whether the caller may retry; the service itself never retries
    pub fn is_retryable(&self) -> bool {
        match self {
            MatchError::ProfileNotFound(_) => false,
            MatchError::StoreUnavailable(e) => e.is_retryable(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            MatchError::ProfileNotFound(_) => 404,
            MatchError::StoreUnavailable(StoreError::Unauthorized) => 401,
            MatchError::StoreUnavailable(_) => 503,
        }
    }
}

/// Runs one "view matches" request against a profile store
#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn ProfileStore>,
    matcher: Matcher,
    pool_limit: usize,
}

impl MatchService {
    pub fn new(store: Arc<dyn ProfileStore>, matcher: Matcher) -> Self {
        Self {
            store,
            matcher,
            pool_limit: DEFAULT_POOL_LIMIT,
        }
    }

    pub fn with_pool_limit(mut self, pool_limit: usize) -> Self {
        self.pool_limit = pool_limit.max(1);
        self
    }

    pub fn pool_limit(&self) -> usize {
        self.pool_limit
    }

    /// Compute ranked matches for `requester_id`
    ///
    /// Any store failure aborts with no partial result.
    pub async fn compute_matches(
        &self,
        ctx: &StoreContext,
        requester_id: &str,
    ) -> Result<MatchResult, MatchError> {
        let requester = match self.store.get_profile(ctx, requester_id).await {
            Ok(profile) => profile,
            Err(StoreError::NotFound(_)) => {
                return Err(MatchError::ProfileNotFound(requester_id.to_string()));
            }
            Err(e) => {
                tracing::error!("Failed to fetch profile for {}: {}", requester_id, e);
                return Err(MatchError::StoreUnavailable(e));
            }
        };

        let candidates = self
            .store
            .list_candidates(ctx, requester_id, self.pool_limit)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list candidates for {}: {}", requester_id, e);
                MatchError::StoreUnavailable(e)
            })?;

        tracing::debug!("Found {} candidates for {}", candidates.len(), requester_id);

        Ok(self.matcher.find_matches(&requester, candidates))
    }
}
