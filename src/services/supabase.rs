use crate::models::{Profile, ProfileUpdate};
use crate::services::store::{merge_for_upsert, ProfileStore, StoreContext, StoreError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Supabase (PostgREST) client for the `profiles` table
///
/// Requests carry the project API key in `apikey`. The bearer token is the
/// caller's access token from [`StoreContext`] when present, else the API key.
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    table: String,
    client: Client,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        api_key: String,
        table: String,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StoreError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_key,
            table,
            client,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }

    fn authorize(&self, request: RequestBuilder, ctx: &StoreContext) -> RequestBuilder {
        let token = ctx.access_token().unwrap_or(self.api_key.as_str());
        request
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .header("Accept", "application/json")
    }

    /// Map a non-success PostgREST status onto a store error
    async fn check_status(response: Response, what: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Supabase request to {} failed: {} - {}", what, status, body);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized,
            StatusCode::NOT_FOUND => StoreError::NotFound(what.to_string()),
            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
                StoreError::Unavailable(format!("Failed to {}: {}", what, status))
            }
            s if s.is_server_error() => {
                StoreError::Unavailable(format!("Failed to {}: {}", what, status))
            }
            _ => StoreError::InvalidInput(format!("Failed to {}: {} - {}", what, status, body)),
        })
    }

    async fn fetch_rows(&self, request: RequestBuilder, what: &str) -> Result<Vec<Value>, StoreError> {
        let response = Self::check_status(request.send().await?, what).await?;
        let json: Value = response.json().await?;

        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(StoreError::InvalidResponse(format!(
                "Expected a JSON array when trying to {}",
                what
            ))),
        }
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn get_profile(&self, ctx: &StoreContext, id: &str) -> Result<Profile, StoreError> {
        tracing::debug!("Fetching profile for user: {}", id);

        let url = format!(
            "{}?select=*&id=eq.{}",
            self.table_url(),
            urlencoding::encode(id)
        );
        let request = self.authorize(self.client.get(&url), ctx);
        let rows = self.fetch_rows(request, "fetch profile").await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("Profile not found for user {}", id)))?;

        serde_json::from_value(row)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    async fn list_candidates(
        &self,
        ctx: &StoreContext,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Profile>, StoreError> {
        let url = format!(
            "{}?select=*&id=neq.{}&limit={}",
            self.table_url(),
            urlencoding::encode(exclude_id),
            limit
        );
        let request = self.authorize(self.client.get(&url), ctx);
        let rows = self.fetch_rows(request, "list candidates").await?;
        let fetched = rows.len();

        let profiles: Vec<Profile> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Profile>(row) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Skipping undecodable profile row: {}", e);
                    None
                }
            })
            .filter(|p| p.id != exclude_id)
            .collect();

        tracing::debug!("Queried {} candidates ({} rows)", profiles.len(), fetched);

        Ok(profiles)
    }

    async fn upsert_profile(
        &self,
        ctx: &StoreContext,
        id: &str,
        fields: ProfileUpdate,
    ) -> Result<Profile, StoreError> {
        let existing = match self.get_profile(ctx, id).await {
            Ok(profile) => Some(profile),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        let profile = merge_for_upsert(existing, id, fields)?;

        // The table owns its own timestamp column, if it has one
        let payload = Profile {
            updated_at: None,
            ..profile.clone()
        };

        let request = self
            .authorize(self.client.post(self.table_url()), ctx)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[&payload]);
        let rows = self.fetch_rows(request, "upsert profile").await?;

        let saved = match rows.into_iter().next() {
            Some(row) => serde_json::from_value(row).map_err(|e| {
                StoreError::InvalidResponse(format!("Failed to parse saved profile: {}", e))
            })?,
            None => profile,
        };

        tracing::debug!("Upserted profile {}", id);

        Ok(saved)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let url = format!("{}?select=id&limit=1", self.table_url());
        let request = self.authorize(self.client.get(&url), &StoreContext::anonymous());
        self.fetch_rows(request, "check health").await.map(|_| true)
    }
}
