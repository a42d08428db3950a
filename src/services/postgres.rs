use crate::models::{Profile, ProfileUpdate};
use crate::services::store::{merge_for_upsert, ProfileStore, StoreContext, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

const PROFILE_COLUMNS: &str = r#"
    id, full_name, avatar_url, institution, major,
    internship_company, internship_title, internship_location,
    internship_start, internship_end,
    price_range_min, price_range_max,
    additional_preferences, gender, preferred_gender, updated_at
"#;

/// Raw `profiles` row; enumerations are free text in the database
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProfileRow {
    id: String,
    full_name: Option<String>,
    avatar_url: Option<String>,
    institution: Option<String>,
    major: Option<String>,
    internship_company: Option<String>,
    internship_title: Option<String>,
    internship_location: Option<String>,
    internship_start: Option<NaiveDate>,
    internship_end: Option<NaiveDate>,
    price_range_min: Option<i64>,
    price_range_max: Option<i64>,
    additional_preferences: Option<String>,
    gender: Option<String>,
    preferred_gender: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            institution: row.institution,
            major: row.major,
            internship_company: row.internship_company,
            internship_title: row.internship_title,
            internship_location: row.internship_location,
            internship_start: row.internship_start,
            internship_end: row.internship_end,
            price_range_min: row.price_range_min,
            price_range_max: row.price_range_max,
            additional_preferences: row.additional_preferences,
            // Unknown values decode as absent, same as the JSON path
            gender: row.gender.and_then(|g| g.parse().ok()),
            preferred_gender: row.preferred_gender.and_then(|g| g.parse().ok()),
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed profile store
///
/// Owns the `profiles` table directly; migrations run on connect.
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Create a new PostgreSQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL profile store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn get_profile(&self, _ctx: &StoreContext, id: &str) -> Result<Profile, StoreError> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);

        let row: Option<ProfileRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Profile::from)
            .ok_or_else(|| StoreError::NotFound(format!("Profile not found for user {}", id)))
    }

    async fn list_candidates(
        &self,
        _ctx: &StoreContext,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Profile>, StoreError> {
        let query = format!(
            "SELECT {} FROM profiles WHERE id <> $1 LIMIT $2",
            PROFILE_COLUMNS
        );

        let rows: Vec<ProfileRow> = sqlx::query_as(&query)
            .bind(exclude_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Queried {} candidates excluding {}", rows.len(), exclude_id);

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    /// Merge and write inside one transaction so concurrent partial updates
    /// to the same profile cannot interleave.
    async fn upsert_profile(
        &self,
        _ctx: &StoreContext,
        id: &str,
        fields: ProfileUpdate,
    ) -> Result<Profile, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {} FROM profiles WHERE id = $1 FOR UPDATE",
            PROFILE_COLUMNS
        );
        let existing: Option<ProfileRow> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let profile = merge_for_upsert(existing.map(Profile::from), id, fields)?;

        let upsert = format!(
            r#"
            INSERT INTO profiles ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (id)
            DO UPDATE SET
                full_name = EXCLUDED.full_name,
                avatar_url = EXCLUDED.avatar_url,
                institution = EXCLUDED.institution,
                major = EXCLUDED.major,
                internship_company = EXCLUDED.internship_company,
                internship_title = EXCLUDED.internship_title,
                internship_location = EXCLUDED.internship_location,
                internship_start = EXCLUDED.internship_start,
                internship_end = EXCLUDED.internship_end,
                price_range_min = EXCLUDED.price_range_min,
                price_range_max = EXCLUDED.price_range_max,
                additional_preferences = EXCLUDED.additional_preferences,
                gender = EXCLUDED.gender,
                preferred_gender = EXCLUDED.preferred_gender,
                updated_at = EXCLUDED.updated_at
            "#,
            columns = PROFILE_COLUMNS
        );

        sqlx::query(&upsert)
            .bind(&profile.id)
            .bind(&profile.full_name)
            .bind(&profile.avatar_url)
            .bind(&profile.institution)
            .bind(&profile.major)
            .bind(&profile.internship_company)
            .bind(&profile.internship_title)
            .bind(&profile.internship_location)
            .bind(profile.internship_start)
            .bind(profile.internship_end)
            .bind(profile.price_range_min)
            .bind(profile.price_range_max)
            .bind(&profile.additional_preferences)
            .bind(profile.gender.map(|g| g.as_str()))
            .bind(profile.preferred_gender.map(|g| g.as_str()))
            .bind(profile.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Upserted profile {}", id);

        Ok(profile)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
