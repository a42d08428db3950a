use crate::models::{ScoringWeights, SpanNormalization};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which profile store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Supabase,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub supabase: Option<SupabaseSettings>,
    pub database: Option<DatabaseSettings>,
    /// JSON array of profiles loaded by the memory backend
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_table() -> String { "profiles".to_string() }
fn default_request_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Second-tier cache; L1-only when unset
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            redis_url: None,
            ttl_secs: None,
            l1_cache_size: None,
        }
    }
}

fn default_cache_enabled() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_pool_limit")]
    pub pool_limit: usize,
    #[serde(default)]
    pub normalization: SpanNormalization,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            pool_limit: default_pool_limit(),
            normalization: SpanNormalization::default(),
        }
    }
}

impl MatchingSettings {
    /// Pool size clamped to a range the pairwise sort handles comfortably
    pub fn effective_pool_limit(&self) -> usize {
        self.pool_limit.clamp(1, 1000)
    }
}

fn default_pool_limit() -> usize { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_employer_weight")]
    pub employer: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            budget: default_budget_weight(),
            employer: default_employer_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            budget: config.budget,
            employer: config.employer,
        }
    }
}

fn default_budget_weight() -> f64 { 10.0 }
fn default_employer_weight() -> f64 { 1.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NESTMATES__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NESTMATES__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("NESTMATES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("NESTMATES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed variables used by hosting platforms
///
/// `DATABASE_URL`, `SUPABASE_URL`, `SUPABASE_KEY` and `REDIS_URL` win over
/// file values when set.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "store.database.url"),
        ("SUPABASE_URL", "store.supabase.url"),
        ("SUPABASE_KEY", "store.supabase.api_key"),
        ("REDIS_URL", "cache.redis_url"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
