use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use nestmates_matcher::config::{LoggingSettings, Settings, StoreBackend, StoreSettings};
use nestmates_matcher::routes::{self, AppState};
use nestmates_matcher::services::{
    CacheManager, CachedProfileStore, InMemoryProfileStore, MatchService, PostgresProfileStore,
    ProfileStore, StoreError, SupabaseClient,
};
use nestmates_matcher::{Matcher, ScoringWeights};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(settings: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

/// Build the configured backing store
async fn build_store(settings: &StoreSettings) -> Result<Arc<dyn ProfileStore>, StoreError> {
    match settings.backend {
        StoreBackend::Supabase => {
            let supabase = settings.supabase.as_ref().ok_or_else(|| {
                StoreError::InvalidInput("store.supabase section is required".to_string())
            })?;
            if supabase.api_key.is_empty() {
                warn!("Supabase API key is empty; set SUPABASE_KEY");
            }

            let client = SupabaseClient::new(
                supabase.url.clone(),
                supabase.api_key.clone(),
                supabase.table.clone(),
                supabase.request_timeout_secs,
            )?;
            info!("Supabase profile store at {}", supabase.url);
            Ok(Arc::new(client))
        }
        StoreBackend::Postgres => {
            let database = settings.database.as_ref().ok_or_else(|| {
                StoreError::InvalidInput("store.database section is required".to_string())
            })?;

            let store = PostgresProfileStore::from_settings(
                &database.url,
                database.max_connections,
                database.min_connections,
                database.acquire_timeout_secs,
                database.idle_timeout_secs,
            )
            .await?;
            info!(
                "PostgreSQL profile store initialized (max: {} connections)",
                database.max_connections.unwrap_or(10)
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let store = match &settings.seed_path {
                Some(path) => InMemoryProfileStore::from_seed_file(path).await?,
                None => InMemoryProfileStore::new(),
            };
            info!("In-memory profile store initialized");
            Ok(Arc::new(store))
        }
    }
}

fn startup_error(what: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", what, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", what, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging);

    info!("Starting NestMates matching service...");

    let mut store = build_store(&settings.store)
        .await
        .map_err(|e| startup_error("Failed to initialize profile store", e))?;

    if settings.cache.enabled {
        let ttl = settings.cache.ttl_secs.unwrap_or(60);
        let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);

        let cache = match CacheManager::new(settings.cache.redis_url.as_deref(), l1_size, ttl).await {
            Ok(cache) => cache,
            Err(e) => {
                error!("Failed to connect to Redis ({}), falling back to in-process cache", e);
                CacheManager::local(l1_size, ttl)
            }
        };

        info!("Profile cache enabled (L1: {} entries, TTL: {}s, {:?})", l1_size, ttl, cache.stats());
        store = Arc::new(CachedProfileStore::new(store, Arc::new(cache)));
    }

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let matcher = Matcher::new(weights, settings.matching.normalization);

    info!(
        "Matcher initialized with weights: {:?}, normalization: {:?}",
        weights,
        settings.matching.normalization
    );

    let app_state = AppState {
        matches: MatchService::new(store.clone(), matcher)
            .with_pool_limit(settings.matching.effective_pool_limit()),
        store,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
