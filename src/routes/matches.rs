use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ConnectRequest, ConnectResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse};
use crate::routes::{error_response, store_context, AppState};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/connect", web::post().to(connect));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Profile store health check failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string"
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string(), false);
    }

    let user_id = &req.user_id;
    let ctx = store_context(&http_req);

    tracing::info!("Finding matches for user: {}", user_id);

    let result = match state.matches.compute_matches(&ctx, user_id).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Failed to compute matches for {}: {}", user_id, e);
            return error_response(
                e.status_code(),
                "Cannot compute matches",
                e.to_string(),
                e.is_retryable(),
            );
        }
    };

    tracing::info!(
        "Returning {} matches for user {} in {:?} ({} skipped)",
        result.total,
        user_id,
        result.requester_location,
        result.skipped
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        total: result.total,
        requester_location: result.requester_location,
        skipped: result.skipped,
    })
}

/// Connect endpoint
///
/// POST /api/v1/matches/connect
///
/// Acknowledges a connection request. Nothing is persisted or delivered.
async fn connect(req: web::Json<ConnectRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string(), false);
    }

    if req.user_id == req.target_user_id {
        return error_response(
            400,
            "Invalid connection",
            "Cannot connect with yourself".to_string(),
            false,
        );
    }

    tracing::info!("Connection request: {} -> {}", req.user_id, req.target_user_id);

    HttpResponse::Ok().json(ConnectResponse {
        success: true,
        request_id: uuid::Uuid::new_v4().to_string(),
    })
}
