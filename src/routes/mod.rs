// Route exports
pub mod matches;
pub mod profiles;

use crate::models::ErrorResponse;
use crate::services::{MatchService, ProfileStore, StoreContext, StoreError};
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub matches: MatchService,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(profiles::configure),
    );
}

/// Build the per-call store context from the `Authorization: Bearer` header
pub fn store_context(req: &HttpRequest) -> StoreContext {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(StoreContext::with_access_token)
        .unwrap_or_default()
}

pub fn error_response(status_code: u16, error: &str, message: String, retryable: bool) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status_code)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
        retryable,
    })
}

/// Map a store failure onto an HTTP error body
pub fn store_error_response(error: &StoreError) -> HttpResponse {
    let (status, label) = match error {
        StoreError::NotFound(_) => (404, "Profile not found"),
        StoreError::Unauthorized => (401, "Unauthorized"),
        StoreError::InvalidInput(_) => (422, "Invalid profile"),
        StoreError::Unavailable(_) => (503, "Profile store unavailable"),
        StoreError::InvalidResponse(_) => (502, "Invalid store response"),
    };

    error_response(status, label, error.to_string(), error.is_retryable())
}
