use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{CreateProfileRequest, ProfileUpdate};
use crate::routes::{error_response, store_context, store_error_response, AppState};

/// Configure profile read/write routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles", web::post().to(create_profile))
        .route("/profiles/{id}", web::get().to(get_profile))
        .route("/profiles/{id}", web::put().to(upsert_profile));
}

/// GET /api/v1/profiles/{id}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> impl Responder {
    let id = path.into_inner();
    let ctx = store_context(&http_req);

    match state.store.get_profile(&ctx, &id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            tracing::info!("Failed to fetch profile {}: {}", id, e);
            store_error_response(&e)
        }
    }
}

/// POST /api/v1/profiles
///
/// Creates the sign-up profile. Uses the supplied id (the auth user id) or
/// generates one.
async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string(), false);
    }

    let CreateProfileRequest { id, fields } = req.into_inner();
    let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let ctx = store_context(&http_req);

    match state.store.upsert_profile(&ctx, &id, fields).await {
        Ok(profile) => {
            tracing::info!("Created profile {}", profile.id);
            HttpResponse::Created().json(profile)
        }
        Err(e) => {
            tracing::error!("Failed to create profile {}: {}", id, e);
            store_error_response(&e)
        }
    }
}

/// PUT /api/v1/profiles/{id}
///
/// Partial update; fields left out of the body keep their stored value.
async fn upsert_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ProfileUpdate>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string(), false);
    }

    let id = path.into_inner();
    let ctx = store_context(&http_req);

    match state.store.upsert_profile(&ctx, &id, req.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            tracing::error!("Failed to save profile {}: {}", id, e);
            store_error_response(&e)
        }
    }
}
