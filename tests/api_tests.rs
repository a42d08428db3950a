// HTTP API tests for NestMates Matcher

use actix_web::{test, web, App};
use nestmates_matcher::core::Matcher;
use nestmates_matcher::models::{Gender, GenderPreference, Profile};
use nestmates_matcher::routes::{configure_routes, AppState};
use nestmates_matcher::services::{InMemoryProfileStore, MatchService, ProfileStore};
use serde_json::{json, Value};
use std::sync::Arc;

fn profile(id: &str, location: &str, preferred: GenderPreference, budget: (i64, i64), company: &str) -> Profile {
    Profile {
        id: id.to_string(),
        full_name: Some(format!("User {}", id)),
        internship_location: Some(location.to_string()),
        internship_company: Some(company.to_string()),
        gender: Some(Gender::Female),
        preferred_gender: Some(preferred),
        price_range_min: Some(budget.0),
        price_range_max: Some(budget.1),
        ..Default::default()
    }
}

fn app_state() -> AppState {
    let store: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::with_profiles(vec![
        profile("requester", "NYC", GenderPreference::NoPreference, (1000, 1500), "Acme"),
        profile("near", "New York", GenderPreference::NoPreference, (1100, 1600), "Globex"),
        profile("colleague", "nyc", GenderPreference::NoPreference, (1100, 1600), "Acme"),
        profile("picky", "NYC", GenderPreference::Only(Gender::Male), (1000, 1500), "Acme"),
        profile("away", "Chicago, IL", GenderPreference::NoPreference, (1000, 1500), "Acme"),
    ]));

    AppState {
        matches: MatchService::new(store.clone(), Matcher::with_default_weights()),
        store,
    }
}

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[actix_web::test]
async fn test_find_matches() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "requester" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    let ids: Vec<&str> = body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();

    assert_eq!(ids, vec!["colleague", "near"]);
    assert_eq!(body["total"], 2);
    assert_eq!(body["requester_location"], "NYC");
}

#[actix_web::test]
async fn test_find_matches_unknown_user() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "ghost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["retryable"], false);
}

#[actix_web::test]
async fn test_find_matches_rejects_empty_user_id() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_profile_lifecycle() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .set_json(json!({
            "id": "newcomer",
            "fullName": "Nia Cole",
            "internshipLocation": "New York, NY",
            "priceRangeMin": 900,
            "priceRangeMax": 1300,
            "preferredGender": "no preference"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/newcomer")
        .set_json(json!({ "internship_company": "Acme" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["internship_company"], "Acme");
    assert_eq!(body["full_name"], "Nia Cole");

    let req = test::TestRequest::get().uri("/api/v1/profiles/newcomer").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["internship_location"], "New York, NY");
    assert_eq!(body["price_range_min"], 900);
    assert_eq!(body["preferred_gender"], "no-preference");
}

#[actix_web::test]
async fn test_update_accepts_blank_form_fields() {
    let app = init_app!();

    // the edit form posts every field, with "" for anything left empty
    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/requester")
        .set_json(json!({
            "id": "requester",
            "full_name": "Ada Park",
            "avatar_url": "",
            "institution": "",
            "major": "",
            "internship_company": "",
            "internship_title": "",
            "internship_location": "New York, NY",
            "price_range_min": 900,
            "price_range_max": 1400,
            "additional_preferences": "",
            "gender": "",
            "preferred_gender": ""
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["full_name"], "Ada Park");
    assert_eq!(body["internship_location"], "New York, NY");
    assert_eq!(body["price_range_max"], 1400);
    // blanks leave stored values alone
    assert_eq!(body["internship_company"], "Acme");
    assert_eq!(body["gender"], "female");
    assert_eq!(body["preferred_gender"], "no-preference");
}

#[actix_web::test]
async fn test_update_rejects_unknown_gender() {
    let app = init_app!();

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/requester")
        .set_json(json!({ "gender": "robot" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_create_profile_generates_id() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .set_json(json!({ "internship_location": "Boston, MA" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert!(!body["id"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn test_get_missing_profile() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/profiles/nobody").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_update_rejects_inverted_budget() {
    let app = init_app!();

    // both bounds in one body fail request validation
    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/requester")
        .set_json(json!({ "price_range_min": 2000, "price_range_max": 1000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // one bound crossing the stored one fails at the store
    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/requester")
        .set_json(json!({ "price_range_min": 2000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
}

#[actix_web::test]
async fn test_connect() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/connect")
        .set_json(json!({ "userId": "requester", "targetUserId": "near" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert!(body["request_id"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/connect")
        .set_json(json!({ "userId": "requester", "targetUserId": "requester" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}
