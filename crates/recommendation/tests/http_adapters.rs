//! HTTP adapter tests against a local fake upstream.

use std::collections::HashMap;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use common::{ErrorKind, UserId};
use domain::{Price, VenueStateManager};
use recommendation::services::build_client;
use recommendation::{
    DiscountPolicyEvaluator, HttpProfileService, HttpTicketService, HttpTokenValidator,
    ProfileService, RecommendationPipeline, TicketService, TokenValidator,
};
use serde_json::json;
use venue_store::InMemoryVenueStore;

type Params = Query<HashMap<String, String>>;

async fn profile(Query(params): Params) -> Response {
    match params.get("user_id").map(String::as_str) {
        Some("1") => Json(json!({
            "data": {
                "user_id": 1,
                "first_name": "Budi",
                "last_name": "Santoso",
                "region": "Jakarta"
            }
        }))
        .into_response(),
        // missing last_name and region
        Some("2") => Json(json!({ "data": { "user_id": 2, "first_name": "Sari" } })).into_response(),
        Some("3") => Json(json!({
            "data": { "user_id": 99, "first_name": "Eko", "last_name": "", "region": "Bali" }
        }))
        .into_response(),
        Some("4") => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "user not found" })),
        )
            .into_response(),
    }
}

async fn validate(Query(params): Params) -> Response {
    match params.get("token").map(String::as_str) {
        Some("good-token") => Json(json!({
            "data": { "is_valid": true, "user_id": 1, "email_user": "budi@example.com" }
        }))
        .into_response(),
        Some("revoked-token") => Json(json!({
            "data": { "is_valid": false, "user_id": 0, "email_user": "" }
        }))
        .into_response(),
        Some("garbled-token") => Json(json!({ "data": "yes" })).into_response(),
        Some("crash-token") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "invalid token" })),
        )
            .into_response(),
    }
}

async fn tickets(Query(params): Params) -> Response {
    match params.get("region_name").map(String::as_str) {
        Some("Jakarta") => Json(json!({
            "data": [
                { "region_name": "Jakarta", "level": "VIP", "price": 500000 },
                { "region_name": "Jakarta", "level": "Online", "price": 100000 }
            ]
        }))
        .into_response(),
        Some("Nowhere") => Json(json!({ "data": null })).into_response(),
        Some("Maintenance") => Json(json!({ "message": "maintenance" })).into_response(),
        Some("Slow") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "data": [] })).into_response()
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/api/private/user/profile", get(profile))
        .route("/api/private/user/validate", get(validate))
        .route("/api/private/ticket", get(tickets));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

struct Upstream {
    profiles: HttpProfileService,
    tickets: HttpTicketService,
    tokens: HttpTokenValidator,
}

async fn upstream() -> Upstream {
    let base_url = spawn_upstream().await;
    let client = build_client(Duration::from_millis(300)).unwrap();
    Upstream {
        profiles: HttpProfileService::new(client.clone(), base_url.clone()),
        tickets: HttpTicketService::new(client.clone(), base_url.clone()),
        tokens: HttpTokenValidator::new(client, base_url),
    }
}

#[tokio::test]
async fn test_profile_is_decoded_from_envelope() {
    let up = upstream().await;

    let profile = up.profiles.find_user_profile(UserId::new(1)).await.unwrap();
    assert_eq!(profile.user_id, UserId::new(1));
    assert_eq!(profile.display_name, "Budi Santoso");
    assert_eq!(profile.region, "Jakarta");
}

#[tokio::test]
async fn test_profile_statuses_map_to_kinds() {
    let up = upstream().await;

    let missing = up.profiles.find_user_profile(UserId::new(404)).await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    let down = up.profiles.find_user_profile(UserId::new(4)).await.unwrap_err();
    assert_eq!(down.kind(), ErrorKind::Unavailable);
    assert!(down.to_string().contains("502"));
}

#[tokio::test]
async fn test_incomplete_profile_is_unavailable() {
    let up = upstream().await;

    let err = up.profiles.find_user_profile(UserId::new(2)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert!(err.to_string().contains("undecodable"));

    let err = up.profiles.find_user_profile(UserId::new(3)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn test_tickets_map_level_to_tier() {
    let up = upstream().await;

    let offers = up.tickets.find_tickets_by_region("Jakarta").await.unwrap();
    assert_eq!(offers.len(), 2);
    assert_eq!(offers[1].tier_level, "Online");
    assert_eq!(offers[1].price, Price::from_minor_units(100_000));

    let none = up.tickets.find_tickets_by_region("Nowhere").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_ticket_failures_are_unavailable() {
    let up = upstream().await;

    let err = up.tickets.find_tickets_by_region("Atlantis").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);

    let err = up.tickets.find_tickets_by_region("Maintenance").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert!(err.to_string().contains("undecodable"));

    let err = up.tickets.find_tickets_by_region("Slow").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable() {
    let client = build_client(Duration::from_millis(300)).unwrap();
    // Nothing listens on the discard port.
    let profiles = HttpProfileService::new(client, "http://127.0.0.1:9");

    let err = profiles.find_user_profile(UserId::new(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn test_token_validation_fails_closed() {
    let up = upstream().await;

    let claims = up.tokens.validate_token("good-token").await.unwrap();
    assert_eq!(claims.user_id, UserId::new(1));
    assert_eq!(claims.email, "budi@example.com");

    for token in ["revoked-token", "garbled-token", "unknown-token", ""] {
        let err = up.tokens.validate_token(token).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized, "token {token:?}");
    }

    let err = up.tokens.validate_token("crash-token").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert!(!err.to_string().contains("crash-token"));
}

#[tokio::test]
async fn test_pipeline_over_http() {
    let up = upstream().await;
    let pipeline = RecommendationPipeline::new(
        VenueStateManager::new(InMemoryVenueStore::new()),
        up.profiles,
        up.tickets,
        DiscountPolicyEvaluator::new(10),
    );
    pipeline
        .venues()
        .set_sold_out("Jakarta", true)
        .await
        .unwrap();

    let rec = pipeline.get_recommendation(UserId::new(1)).await.unwrap();

    assert_eq!(rec.display_name, "Budi Santoso");
    assert!(rec.is_sold_out);
    let offer = rec.recommended_offer().unwrap();
    assert_eq!(offer.tier_level, "Online");
    assert_eq!(offer.discounted_price, Price::from_minor_units(90_000));
}
