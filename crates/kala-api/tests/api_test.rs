//! HTTP 路由集成测试
//!
//! 使用内存仓储构造完整应用，通过 oneshot 发送请求

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use kala_api::{
    auth::{JwtConfig, JwtManager},
    routes,
    state::AppState,
};
use kala_core::{
    ArtistProfile, HIDDEN_CONTACT, InMemoryEnquiryRepository, InMemoryExhibitionRepository,
    InMemoryProfileRepository, Role,
};
use kala_shared::config::EnquiryConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "api-test-secret";

fn jwt() -> JwtManager {
    JwtManager::new(JwtConfig {
        secret: SECRET.to_string(),
        audience: "authenticated".to_string(),
    })
}

fn token(user_id: &str, role: Role) -> String {
    jwt()
        .generate_token(user_id, None, role, Duration::hours(1))
        .unwrap()
}

fn artist(id: &str, rate: f64) -> ArtistProfile {
    ArtistProfile {
        id: id.to_string(),
        role: Role::Artist,
        full_name: Some(format!("Artist {}", id)),
        bio: Some("Gond painter".to_string()),
        avatar: None,
        location: Some("Bhopal".to_string()),
        categories: vec!["Gond".to_string()],
        teaching_rate: Some(rate),
        teaches_online: true,
        teaches_offline: false,
        is_approved: true,
        is_active: true,
        phone: Some(format!("phone-{}", id)),
        email: Some(format!("{}@kala.test", id)),
    }
}

fn test_app() -> Router {
    let profiles = Arc::new(InMemoryProfileRepository::new());
    profiles.insert_artist(artist("a1", 300.0));
    profiles.insert_artist(artist("a2", 280.0));

    let state = AppState::new(
        profiles,
        Arc::new(InMemoryEnquiryRepository::new()),
        Arc::new(InMemoryExhibitionRepository::new()),
        EnquiryConfig::default(),
        jwt(),
    );
    routes::app(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn enquiry_body() -> Value {
    json!({
        "artType": "Gond",
        "skillLevel": "beginner",
        "duration": "1 month",
        "budgetRange": "250-350",
        "classType": "online"
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app();
    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_enquiry_requires_authentication() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/public/art-class-enquiry")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(enquiry_body().to_string()))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, get("/api/user/my-enquiries", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_enquiry_match_and_reveal_flow() {
    let app = test_app();
    let user = token("user-1", Role::User);

    let (status, body) = send(
        &app,
        post("/api/public/art-class-enquiry", &user, enquiry_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["matchedCount"], 2);
    assert_eq!(body["data"]["status"], "matched");
    let enquiry_id = body["data"]["enquiryId"].as_str().unwrap().to_string();

    // 第二次提交被限频
    let (status, body) = send(
        &app,
        post("/api/public/art-class-enquiry", &user, enquiry_body()),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMITED");

    let matches_uri = format!("/api/public/art-class-matches/{}", enquiry_id);
    let (status, body) = send(&app, get(&matches_uri, Some(&user))).await;
    assert_eq!(status, StatusCode::OK);
    let artists = body["data"]["artists"].as_array().unwrap();
    assert_eq!(artists[0]["id"], "a2");
    assert_eq!(artists[0]["phone"], HIDDEN_CONTACT);
    assert_eq!(body["data"]["enquiry"]["contactsRemaining"], 3);

    let reveal = json!({ "enquiryId": enquiry_id, "artistId": "a2" });
    let (status, body) = send(
        &app,
        post("/api/public/reveal-contact", &user, reveal.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "phone-a2");
    assert_eq!(body["data"]["contactsRemaining"], 2);

    let (status, body) = send(&app, post("/api/public/reveal-contact", &user, reveal)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_REVEALED");

    let (status, body) = send(&app, get(&matches_uri, Some(&user))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["artists"][0]["phone"], "phone-a2");
    assert_eq!(body["data"]["artists"][1]["phone"], HIDDEN_CONTACT);

    let (status, body) = send(&app, get("/api/user/my-enquiries", Some(&user))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_other_user_cannot_see_enquiry() {
    let app = test_app();
    let owner = token("user-1", Role::User);
    let (_, body) = send(
        &app,
        post("/api/public/art-class-enquiry", &owner, enquiry_body()),
    )
    .await;
    let enquiry_id = body["data"]["enquiryId"].as_str().unwrap().to_string();

    let intruder = token("user-2", Role::User);
    let (status, body) = send(
        &app,
        get(
            &format!("/api/public/art-class-matches/{}", enquiry_id),
            Some(&intruder),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ENQUIRY_NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_class_type_rejected() {
    let app = test_app();
    let user = token("user-1", Role::User);
    let mut body = enquiry_body();
    body["classType"] = json!("hybrid");

    let (status, body) = send(&app, post("/api/public/art-class-enquiry", &user, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_fee_quote_is_public() {
    let app = test_app();

    let (status, body) = send(
        &app,
        get(
            "/api/public/exhibition-quote?exhibitionType=Kalakanksh&artworkCount=12",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalFee"], 1200);
    assert_eq!(body["data"]["additionalArtworks"], 2);

    let (status, body) = send(
        &app,
        get("/api/public/exhibition-quote?artworkCount=16", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn test_exhibition_role_guards_and_approval() {
    let app = test_app();
    let artist_token = token("a1", Role::Artist);
    let user_token = token("user-1", Role::User);
    let admin_token = token("admin-1", Role::Admin);

    let exhibition = json!({
        "name": "Forest Tales",
        "startDate": "2026-11-01",
        "endDate": "2026-11-05",
        "artworkIds": ["w1", "w2", "w3"],
        "exhibitionType": "Kalahruday"
    });

    let (status, body) = send(
        &app,
        post("/api/artist/exhibitions", &user_token, exhibition.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = send(
        &app,
        post("/api/artist/exhibitions", &artist_token, exhibition),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalFee"], 2000);
    assert_eq!(body["data"]["isApproved"], false);
    let exhibition_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get("/api/artist/exhibitions", Some(&artist_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // 审核前公开列表为空
    let (_, body) = send(&app, get("/api/public/exhibitions", None)).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, get("/api/admin/pending-exhibitions", Some(&artist_token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, get("/api/admin/pending-exhibitions", Some(&admin_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        post(
            "/api/admin/approve-exhibition",
            &admin_token,
            json!({ "exhibitionId": exhibition_id, "approved": true }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["exhibition"]["status"], "active");

    let (_, body) = send(&app, get("/api/public/exhibitions/active", None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = send(&app, get("/api/public/exhibitions/archived", None)).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_can_use_artist_routes() {
    let app = test_app();
    let admin_token = token("admin-1", Role::Admin);

    let (status, _) = send(&app, get("/api/artist/exhibitions", Some(&admin_token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_capacity_exceeded_on_create() {
    let app = test_app();
    let artist_token = token("a1", Role::Artist);
    let artworks: Vec<String> = (0..16).map(|i| format!("w{}", i)).collect();

    let (status, body) = send(
        &app,
        post(
            "/api/artist/exhibitions",
            &artist_token,
            json!({
                "name": "Too Many",
                "startDate": "2026-11-01",
                "endDate": "2026-11-03",
                "artworkIds": artworks
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");
}
