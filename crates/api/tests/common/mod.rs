#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use ridgeline_api::auth::jwt::{generate_access_token, JwtConfig};
use ridgeline_api::config::ServerConfig;
use ridgeline_api::router::build_app_router;
use ridgeline_api::state::AppState;
use ridgeline_core::feed::FeedSettings;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        feed: FeedSettings::default(),
    }
}

/// Build the full application router on `pool`, with the production
/// middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let feed = Arc::new(ridgeline_db::feed_assembler(pool.clone(), config.feed));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        feed,
    };
    build_app_router(state, &config)
}

/// A valid access token for `user_id`.
pub fn token_for(user_id: i64) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET with an `Authorization: Bearer` header.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// `2020-01-01T00:00:00Z` plus `secs` seconds.
pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_577_836_800 + secs, 0).unwrap()
}

/// Insert a validated user and their profile document.
pub async fn seed_user(pool: &PgPool, id: i64, name: &str, is_profile_public: bool) {
    sqlx::query(
        "INSERT INTO users (id, name, forum_username, email_validated, is_profile_public) \
         VALUES ($1, $2, $2, TRUE, $3)",
    )
    .bind(id)
    .bind(name)
    .bind(is_profile_public)
    .execute(pool)
    .await
    .unwrap();
    seed_document(pool, id, "u", &[("fr", name)]).await;
}

/// Insert a document with one locale per `(lang, title)`.
pub async fn seed_document(pool: &PgPool, id: i64, document_type: &str, locales: &[(&str, &str)]) {
    sqlx::query("INSERT INTO documents (document_id, document_type) VALUES ($1, $2)")
        .bind(id)
        .bind(document_type)
        .execute(pool)
        .await
        .unwrap();
    for (lang, title) in locales {
        sqlx::query("INSERT INTO document_locales (document_id, lang, title) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(*lang)
            .bind(*title)
            .execute(pool)
            .await
            .unwrap();
    }
}

/// A change log row. Defaults to a `created` outing change by one user.
pub struct NewChange {
    pub change_id: i64,
    pub time: DateTime<Utc>,
    pub user_id: i64,
    pub user_ids: Vec<i64>,
    pub document_id: i64,
    pub document_type: &'static str,
    pub area_ids: Vec<i64>,
    pub activities: Vec<String>,
    pub image_ids: [Option<i64>; 3],
    pub more_images: bool,
}

impl NewChange {
    pub fn new(change_id: i64, time: DateTime<Utc>, user_id: i64, document_id: i64) -> Self {
        Self {
            change_id,
            time,
            user_id,
            user_ids: vec![user_id],
            document_id,
            document_type: "o",
            area_ids: Vec::new(),
            activities: Vec::new(),
            image_ids: [None; 3],
            more_images: false,
        }
    }
}

pub async fn seed_change(pool: &PgPool, change: NewChange) {
    sqlx::query(
        "INSERT INTO feed_document_changes \
         (change_id, time, user_id, user_ids, document_id, document_type, change_type, \
          area_ids, activities, image1_id, image2_id, image3_id, more_images) \
         VALUES ($1, $2, $3, $4, $5, $6, 'created', $7, $8, $9, $10, $11, $12)",
    )
    .bind(change.change_id)
    .bind(change.time)
    .bind(change.user_id)
    .bind(change.user_ids)
    .bind(change.document_id)
    .bind(change.document_type)
    .bind(change.area_ids)
    .bind(change.activities)
    .bind(change.image_ids[0])
    .bind(change.image_ids[1])
    .bind(change.image_ids[2])
    .bind(change.more_images)
    .execute(pool)
    .await
    .unwrap();
}

/// Ids of the entries of a feed response body, in order.
pub fn entry_ids(json: &serde_json::Value) -> Vec<i64> {
    json["feed"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect()
}
