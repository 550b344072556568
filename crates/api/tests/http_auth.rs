//! Black-box tests for the HTTP auth boundary.
//!
//! The pool is created lazily and never connected: every route exercised
//! here is either public or rejected by the middleware before any query
//! runs, so no database is needed.

use std::net::SocketAddr;

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;

use farmgate_api::app::build_app;
use farmgate_auth::{Hs256JwtCodec, JwtClaims, Role};
use farmgate_core::UserId;

const SECRET: &str = "test-secret";

async fn spawn_app() -> SocketAddr {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://farmgate@localhost/farmgate_test")
        .unwrap();
    let app = build_app(pool, SECRET.to_string());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn mint_token(secret: &str, username: &str) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: UserId::new(),
        username: username.to_string(),
        roles: vec![Role::new("admin")],
        issued_at: now,
        expires_at: now + Duration::minutes(10),
    };
    Hs256JwtCodec::new(secret).encode(&claims).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let addr = spawn_app().await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let addr = spawn_app().await;

    let resp = reqwest::get(format!("http://{addr}/farms")).await.unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn protected_routes_reject_malformed_header() {
    let addr = spawn_app().await;
    let client = reqwest::Client::new();

    for header in ["Token abc", "Bearer ", "bearer abc"] {
        let resp = client
            .get(format!("http://{addr}/whoami"))
            .header("Authorization", header)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401, "header {header:?} should be rejected");
    }
}

#[tokio::test]
async fn protected_routes_reject_foreign_signature() {
    let addr = spawn_app().await;
    let token = mint_token("other-secret", "mallory");

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/whoami"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn whoami_reflects_token_claims() {
    let addr = spawn_app().await;
    let token = mint_token(SECRET, "agronomist");

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/whoami"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["username"], "agronomist");
    assert_eq!(body["roles"][0], "admin");
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let addr = spawn_app().await;
    let token = mint_token(SECRET, "agronomist");

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/farms/not-a-uuid"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}
