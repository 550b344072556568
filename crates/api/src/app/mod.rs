//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store construction over the shared pool
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and their domain conversions
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use sqlx::PgPool;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(pool: PgPool, jwt_secret: String) -> Router {
    let services = Arc::new(services::build_services(pool, &jwt_secret));
    let auth_state = middleware::AuthState {
        jwt: services.jwt.clone(),
    };

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::auth::router())
        .merge(protected)
        .layer(Extension(services))
}
