use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::post;
use axum::{Extension, Json, Router};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use farmgate_auth::{hash_password, verify_password, JwtClaims, Role};
use farmgate_core::{DomainError, PartyId};

use crate::app::dto::{LoginRequest, RegisterRequest};
use crate::app::errors::{domain_error_to_response, json_error, store_error_to_response};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

const TOKEN_TTL_HOURS: i64 = 8;

/// Public routes: these sit outside the bearer-token middleware.
pub fn router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), Response> {
    if body.username.trim().is_empty() {
        return Err(domain_error_to_response(DomainError::validation(
            "username cannot be empty",
        )));
    }
    if body.password.len() < 8 {
        return Err(domain_error_to_response(DomainError::validation(
            "password must be at least 8 characters",
        )));
    }

    let party_id = body
        .party_id
        .as_deref()
        .map(parse_id::<PartyId>)
        .transpose()?;
    let roles: Vec<Role> = if body.roles.is_empty() {
        vec![Role::new("user")]
    } else {
        body.roles.into_iter().map(Role::new).collect()
    };

    let password_hash = hash_password(&body.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "password_error",
            "could not hash password",
        )
    })?;

    let user = services
        .users
        .create(body.username, password_hash, roles, party_id)
        .await
        .map_err(store_error_to_response)?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id,
            "username": user.username,
            "roles": user.roles,
        })),
    ))
}

async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, Response> {
    let user = services
        .users
        .find_by_username(&body.username)
        .await
        .map_err(store_error_to_response)?
        .ok_or_else(invalid_credentials)?;

    let verified = verify_password(&body.password, &user.password_hash).map_err(|e| {
        tracing::error!(error = %e, "stored password hash unusable");
        json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "password_error",
            "could not verify password",
        )
    })?;
    if !verified {
        return Err(invalid_credentials());
    }

    let now = Utc::now();
    let claims = JwtClaims {
        sub: user.id,
        username: user.username,
        roles: user.roles,
        issued_at: now,
        expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
    };
    let token = services.jwt.encode(&claims).map_err(|e| {
        tracing::error!(error = %e, "token signing failed");
        json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "token_error",
            "could not issue token",
        )
    })?;

    Ok(Json(json!({
        "token": token,
        "expires_at": claims.expires_at,
    })))
}

fn invalid_credentials() -> Response {
    // One message for unknown user and wrong password alike.
    json_error(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "invalid username or password",
    )
}
