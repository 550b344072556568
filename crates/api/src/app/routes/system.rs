use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::context::AuthContext;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Echo the authenticated identity derived from the bearer token.
pub async fn whoami(Extension(ctx): Extension<AuthContext>) -> Json<Value> {
    Json(json!({
        "user_id": ctx.user_id,
        "username": ctx.username,
        "roles": ctx.roles,
    }))
}
