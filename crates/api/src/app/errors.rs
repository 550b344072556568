use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use farmgate_core::DomainError;
use farmgate_infra::StoreError;

/// One JSON error shape for the whole API: `{"error": code, "message": …}`.
pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match &err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string()),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string()),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", err.to_string()),
        DomainError::InvariantViolation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", err.to_string())
        }
        DomainError::InsufficientStock { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_stock", err.to_string())
        }
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(domain) => domain_error_to_response(domain),
        StoreError::Database(db) => {
            tracing::error!(error = %db, "database failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", "storage failure")
        }
    }
}
