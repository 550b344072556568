use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;

use farmgate_core::{ActivityId, FarmId};
use farmgate_production::Activity;

use crate::app::dto::ActivityRequest;
use crate::app::errors::{domain_error_to_response, store_error_to_response};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch).put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    farm_id: Option<String>,
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), Response> {
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let activity = services
        .activities
        .create(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(activity)))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Activity>>, Response> {
    let farm_id = query
        .farm_id
        .as_deref()
        .map(parse_id::<FarmId>)
        .transpose()?;
    let activities = services
        .activities
        .list(farm_id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(activities))
}

async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Activity>, Response> {
    let id: ActivityId = parse_id(&id)?;
    let activity = services
        .activities
        .get(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(activity))
}

/// Replace the activity; stock is reconciled against the previous usage
/// lines.
async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ActivityRequest>,
) -> Result<Json<Activity>, Response> {
    let id: ActivityId = parse_id(&id)?;
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let activity = services
        .activities
        .update(id, input)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(activity))
}

/// Delete the activity; consumed supplies return to stock.
async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let id: ActivityId = parse_id(&id)?;
    services
        .activities
        .delete(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}
