use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};

use farmgate_core::FarmId;
use farmgate_farms::Farm;

use crate::app::dto::FarmRequest;
use crate::app::errors::{domain_error_to_response, store_error_to_response};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch).put(update).delete(remove))
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<FarmRequest>,
) -> Result<(StatusCode, Json<Farm>), Response> {
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let farm = services
        .farms
        .create(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(farm)))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Farm>>, Response> {
    let farms = services.farms.list().await.map_err(store_error_to_response)?;
    Ok(Json(farms))
}

async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Farm>, Response> {
    let id: FarmId = parse_id(&id)?;
    let farm = services.farms.get(id).await.map_err(store_error_to_response)?;
    Ok(Json(farm))
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<FarmRequest>,
) -> Result<Json<Farm>, Response> {
    let id: FarmId = parse_id(&id)?;
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let farm = services
        .farms
        .update(id, input)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(farm))
}

async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let id: FarmId = parse_id(&id)?;
    services
        .farms
        .delete(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}
