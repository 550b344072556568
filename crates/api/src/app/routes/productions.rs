use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;

use farmgate_core::{FarmId, ProductionId, Quantity};
use farmgate_production::{ProductionCycle, ProductionStatus};
use farmgate_products::QualityAssessment;

use crate::app::dto::{
    HarvestRequest, ProductionRequest, QualityAssessmentRequest, StatusRequest,
};
use crate::app::errors::{domain_error_to_response, store_error_to_response};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch).put(update).delete(remove))
        .route("/:id/harvest", post(harvest))
        .route("/:id/status", post(set_status))
        .route("/:id/quality", get(assessments).post(add_assessment))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    farm_id: Option<String>,
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ProductionRequest>,
) -> Result<(StatusCode, Json<ProductionCycle>), Response> {
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let cycle = services
        .productions
        .create(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(cycle)))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductionCycle>>, Response> {
    let farm_id = query
        .farm_id
        .as_deref()
        .map(parse_id::<FarmId>)
        .transpose()?;
    let cycles = services
        .productions
        .list(farm_id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(cycles))
}

async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<ProductionCycle>, Response> {
    let id: ProductionId = parse_id(&id)?;
    let cycle = services
        .productions
        .get(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(cycle))
}

/// Replace the cycle; stock is reconciled against the previous usage lines.
async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProductionRequest>,
) -> Result<Json<ProductionCycle>, Response> {
    let id: ProductionId = parse_id(&id)?;
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let cycle = services
        .productions
        .update(id, input)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(cycle))
}

/// Delete a non-harvested cycle; consumed supplies return to stock.
async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let id: ProductionId = parse_id(&id)?;
    services
        .productions
        .delete(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn harvest(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<HarvestRequest>,
) -> Result<Json<ProductionCycle>, Response> {
    let id: ProductionId = parse_id(&id)?;
    let quantity = Quantity::positive(body.quantity).map_err(domain_error_to_response)?;
    let cycle = services
        .productions
        .harvest(id, quantity, body.harvested_on)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(cycle))
}

async fn set_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<ProductionCycle>, Response> {
    let id: ProductionId = parse_id(&id)?;
    let status = ProductionStatus::parse(&body.status).map_err(domain_error_to_response)?;
    let cycle = services
        .productions
        .set_status(id, status)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(cycle))
}

async fn add_assessment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<QualityAssessmentRequest>,
) -> Result<(StatusCode, Json<QualityAssessment>), Response> {
    let id: ProductionId = parse_id(&id)?;
    let input = body.into_domain(id).map_err(domain_error_to_response)?;
    let assessment = services
        .products
        .add_assessment(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(assessment)))
}

async fn assessments(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<QualityAssessment>>, Response> {
    let id: ProductionId = parse_id(&id)?;
    let assessments = services
        .products
        .assessments(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(assessments))
}
