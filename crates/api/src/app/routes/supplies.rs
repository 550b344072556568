use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;

use farmgate_core::{FarmId, Quantity, SupplyId};
use farmgate_supplies::{Supply, SupplyPurchase, UsageHistoryEntry};

use crate::app::dto::{SupplyPurchaseRequest, SupplyRequest};
use crate::app::errors::{domain_error_to_response, store_error_to_response};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/low-stock", get(low_stock))
        .route("/:id", get(fetch).put(update).delete(remove))
        .route("/:id/purchases", get(purchases).post(record_purchase))
        .route("/:id/history", get(history))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    farm_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LowStockQuery {
    threshold: Decimal,
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<SupplyRequest>,
) -> Result<(StatusCode, Json<Supply>), Response> {
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let supply = services
        .supplies
        .create(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(supply)))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Supply>>, Response> {
    let farm_id = query
        .farm_id
        .as_deref()
        .map(parse_id::<FarmId>)
        .transpose()?;
    let supplies = services
        .supplies
        .list(farm_id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(supplies))
}

/// Supplies below the given threshold, lowest stock first.
async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<LowStockQuery>,
) -> Result<Json<Vec<Supply>>, Response> {
    let threshold = Quantity::new(query.threshold).map_err(domain_error_to_response)?;
    let supplies = services
        .supplies
        .low_stock(threshold)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(supplies))
}

async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Supply>, Response> {
    let id: SupplyId = parse_id(&id)?;
    let supply = services
        .supplies
        .get(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(supply))
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<SupplyRequest>,
) -> Result<Json<Supply>, Response> {
    let id: SupplyId = parse_id(&id)?;
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let supply = services
        .supplies
        .update(id, input)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(supply))
}

async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let id: SupplyId = parse_id(&id)?;
    services
        .supplies
        .delete(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a purchase; the supply is restocked in the same transaction.
async fn record_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<SupplyPurchaseRequest>,
) -> Result<(StatusCode, Json<SupplyPurchase>), Response> {
    let id: SupplyId = parse_id(&id)?;
    let input = body.into_domain(id).map_err(domain_error_to_response)?;
    let purchase = services
        .supplies
        .record_purchase(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

async fn purchases(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SupplyPurchase>>, Response> {
    let id: SupplyId = parse_id(&id)?;
    let purchases = services
        .supplies
        .purchases(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(purchases))
}

/// Append-only record of every stock decrement.
async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<UsageHistoryEntry>>, Response> {
    let id: SupplyId = parse_id(&id)?;
    let entries = services
        .supplies
        .history(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(entries))
}
