use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};

use farmgate_core::ProductId;
use farmgate_products::{Product, ProductInventory, ProductPrice};

use crate::app::dto::{ProductPriceRequest, ProductRequest};
use crate::app::errors::{domain_error_to_response, store_error_to_response};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch).put(update).delete(remove))
        .route("/:id/prices", get(price_history).post(add_price))
        .route("/:id/inventory", get(inventory))
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), Response> {
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let product = services
        .products
        .create(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Product>>, Response> {
    let products = services
        .products
        .list()
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(products))
}

async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, Response> {
    let id: ProductId = parse_id(&id)?;
    let product = services
        .products
        .get(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(product))
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<Product>, Response> {
    let id: ProductId = parse_id(&id)?;
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let product = services
        .products
        .update(id, input)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(product))
}

async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let id: ProductId = parse_id(&id)?;
    services
        .products
        .delete(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append an entry to the product's price history.
async fn add_price(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProductPriceRequest>,
) -> Result<(StatusCode, Json<ProductPrice>), Response> {
    let id: ProductId = parse_id(&id)?;
    let input = body.into_domain(id).map_err(domain_error_to_response)?;
    let price = services
        .products
        .add_price(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(price)))
}

async fn price_history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductPrice>>, Response> {
    let id: ProductId = parse_id(&id)?;
    let history = services
        .products
        .price_history(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(history))
}

/// Harvested stock per farm for one product.
async fn inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductInventory>>, Response> {
    let id: ProductId = parse_id(&id)?;
    let inventory = services
        .products
        .inventory(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(inventory))
}
