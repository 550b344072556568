use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};

use farmgate_core::SaleId;
use farmgate_sales::{Invoice, Sale};

use crate::app::dto::SaleRequest;
use crate::app::errors::{domain_error_to_response, store_error_to_response};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch))
        .route("/:id/invoice", get(invoice))
}

/// Register a sale. The total is always recomputed from the lines; any
/// client-supplied total is ignored by the request shape.
async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<SaleRequest>,
) -> Result<(StatusCode, Json<Sale>), Response> {
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let sale = services
        .sales
        .create(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Sale>>, Response> {
    let sales = services.sales.list().await.map_err(store_error_to_response)?;
    Ok(Json(sales))
}

async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Sale>, Response> {
    let id: SaleId = parse_id(&id)?;
    let sale = services.sales.get(id).await.map_err(store_error_to_response)?;
    Ok(Json(sale))
}

/// Invoice document for a sale, numbered from its persistent sequence.
async fn invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, Response> {
    let id: SaleId = parse_id(&id)?;
    let invoice = services
        .sales
        .invoice(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(invoice))
}
