use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;

use farmgate_core::PartyId;
use farmgate_parties::{Party, PartyKind};

use crate::app::dto::PartyRequest;
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
    kind: Option<String>,
}

async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<PartyRequest>,
) -> Result<(StatusCode, Json<Party>), Response> {
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let party = services
        .parties
        .create(input)
        .await
        .map_err(store_error_to_response)?;
    Ok((StatusCode::CREATED, Json(party)))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Party>>, Response> {
    let kind = query
        .kind
        .as_deref()
        .map(PartyKind::parse)
        .transpose()
        .map_err(domain_error_to_response)?;
    let parties = services
        .parties
        .list(kind)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(parties))
}

async fn fetch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Party>, Response> {
    let id: PartyId = parse_id(&id)?;
    let party = services
        .parties
        .get(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(party))
}

async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<PartyRequest>,
) -> Result<Json<Party>, Response> {
    let id: PartyId = parse_id(&id)?;
    let input = body.into_domain().map_err(domain_error_to_response)?;
    let party = services
        .parties
        .update(id, input)
        .await
        .map_err(store_error_to_response)?;
    Ok(Json(party))
}

/// Soft delete: the party stays referenced by sales and farms.
async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let id: PartyId = parse_id(&id)?;
    services
        .parties
        .deactivate(id)
        .await
        .map_err(store_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}
