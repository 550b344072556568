//! HTTP routes, one module per domain area.

use axum::routing::get;
use axum::Router;

use farmgate_core::DomainError;

use super::errors;

pub mod activities;
pub mod auth;
pub mod farms;
pub mod parties;
pub mod productions;
pub mod products;
pub mod sales;
pub mod supplies;
pub mod system;

/// All routes that sit behind the bearer-token middleware.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/farms", farms::router())
        .nest("/parties", parties::router())
        .nest("/products", products::router())
        .nest("/supplies", supplies::router())
        .nest("/productions", productions::router())
        .nest("/activities", activities::router())
        .nest("/sales", sales::router())
}

/// Parse a path/query id into its typed form, or a 400 response.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse().map_err(errors::domain_error_to_response)
}
