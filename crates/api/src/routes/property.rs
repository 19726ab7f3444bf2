use axum::routing::{get, post};
use axum::Router;

use crate::handlers::property;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// Listing goes through `/projects/{id}/properties`.
///
/// ```text
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(property::create)).route(
        "/{id}",
        get(property::get_by_id)
            .put(property::update)
            .delete(property::delete),
    )
}
