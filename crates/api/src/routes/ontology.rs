use axum::routing::get;
use axum::Router;

use crate::handlers::ontology;
use crate::state::AppState;

/// Routes mounted at `/ontologies`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ontology::list).post(ontology::create))
        .route(
            "/{id}",
            get(ontology::get_by_id)
                .put(ontology::update)
                .delete(ontology::delete),
        )
}
