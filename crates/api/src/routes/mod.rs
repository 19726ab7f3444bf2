pub mod auth;
pub mod command;
pub mod health;
pub mod ontology;
pub mod project;
pub mod property;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/properties                        list properties
/// /projects/{id}/command-history                   project activity feed
///
/// /ontologies                                      list, create
/// /ontologies/{id}                                 get, update, delete
///
/// /properties                                      create
/// /properties/{id}                                 get, update, delete
///
/// /commands/undo                                   undo last command
/// /commands/redo                                   redo last undone command
/// /commands/{id}                                   command detail
/// /commands/{id}/undo                              undo a given command
/// /commands/{id}/redo                              redo a given command
/// /command-history                                 caller's activity feed
/// /delete-commands                                 delete commands (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication.
        .nest("/auth", auth::router())
        // Domain resources; every write is a recorded command.
        .nest("/projects", project::router())
        .nest("/ontologies", ontology::router())
        .nest("/properties", property::router())
        // Undo/redo and command log.
        .nest("/commands", command::router())
        .merge(command::feed_router())
}
