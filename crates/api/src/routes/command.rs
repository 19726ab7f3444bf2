//! Route definitions for undo/redo and the command log.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{command, command_history};
use crate::state::AppState;

/// Routes mounted at `/commands`.
///
/// ```text
/// POST /undo        -> undo
/// POST /redo        -> redo
/// GET  /{id}        -> get_by_id
/// POST /{id}/undo   -> undo_command
/// POST /{id}/redo   -> redo_command
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/undo", post(command::undo))
        .route("/redo", post(command::redo))
        .route("/{id}", get(command::get_by_id))
        .route("/{id}/undo", post(command::undo_command))
        .route("/{id}/redo", post(command::redo_command))
}

/// Feed routes merged at the API root.
///
/// ```text
/// GET /command-history   -> list_mine
/// GET /delete-commands   -> list_delete_commands (admin)
/// ```
pub fn feed_router() -> Router<AppState> {
    Router::new()
        .route("/command-history", get(command_history::list_mine))
        .route("/delete-commands", get(command::list_delete_commands))
}
