//! Handlers for the `/command-history` feed of the authenticated user.

use axum::extract::{Query, State};
use axum::Json;
use cytomine_core::pagination::Page;
use cytomine_db::models::command_history::CommandHistory;
use cytomine_db::repositories::CommandHistoryRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// GET /api/v1/command-history
///
/// The caller's executions, undos and redos, most recent first.
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<CommandHistory>>> {
    let (offset, max) = (params.offset(), params.max());
    let size = CommandHistoryRepo::count_for_user(&state.pool, auth.user_id).await?;
    let items = CommandHistoryRepo::list_for_user(&state.pool, auth.user_id, offset, max).await?;
    Ok(Json(Page::new(items, offset, max, size)))
}
