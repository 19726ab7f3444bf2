//! Handlers for `/commands` (undo, redo, detail) and `/delete-commands`.

use axum::extract::{Path, Query, State};
use axum::Json;
use cytomine_core::command::CommandResponse;
use cytomine_core::error::CoreError;
use cytomine_core::types::DbId;
use cytomine_db::repositories::{CommandHistoryRepo, CommandRepo};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::DeleteCommandParams;
use crate::response::{replay_reply, DataResponse};
use crate::services::command;
use crate::state::AppState;

type ReplayReply = Json<DataResponse<Vec<Map<String, Value>>>>;

async fn replay(
    state: &AppState,
    user_id: DbId,
    command_id: Option<DbId>,
    redo: bool,
) -> AppResult<Vec<CommandResponse>> {
    let mut tx = state.pool.begin().await?;
    let responses = if redo {
        command::redo(&mut tx, user_id, command_id).await?
    } else {
        command::undo(&mut tx, user_id, command_id).await?
    };
    tx.commit().await?;
    Ok(responses)
}

/// POST /api/v1/commands/undo
///
/// Undo the caller's most recent command (or transaction).
pub async fn undo(State(state): State<AppState>, auth: AuthUser) -> AppResult<ReplayReply> {
    let responses = replay(&state, auth.user_id, None, false).await?;
    Ok(replay_reply(responses))
}

/// POST /api/v1/commands/{id}/undo
pub async fn undo_command(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ReplayReply> {
    let responses = replay(&state, auth.user_id, Some(id), false).await?;
    Ok(replay_reply(responses))
}

/// POST /api/v1/commands/redo
pub async fn redo(State(state): State<AppState>, auth: AuthUser) -> AppResult<ReplayReply> {
    let responses = replay(&state, auth.user_id, None, true).await?;
    Ok(replay_reply(responses))
}

/// POST /api/v1/commands/{id}/redo
pub async fn redo_command(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ReplayReply> {
    let responses = replay(&state, auth.user_id, Some(id), true).await?;
    Ok(replay_reply(responses))
}

/// GET /api/v1/commands/{id}
///
/// A command with its history rows. Only its author or an admin may read it.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Value>>> {
    let command = CommandRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Command", id))?;
    if command.user_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Commands of other users are not visible".into(),
        )));
    }

    let history = CommandHistoryRepo::list_for_command(&state.pool, id).await?;
    let mut json = command.to_json();
    json["history"] = serde_json::to_value(history)
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(Json(DataResponse { data: json }))
}

/// GET /api/v1/delete-commands?domain=&after=
///
/// Delete commands of every user, most recent first. Admin only.
pub async fn list_delete_commands(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<DeleteCommandParams>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let mut conn = state.pool.acquire().await?;
    let commands =
        command::list_delete_commands(&mut conn, params.domain.as_deref(), params.after).await?;
    Ok(Json(DataResponse { data: commands }))
}
