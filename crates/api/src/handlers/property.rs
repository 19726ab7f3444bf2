//! Handlers for the `/properties` resource.

use axum::extract::{Path, State};
use axum::Json;
use cytomine_core::types::DbId;
use cytomine_db::models::property::Property;
use cytomine_db::repositories::PropertyRepo;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{command_reply, CommandReply, DataResponse};
use crate::services::command::{execute_command, CommandContext, PendingCommand};
use crate::services::property::PropertyService;
use crate::services::transaction;
use crate::state::AppState;

/// GET /api/v1/properties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Property>>> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Property", id))?;
    Ok(Json(DataResponse { data: property }))
}

/// POST /api/v1/properties
///
/// Body: `{ "project": <id>, "key": "...", "value": "..." }`.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(json): Json<Value>,
) -> AppResult<CommandReply> {
    let mut tx = state.pool.begin().await?;
    let ctx = CommandContext::new(auth.user_id);
    let response =
        execute_command(&PropertyService, &mut tx, &ctx, PendingCommand::Add { json }).await?;
    tx.commit().await?;
    Ok(command_reply(response))
}

/// PUT /api/v1/properties/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(json): Json<Value>,
) -> AppResult<CommandReply> {
    let mut tx = state.pool.begin().await?;
    let ctx = CommandContext::new(auth.user_id);
    let response =
        execute_command(&PropertyService, &mut tx, &ctx, PendingCommand::Edit { id, json })
            .await?;
    tx.commit().await?;
    Ok(command_reply(response))
}

/// DELETE /api/v1/properties/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<CommandReply> {
    let mut tx = state.pool.begin().await?;
    let ctx = transaction::start(&mut tx, CommandContext::new(auth.user_id)).await?;
    let response =
        execute_command(&PropertyService, &mut tx, &ctx, PendingCommand::Delete { id }).await?;
    tx.commit().await?;
    Ok(command_reply(response))
}
