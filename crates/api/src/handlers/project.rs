//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use cytomine_core::pagination::Page;
use cytomine_core::search::{domain_associated_filters, to_sql_constraints, AssociatedFilters};
use cytomine_core::types::DbId;
use cytomine_db::models::command_history::CommandHistory;
use cytomine_db::models::project::{Project, PROJECT_SCHEMA};
use cytomine_db::models::property::{Property, PROPERTY_SCHEMA};
use cytomine_db::repositories::{CommandHistoryRepo, ProjectRepo, PropertyRepo};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{ListParams, PaginationParams};
use crate::response::{command_reply, CommandReply, DataResponse};
use crate::services::command::{execute_command, CommandContext, PendingCommand};
use crate::services::project::ProjectService;
use crate::services::transaction;
use crate::state::AppState;

/// GET /api/v1/projects
///
/// Accepts `max`, `offset` and `property[operator]=value` filters.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Page<Project>>> {
    let params = ListParams::from_pairs(pairs)?;
    let AssociatedFilters { filters, leftovers } =
        domain_associated_filters(&PROJECT_SCHEMA, params.search)?;
    if !leftovers.is_empty() {
        tracing::debug!(?leftovers, "Ignoring filters on unknown project fields");
    }
    let constraints = to_sql_constraints(&filters);

    let size = ProjectRepo::count(&state.pool, &constraints).await?;
    let projects = ProjectRepo::list(&state.pool, &constraints, params.offset, params.max).await?;
    Ok(Json(Page::new(projects, params.offset, params.max, size)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(json): Json<Value>,
) -> AppResult<CommandReply> {
    let mut tx = state.pool.begin().await?;
    let ctx = CommandContext::new(auth.user_id);
    let response =
        execute_command(&ProjectService, &mut tx, &ctx, PendingCommand::Add { json }).await?;
    tx.commit().await?;
    Ok(command_reply(response))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(json): Json<Value>,
) -> AppResult<CommandReply> {
    let mut tx = state.pool.begin().await?;
    let ctx = CommandContext::new(auth.user_id);
    let response =
        execute_command(&ProjectService, &mut tx, &ctx, PendingCommand::Edit { id, json }).await?;
    tx.commit().await?;
    Ok(command_reply(response))
}

/// DELETE /api/v1/projects/{id}
///
/// The project's properties are deleted in the same transaction and come
/// back with it on undo.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<CommandReply> {
    let mut tx = state.pool.begin().await?;
    let ctx = transaction::start(&mut tx, CommandContext::new(auth.user_id)).await?;
    let response =
        execute_command(&ProjectService, &mut tx, &ctx, PendingCommand::Delete { id }).await?;
    tx.commit().await?;
    Ok(command_reply(response))
}

/// GET /api/v1/projects/{id}/properties
///
/// Accepts `property[operator]=value` filters on `key` and `value`.
pub async fn list_properties(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<DataResponse<Vec<Property>>>> {
    find_project(&state, id).await?;
    let params = ListParams::from_pairs(pairs)?;
    let AssociatedFilters { filters, .. } =
        domain_associated_filters(&PROPERTY_SCHEMA, params.search)?;
    let properties =
        PropertyRepo::list_for_project(&state.pool, id, &to_sql_constraints(&filters)).await?;
    Ok(Json(DataResponse { data: properties }))
}

/// GET /api/v1/projects/{id}/command-history
///
/// History of every command recorded against the project, most recent first.
pub async fn command_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<CommandHistory>>> {
    let (offset, max) = (params.offset(), params.max());
    let size = CommandHistoryRepo::count_for_project(&state.pool, id).await?;
    let items = CommandHistoryRepo::list_for_project(&state.pool, id, offset, max).await?;
    Ok(Json(Page::new(items, offset, max, size)))
}

async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))
}
