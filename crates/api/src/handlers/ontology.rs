//! Handlers for the `/ontologies` resource.
//!
//! Ontologies are few, so list filters are evaluated in memory on their JSON
//! form rather than translated to SQL.

use axum::extract::{Path, Query, State};
use axum::Json;
use cytomine_core::pagination::Page;
use cytomine_core::search::{domain_associated_filters, AssociatedFilters, Predicate};
use cytomine_core::types::DbId;
use cytomine_db::models::ontology::{Ontology, ONTOLOGY_SCHEMA};
use cytomine_db::repositories::OntologyRepo;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{command_reply, CommandReply, DataResponse};
use crate::services::command::{execute_command, CommandContext, PendingCommand};
use crate::services::model::to_json;
use crate::services::ontology::OntologyService;
use crate::services::transaction;
use crate::state::AppState;

/// GET /api/v1/ontologies
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Page<Value>>> {
    let params = ListParams::from_pairs(pairs)?;
    let AssociatedFilters { filters, .. } =
        domain_associated_filters(&ONTOLOGY_SCHEMA, params.search)?;
    let predicate = Predicate::from_filters(&filters);

    let mut matching = Vec::new();
    for ontology in OntologyRepo::list(&state.pool).await? {
        let json = to_json(&ontology)?;
        if predicate.matches(&json) {
            matching.push(json);
        }
    }
    Ok(Json(Page::slice(matching, params.offset, params.max)))
}

/// GET /api/v1/ontologies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ontology>>> {
    let ontology = OntologyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Ontology", id))?;
    Ok(Json(DataResponse { data: ontology }))
}

/// POST /api/v1/ontologies
///
/// The authenticated user becomes the ontology's creator.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(mut json): Json<Value>,
) -> AppResult<CommandReply> {
    if let Some(map) = json.as_object_mut() {
        map.insert("user".into(), json!(auth.user_id));
    }
    let mut tx = state.pool.begin().await?;
    let ctx = CommandContext::new(auth.user_id);
    let response =
        execute_command(&OntologyService, &mut tx, &ctx, PendingCommand::Add { json }).await?;
    tx.commit().await?;
    Ok(command_reply(response))
}

/// PUT /api/v1/ontologies/{id}
///
/// The creator is kept: a `user` key in the payload is ignored.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(mut json): Json<Value>,
) -> AppResult<CommandReply> {
    if let Some(map) = json.as_object_mut() {
        map.remove("user");
    }
    let mut tx = state.pool.begin().await?;
    let ctx = CommandContext::new(auth.user_id);
    let response =
        execute_command(&OntologyService, &mut tx, &ctx, PendingCommand::Edit { id, json })
            .await?;
    tx.commit().await?;
    Ok(command_reply(response))
}

/// DELETE /api/v1/ontologies/{id}
///
/// Rejected while a project still references the ontology.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<CommandReply> {
    let mut tx = state.pool.begin().await?;
    let ctx = transaction::start(&mut tx, CommandContext::new(auth.user_id)).await?;
    let response =
        execute_command(&OntologyService, &mut tx, &ctx, PendingCommand::Delete { id }).await?;
    tx.commit().await?;
    Ok(command_reply(response))
}
