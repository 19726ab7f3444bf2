//! Projects: the unit of work owning properties and, through the command
//! log, the activity feed of their members.

use async_trait::async_trait;
use cytomine_core::error::CoreError;
use cytomine_core::json::retrieve_long_id;
use cytomine_core::search::{DomainSchema, SqlConstraints};
use cytomine_core::types::DbId;
use cytomine_db::models::project::{ProjectInput, PROJECT_SCHEMA};
use cytomine_db::repositories::{OntologyRepo, ProjectRepo, PropertyRepo};
use serde_json::Value;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::services::command::{execute_command, CommandContext, PendingCommand};
use crate::services::model::{parse_input, require_name, to_json, ModelService};
use crate::services::property::PropertyService;

pub struct ProjectService;

impl ProjectService {
    async fn validate(&self, conn: &mut PgConnection, json: &Value) -> AppResult<ProjectInput> {
        let input: ProjectInput = parse_input(self.domain_name(), json)?;
        require_name(self.domain_name(), &input.name)?;
        if let Some(ontology_id) = input.ontology {
            OntologyRepo::find_by_id(&mut *conn, ontology_id)
                .await?
                .ok_or_else(|| AppError::not_found("Ontology", ontology_id))?;
        }
        Ok(input)
    }
}

#[async_trait]
impl ModelService for ProjectService {
    fn schema(&self) -> &'static DomainSchema {
        &PROJECT_SCHEMA
    }

    fn message_params(&self, object: &Value) -> Vec<String> {
        vec![
            object["id"].to_string(),
            object["name"].as_str().unwrap_or_default().to_string(),
        ]
    }

    fn project_of(&self, object: &Value) -> Option<DbId> {
        retrieve_long_id(object)
    }

    /// A deleted project no longer owns the command that deleted it.
    fn project_of_deleted(&self, _object: &Value) -> Option<DbId> {
        None
    }

    async fn find(&self, conn: &mut PgConnection, id: DbId) -> AppResult<Option<Value>> {
        ProjectRepo::find_by_id(conn, id)
            .await?
            .map(|p| to_json(&p))
            .transpose()
    }

    async fn insert(
        &self,
        conn: &mut PgConnection,
        id: Option<DbId>,
        json: &Value,
    ) -> AppResult<Value> {
        let input = self.validate(conn, json).await?;
        let project = ProjectRepo::insert(conn, id, &input).await?;
        to_json(&project)
    }

    async fn update(&self, conn: &mut PgConnection, id: DbId, json: &Value) -> AppResult<Value> {
        let input = self.validate(conn, json).await?;
        let project = ProjectRepo::update(conn, id, &input)
            .await?
            .ok_or_else(|| AppError::not_found(self.domain_name(), id))?;
        to_json(&project)
    }

    async fn remove(&self, conn: &mut PgConnection, id: DbId) -> AppResult<()> {
        if !ProjectRepo::delete(conn, id).await? {
            return Err(AppError::not_found(self.domain_name(), id));
        }
        Ok(())
    }

    async fn check_do_not_already_exist(
        &self,
        conn: &mut PgConnection,
        id: Option<DbId>,
        json: &Value,
    ) -> AppResult<()> {
        let Some(name) = json["name"].as_str() else {
            return Ok(());
        };
        match ProjectRepo::find_by_name(conn, name).await? {
            Some(existing) if Some(existing.id) != id => Err(CoreError::Conflict(format!(
                "Project {name} already exist"
            ))
            .into()),
            _ => Ok(()),
        }
    }

    /// Properties are deleted as silent commands of the same transaction.
    async fn delete_dependencies(
        &self,
        conn: &mut PgConnection,
        object: &Value,
        ctx: &CommandContext,
    ) -> AppResult<()> {
        let Some(project_id) = retrieve_long_id(object) else {
            return Ok(());
        };
        let properties =
            PropertyRepo::list_for_project(&mut *conn, project_id, &SqlConstraints::default())
                .await?;
        let silent = ctx.silent();
        for property in properties {
            execute_command(
                &PropertyService,
                conn,
                &silent,
                PendingCommand::Delete { id: property.id },
            )
            .await?;
        }
        Ok(())
    }
}
