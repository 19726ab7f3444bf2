//! Ontologies: vocabularies that projects may reference.

use async_trait::async_trait;
use cytomine_core::error::CoreError;
use cytomine_core::json::retrieve_long_id;
use cytomine_core::search::DomainSchema;
use cytomine_core::types::DbId;
use cytomine_db::models::ontology::{OntologyInput, ONTOLOGY_SCHEMA};
use cytomine_db::repositories::{OntologyRepo, ProjectRepo};
use serde_json::Value;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::services::command::CommandContext;
use crate::services::model::{parse_input, require_name, to_json, ModelService};

pub struct OntologyService;

impl OntologyService {
    fn validate(&self, json: &Value) -> AppResult<OntologyInput> {
        let input: OntologyInput = parse_input(self.domain_name(), json)?;
        require_name(self.domain_name(), &input.name)?;
        Ok(input)
    }
}

#[async_trait]
impl ModelService for OntologyService {
    fn schema(&self) -> &'static DomainSchema {
        &ONTOLOGY_SCHEMA
    }

    fn message_params(&self, object: &Value) -> Vec<String> {
        vec![
            object["id"].to_string(),
            object["name"].as_str().unwrap_or_default().to_string(),
        ]
    }

    async fn find(&self, conn: &mut PgConnection, id: DbId) -> AppResult<Option<Value>> {
        OntologyRepo::find_by_id(conn, id)
            .await?
            .map(|o| to_json(&o))
            .transpose()
    }

    async fn insert(
        &self,
        conn: &mut PgConnection,
        id: Option<DbId>,
        json: &Value,
    ) -> AppResult<Value> {
        let input = self.validate(json)?;
        let ontology = OntologyRepo::insert(conn, id, &input).await?;
        to_json(&ontology)
    }

    async fn update(&self, conn: &mut PgConnection, id: DbId, json: &Value) -> AppResult<Value> {
        let input = self.validate(json)?;
        let ontology = OntologyRepo::update(conn, id, &input)
            .await?
            .ok_or_else(|| AppError::not_found(self.domain_name(), id))?;
        to_json(&ontology)
    }

    async fn remove(&self, conn: &mut PgConnection, id: DbId) -> AppResult<()> {
        if !OntologyRepo::delete(conn, id).await? {
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
        match OntologyRepo::find_by_name(conn, name).await? {
            Some(existing) if Some(existing.id) != id => Err(CoreError::Conflict(format!(
                "Ontology {name} already exist"
            ))
            .into()),
            _ => Ok(()),
        }
    }

    /// An ontology still referenced by a project cannot be deleted.
    async fn delete_dependencies(
        &self,
        conn: &mut PgConnection,
        object: &Value,
        _ctx: &CommandContext,
    ) -> AppResult<()> {
        let Some(id) = retrieve_long_id(object) else {
            return Ok(());
        };
        let used_by = ProjectRepo::count_by_ontology(conn, id).await?;
        if used_by > 0 {
            return Err(CoreError::Constraint(format!(
                "Ontology {id} is still used by {used_by} project(s)"
            ))
            .into());
        }
        Ok(())
    }
}
