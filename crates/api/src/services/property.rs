//! Project properties: free key/value pairs, one value per key and project.

use async_trait::async_trait;
use cytomine_core::error::CoreError;
use cytomine_core::search::DomainSchema;
use cytomine_core::types::DbId;
use cytomine_db::models::property::{PropertyInput, PROPERTY_SCHEMA};
use cytomine_db::repositories::{ProjectRepo, PropertyRepo};
use serde_json::Value;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::services::model::{parse_input, to_json, ModelService};

pub struct PropertyService;

impl PropertyService {
    async fn validate(&self, conn: &mut PgConnection, json: &Value) -> AppResult<PropertyInput> {
        let input: PropertyInput = parse_input(self.domain_name(), json)?;
        if input.key.trim().is_empty() {
            return Err(CoreError::Validation("Property key must not be blank".into()).into());
        }
        ProjectRepo::find_by_id(&mut *conn, input.project)
            .await?
            .ok_or_else(|| AppError::not_found("Project", input.project))?;
        Ok(input)
    }
}

#[async_trait]
impl ModelService for PropertyService {
    fn schema(&self) -> &'static DomainSchema {
        &PROPERTY_SCHEMA
    }

    fn message_params(&self, object: &Value) -> Vec<String> {
        vec![
            object["id"].to_string(),
            object["key"].as_str().unwrap_or_default().to_string(),
        ]
    }

    fn project_of(&self, object: &Value) -> Option<DbId> {
        object["project"].as_i64()
    }

    async fn find(&self, conn: &mut PgConnection, id: DbId) -> AppResult<Option<Value>> {
        PropertyRepo::find_by_id(conn, id)
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
        let property = PropertyRepo::insert(conn, id, &input).await?;
        to_json(&property)
    }

    async fn update(&self, conn: &mut PgConnection, id: DbId, json: &Value) -> AppResult<Value> {
        let input = self.validate(conn, json).await?;
        let property = PropertyRepo::update(conn, id, &input)
            .await?
            .ok_or_else(|| AppError::not_found(self.domain_name(), id))?;
        to_json(&property)
    }

    async fn remove(&self, conn: &mut PgConnection, id: DbId) -> AppResult<()> {
        if !PropertyRepo::delete(conn, id).await? {
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
        let (Some(project_id), Some(key)) = (json["project"].as_i64(), json["key"].as_str()) else {
            return Ok(());
        };
        match PropertyRepo::find_by_project_and_key(conn, project_id, key).await? {
            Some(existing) if Some(existing.id) != id => Err(CoreError::Conflict(format!(
                "Property {key} already exist in project {project_id}"
            ))
            .into()),
            _ => Ok(()),
        }
    }
}
