//! The per-domain service contract used by the command engine.
//!
//! A [`ModelService`] knows how to load, insert, update and remove the objects
//! of one domain from their JSON form. The provided `create`, `edit` and
//! `destroy` methods wrap those primitives into [`CommandResponse`]s; they are
//! what commands call when first executed and again when undone or redone.

use async_trait::async_trait;
use cytomine_core::command::{CommandKind, CommandResponse, Replay};
use cytomine_core::error::CoreError;
use cytomine_core::json::{as_object, retrieve_long_id};
use cytomine_core::naming;
use cytomine_core::search::DomainSchema;
use cytomine_core::types::DbId;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::services::command::CommandContext;

#[async_trait]
pub trait ModelService: Send + Sync {
    /// Filterable fields and table of the domain.
    fn schema(&self) -> &'static DomainSchema;

    /// Domain name, e.g. `Project`.
    fn domain_name(&self) -> &'static str {
        self.schema().domain
    }

    /// Service name recorded on commands, e.g. `ProjectService`.
    fn service_name(&self) -> String {
        naming::service_name(self.domain_name())
    }

    /// Whether commands of this domain are pushed on the undo stack.
    fn save_on_undo_redo_stack(&self) -> bool {
        true
    }

    /// Parameters of the action message: the id, then a label.
    fn message_params(&self, object: &Value) -> Vec<String>;

    /// Project the object belongs to, recorded on its commands.
    fn project_of(&self, _object: &Value) -> Option<DbId> {
        None
    }

    /// Project recorded on the delete command of `object`.
    fn project_of_deleted(&self, object: &Value) -> Option<DbId> {
        self.project_of(object)
    }

    /// Load the JSON form of an object.
    async fn find(&self, conn: &mut PgConnection, id: DbId) -> AppResult<Option<Value>>;

    /// Insert an object. `id` is set when a deleted object is restored.
    async fn insert(&self, conn: &mut PgConnection, id: Option<DbId>, json: &Value)
        -> AppResult<Value>;

    /// Replace the writable fields of an existing object.
    async fn update(&self, conn: &mut PgConnection, id: DbId, json: &Value) -> AppResult<Value>;

    async fn remove(&self, conn: &mut PgConnection, id: DbId) -> AppResult<()>;

    /// Reject a write that would duplicate an existing object. `id` is the
    /// object being written, which never conflicts with itself.
    async fn check_do_not_already_exist(
        &self,
        _conn: &mut PgConnection,
        _id: Option<DbId>,
        _json: &Value,
    ) -> AppResult<()> {
        Ok(())
    }

    /// Delete or reject dependent objects before `object` is deleted.
    ///
    /// Dependents deleted here go through the command engine so they are
    /// undone together with `object` when `ctx` carries a transaction.
    async fn delete_dependencies(
        &self,
        _conn: &mut PgConnection,
        _object: &Value,
        _ctx: &CommandContext,
    ) -> AppResult<()> {
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Provided operations
    // -----------------------------------------------------------------------

    /// Load an object or fail with `NotFound`.
    async fn retrieve(&self, conn: &mut PgConnection, id: DbId) -> AppResult<Value> {
        self.find(conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(self.domain_name(), id))
    }

    /// Insert the object described by `json`, keeping its `id` if present.
    async fn create(
        &self,
        conn: &mut PgConnection,
        json: &Value,
        print_message: bool,
    ) -> AppResult<CommandResponse> {
        as_object(json)?;
        let id = retrieve_long_id(json);
        self.check_do_not_already_exist(conn, id, json).await?;
        let object = self.insert(conn, id, json).await?;
        Ok(self.response(CommandKind::Add, object, print_message))
    }

    /// Overwrite the object identified by `json["id"]` with `json`.
    async fn edit(
        &self,
        conn: &mut PgConnection,
        json: &Value,
        print_message: bool,
    ) -> AppResult<CommandResponse> {
        let id = require_id(json)?;
        self.retrieve(conn, id).await?;
        self.check_do_not_already_exist(conn, Some(id), json).await?;
        let object = self.update(conn, id, json).await?;
        Ok(self.response(CommandKind::Edit, object, print_message))
    }

    /// Remove the object identified by `json["id"]`.
    async fn destroy(
        &self,
        conn: &mut PgConnection,
        json: &Value,
        print_message: bool,
    ) -> AppResult<CommandResponse> {
        let id = require_id(json)?;
        let object = self.retrieve(conn, id).await?;
        self.remove(conn, id).await?;
        Ok(self.response(CommandKind::Delete, object, print_message))
    }

    /// Apply the service operation an undo or redo asks for.
    async fn replay(
        &self,
        conn: &mut PgConnection,
        replay: Replay,
        print_message: bool,
    ) -> AppResult<CommandResponse> {
        match replay {
            Replay::Create(json) => self.create(conn, &json, print_message).await,
            Replay::Edit(json) => self.edit(conn, &json, print_message).await,
            Replay::Destroy(json) => self.destroy(conn, &json, print_message).await,
        }
    }

    fn response(&self, kind: CommandKind, object: Value, print_message: bool) -> CommandResponse {
        let params = self.message_params(&object);
        CommandResponse::for_object(kind, self.domain_name(), object, &params, print_message)
    }
}

/// The `id` of a JSON payload, required for edits and deletions.
pub fn require_id(json: &Value) -> AppResult<DbId> {
    retrieve_long_id(json)
        .ok_or_else(|| CoreError::Validation("Object has no valid 'id'".into()).into())
}

/// Deserialize the writable fields of a domain object from its JSON form.
pub fn parse_input<T: DeserializeOwned>(domain: &str, json: &Value) -> AppResult<T> {
    serde_json::from_value(json.clone())
        .map_err(|e| CoreError::Validation(format!("Invalid {domain}: {e}")).into())
}

/// Serialize a row into its JSON form.
pub fn to_json<T: serde::Serialize>(row: &T) -> AppResult<Value> {
    serde_json::to_value(row).map_err(|e| AppError::InternalError(e.to_string()))
}

/// Reject blank names, which the storage layer would otherwise accept.
pub fn require_name(domain: &str, name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{domain} name must not be blank")).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn id_is_required() {
        assert_eq!(require_id(&json!({"id": "5"})).unwrap(), 5);
        assert_matches!(
            require_id(&json!({"name": "x"})),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(require_name("Project", "demo").is_ok());
        assert_matches!(
            require_name("Project", "  "),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn input_errors_are_validation_errors() {
        #[derive(Debug, serde::Deserialize)]
        struct Input {
            #[allow(dead_code)]
            name: String,
        }
        assert_matches!(
            parse_input::<Input>("Project", &json!({"name": 3})),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
