//! Command log rows.

use cytomine_core::command::{self, CommandKind};
use cytomine_core::diff::diff_objects;
use cytomine_core::error::CoreError;
use cytomine_core::naming::domain_from_service;
use cytomine_core::types::{DbId, Timestamp};
use serde_json::{json, Value};
use sqlx::FromRow;

/// A command row from the `commands` table, joined with its actor's username.
#[derive(Debug, Clone, FromRow)]
pub struct Command {
    pub id: DbId,
    pub command_type: String,
    pub user_id: DbId,
    pub username: String,
    pub transaction_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub service_name: String,
    pub data: Value,
    pub action_message: String,
    pub print_message: bool,
    pub save_on_undo_redo_stack: bool,
    pub refuse_undo: bool,
    pub created_at: Timestamp,
}

impl Command {
    pub fn kind(&self) -> Result<CommandKind, CoreError> {
        self.command_type.parse()
    }

    /// Domain the command applied to, derived from its service name.
    pub fn domain(&self) -> &str {
        domain_from_service(&self.service_name)
    }

    /// JSON form exposed by the command endpoints.
    ///
    /// Edit commands also carry the field-level `changes` between their two
    /// snapshots.
    pub fn to_json(&self) -> Value {
        let kind = self.kind().ok();
        let mut json = json!({
            "id": self.id,
            "created": self.created_at,
            "CLASSNAME": kind.map(|k| k.class_name()),
            "serviceName": self.service_name,
            "action": format!("{} by {}", self.action_message, self.username),
            "data": self.data,
            "user": self.user_id,
            "type": self.command_type,
            "project": self.project_id,
            "transaction": self.transaction_id,
        });
        if kind == Some(CommandKind::Edit) {
            let domain = self.domain();
            let previous = self
                .data
                .get(command::previous_key(domain))
                .unwrap_or(&Value::Null);
            let new = self.data.get(command::new_key(domain)).unwrap_or(&Value::Null);
            json["changes"] = json!(diff_objects(previous, new));
        }
        json
    }
}

/// DTO for inserting a command after it executed.
#[derive(Debug, Clone)]
pub struct NewCommand {
    pub kind: CommandKind,
    pub user_id: DbId,
    pub transaction_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub service_name: String,
    pub data: Value,
    pub action_message: String,
    pub print_message: bool,
    pub save_on_undo_redo_stack: bool,
    pub refuse_undo: bool,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn command(kind: &str, data: Value) -> Command {
        Command {
            id: 3,
            command_type: kind.to_string(),
            user_id: 1,
            username: "alice".into(),
            transaction_id: None,
            project_id: Some(9),
            service_name: "ProjectService".into(),
            data,
            action_message: "Project 9 (demo) edited".into(),
            print_message: true,
            save_on_undo_redo_stack: true,
            refuse_undo: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn json_layout() {
        let json = command("ADD", json!({"id": 9})).to_json();
        assert_eq!(json["CLASSNAME"], "AddCommand");
        assert_eq!(json["action"], "Project 9 (demo) edited by alice");
        assert_eq!(json["type"], "ADD");
        assert!(json.get("changes").is_none());
    }

    #[test]
    fn edit_json_has_changes() {
        let data = command::edit_data("Project", json!({"name": "a"}), json!({"name": "b"}));
        let json = command("EDIT", data).to_json();
        assert_eq!(json["changes"][0]["field"], "name");
        assert_eq!(json["changes"][0]["status"], "changed");
    }
}
