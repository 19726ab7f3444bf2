//! Command model: the three kinds of mutating operations, the payloads they
//! record, and how a recorded command is replayed for undo and redo.

use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::CoreError;
use crate::naming;

/// HTTP-like status of a successful command.
pub const SUCCESS_STATUS: u16 = 200;

/// Prefix of the `previous` snapshot key in edit command data.
const PREVIOUS_PREFIX: &str = "previous";

/// Prefix of the `new` snapshot key in edit command data.
const NEW_PREFIX: &str = "new";

/// Namespace of callback method names understood by web clients.
const CALLBACK_NAMESPACE: &str = "be.cytomine";

// ---------------------------------------------------------------------------
// Command kind
// ---------------------------------------------------------------------------

/// Discriminator of a stored command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandKind {
    Add,
    Edit,
    Delete,
}

impl CommandKind {
    /// Value stored in the `command_type` column and exposed as `type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Edit => "EDIT",
            Self::Delete => "DELETE",
        }
    }

    /// Class name exposed to clients as `CLASSNAME`.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Add => "AddCommand",
            Self::Edit => "EditCommand",
            Self::Delete => "DeleteCommand",
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            Self::Add => "added",
            Self::Edit => "edited",
            Self::Delete => "deleted",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADD" => Ok(Self::Add),
            "EDIT" => Ok(Self::Edit),
            "DELETE" => Ok(Self::Delete),
            other => Err(CoreError::Internal(format!("Unknown command type '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// History prefix
// ---------------------------------------------------------------------------

/// Prefix of a command history row: the original execution, an undo or a redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPrefix {
    Execute,
    Undo,
    Redo,
}

impl HistoryPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Execute => "",
            Self::Undo => "UNDO",
            Self::Redo => "REDO",
        }
    }
}

// ---------------------------------------------------------------------------
// Recorded data
// ---------------------------------------------------------------------------

/// Key of the pre-update snapshot in edit data (`previousProject`).
pub fn previous_key(domain: &str) -> String {
    format!("{PREVIOUS_PREFIX}{domain}")
}

/// Key of the post-update snapshot in edit data (`newProject`).
pub fn new_key(domain: &str) -> String {
    format!("{NEW_PREFIX}{domain}")
}

/// Data recorded by an edit command: both snapshots keyed by domain name.
pub fn edit_data(domain: &str, previous: Value, new: Value) -> Value {
    let mut data = Map::new();
    data.insert(previous_key(domain), previous);
    data.insert(new_key(domain), new);
    Value::Object(data)
}

/// Service-level operation needed to replay a recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum Replay {
    Create(Value),
    Edit(Value),
    Destroy(Value),
}

fn snapshot(data: &Value, key: &str) -> Result<Value, CoreError> {
    data.get(key)
        .cloned()
        .ok_or_else(|| CoreError::Internal(format!("Command data has no '{key}' snapshot")))
}

/// Operation that reverses a command: an add is destroyed, a delete is
/// re-created from its backup, an edit re-applies the previous snapshot.
pub fn undo_replay(kind: CommandKind, domain: &str, data: &Value) -> Result<Replay, CoreError> {
    Ok(match kind {
        CommandKind::Add => Replay::Destroy(data.clone()),
        CommandKind::Edit => Replay::Edit(snapshot(data, &previous_key(domain))?),
        CommandKind::Delete => Replay::Create(data.clone()),
    })
}

/// Operation that re-applies a command after it was undone.
pub fn redo_replay(kind: CommandKind, domain: &str, data: &Value) -> Result<Replay, CoreError> {
    Ok(match kind {
        CommandKind::Add => Replay::Create(data.clone()),
        CommandKind::Edit => Replay::Edit(snapshot(data, &new_key(domain))?),
        CommandKind::Delete => Replay::Destroy(data.clone()),
    })
}

// ---------------------------------------------------------------------------
// Messages and responses
// ---------------------------------------------------------------------------

/// Callback method name for a command on a domain (`be.cytomine.AddProjectCommand`).
pub fn callback_method(kind: CommandKind, domain: &str) -> String {
    format!("{CALLBACK_NAMESPACE}.{}{domain}Command", kind.action())
}

/// Human-readable message for a command, e.g. `Project 12 (demo) added`.
///
/// The first parameter is the object id, the optional second one a label.
pub fn action_message(kind: CommandKind, domain: &str, params: &[String]) -> String {
    match params {
        [] => format!("{domain} {}", kind.past_tense()),
        [id] => format!("{domain} {id} {}", kind.past_tense()),
        [id, label, ..] => format!("{domain} {id} ({label}) {}", kind.past_tense()),
    }
}

/// Result of a service-level create/edit/destroy.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub status: u16,
    pub data: Map<String, Value>,
    /// The domain object as JSON; not part of the serialized response.
    #[serde(skip)]
    pub object: Value,
}

impl CommandResponse {
    /// Build the response for a command applied to `object`.
    ///
    /// `data` holds the message, the client callback, the print flag and the
    /// object itself under its lower-cased domain name.
    pub fn for_object(
        kind: CommandKind,
        domain: &str,
        object: Value,
        message_params: &[String],
        print_message: bool,
    ) -> Self {
        let id = object
            .get(crate::json::ID_KEY)
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();

        let mut callback = Map::new();
        callback.insert("method".into(), json!(callback_method(kind, domain)));
        callback.insert(format!("{}ID", naming::response_key(domain)), json!(id));

        let mut data = Map::new();
        data.insert(
            "message".into(),
            json!(action_message(kind, domain, message_params)),
        );
        data.insert("callback".into(), Value::Object(callback));
        data.insert("printMessage".into(), json!(print_message));
        data.insert(naming::response_key(domain), object.clone());

        Self {
            status: SUCCESS_STATUS,
            data,
            object,
        }
    }

    /// Successful response for an undo/redo request with nothing to replay.
    pub fn nothing_to(operation: &str) -> Self {
        let mut data = Map::new();
        data.insert("success".into(), json!(true));
        data.insert("message".into(), json!(format!("Nothing to {operation}")));
        data.insert("callback".into(), Value::Null);
        data.insert("printMessage".into(), json!(true));
        Self {
            status: SUCCESS_STATUS,
            data,
            object: Value::Null,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Message placed in `data` by [`CommandResponse::for_object`].
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }

    /// Record the id of the persisted command in the response payload.
    pub fn set_command_id(&mut self, command_id: crate::types::DbId) {
        self.data.insert("command".into(), json!(command_id));
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn kind_round_trips_through_storage_string() {
        for kind in [CommandKind::Add, CommandKind::Edit, CommandKind::Delete] {
            assert_eq!(kind.as_str().parse::<CommandKind>().unwrap(), kind);
        }
        assert!("MOVE".parse::<CommandKind>().is_err());
    }

    #[test]
    fn class_names() {
        assert_eq!(CommandKind::Delete.class_name(), "DeleteCommand");
    }

    #[test]
    fn edit_data_has_both_snapshots() {
        let data = edit_data("Project", json!({"name": "a"}), json!({"name": "b"}));
        assert_eq!(data["previousProject"], json!({"name": "a"}));
        assert_eq!(data["newProject"], json!({"name": "b"}));
    }

    #[test]
    fn undo_is_the_inverse_operation() {
        let obj = json!({"id": 1});
        assert_eq!(
            undo_replay(CommandKind::Add, "Project", &obj).unwrap(),
            Replay::Destroy(obj.clone())
        );
        assert_eq!(
            undo_replay(CommandKind::Delete, "Project", &obj).unwrap(),
            Replay::Create(obj.clone())
        );
        let data = edit_data("Project", json!({"v": 1}), json!({"v": 2}));
        assert_eq!(
            undo_replay(CommandKind::Edit, "Project", &data).unwrap(),
            Replay::Edit(json!({"v": 1}))
        );
    }

    #[test]
    fn redo_reapplies_the_operation() {
        let obj = json!({"id": 1});
        assert_eq!(
            redo_replay(CommandKind::Add, "Project", &obj).unwrap(),
            Replay::Create(obj.clone())
        );
        assert_eq!(
            redo_replay(CommandKind::Delete, "Project", &obj).unwrap(),
            Replay::Destroy(obj.clone())
        );
        let data = edit_data("Project", json!({"v": 1}), json!({"v": 2}));
        assert_eq!(
            redo_replay(CommandKind::Edit, "Project", &data).unwrap(),
            Replay::Edit(json!({"v": 2}))
        );
    }

    #[test]
    fn edit_replay_without_snapshot_fails() {
        assert_matches!(
            undo_replay(CommandKind::Edit, "Project", &json!({})),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn messages() {
        let params = vec!["12".to_string(), "demo".to_string()];
        assert_eq!(
            action_message(CommandKind::Add, "Project", &params),
            "Project 12 (demo) added"
        );
        assert_eq!(
            action_message(CommandKind::Delete, "Property", &params[..1]),
            "Property 12 deleted"
        );
        assert_eq!(
            callback_method(CommandKind::Edit, "Ontology"),
            "be.cytomine.EditOntologyCommand"
        );
    }

    #[test]
    fn response_payload_layout() {
        let object = json!({"id": 7, "name": "demo"});
        let mut response = CommandResponse::for_object(
            CommandKind::Add,
            "Project",
            object.clone(),
            &["7".into(), "demo".into()],
            true,
        );
        response.set_command_id(99);

        assert!(response.is_success());
        assert_eq!(response.message(), Some("Project 7 (demo) added"));
        assert_eq!(response.data["project"], object);
        assert_eq!(response.data["callback"]["projectID"], json!("7"));
        assert_eq!(
            response.data["callback"]["method"],
            json!("be.cytomine.AddProjectCommand")
        );
        assert_eq!(response.data["command"], json!(99));
    }

    #[test]
    fn nothing_to_undo_is_success() {
        let response = CommandResponse::nothing_to("undo");
        assert!(response.is_success());
        assert_eq!(response.data["success"], json!(true));
        assert_eq!(response.message(), Some("Nothing to undo"));
    }
}
