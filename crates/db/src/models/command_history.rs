//! Command history rows: the append-only activity feed.

use cytomine_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A `command_histories` row joined with its command and actor.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandHistory {
    pub id: DbId,
    #[serde(rename = "command")]
    pub command_id: DbId,
    #[serde(rename = "user")]
    pub user_id: DbId,
    pub username: String,
    #[serde(rename = "project")]
    pub project_id: Option<DbId>,
    pub message: String,
    pub prefix_action: String,
    pub service_name: String,
    #[serde(rename = "type")]
    pub command_type: String,
    #[serde(rename = "created")]
    pub created_at: Timestamp,
}

/// DTO for appending a history row.
#[derive(Debug, Clone)]
pub struct NewCommandHistory {
    pub command_id: DbId,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub message: String,
    pub prefix_action: &'static str,
}
