//! Repository for the `commands` table.

use cytomine_core::command::CommandKind;
use cytomine_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::command::{Command, NewCommand};

/// Column list of a command joined with its actor (`c` = commands, `u` = users).
const COLUMNS: &str = "\
    c.id, c.command_type, c.user_id, u.username, c.transaction_id, c.project_id, \
    c.service_name, c.data, c.action_message, c.print_message, \
    c.save_on_undo_redo_stack, c.refuse_undo, c.created_at";

/// Provides insert and lookup operations for the command log.
pub struct CommandRepo;

impl CommandRepo {
    /// Persist an executed command.
    pub async fn insert<'e, E>(executor: E, input: &NewCommand) -> Result<Command, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "WITH c AS (
                INSERT INTO commands (command_type, user_id, transaction_id, project_id,
                    service_name, data, action_message, print_message,
                    save_on_undo_redo_stack, refuse_undo)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
             )
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.user_id"
        );
        sqlx::query_as::<_, Command>(&query)
            .bind(input.kind.as_str())
            .bind(input.user_id)
            .bind(input.transaction_id)
            .bind(input.project_id)
            .bind(&input.service_name)
            .bind(&input.data)
            .bind(&input.action_message)
            .bind(input.print_message)
            .bind(input.save_on_undo_redo_stack)
            .bind(input.refuse_undo)
            .fetch_one(executor)
            .await
    }

    /// Find a command by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Command>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM commands c JOIN users u ON u.id = c.user_id WHERE c.id = $1"
        );
        sqlx::query_as::<_, Command>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find several commands by ID. Missing ids are skipped.
    pub async fn find_by_ids<'e, E>(executor: E, ids: &[DbId]) -> Result<Vec<Command>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM commands c JOIN users u ON u.id = c.user_id \
             WHERE c.id = ANY($1) ORDER BY c.id"
        );
        sqlx::query_as::<_, Command>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// Delete commands, optionally restricted to one service and to commands
    /// created strictly after `after`, most recent first.
    pub async fn list_delete_commands<'e, E>(
        executor: E,
        service_name: Option<&str>,
        after: Option<Timestamp>,
    ) -> Result<Vec<Command>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM commands c JOIN users u ON u.id = c.user_id
             WHERE c.command_type = $1
               AND ($2::TEXT IS NULL OR c.service_name = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR c.created_at > $3)
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, Command>(&query)
            .bind(CommandKind::Delete.as_str())
            .bind(service_name)
            .bind(after)
            .fetch_all(executor)
            .await
    }
}
