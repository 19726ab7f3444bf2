//! Repository for the `command_histories` table.

use cytomine_core::types::DbId;
use sqlx::PgExecutor;

use crate::filter::limit;
use crate::models::command_history::{CommandHistory, NewCommandHistory};

/// Column list of a history row joined with its command (`c`) and actor (`u`).
const COLUMNS: &str = "\
    h.id, h.command_id, h.user_id, u.username, h.project_id, h.message, \
    h.prefix_action, c.service_name, c.command_type, h.created_at";

const FROM: &str = "command_histories h \
    JOIN commands c ON c.id = h.command_id \
    JOIN users u ON u.id = h.user_id";

/// Provides append and paginated reads of the activity feed.
pub struct CommandHistoryRepo;

impl CommandHistoryRepo {
    /// Append a history row. History rows are never updated.
    pub async fn insert<'e, E>(executor: E, input: &NewCommandHistory) -> Result<DbId, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO command_histories (command_id, user_id, project_id, message, prefix_action)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.command_id)
        .bind(input.user_id)
        .bind(input.project_id)
        .bind(&input.message)
        .bind(input.prefix_action)
        .fetch_one(executor)
        .await
    }

    /// History of one user, most recent first.
    pub async fn list_for_user<'e, E>(
        executor: E,
        user_id: DbId,
        offset: i64,
        max: i64,
    ) -> Result<Vec<CommandHistory>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE h.user_id = $1
             ORDER BY h.created_at DESC, h.id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CommandHistory>(&query)
            .bind(user_id)
            .bind(limit(max))
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    pub async fn count_for_user<'e, E>(executor: E, user_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM command_histories WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(executor)
        .await
    }

    /// History of one project, most recent first.
    pub async fn list_for_project<'e, E>(
        executor: E,
        project_id: DbId,
        offset: i64,
        max: i64,
    ) -> Result<Vec<CommandHistory>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE h.project_id = $1
             ORDER BY h.created_at DESC, h.id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CommandHistory>(&query)
            .bind(project_id)
            .bind(limit(max))
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    pub async fn count_for_project<'e, E>(executor: E, project_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM command_histories WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(executor)
        .await
    }

    /// History rows written for one command, oldest first.
    pub async fn list_for_command<'e, E>(
        executor: E,
        command_id: DbId,
    ) -> Result<Vec<CommandHistory>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE h.command_id = $1 ORDER BY h.id ASC"
        );
        sqlx::query_as::<_, CommandHistory>(&query)
            .bind(command_id)
            .fetch_all(executor)
            .await
    }
}
