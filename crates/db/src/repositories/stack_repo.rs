//! Repository for the `undo_stack_items` and `redo_stack_items` tables.
//!
//! Both tables draw their ids from `stack_item_seq`, so an id is also the
//! item's position in the user's undo/redo log.

use cytomine_core::types::DbId;
use cytomine_core::undo::StackKind;
use sqlx::PgExecutor;

use crate::models::stack::StackItem;

/// Column list of a stack item joined with its command (`s` = item, `c` = command).
const COLUMNS: &str = "s.id, s.user_id, s.command_id, s.transaction_id, c.refuse_undo, s.created_at";

fn table(kind: StackKind) -> &'static str {
    match kind {
        StackKind::Undo => "undo_stack_items",
        StackKind::Redo => "redo_stack_items",
    }
}

/// Provides push/list/remove operations on the two stacks.
pub struct StackRepo;

impl StackRepo {
    /// Push an item for `command_id` on top of a user's stack.
    pub async fn push<'e, E>(
        executor: E,
        kind: StackKind,
        user_id: DbId,
        command_id: DbId,
        transaction_id: Option<DbId>,
    ) -> Result<StackItem, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "WITH s AS (
                INSERT INTO {} (user_id, command_id, transaction_id)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             SELECT {COLUMNS} FROM s JOIN commands c ON c.id = s.command_id",
            table(kind)
        );
        sqlx::query_as::<_, StackItem>(&query)
            .bind(user_id)
            .bind(command_id)
            .bind(transaction_id)
            .fetch_one(executor)
            .await
    }

    /// All items of a user's stack, oldest first.
    pub async fn list_for_user<'e, E>(
        executor: E,
        kind: StackKind,
        user_id: DbId,
    ) -> Result<Vec<StackItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM {} s JOIN commands c ON c.id = s.command_id
             WHERE s.user_id = $1 ORDER BY s.id ASC",
            table(kind)
        );
        sqlx::query_as::<_, StackItem>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Remove an item from a stack. Returns `true` if a row was removed.
    pub async fn remove<'e, E>(executor: E, kind: StackKind, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("DELETE FROM {} WHERE id = $1", table(kind));
        let result = sqlx::query(&query).bind(id).execute(executor).await?;
        Ok(result.rows_affected() > 0)
    }
}
