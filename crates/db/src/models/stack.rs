//! Undo and redo stack items.

use cytomine_core::types::{DbId, Timestamp};
use cytomine_core::undo::StackEntry;
use serde::Serialize;
use sqlx::FromRow;

/// A row of `undo_stack_items` or `redo_stack_items`, with the `refuse_undo`
/// flag of its command.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StackItem {
    pub id: DbId,
    pub user_id: DbId,
    pub command_id: DbId,
    pub transaction_id: Option<DbId>,
    pub refuse_undo: bool,
    pub created_at: Timestamp,
}

impl From<&StackItem> for StackEntry {
    fn from(item: &StackItem) -> Self {
        StackEntry {
            seq: item.id,
            user_id: item.user_id,
            command_id: item.command_id,
            transaction_id: item.transaction_id,
            refuse_undo: item.refuse_undo,
        }
    }
}
