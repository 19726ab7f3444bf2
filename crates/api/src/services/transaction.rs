//! Transactions group commands that are undone and redone together.

use cytomine_db::repositories::TransactionRepo;
use sqlx::PgConnection;

use crate::error::AppResult;
use crate::services::command::CommandContext;

/// Start a transaction for `ctx`: every command executed with the returned
/// context joins it.
pub async fn start(conn: &mut PgConnection, ctx: CommandContext) -> AppResult<CommandContext> {
    let transaction = TransactionRepo::create(conn).await?;
    tracing::debug!(transaction_id = transaction.id, user_id = ctx.user_id, "Transaction started");
    Ok(ctx.in_transaction(transaction.id))
}
