//! Repository for the `transactions` table.

use sqlx::PgExecutor;

use crate::models::transaction::Transaction;

pub struct TransactionRepo;

impl TransactionRepo {
    /// Open a new command transaction.
    pub async fn create<'e, E>(executor: E) -> Result<Transaction, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Transaction>(
            "INSERT INTO transactions DEFAULT VALUES RETURNING id, created_at",
        )
        .fetch_one(executor)
        .await
    }
}
