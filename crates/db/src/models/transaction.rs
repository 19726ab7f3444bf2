//! Transaction model: a correlation id grouping commands undone together.

use cytomine_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub created_at: Timestamp,
}
