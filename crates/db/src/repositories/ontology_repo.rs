//! Repository for the `ontologies` table.

use cytomine_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::ontology::{Ontology, OntologyInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, user_id, created_at, updated_at";

/// Provides CRUD operations for ontologies.
pub struct OntologyRepo;

impl OntologyRepo {
    /// Insert an ontology, honouring `id` and `input.created` when restoring.
    pub async fn insert<'e, E>(
        executor: E,
        id: Option<DbId>,
        input: &OntologyInput,
    ) -> Result<Ontology, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO ontologies (id, name, user_id, created_at)
             VALUES (COALESCE($1, nextval('domain_id_seq')), $2, $3, COALESCE($4, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ontology>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.user)
            .bind(input.created)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Ontology>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM ontologies WHERE id = $1");
        sqlx::query_as::<_, Ontology>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_name<'e, E>(
        executor: E,
        name: &str,
    ) -> Result<Option<Ontology>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM ontologies WHERE name = $1");
        sqlx::query_as::<_, Ontology>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// List every ontology ordered by name.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Ontology>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM ontologies ORDER BY name ASC");
        sqlx::query_as::<_, Ontology>(&query)
            .fetch_all(executor)
            .await
    }

    /// Rename an ontology. Returns `None` if it does not exist.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &OntologyInput,
    ) -> Result<Option<Ontology>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE ontologies SET name = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ontology>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(executor)
            .await
    }

    /// Delete an ontology by ID. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM ontologies WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
