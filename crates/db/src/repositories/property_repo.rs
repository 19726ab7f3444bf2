//! Repository for the `properties` table.

use cytomine_core::search::SqlConstraints;
use cytomine_core::types::DbId;
use sqlx::PgExecutor;

use crate::filter::{bind_values, build_where};
use crate::models::property::{Property, PropertyInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, key, value, created_at, updated_at";

/// Provides CRUD operations for project properties.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a property, honouring `id` and `input.created` when restoring.
    pub async fn insert<'e, E>(
        executor: E,
        id: Option<DbId>,
        input: &PropertyInput,
    ) -> Result<Property, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO properties (id, project_id, key, value, created_at)
             VALUES (COALESCE($1, nextval('domain_id_seq')), $2, $3, $4, COALESCE($5, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(input.project)
            .bind(&input.key)
            .bind(&input.value)
            .bind(input.created)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Property>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the property holding `key` on a project.
    pub async fn find_by_project_and_key<'e, E>(
        executor: E,
        project_id: DbId,
        key: &str,
    ) -> Result<Option<Property>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE project_id = $1 AND key = $2");
        sqlx::query_as::<_, Property>(&query)
            .bind(project_id)
            .bind(key)
            .fetch_optional(executor)
            .await
    }

    /// Properties of a project matching the search constraints, by key.
    pub async fn list_for_project<'e, E>(
        executor: E,
        project_id: DbId,
        constraints: &SqlConstraints,
    ) -> Result<Vec<Property>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let filter = build_where(&["project_id = $1".to_string()], constraints, 2);
        let query = format!(
            "SELECT {COLUMNS} FROM properties {} ORDER BY key ASC, id ASC",
            filter.sql
        );
        bind_values(sqlx::query_as::<_, Property>(&query).bind(project_id), &filter.values)
            .fetch_all(executor)
            .await
    }

    /// Replace the key and value of a property.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &PropertyInput,
    ) -> Result<Option<Property>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE properties SET key = $2, value = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(&input.key)
            .bind(&input.value)
            .fetch_optional(executor)
            .await
    }

    /// Delete a property by ID. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
