//! Repository for the `projects` table.

use cytomine_core::search::SqlConstraints;
use cytomine_core::types::DbId;
use sqlx::PgExecutor;

use crate::filter::{bind_values, bind_values_scalar, build_where, limit};
use crate::models::project::{Project, ProjectInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, ontology_id, blind_mode, number_of_annotations, \
                       created_at, updated_at";

/// Provides CRUD and filtered listing for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project. `id` and `input.created` are only set when restoring
    /// a deleted project; otherwise both are generated.
    pub async fn insert<'e, E>(
        executor: E,
        id: Option<DbId>,
        input: &ProjectInput,
    ) -> Result<Project, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO projects (id, name, description, ontology_id, blind_mode,
                number_of_annotations, created_at)
             VALUES (COALESCE($1, nextval('domain_id_seq')), $2, $3, $4, $5, $6, COALESCE($7, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.ontology)
            .bind(input.blind_mode)
            .bind(input.number_of_annotations)
            .bind(input.created)
            .fetch_one(executor)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Project>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a project by its unique name.
    pub async fn find_by_name<'e, E>(
        executor: E,
        name: &str,
    ) -> Result<Option<Project>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE name = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// List projects matching the search constraints, ordered by id.
    /// A `max` of 0 returns every row from `offset`.
    pub async fn list<'e, E>(
        executor: E,
        constraints: &SqlConstraints,
        offset: i64,
        max: i64,
    ) -> Result<Vec<Project>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let filter = build_where(&[], constraints, 1);
        let query = format!(
            "SELECT {COLUMNS} FROM projects {} ORDER BY id ASC LIMIT ${} OFFSET ${}",
            filter.sql,
            filter.next_index,
            filter.next_index + 1
        );
        bind_values(sqlx::query_as::<_, Project>(&query), &filter.values)
            .bind(limit(max))
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Count projects matching the search constraints.
    pub async fn count<'e, E>(executor: E, constraints: &SqlConstraints) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let filter = build_where(&[], constraints, 1);
        let query = format!("SELECT COUNT(*)::BIGINT FROM projects {}", filter.sql);
        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &filter.values)
            .fetch_one(executor)
            .await
    }

    /// Number of projects using an ontology.
    pub async fn count_by_ontology<'e, E>(executor: E, ontology_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM projects WHERE ontology_id = $1")
            .bind(ontology_id)
            .fetch_one(executor)
            .await
    }

    /// Replace every writable field of a project.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &ProjectInput,
    ) -> Result<Option<Project>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE projects SET
                name = $2,
                description = $3,
                ontology_id = $4,
                blind_mode = $5,
                number_of_annotations = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.ontology)
            .bind(input.blind_mode)
            .bind(input.number_of_annotations)
            .fetch_optional(executor)
            .await
    }

    /// Delete a project by ID. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
