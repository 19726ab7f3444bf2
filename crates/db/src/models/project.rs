//! Project entity model and DTOs.

use cytomine_core::search::{DomainSchema, FieldSpec, FieldType};
use cytomine_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Filterable fields of projects.
pub const PROJECT_SCHEMA: DomainSchema = DomainSchema {
    domain: "Project",
    fields: &[
        FieldSpec::new("id", FieldType::Long),
        FieldSpec::new("name", FieldType::String),
        FieldSpec::new("description", FieldType::String),
        FieldSpec::new("ontology", FieldType::Reference("Ontology")),
        FieldSpec::new("blindMode", FieldType::Boolean),
        FieldSpec::new("numberOfAnnotations", FieldType::Long),
        FieldSpec::with_column("created", FieldType::Date, "created_at"),
        FieldSpec::with_column("updated", FieldType::Date, "updated_at"),
    ],
};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "ontology")]
    pub ontology_id: Option<DbId>,
    pub blind_mode: bool,
    pub number_of_annotations: i64,
    #[serde(rename = "created")]
    pub created_at: Timestamp,
    #[serde(rename = "updated")]
    pub updated_at: Timestamp,
}

/// Writable fields of a project, read from its JSON form.
///
/// `created` is only honoured when a deleted project is restored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub ontology: Option<DbId>,
    #[serde(default)]
    pub blind_mode: bool,
    #[serde(default)]
    pub number_of_annotations: i64,
    pub created: Option<Timestamp>,
}
