//! Property entity model and DTOs: key/value pairs attached to a project.

use cytomine_core::search::{DomainSchema, FieldSpec, FieldType};
use cytomine_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Filterable fields of properties.
pub const PROPERTY_SCHEMA: DomainSchema = DomainSchema {
    domain: "Property",
    fields: &[
        FieldSpec::new("id", FieldType::Long),
        FieldSpec::new("project", FieldType::Reference("Project")),
        FieldSpec::new("key", FieldType::String),
        FieldSpec::new("value", FieldType::String),
        FieldSpec::with_column("created", FieldType::Date, "created_at"),
        FieldSpec::with_column("updated", FieldType::Date, "updated_at"),
    ],
};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    #[serde(rename = "project")]
    pub project_id: DbId,
    pub key: String,
    pub value: String,
    #[serde(rename = "created")]
    pub created_at: Timestamp,
    #[serde(rename = "updated")]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyInput {
    pub project: DbId,
    pub key: String,
    pub value: String,
    pub created: Option<Timestamp>,
}
