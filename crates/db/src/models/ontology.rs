//! Ontology entity model and DTOs.

use cytomine_core::search::{DomainSchema, FieldSpec, FieldType};
use cytomine_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Filterable fields of ontologies.
pub const ONTOLOGY_SCHEMA: DomainSchema = DomainSchema {
    domain: "Ontology",
    fields: &[
        FieldSpec::new("id", FieldType::Long),
        FieldSpec::new("name", FieldType::String),
        FieldSpec::new("user", FieldType::Reference("User")),
        FieldSpec::with_column("created", FieldType::Date, "created_at"),
        FieldSpec::with_column("updated", FieldType::Date, "updated_at"),
    ],
};

/// An ontology row from the `ontologies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ontology {
    pub id: DbId,
    pub name: String,
    /// Creator of the ontology.
    #[serde(rename = "user")]
    pub user_id: DbId,
    #[serde(rename = "created")]
    pub created_at: Timestamp,
    #[serde(rename = "updated")]
    pub updated_at: Timestamp,
}

/// Writable fields of an ontology, read from its JSON form.
#[derive(Debug, Clone, Deserialize)]
pub struct OntologyInput {
    pub name: String,
    pub user: DbId,
    pub created: Option<Timestamp>,
}
