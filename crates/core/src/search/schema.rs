//! Static field descriptors of filterable domains and value coercion.

use chrono::DateTime;
use serde::Serialize;

use crate::error::CoreError;
use crate::naming::field_name_to_sql;
use crate::types::Timestamp;

/// Declared type of a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Long,
    Double,
    Boolean,
    String,
    /// Timestamp, filtered with epoch milliseconds.
    Date,
    /// Link to another domain, filtered with its primary key. Holds the
    /// referenced domain name.
    Reference(&'static str),
}

/// One filterable property of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Property name as exposed in JSON (`blindMode`, `ontology`).
    pub name: &'static str,
    pub field_type: FieldType,
    /// Column name when it does not follow from `name`.
    pub column: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            column: None,
        }
    }

    /// A field stored in an explicitly named column (`created` in `created_at`).
    pub const fn with_column(
        name: &'static str,
        field_type: FieldType,
        column: &'static str,
    ) -> Self {
        Self {
            name,
            field_type,
            column: Some(column),
        }
    }

    /// SQL column backing the field. References point to `<name>_id`.
    pub fn column(&self) -> String {
        match (self.column, self.field_type) {
            (Some(column), _) => column.to_string(),
            (None, FieldType::Reference(_)) => format!("{}_id", field_name_to_sql(self.name)),
            (None, _) => field_name_to_sql(self.name),
        }
    }
}

/// Filterable fields of a domain.
#[derive(Debug, Clone, Copy)]
pub struct DomainSchema {
    pub domain: &'static str,
    pub fields: &'static [FieldSpec],
}

impl DomainSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A filter value coerced to the type of its column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Int(i32),
    BigInt(i64),
    Double(f64),
    Bool(bool),
    Text(String),
    Timestamp(Timestamp),
}

fn invalid(field: &FieldSpec, raw: &str) -> CoreError {
    match field.field_type {
        FieldType::Reference(domain) => CoreError::Validation(format!(
            "Invalid {domain} id '{raw}' for filter on '{}'",
            field.name
        )),
        _ => CoreError::Validation(format!(
            "Invalid value '{raw}' for filter on '{}'",
            field.name
        )),
    }
}

/// Coerce one raw filter value to the field's declared type.
pub fn coerce(field: &FieldSpec, raw: &str) -> Result<SqlValue, CoreError> {
    let trimmed = raw.trim();
    let value = match field.field_type {
        FieldType::Integer => trimmed.parse().map(SqlValue::Int).ok(),
        FieldType::Long | FieldType::Reference(_) => trimmed.parse().map(SqlValue::BigInt).ok(),
        FieldType::Double => trimmed.parse().map(SqlValue::Double).ok(),
        FieldType::Boolean => trimmed.parse().map(SqlValue::Bool).ok(),
        FieldType::String => Some(SqlValue::Text(raw.to_string())),
        FieldType::Date => trimmed
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .map(SqlValue::Timestamp),
    };
    value.ok_or_else(|| invalid(field, raw))
}
