//! First translation pass: keep the entries that name a field of the domain
//! and coerce their values to the field's type.

use crate::error::CoreError;

use super::operation::SearchOperation;
use super::params::{SearchParameterEntry, SearchValue, NULL_LITERAL};
use super::schema::{coerce, DomainSchema, FieldSpec, FieldType, SqlValue};

/// Typed value of a domain filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    One(SqlValue),
    /// Values of an `in` filter; `None` stands for null.
    Many(Vec<Option<SqlValue>>),
}

/// A search entry bound to a field of the domain, with a typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainFilter {
    pub field: FieldSpec,
    pub operation: SearchOperation,
    pub value: FilterValue,
}

/// Filters that apply to the domain, and the entries left untranslated.
#[derive(Debug, Clone, Default)]
pub struct AssociatedFilters {
    pub filters: Vec<DomainFilter>,
    pub leftovers: Vec<SearchParameterEntry>,
}

fn coerce_optional(field: &FieldSpec, raw: &str) -> Result<Option<SqlValue>, CoreError> {
    if raw == NULL_LITERAL {
        Ok(None)
    } else {
        coerce(field, raw).map(Some)
    }
}

fn translate(field: &FieldSpec, entry: &SearchParameterEntry) -> Result<FilterValue, CoreError> {
    if entry.value.is_null() {
        return Ok(FilterValue::Null);
    }

    match (entry.operation, &entry.value) {
        (SearchOperation::In, SearchValue::List(values)) => values
            .iter()
            .map(|v| coerce_optional(field, v))
            .collect::<Result<Vec<_>, _>>()
            .map(FilterValue::Many),
        (SearchOperation::In, SearchValue::Single(v)) => {
            Ok(FilterValue::Many(vec![coerce_optional(field, v)?]))
        }
        (op, SearchValue::Single(v)) if op.is_pattern() => {
            if field.field_type != FieldType::String {
                return Err(CoreError::Validation(format!(
                    "Operator '{op}' is not supported on '{}'",
                    field.name
                )));
            }
            Ok(FilterValue::One(SqlValue::Text(format!(
                "%{}%",
                v.trim_matches('%')
            ))))
        }
        (_, SearchValue::Single(v)) => coerce(field, v).map(FilterValue::One),
        (op, SearchValue::List(_)) => Err(CoreError::Validation(format!(
            "Operator '{op}' on '{}' expects a single value",
            field.name
        ))),
        (_, SearchValue::Null) => Ok(FilterValue::Null),
    }
}

/// Split `entries` into typed filters for `schema` and untranslated leftovers.
///
/// Entries naming an unknown property are returned as leftovers. A value that
/// cannot be coerced to the field's type is a validation error.
pub fn domain_associated_filters(
    schema: &DomainSchema,
    entries: Vec<SearchParameterEntry>,
) -> Result<AssociatedFilters, CoreError> {
    let mut result = AssociatedFilters::default();
    for entry in entries {
        match schema.field(&entry.property) {
            Some(field) => {
                let value = translate(field, &entry)?;
                result.filters.push(DomainFilter {
                    field: *field,
                    operation: entry.operation,
                    value,
                });
            }
            None => result.leftovers.push(entry),
        }
    }
    Ok(result)
}
