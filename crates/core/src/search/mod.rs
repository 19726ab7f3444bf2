//! Search filters: `field[operator]=value` request parameters translated into
//! typed domain filters, then into SQL constraints or in-memory predicates.
//!
//! The translation never touches the database: SQL output is a list of
//! clauses with named parameters that the repository layer renders to
//! positional placeholders and binds.

pub mod filter;
pub mod operation;
pub mod params;
pub mod predicate;
pub mod schema;
pub mod sql;

pub use filter::{domain_associated_filters, AssociatedFilters, DomainFilter, FilterValue};
pub use operation::SearchOperation;
pub use params::{parse_search_parameters, SearchParameterEntry, SearchValue};
pub use predicate::Predicate;
pub use schema::{DomainSchema, FieldSpec, FieldType, SqlValue};
pub use sql::{to_sql_constraints, SqlConstraints};

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::new("name", FieldType::String),
        FieldSpec::new("ontology", FieldType::Reference("Ontology")),
    ];

    const SCHEMA: DomainSchema = DomainSchema {
        domain: "Project",
        fields: FIELDS,
    };

    #[test]
    fn request_parameters_to_where_clause() {
        let entries = parse_search_parameters([
            ("name[ilike]", "*demo*"),
            ("ontology[in]", "1,2,null"),
            ("max", "10"),
            ("unknown[equals]", "x"),
        ]);
        let associated = domain_associated_filters(&SCHEMA, entries).unwrap();
        assert_eq!(associated.leftovers.len(), 1);

        let (sql, values) = to_sql_constraints(&associated.filters)
            .where_clause(1)
            .unwrap();
        assert_eq!(
            sql,
            "name ILIKE $1 AND (ontology_id IN ($2,$3) OR ontology_id IS NULL)"
        );
        assert_eq!(values[0], SqlValue::Text("%demo%".into()));
        assert_eq!(values.len(), 3);
    }
}
