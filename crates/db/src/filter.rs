//! Binding of search constraints to sqlx queries.

use cytomine_core::search::{SqlConstraints, SqlValue};
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// A rendered `WHERE` clause and the values to bind, in placeholder order.
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    /// Empty, or starts with `WHERE `.
    pub sql: String,
    pub values: Vec<SqlValue>,
    /// Index of the next free `$n` placeholder.
    pub next_index: usize,
}

/// Combine fixed conditions (already using `$1..`) with search constraints
/// whose placeholders are numbered from `first_index`.
pub fn build_where(
    fixed: &[String],
    constraints: &SqlConstraints,
    first_index: usize,
) -> WhereClause {
    let mut conditions: Vec<String> = fixed.to_vec();
    let mut values = Vec::new();
    if let Some((sql, bound)) = constraints.where_clause(first_index) {
        conditions.push(sql);
        values = bound;
    }
    let next_index = first_index + values.len();
    let sql = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    WhereClause {
        sql,
        values,
        next_index,
    }
}

/// Bind a slice of `SqlValue` to a sqlx `QueryAs`.
pub fn bind_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for val in values {
        match val {
            SqlValue::Int(v) => q = q.bind(*v),
            SqlValue::BigInt(v) => q = q.bind(*v),
            SqlValue::Double(v) => q = q.bind(*v),
            SqlValue::Bool(v) => q = q.bind(*v),
            SqlValue::Text(v) => q = q.bind(v.as_str()),
            SqlValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `SqlValue` to a sqlx `QueryScalar`.
pub fn bind_values_scalar<'q, O>(
    mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    values: &'q [SqlValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for val in values {
        match val {
            SqlValue::Int(v) => q = q.bind(*v),
            SqlValue::BigInt(v) => q = q.bind(*v),
            SqlValue::Double(v) => q = q.bind(*v),
            SqlValue::Bool(v) => q = q.bind(*v),
            SqlValue::Text(v) => q = q.bind(v.as_str()),
            SqlValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// `LIMIT` value for a page size; `None` (SQL null) means no limit.
pub fn limit(max: i64) -> Option<i64> {
    (max > 0).then_some(max)
}

#[cfg(test)]
mod tests {
    use cytomine_core::search::{
        to_sql_constraints, DomainFilter, FieldSpec, FieldType, FilterValue, SearchOperation,
    };

    use super::*;

    #[test]
    fn fixed_conditions_come_first() {
        let constraints = to_sql_constraints(&[DomainFilter {
            field: FieldSpec::new("key", FieldType::String),
            operation: SearchOperation::Equals,
            value: FilterValue::One(SqlValue::Text("k".into())),
        }]);
        let clause = build_where(&["project_id = $1".to_string()], &constraints, 2);
        assert_eq!(clause.sql, "WHERE project_id = $1 AND key = $2");
        assert_eq!(clause.values, vec![SqlValue::Text("k".into())]);
        assert_eq!(clause.next_index, 3);
    }

    #[test]
    fn no_conditions_no_where() {
        let clause = build_where(&[], &SqlConstraints::default(), 1);
        assert!(clause.sql.is_empty());
        assert_eq!(clause.next_index, 1);
    }

    #[test]
    fn zero_max_is_unlimited() {
        assert_eq!(limit(0), None);
        assert_eq!(limit(10), Some(10));
    }
}
