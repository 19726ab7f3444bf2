//! Second translation pass: typed filters to SQL fragments with named
//! parameters, rendered to positional placeholders for sqlx.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use super::filter::{DomainFilter, FilterValue};
use super::operation::SearchOperation;
use super::schema::SqlValue;

/// Named parameter reference inside a clause.
static NAMED_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z0-9_]+)").expect("valid regex"));

/// SQL constraints produced from domain filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlConstraints {
    pub clauses: Vec<String>,
    pub params: BTreeMap<String, SqlValue>,
}

impl SqlConstraints {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render the clauses as one AND-ed expression with `$n` placeholders,
    /// numbered from `first_index`, and the values to bind in that order.
    ///
    /// Returns `None` when there is no clause.
    pub fn where_clause(&self, first_index: usize) -> Option<(String, Vec<SqlValue>)> {
        if self.is_empty() {
            return None;
        }
        let joined = self.clauses.join(" AND ");
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut values = Vec::new();

        let rendered = NAMED_PARAM_RE.replace_all(&joined, |caps: &regex::Captures| {
            let name = &caps[1];
            let Some(value) = self.params.get(name) else {
                return caps[0].to_string();
            };
            let idx = *positions.entry(name.to_string()).or_insert_with(|| {
                values.push(value.clone());
                first_index + values.len() - 1
            });
            format!("${idx}")
        });
        Some((rendered.into_owned(), values))
    }
}

/// Clause and parameters of a single filter, before name deduplication.
struct Fragment {
    column: String,
    clause: String,
    params: Vec<(String, SqlValue)>,
}

fn dedup(values: &[Option<SqlValue>]) -> Vec<Option<SqlValue>> {
    let mut out: Vec<Option<SqlValue>> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}

fn in_fragment(column: &str, values: &[Option<SqlValue>]) -> (String, Vec<(String, SqlValue)>) {
    let values = dedup(values);
    let has_null = values.iter().any(Option::is_none);
    let present: Vec<SqlValue> = values.into_iter().flatten().collect();

    if present.is_empty() {
        let clause = if has_null {
            format!("{column} IS NULL")
        } else {
            "FALSE".to_string()
        };
        return (clause, Vec::new());
    }

    let params: Vec<(String, SqlValue)> = present
        .into_iter()
        .enumerate()
        .map(|(i, v)| (format!("{column}_{}", i + 1), v))
        .collect();
    let placeholders: Vec<String> = params.iter().map(|(name, _)| format!(":{name}")).collect();
    let in_clause = format!("{column} IN ({})", placeholders.join(","));

    let clause = if has_null {
        format!("({in_clause} OR {column} IS NULL)")
    } else {
        in_clause
    };
    (clause, params)
}

fn fragment(filter: &DomainFilter) -> Fragment {
    let column = filter.field.column();
    let (clause, params) = match (filter.operation, &filter.value) {
        (SearchOperation::In, FilterValue::Null) => (format!("{column} IS NULL"), Vec::new()),
        (SearchOperation::In, FilterValue::One(v)) => in_fragment(&column, &[Some(v.clone())]),
        (SearchOperation::In, FilterValue::Many(values)) => in_fragment(&column, values),
        (SearchOperation::Equals, FilterValue::Null) => (format!("{column} IS NULL"), Vec::new()),
        (SearchOperation::Nequals, FilterValue::Null) => {
            (format!("{column} IS NOT NULL"), Vec::new())
        }
        // Comparisons against null match nothing in SQL.
        (_, FilterValue::Null) => ("FALSE".to_string(), Vec::new()),
        (op, FilterValue::One(v)) => (
            format!("{column} {} :{column}", op.sql_operator()),
            vec![(column.clone(), v.clone())],
        ),
        (op, FilterValue::Many(values)) => {
            let first = values.iter().flatten().next().cloned();
            match first {
                Some(v) => (
                    format!("{column} {} :{column}", op.sql_operator()),
                    vec![(column.clone(), v)],
                ),
                None => ("FALSE".to_string(), Vec::new()),
            }
        }
    };
    Fragment {
        column,
        clause,
        params,
    }
}

fn replace_joker(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Text(s) => SqlValue::Text(s.replace('*', "%")),
        other => other,
    }
}

/// Translate domain filters into SQL constraints.
///
/// Parameters are named after their column (`name`, `ontology_id_1` ...).
/// When several filters with parameters target the same column, the k-th of
/// them (counting from 0) gets `_k` appended to each of its parameter names.
pub fn to_sql_constraints(filters: &[DomainFilter]) -> SqlConstraints {
    let fragments: Vec<Fragment> = filters.iter().map(fragment).collect();

    let mut per_column: HashMap<&str, usize> = HashMap::new();
    for f in fragments.iter().filter(|f| !f.params.is_empty()) {
        *per_column.entry(f.column.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut constraints = SqlConstraints::default();
    for f in &fragments {
        let shared = per_column.get(f.column.as_str()).copied().unwrap_or(0) > 1;
        if f.params.is_empty() || !shared {
            constraints.clauses.push(f.clause.clone());
            for (name, value) in &f.params {
                constraints
                    .params
                    .insert(name.clone(), replace_joker(value.clone()));
            }
            continue;
        }

        let slot = seen.entry(f.column.clone()).or_default();
        let k = *slot;
        *slot += 1;

        let names: HashMap<&str, String> = f
            .params
            .iter()
            .map(|(name, _)| (name.as_str(), format!("{name}_{k}")))
            .collect();
        let clause = NAMED_PARAM_RE.replace_all(&f.clause, |caps: &regex::Captures| {
            match names.get(&caps[1]) {
                Some(renamed) => format!(":{renamed}"),
                None => caps[0].to_string(),
            }
        });
        constraints.clauses.push(clause.into_owned());
        for (name, value) in &f.params {
            constraints
                .params
                .insert(format!("{name}_{k}"), replace_joker(value.clone()));
        }
    }
    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::schema::{FieldSpec, FieldType};

    const NAME: FieldSpec = FieldSpec::new("name", FieldType::String);
    const ONTOLOGY: FieldSpec = FieldSpec::new("ontology", FieldType::Reference("Ontology"));
    const ANNOTATIONS: FieldSpec = FieldSpec::new("numberOfAnnotations", FieldType::Long);

    fn filter(field: FieldSpec, operation: SearchOperation, value: FilterValue) -> DomainFilter {
        DomainFilter {
            field,
            operation,
            value,
        }
    }

    #[test]
    fn equals_with_value_and_null() {
        let c = to_sql_constraints(&[
            filter(NAME, SearchOperation::Equals, FilterValue::One(SqlValue::Text("a".into()))),
            filter(ONTOLOGY, SearchOperation::Equals, FilterValue::Null),
        ]);
        assert_eq!(c.clauses, vec!["name = :name", "ontology_id IS NULL"]);
        assert_eq!(c.params.get("name"), Some(&SqlValue::Text("a".into())));
        assert_eq!(c.params.len(), 1);
    }

    #[test]
    fn nequals_null_is_not_null() {
        let c = to_sql_constraints(&[filter(ONTOLOGY, SearchOperation::Nequals, FilterValue::Null)]);
        assert_eq!(c.clauses, vec!["ontology_id IS NOT NULL"]);
    }

    #[test]
    fn in_list_is_deduplicated() {
        let c = to_sql_constraints(&[filter(
            ONTOLOGY,
            SearchOperation::In,
            FilterValue::Many(vec![
                Some(SqlValue::BigInt(1)),
                Some(SqlValue::BigInt(2)),
                Some(SqlValue::BigInt(1)),
            ]),
        )]);
        assert_eq!(c.clauses, vec!["ontology_id IN (:ontology_id_1,:ontology_id_2)"]);
        assert_eq!(c.params.len(), 2);
    }

    #[test]
    fn in_with_null_adds_is_null_branch() {
        let c = to_sql_constraints(&[filter(
            ONTOLOGY,
            SearchOperation::In,
            FilterValue::Many(vec![Some(SqlValue::BigInt(1)), None]),
        )]);
        assert_eq!(
            c.clauses,
            vec!["(ontology_id IN (:ontology_id_1) OR ontology_id IS NULL)"]
        );
    }

    #[test]
    fn in_with_only_null_is_null() {
        let c = to_sql_constraints(&[filter(
            ONTOLOGY,
            SearchOperation::In,
            FilterValue::Many(vec![None, None]),
        )]);
        assert_eq!(c.clauses, vec!["ontology_id IS NULL"]);
        assert!(c.params.is_empty());
    }

    #[test]
    fn same_column_gets_suffixed_names() {
        let c = to_sql_constraints(&[
            filter(ANNOTATIONS, SearchOperation::Gte, FilterValue::One(SqlValue::BigInt(1))),
            filter(ANNOTATIONS, SearchOperation::Lte, FilterValue::One(SqlValue::BigInt(9))),
        ]);
        assert_eq!(
            c.clauses,
            vec![
                "number_of_annotations >= :number_of_annotations_0",
                "number_of_annotations <= :number_of_annotations_1",
            ]
        );
        assert_eq!(
            c.params.get("number_of_annotations_1"),
            Some(&SqlValue::BigInt(9))
        );
    }

    #[test]
    fn renders_positional_where_clause() {
        let c = to_sql_constraints(&[
            filter(NAME, SearchOperation::Ilike, FilterValue::One(SqlValue::Text("%a%".into()))),
            filter(
                ONTOLOGY,
                SearchOperation::In,
                FilterValue::Many(vec![Some(SqlValue::BigInt(3)), Some(SqlValue::BigInt(4))]),
            ),
        ]);
        let (sql, values) = c.where_clause(2).unwrap();
        assert_eq!(sql, "name ILIKE $2 AND ontology_id IN ($3,$4)");
        assert_eq!(
            values,
            vec![
                SqlValue::Text("%a%".into()),
                SqlValue::BigInt(3),
                SqlValue::BigInt(4)
            ]
        );
    }

    #[test]
    fn empty_constraints_render_nothing() {
        assert!(SqlConstraints::default().where_clause(1).is_none());
    }

    #[test]
    fn joker_in_text_parameter() {
        let c = to_sql_constraints(&[filter(
            NAME,
            SearchOperation::Equals,
            FilterValue::One(SqlValue::Text("a*".into())),
        )]);
        assert_eq!(c.params.get("name"), Some(&SqlValue::Text("a%".into())));
    }
}
