//! Predicate trees built from domain filters and evaluated against the JSON
//! form of domain objects.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::filter::{DomainFilter, FilterValue};
use super::operation::SearchOperation;
use super::schema::SqlValue;

/// Conjunction of filter conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches everything.
    All,
    Condition(DomainFilter),
    And(Vec<Predicate>),
}

impl Predicate {
    /// AND together every filter; no filters means no restriction.
    pub fn from_filters(filters: &[DomainFilter]) -> Self {
        match filters {
            [] => Self::All,
            [single] => Self::Condition(single.clone()),
            many => Self::And(many.iter().cloned().map(Self::Condition).collect()),
        }
    }

    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Self::All, p) | (p, Self::All) => p,
            (Self::And(mut a), Self::And(b)) => {
                a.extend(b);
                Self::And(a)
            }
            (Self::And(mut a), p) => {
                a.push(p);
                Self::And(a)
            }
            (p, Self::And(mut b)) => {
                b.insert(0, p);
                Self::And(b)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }

    /// Evaluate against the JSON representation of an object.
    pub fn matches(&self, object: &Value) -> bool {
        match self {
            Self::All => true,
            Self::Condition(filter) => condition_matches(filter, object),
            Self::And(parts) => parts.iter().all(|p| p.matches(object)),
        }
    }
}

fn condition_matches(filter: &DomainFilter, object: &Value) -> bool {
    let actual = object.get(filter.field.name).unwrap_or(&Value::Null);
    let is_null = actual.is_null();

    match (filter.operation, &filter.value) {
        (SearchOperation::Equals | SearchOperation::In, FilterValue::Null) => is_null,
        (SearchOperation::Nequals, FilterValue::Null) => !is_null,
        (_, FilterValue::Null) => false,
        (SearchOperation::In, FilterValue::Many(values)) => values.iter().any(|v| match v {
            None => is_null,
            Some(v) => compare(actual, v) == Some(Ordering::Equal),
        }),
        (op, FilterValue::Many(values)) => values
            .iter()
            .flatten()
            .next()
            .is_some_and(|v| scalar_matches(op, actual, v)),
        (op, FilterValue::One(v)) => scalar_matches(op, actual, v),
    }
}

fn scalar_matches(op: SearchOperation, actual: &Value, expected: &SqlValue) -> bool {
    match op {
        SearchOperation::Equals | SearchOperation::In => {
            compare(actual, expected) == Some(Ordering::Equal)
        }
        SearchOperation::Nequals => {
            !actual.is_null() && compare(actual, expected) != Some(Ordering::Equal)
        }
        SearchOperation::Lte => matches!(
            compare(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        SearchOperation::Gte => matches!(
            compare(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        SearchOperation::Like | SearchOperation::Ilike => {
            let (Some(text), SqlValue::Text(pattern)) = (actual.as_str(), expected) else {
                return false;
            };
            if op == SearchOperation::Ilike {
                like_match(&pattern.to_lowercase(), &text.to_lowercase())
            } else {
                like_match(pattern, text)
            }
        }
    }
}

fn json_timestamp(actual: &Value) -> Option<DateTime<Utc>> {
    match actual {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Order a JSON value against a typed filter value. `None` when the two are
/// not comparable (including nulls).
fn compare(actual: &Value, expected: &SqlValue) -> Option<Ordering> {
    match expected {
        SqlValue::Int(v) => actual.as_f64()?.partial_cmp(&f64::from(*v)),
        SqlValue::BigInt(v) => match actual {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(i.cmp(v)),
                None => n.as_f64()?.partial_cmp(&(*v as f64)),
            },
            Value::String(s) => s.parse::<i64>().ok().map(|i| i.cmp(v)),
            _ => None,
        },
        SqlValue::Double(v) => actual.as_f64()?.partial_cmp(v),
        SqlValue::Bool(v) => actual.as_bool().map(|b| b.cmp(v)),
        SqlValue::Text(v) => actual.as_str().map(|s| s.cmp(v.as_str())),
        SqlValue::Timestamp(v) => json_timestamp(actual).map(|t| t.cmp(v)),
    }
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one.
pub fn like_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '_' || (p[pi] != '%' && p[pi] == t[ti])) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '%' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if let Some((star, matched)) = backtrack {
            pi = star + 1;
            ti = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '%')
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::search::schema::{FieldSpec, FieldType};

    const NAME: FieldSpec = FieldSpec::new("name", FieldType::String);
    const USER: FieldSpec = FieldSpec::new("user", FieldType::Reference("User"));

    fn filter(field: FieldSpec, operation: SearchOperation, value: FilterValue) -> DomainFilter {
        DomainFilter {
            field,
            operation,
            value,
        }
    }

    #[test]
    fn like_wildcards() {
        assert!(like_match("%abc%", "xabcx"));
        assert!(like_match("a_c", "abc"));
        assert!(!like_match("a_c", "abbc"));
        assert!(like_match("%", ""));
        assert!(!like_match("%ABC%", "xabcx"));
        assert!(like_match("%a%b%", "xxaxxbxx"));
    }

    #[test]
    fn like_is_case_sensitive_ilike_is_not() {
        let object = json!({"name": "xabcx"});
        let like = Predicate::from_filters(&[filter(
            NAME,
            SearchOperation::Like,
            FilterValue::One(SqlValue::Text("%ABC%".into())),
        )]);
        let ilike = Predicate::from_filters(&[filter(
            NAME,
            SearchOperation::Ilike,
            FilterValue::One(SqlValue::Text("%ABC%".into())),
        )]);
        assert!(!like.matches(&object));
        assert!(ilike.matches(&object));
    }

    #[test]
    fn equals_and_in_select_the_same_objects() {
        let equals = Predicate::from_filters(&[filter(
            USER,
            SearchOperation::Equals,
            FilterValue::One(SqlValue::BigInt(5)),
        )]);
        let within = Predicate::from_filters(&[filter(
            USER,
            SearchOperation::In,
            FilterValue::Many(vec![Some(SqlValue::BigInt(5))]),
        )]);
        for object in [json!({"user": 5}), json!({"user": 6}), json!({"user": null})] {
            assert_eq!(equals.matches(&object), within.matches(&object));
        }
    }

    #[test]
    fn in_with_null_keeps_nulls() {
        let p = Predicate::from_filters(&[filter(
            USER,
            SearchOperation::In,
            FilterValue::Many(vec![Some(SqlValue::BigInt(1)), None]),
        )]);
        assert!(p.matches(&json!({"user": 1})));
        assert!(p.matches(&json!({"user": null})));
        assert!(p.matches(&json!({})));
        assert!(!p.matches(&json!({"user": 2})));
    }

    #[test]
    fn conjunction() {
        let p = Predicate::from_filters(&[
            filter(USER, SearchOperation::Gte, FilterValue::One(SqlValue::BigInt(2))),
            filter(USER, SearchOperation::Lte, FilterValue::One(SqlValue::BigInt(4))),
        ]);
        assert!(p.matches(&json!({"user": 3})));
        assert!(!p.matches(&json!({"user": 5})));
    }

    #[test]
    fn and_flattens() {
        let a = Predicate::from_filters(&[filter(NAME, SearchOperation::Equals, FilterValue::Null)]);
        let combined = Predicate::All.and(a.clone()).and(a.clone());
        assert_eq!(combined, Predicate::And(vec![a.clone(), a]));
        assert!(Predicate::All.matches(&json!({})));
    }

    #[test]
    fn nequals_null() {
        let p = Predicate::from_filters(&[filter(NAME, SearchOperation::Nequals, FilterValue::Null)]);
        assert!(p.matches(&json!({"name": "a"})));
        assert!(!p.matches(&json!({"name": null})));
    }
}
