//! Parsing of `field[operator]=value` request parameters.

use std::sync::LazyLock;

use regex::Regex;

use super::operation::SearchOperation;

/// `property[operator]`, with the operator being everything between the last
/// pair of brackets.
static SEARCH_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\[(.+)\]$").expect("valid regex"));

/// Textual null accepted in filter values.
pub const NULL_LITERAL: &str = "null";

/// Raw value of a search parameter, before any type coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchValue {
    Null,
    Single(String),
    List(Vec<String>),
}

impl SearchValue {
    /// Whether the value denotes SQL null (`null` or the literal `"null"`).
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Single(s) => s == NULL_LITERAL,
            Self::List(_) => false,
        }
    }
}

/// One filter as written by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParameterEntry {
    pub property: String,
    pub operation: SearchOperation,
    pub value: SearchValue,
}

impl SearchParameterEntry {
    pub fn new(property: impl Into<String>, operation: SearchOperation, value: SearchValue) -> Self {
        Self {
            property: property.into(),
            operation,
            value,
        }
    }
}

/// Extract search entries from request parameters.
///
/// Keys that are not of the form `property[operator]` and unknown operators
/// are skipped. `in` values containing commas become lists; `*` in
/// `like`/`ilike` values is the `%` wildcard.
pub fn parse_search_parameters<I, K, V>(params: I) -> Vec<SearchParameterEntry>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .into_iter()
        .filter_map(|(key, value)| {
            let caps = SEARCH_KEY_RE.captures(key.as_ref())?;
            let operation = SearchOperation::parse(&caps[2])?;
            let raw = value.as_ref();

            let value = match operation {
                SearchOperation::In if raw.contains(',') => {
                    SearchValue::List(raw.split(',').map(str::to_string).collect())
                }
                op if op.is_pattern() => SearchValue::Single(raw.replace('*', "%")),
                _ => SearchValue::Single(raw.to_string()),
            };
            Some(SearchParameterEntry::new(&caps[1], operation, value))
        })
        .collect()
}
