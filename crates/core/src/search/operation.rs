//! Filter operators accepted in `field[operator]=value` query parameters.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOperation {
    Equals,
    Nequals,
    Like,
    Ilike,
    Lte,
    Gte,
    In,
}

impl SearchOperation {
    pub const ALL: [SearchOperation; 7] = [
        Self::Equals,
        Self::Nequals,
        Self::Like,
        Self::Ilike,
        Self::Lte,
        Self::Gte,
        Self::In,
    ];

    /// Parse the operator written between brackets. Unknown operators yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Nequals => "nequals",
            Self::Like => "like",
            Self::Ilike => "ilike",
            Self::Lte => "lte",
            Self::Gte => "gte",
            Self::In => "in",
        }
    }

    /// Binary SQL operator, for every operation except `in`.
    pub fn sql_operator(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Nequals => "!=",
            Self::Like => "LIKE",
            Self::Ilike => "ILIKE",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::In => "IN",
        }
    }

    /// Whether the value is a wildcard pattern.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Like | Self::Ilike)
    }
}

impl std::fmt::Display for SearchOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
