//! Shared query parameter types for API handlers.
//!
//! List endpoints accept `?max=&offset=` plus any number of search filters of
//! the form `property[operator]=value`. axum's `Query<Vec<(String, String)>>`
//! keeps repeated and bracketed keys intact; [`ListParams`] splits them.

use cytomine_core::pagination::{clamp_max, clamp_offset};
use cytomine_core::search::{parse_search_parameters, SearchParameterEntry};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Pagination and search filters of a list request.
#[derive(Debug, Default)]
pub struct ListParams {
    /// Page size; `0` means unlimited.
    pub max: i64,
    pub offset: i64,
    pub search: Vec<SearchParameterEntry>,
}

impl ListParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> AppResult<Self> {
        let mut max = None;
        let mut offset = None;
        let mut rest = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            match key.as_str() {
                "max" => max = Some(parse_number("max", &value)?),
                "offset" => offset = Some(parse_number("offset", &value)?),
                _ => rest.push((key, value)),
            }
        }
        Ok(Self {
            max: clamp_max(max),
            offset: clamp_offset(offset),
            search: parse_search_parameters(rest),
        })
    }
}

fn parse_number(name: &str, raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Parameter '{name}' must be an integer")))
}

/// Plain pagination parameters (`?max=&offset=`) for feeds without filters.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub max: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn max(&self) -> i64 {
        clamp_max(self.max)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Query of `GET /delete-commands`.
#[derive(Debug, Deserialize)]
pub struct DeleteCommandParams {
    /// Domain name (`Project`) or service name (`ProjectService`).
    pub domain: Option<String>,
    /// Only commands created after this instant, in epoch milliseconds.
    pub after: Option<i64>,
}
