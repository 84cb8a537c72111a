//! Query plan construction from raw request parameters
//!
//! [`parse_plan`] turns the raw query-string map into a validated
//! [`QueryPlan`]. All validation happens here, before any storage access:
//! a plan that parses is guaranteed to execute without further input checks.

use crate::core::field::FieldValue;
use crate::query::schema::{EntitySchema, FilterKind};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Default page size when `per_page` is absent
pub const DEFAULT_PER_PAGE: usize = 10;

/// Hard cap on page size; larger requests clamp silently
pub const MAX_PER_PAGE: usize = 100;

/// Pagination bounds, normally sourced from [`crate::config::AppConfig`]
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_per_page: usize,
    pub max_per_page: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` case-insensitively; anything else is `Desc`
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

/// Resolved sort key: an allow-listed field plus a direction
#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// Comparison operator of a filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

/// A single field/operator/value constraint, applied conjunctively
#[derive(Debug, Clone)]
pub struct FilterPredicate {
    pub field: &'static str,
    pub op: FilterOp,
    pub value: FieldValue,
}

/// Free-text search bound to the schema's searchable fields.
///
/// The term is lowercased once at parse time; matching is case-insensitive
/// substring over any of the fields.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    pub term: String,
    pub fields: &'static [&'static str],
}

/// The complete filter side of a plan: typed predicates AND'd together,
/// with an optional search term AND'd on top.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub predicates: Vec<FilterPredicate>,
    pub search: Option<SearchFilter>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.search.is_none()
    }
}

/// A validated, normalized query plan. Constructed fresh per request and
/// never persisted.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub page: usize,
    pub per_page: usize,
    pub sort: SortKey,
    pub filter: FilterSet,
}

impl QueryPlan {
    /// Offset of the first item of the requested page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Validation failures raised while building a plan.
///
/// Every variant is detected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidPage(String),
    InvalidPerPage(String),
    InvalidFilterValue {
        param: String,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidPage(raw) => {
                write!(f, "'page' must be a positive integer (got '{}')", raw)
            }
            QueryError::InvalidPerPage(raw) => {
                write!(f, "'per_page' must be a positive integer (got '{}')", raw)
            }
            QueryError::InvalidFilterValue {
                param,
                value,
                expected,
            } => {
                write!(f, "'{}' must be {} (got '{}')", param, expected, value)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    /// Wire-level error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::InvalidPage(_) => "InvalidPage",
            QueryError::InvalidPerPage(_) => "InvalidPerPage",
            QueryError::InvalidFilterValue { .. } => "InvalidFilterValue",
        }
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n >= 1)
}

/// Build a [`QueryPlan`] from raw query parameters.
///
/// * `page` defaults to 1; non-numeric or non-positive values error.
/// * `per_page` defaults to `limits.default_per_page`; non-numeric or
///   non-positive values error, values above `limits.max_per_page` clamp.
/// * `sort_by` outside the schema's allow-list falls back to the default
///   sort field; `sort_order` other than `asc`/`desc` falls back to `desc`.
/// * `search` is trimmed; an empty string means no text filter.
/// * Typed filters parse according to their [`FilterKind`]; malformed
///   numeric, boolean or datetime values error, exact-match values pass
///   through verbatim.
pub fn parse_plan(
    params: &HashMap<String, String>,
    schema: &'static EntitySchema,
    limits: PageLimits,
) -> Result<QueryPlan, QueryError> {
    let page = match params.get("page") {
        Some(raw) => parse_positive(raw).ok_or_else(|| QueryError::InvalidPage(raw.clone()))?,
        None => 1,
    };

    let per_page = match params.get("per_page") {
        Some(raw) => parse_positive(raw).ok_or_else(|| QueryError::InvalidPerPage(raw.clone()))?,
        None => limits.default_per_page,
    }
    .min(limits.max_per_page);

    let sort = SortKey {
        field: schema.resolve_sort_field(params.get("sort_by").map(String::as_str)),
        direction: SortDirection::parse(params.get("sort_order").map(String::as_str)),
    };

    let mut predicates = Vec::new();
    for spec in schema.filters {
        let Some(raw) = params.get(spec.param) else {
            continue;
        };

        let (op, value) = match spec.kind {
            FilterKind::Exact => (FilterOp::Eq, FieldValue::String(raw.clone())),
            FilterKind::Bool => {
                let parsed = if raw.eq_ignore_ascii_case("true") {
                    true
                } else if raw.eq_ignore_ascii_case("false") {
                    false
                } else {
                    return Err(QueryError::InvalidFilterValue {
                        param: spec.param.to_string(),
                        value: raw.clone(),
                        expected: "'true' or 'false'",
                    });
                };
                (FilterOp::Eq, FieldValue::Boolean(parsed))
            }
            FilterKind::MinFloat | FilterKind::MaxFloat => {
                let parsed: f64 = raw.trim().parse().map_err(|_| {
                    QueryError::InvalidFilterValue {
                        param: spec.param.to_string(),
                        value: raw.clone(),
                        expected: "a number",
                    }
                })?;
                let op = if spec.kind == FilterKind::MinFloat {
                    FilterOp::Gte
                } else {
                    FilterOp::Lte
                };
                (op, FieldValue::Float(parsed))
            }
            FilterKind::After | FilterKind::Before => {
                let parsed = DateTime::parse_from_rfc3339(raw.trim()).map_err(|_| {
                    QueryError::InvalidFilterValue {
                        param: spec.param.to_string(),
                        value: raw.clone(),
                        expected: "an RFC 3339 datetime",
                    }
                })?;
                let op = if spec.kind == FilterKind::After {
                    FilterOp::Gte
                } else {
                    FilterOp::Lte
                };
                (op, FieldValue::DateTime(parsed.with_timezone(&Utc)))
            }
        };

        predicates.push(FilterPredicate {
            field: spec.field,
            op,
            value,
        });
    }

    let search = params
        .get("search")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|term| SearchFilter {
            term: term.to_lowercase(),
            fields: schema.searchable,
        });

    Ok(QueryPlan {
        page,
        per_page,
        sort,
        filter: FilterSet { predicates, search },
    })
}
