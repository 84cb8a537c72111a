//! Static per-entity allow-lists consumed by the query planner
//!
//! Every field a client can sort, search or filter on is enumerated here at
//! compile time. Query parameters that name anything outside these lists
//! either fall back to a default (sorting) or are ignored entirely, so no
//! request can probe entity attributes that were never meant to be exposed.

/// How a filter parameter is parsed and matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Verbatim string equality (e.g. `category`, `role`)
    Exact,
    /// `true`/`false`, case-insensitive
    Bool,
    /// Lower bound on a numeric field, parsed as float
    MinFloat,
    /// Upper bound on a numeric field, parsed as float
    MaxFloat,
    /// Lower bound on a datetime field, parsed as RFC 3339
    After,
    /// Upper bound on a datetime field, parsed as RFC 3339
    Before,
}

/// One allow-listed filter: the query parameter, the entity field it
/// constrains, and how the raw value is interpreted.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub param: &'static str,
    pub field: &'static str,
    pub kind: FilterKind,
}

/// The complete query surface of one entity type.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    /// Singular entity name, used in error messages
    pub entity: &'static str,
    /// Sort field applied when `sort_by` is absent or not allow-listed
    pub default_sort: &'static str,
    /// Fields `sort_by` may name
    pub sortable: &'static [&'static str],
    /// Text fields the `search` parameter scans
    pub searchable: &'static [&'static str],
    /// Typed filter parameters
    pub filters: &'static [FilterSpec],
}

impl EntitySchema {
    /// Resolve a requested sort field against the allow-list.
    ///
    /// Unknown fields fall back to the default sort key rather than
    /// erroring; clients with a stale field name keep a usable endpoint.
    pub fn resolve_sort_field(&self, requested: Option<&str>) -> &'static str {
        match requested {
            Some(name) => self
                .sortable
                .iter()
                .find(|f| **f == name)
                .copied()
                .unwrap_or(self.default_sort),
            None => self.default_sort,
        }
    }
}
