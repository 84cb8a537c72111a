//! The request-filtering and pagination pipeline
//!
//! A list request flows through two stages:
//!
//! 1. [`plan::parse_plan`] validates and normalizes the raw query
//!    parameters against the entity's [`schema::EntitySchema`] allow-lists,
//!    producing a [`plan::QueryPlan`] or a validation error — before any
//!    storage access.
//! 2. [`resolver::execute`] runs the plan against a storage collaborator:
//!    one count, one bounded fetch, deterministic ordering, and pagination
//!    metadata that is independent of the requested page.

pub mod page;
pub mod plan;
pub mod resolver;
pub mod schema;

pub use page::{Page, PageMeta};
pub use plan::{parse_plan, FilterSet, PageLimits, QueryError, QueryPlan};
pub use resolver::execute;
pub use schema::{EntitySchema, FilterKind, FilterSpec};
