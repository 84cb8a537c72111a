//! Storage collaborators
//!
//! The rest of the application talks to persistence exclusively through
//! [`EntityStore`], so backends can be swapped without touching handlers or
//! the query pipeline. The in-memory implementation is the development and
//! test default.

pub mod in_memory;

pub use in_memory::InMemoryStore;

use crate::core::entity::Record;
use crate::query::plan::{FilterSet, SortKey};
use async_trait::async_trait;
use uuid::Uuid;

/// Errors surfaced by storage backends.
///
/// `Unavailable` maps to HTTP 503; callers never retry — if a backend wants
/// retries it owns them itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: Uuid },
}

/// CRUD plus bounded querying over one entity type.
///
/// `count` and `fetch_page` MUST apply `filter` identically so pagination
/// metadata stays consistent with the returned page.
#[async_trait]
pub trait EntityStore<T: Record>: Send + Sync {
    /// Insert a new entity
    async fn insert(&self, entity: T) -> Result<T, StoreError>;

    /// Get an entity by id
    async fn get(&self, id: &Uuid) -> Result<Option<T>, StoreError>;

    /// Replace an existing entity; `NotFound` if the id is unknown
    async fn replace(&self, id: &Uuid, entity: T) -> Result<T, StoreError>;

    /// Remove an entity; `NotFound` if the id is unknown
    async fn remove(&self, id: &Uuid) -> Result<(), StoreError>;

    /// Count entities matching the filter set, ignoring pagination
    async fn count(&self, filter: &FilterSet) -> Result<usize, StoreError>;

    /// Fetch one sorted, bounded slice of the matching entities
    async fn fetch_page(
        &self,
        filter: &FilterSet,
        sort: &SortKey,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>, StoreError>;

    /// Find entities whose field equals the given string, used for
    /// uniqueness checks on create/update
    async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<T>, StoreError>;
}
