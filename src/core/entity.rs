//! Entity traits defining the core abstraction for persisted records

use crate::core::field::FieldValue;
use crate::query::schema::EntitySchema;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all entities in the system.
///
/// All entities have:
/// - id: Unique identifier
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "users", "products")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "user", "product")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Trait for entities the query pipeline can filter, search and sort.
///
/// Field access goes through [`Record::field_value`] with names drawn from
/// the entity's [`EntitySchema`] allow-lists; arbitrary field names simply
/// resolve to `None` and never reach an unintended attribute.
pub trait Record: Entity {
    /// The static allow-list schema for this entity type
    fn schema() -> &'static EntitySchema;

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}
