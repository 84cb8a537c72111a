//! In-memory implementation of EntityStore for development and tests

use crate::core::entity::Record;
use crate::core::field::FieldValue;
use crate::query::plan::{FilterSet, SortKey};
use crate::query::resolver::{matches_filter, order_records};
use crate::storage::{EntityStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory entity store backed by a `RwLock`ed map.
///
/// Counting and fetching share the same predicate evaluation
/// ([`matches_filter`]), so pagination metadata always agrees with the
/// returned page.
#[derive(Clone)]
pub struct InMemoryStore<T> {
    entities: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Record> InMemoryStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, T>>, StoreError> {
        self.entities
            .read()
            .map_err(|e| StoreError::Unavailable(format!("failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, T>>, StoreError> {
        self.entities
            .write()
            .map_err(|e| StoreError::Unavailable(format!("failed to acquire write lock: {}", e)))
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> EntityStore<T> for InMemoryStore<T> {
    async fn insert(&self, entity: T) -> Result<T, StoreError> {
        let mut entities = self.write()?;
        entities.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>, StoreError> {
        let entities = self.read()?;
        Ok(entities.get(id).cloned())
    }

    async fn replace(&self, id: &Uuid, entity: T) -> Result<T, StoreError> {
        let mut entities = self.write()?;
        if !entities.contains_key(id) {
            return Err(StoreError::NotFound {
                entity: T::resource_name_singular(),
                id: *id,
            });
        }
        entities.insert(*id, entity.clone());
        Ok(entity)
    }

    async fn remove(&self, id: &Uuid) -> Result<(), StoreError> {
        let mut entities = self.write()?;
        if entities.remove(id).is_none() {
            return Err(StoreError::NotFound {
                entity: T::resource_name_singular(),
                id: *id,
            });
        }
        Ok(())
    }

    async fn count(&self, filter: &FilterSet) -> Result<usize, StoreError> {
        let entities = self.read()?;
        Ok(entities
            .values()
            .filter(|e| matches_filter(*e, filter))
            .count())
    }

    async fn fetch_page(
        &self,
        filter: &FilterSet,
        sort: &SortKey,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>, StoreError> {
        let entities = self.read()?;
        let mut matching: Vec<T> = entities
            .values()
            .filter(|e| matches_filter(*e, filter))
            .cloned()
            .collect();

        matching.sort_by(|a, b| order_records(a, b, sort));

        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<T>, StoreError> {
        let entities = self.read()?;
        Ok(entities
            .values()
            .filter(|e| {
                e.field_value(field)
                    .as_ref()
                    .and_then(FieldValue::as_string)
                    .is_some_and(|v| v == value)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::product::Product;
    use crate::query::plan::SortDirection;

    fn product(name: &str, price: f64) -> Product {
        Product::new(
            name.to_string(),
            String::new(),
            price,
            0,
            "General".to_string(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryStore::new();
        let p = product("Keyboard", 89.99);
        let id = p.id;

        store.insert(p).await.expect("insert should succeed");

        let found = store.get(&id).await.expect("get should succeed");
        assert_eq!(found.expect("should exist").name, "Keyboard");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store: InMemoryStore<Product> = InMemoryStore::new();
        let found = store.get(&Uuid::new_v4()).await.expect("get should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_replace_unknown_id_is_not_found() {
        let store = InMemoryStore::new();
        let p = product("Ghost", 1.0);
        let err = store.replace(&Uuid::new_v4(), p).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryStore::new();
        let p = product("Mouse", 29.99);
        let id = p.id;
        store.insert(p).await.expect("insert should succeed");

        store.remove(&id).await.expect("remove should succeed");
        assert!(store.get(&id).await.expect("get should succeed").is_none());

        let err = store.remove(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_count_and_fetch_agree() {
        let store = InMemoryStore::new();
        for i in 0..7 {
            store
                .insert(product(&format!("p{i}"), i as f64))
                .await
                .expect("insert should succeed");
        }

        let filter = FilterSet::default();
        let sort = SortKey {
            field: "price",
            direction: SortDirection::Asc,
        };

        let total = store.count(&filter).await.expect("count should succeed");
        let all = store
            .fetch_page(&filter, &sort, 0, 100)
            .await
            .expect("fetch should succeed");
        assert_eq!(total, all.len());
    }

    #[tokio::test]
    async fn test_fetch_page_offset_and_limit() {
        let store = InMemoryStore::new();
        for i in 0..10 {
            store
                .insert(product(&format!("p{i}"), i as f64))
                .await
                .expect("insert should succeed");
        }

        let sort = SortKey {
            field: "price",
            direction: SortDirection::Asc,
        };
        let page = store
            .fetch_page(&FilterSet::default(), &sort, 4, 3)
            .await
            .expect("fetch should succeed");

        let prices: Vec<f64> = page.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![4.0, 5.0, 6.0]);
    }

    #[tokio::test]
    async fn test_find_by_field() {
        let store = InMemoryStore::new();
        store
            .insert(product("Unique", 5.0))
            .await
            .expect("insert should succeed");
        store
            .insert(product("Other", 5.0))
            .await
            .expect("insert should succeed");

        let hits = store
            .find_by_field("name", "Unique")
            .await
            .expect("find should succeed");
        assert_eq!(hits.len(), 1);

        let misses = store
            .find_by_field("name", "unique")
            .await
            .expect("find should succeed");
        assert!(misses.is_empty()); // exact match is case-sensitive
    }
}
