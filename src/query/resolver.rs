//! Plan execution against a storage collaborator
//!
//! [`execute`] performs the single logical read of a list request: one
//! count, one page fetch, metadata derived from the count. It never writes
//! and never retries; storage failures propagate as-is.
//!
//! The predicate helpers here are also what [`crate::storage::InMemoryStore`]
//! uses for both counting and fetching, which keeps the §count/§fetch
//! contract ("apply filters identically") true by construction.

use crate::core::entity::Record;
use crate::core::field::FieldValue;
use crate::query::page::{Page, PageMeta};
use crate::query::plan::{
    FilterOp, FilterPredicate, FilterSet, QueryPlan, SearchFilter, SortDirection, SortKey,
};
use crate::storage::{EntityStore, StoreError};
use std::cmp::Ordering;

/// Evaluate one predicate against a record.
///
/// A record that does not expose the field (or exposes it with an
/// incomparable type) does not match; the allow-list makes this unreachable
/// for well-formed schemas.
pub fn matches_predicate<T: Record>(record: &T, predicate: &FilterPredicate) -> bool {
    let Some(actual) = record.field_value(predicate.field) else {
        return false;
    };

    match predicate.op {
        FilterOp::Eq => match (&actual, &predicate.value) {
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
            _ => actual == predicate.value,
        },
        FilterOp::Gte => compare_for_range(&actual, &predicate.value)
            .is_some_and(|ord| ord != Ordering::Less),
        FilterOp::Lte => compare_for_range(&actual, &predicate.value)
            .is_some_and(|ord| ord != Ordering::Greater),
    }
}

fn compare_for_range(actual: &FieldValue, bound: &FieldValue) -> Option<Ordering> {
    match (actual, bound) {
        (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
        _ => match (actual.as_number(), bound.as_number()) {
            (Some(a), Some(b)) => Some(a.total_cmp(&b)),
            _ => None,
        },
    }
}

/// Case-insensitive substring match over the search fields, OR'd together.
pub fn matches_search<T: Record>(record: &T, search: &SearchFilter) -> bool {
    search.fields.iter().any(|field| {
        record
            .field_value(field)
            .as_ref()
            .and_then(FieldValue::as_string)
            .is_some_and(|text| text.to_lowercase().contains(&search.term))
    })
}

/// Conjunction of every predicate plus the optional search term.
pub fn matches_filter<T: Record>(record: &T, filter: &FilterSet) -> bool {
    filter
        .predicates
        .iter()
        .all(|p| matches_predicate(record, p))
        && filter
            .search
            .as_ref()
            .is_none_or(|s| matches_search(record, s))
}

/// Order two records by the sort key, ties broken by id ascending so the
/// ordering is total and repeated reads return identical sequences.
pub fn order_records<T: Record>(a: &T, b: &T, sort: &SortKey) -> Ordering {
    let left = a.field_value(sort.field).unwrap_or(FieldValue::Null);
    let right = b.field_value(sort.field).unwrap_or(FieldValue::Null);

    let primary = match sort.direction {
        SortDirection::Asc => left.compare(&right),
        SortDirection::Desc => right.compare(&left),
    };

    primary.then_with(|| a.id().cmp(&b.id()))
}

/// Execute a validated plan against the store.
///
/// `total_items` comes from `count` and is independent of the requested
/// page. A page past the end yields an empty item list with correct
/// metadata rather than an error.
pub async fn execute<T, S>(plan: &QueryPlan, store: &S) -> Result<Page<T>, StoreError>
where
    T: Record,
    S: EntityStore<T> + ?Sized,
{
    let total_items = store.count(&plan.filter).await?;
    let meta = PageMeta::new(plan.page, plan.per_page, total_items);

    let items = if plan.page > meta.total_pages {
        Vec::new()
    } else {
        store
            .fetch_page(&plan.filter, &plan.sort, plan.offset(), plan.per_page)
            .await?
    };

    Ok(Page { items, meta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::plan::{PageLimits, parse_plan};
    use crate::query::schema::{EntitySchema, FilterKind, FilterSpec};
    use crate::storage::InMemoryStore;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use uuid::Uuid;

    #[derive(Debug, Clone)]
    struct Widget {
        id: Uuid,
        name: String,
        price: f64,
        category: String,
        created_at: DateTime<Utc>,
    }

    static WIDGET_SCHEMA: EntitySchema = EntitySchema {
        entity: "widget",
        default_sort: "created_at",
        sortable: &["name", "price", "created_at"],
        searchable: &["name"],
        filters: &[
            FilterSpec {
                param: "category",
                field: "category",
                kind: FilterKind::Exact,
            },
            FilterSpec {
                param: "min_price",
                field: "price",
                kind: FilterKind::MinFloat,
            },
            FilterSpec {
                param: "max_price",
                field: "price",
                kind: FilterKind::MaxFloat,
            },
        ],
    };

    impl crate::core::entity::Entity for Widget {
        fn resource_name() -> &'static str {
            "widgets"
        }

        fn resource_name_singular() -> &'static str {
            "widget"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn updated_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    impl Record for Widget {
        fn schema() -> &'static EntitySchema {
            &WIDGET_SCHEMA
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(FieldValue::String(self.name.clone())),
                "price" => Some(FieldValue::Float(self.price)),
                "category" => Some(FieldValue::String(self.category.clone())),
                "created_at" => Some(FieldValue::DateTime(self.created_at)),
                _ => None,
            }
        }
    }

    fn widget(name: &str, price: f64, category: &str) -> Widget {
        Widget {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price,
            category: category.to_string(),
            created_at: Utc::now(),
        }
    }

    async fn seeded_store(widgets: Vec<Widget>) -> InMemoryStore<Widget> {
        let store = InMemoryStore::new();
        for w in widgets {
            store.insert(w).await.expect("insert should succeed");
        }
        store
    }

    fn plan_for(pairs: &[(&str, &str)]) -> QueryPlan {
        let params: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        parse_plan(&params, &WIDGET_SCHEMA, PageLimits::default()).expect("plan should parse")
    }

    #[tokio::test]
    async fn test_execute_returns_at_most_per_page_items() {
        let store = seeded_store((0..23).map(|i| widget(&format!("w{i}"), 1.0, "a")).collect()).await;

        let page = execute(&plan_for(&[("per_page", "10")]), &store)
            .await
            .expect("execute should succeed");
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.meta.total_items, 23);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[tokio::test]
    async fn test_execute_page_beyond_range_is_empty_not_error() {
        let store = seeded_store(vec![widget("only", 1.0, "a")]).await;

        let page = execute(&plan_for(&[("page", "7")]), &store)
            .await
            .expect("execute should succeed");
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_items, 1);
        assert_eq!(page.meta.total_pages, 1);
        assert!(!page.meta.has_next);
        assert!(page.meta.has_prev);
    }

    #[tokio::test]
    async fn test_execute_sort_asc_then_desc_reverses() {
        let store = seeded_store(vec![
            widget("a", 10.0, "x"),
            widget("b", 5.0, "x"),
            widget("c", 20.0, "x"),
        ])
        .await;

        let asc = execute(
            &plan_for(&[("sort_by", "price"), ("sort_order", "asc")]),
            &store,
        )
        .await
        .expect("execute should succeed");
        let desc = execute(
            &plan_for(&[("sort_by", "price"), ("sort_order", "desc")]),
            &store,
        )
        .await
        .expect("execute should succeed");

        let asc_prices: Vec<f64> = asc.items.iter().map(|w| w.price).collect();
        let desc_prices: Vec<f64> = desc.items.iter().map(|w| w.price).collect();
        assert_eq!(asc_prices, vec![5.0, 10.0, 20.0]);
        assert_eq!(desc_prices, vec![20.0, 10.0, 5.0]);
    }

    #[tokio::test]
    async fn test_execute_is_idempotent() {
        let store = seeded_store(
            (0..15)
                .map(|i| widget(&format!("w{}", i % 4), (i % 3) as f64, "a"))
                .collect(),
        )
        .await;
        let plan = plan_for(&[("sort_by", "name"), ("per_page", "7")]);

        let first = execute(&plan, &store).await.expect("execute should succeed");
        let second = execute(&plan, &store).await.expect("execute should succeed");

        assert_eq!(first.meta, second.meta);
        let first_ids: Vec<Uuid> = first.items.iter().map(|w| w.id).collect();
        let second_ids: Vec<Uuid> = second.items.iter().map(|w| w.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[tokio::test]
    async fn test_execute_search_case_insensitive_substring() {
        let store = seeded_store(vec![
            widget("Laptop Pro", 1000.0, "Electronics"),
            widget("Desk Lamp", 30.0, "Furniture"),
        ])
        .await;

        let page = execute(&plan_for(&[("search", "lap")]), &store)
            .await
            .expect("execute should succeed");
        assert_eq!(page.meta.total_items, 2); // "Laptop" and "Lamp" both contain "lap"

        let page = execute(&plan_for(&[("search", "laptop")]), &store)
            .await
            .expect("execute should succeed");
        assert_eq!(page.meta.total_items, 1);
        assert_eq!(page.items[0].name, "Laptop Pro");
    }

    #[tokio::test]
    async fn test_execute_filters_are_conjunctive() {
        let store = seeded_store(vec![
            widget("cheap-a", 5.0, "a"),
            widget("pricy-a", 50.0, "a"),
            widget("cheap-b", 5.0, "b"),
        ])
        .await;

        let page = execute(&plan_for(&[("category", "a"), ("max_price", "10")]), &store)
            .await
            .expect("execute should succeed");
        assert_eq!(page.meta.total_items, 1);
        assert_eq!(page.items[0].name, "cheap-a");
    }

    #[tokio::test]
    async fn test_execute_combined_scenario() {
        // 50 widgets, 12 in Electronics, per_page 5: page 3 holds 2 items.
        let mut widgets = Vec::new();
        for i in 0..12 {
            widgets.push(widget(&format!("e{i}"), 10.0 + i as f64, "Electronics"));
        }
        for i in 0..38 {
            widgets.push(widget(&format!("o{i}"), 5.0, "Other"));
        }
        let store = seeded_store(widgets).await;

        let page = execute(
            &plan_for(&[
                ("category", "Electronics"),
                ("per_page", "5"),
                ("page", "3"),
            ]),
            &store,
        )
        .await
        .expect("execute should succeed");

        assert_eq!(page.meta.total_items, 12);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.items.len(), 2);
        assert!(!page.meta.has_next);
        assert!(page.meta.has_prev);
    }

    #[tokio::test]
    async fn test_total_counts_independent_of_page() {
        let store = seeded_store((0..17).map(|i| widget(&format!("w{i}"), 1.0, "a")).collect()).await;

        for page_no in ["1", "2", "4"] {
            let page = execute(&plan_for(&[("page", page_no), ("per_page", "5")]), &store)
                .await
                .expect("execute should succeed");
            assert_eq!(page.meta.total_items, 17);
            assert_eq!(page.meta.total_pages, 4);
        }
    }

    #[test]
    fn test_order_records_ties_broken_by_id() {
        let mut a = widget("same", 1.0, "x");
        let mut b = widget("same", 1.0, "x");
        // Force a known id ordering.
        a.id = Uuid::from_u128(1);
        b.id = Uuid::from_u128(2);

        let sort = SortKey {
            field: "name",
            direction: SortDirection::Asc,
        };
        assert_eq!(order_records(&a, &b, &sort), Ordering::Less);
        assert_eq!(order_records(&b, &a, &sort), Ordering::Greater);

        // Same tiebreak direction even when the primary sort flips.
        let sort_desc = SortKey {
            field: "name",
            direction: SortDirection::Desc,
        };
        assert_eq!(order_records(&a, &b, &sort_desc), Ordering::Less);
    }
}
