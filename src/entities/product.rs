//! Product entity, payload types and validation rules

use crate::core::entity::{Entity, Record};
use crate::core::field::FieldValue;
use crate::query::schema::{EntitySchema, FilterKind, FilterSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned when a creation payload omits one
pub const DEFAULT_CATEGORY: &str = "General";

/// Query surface of the product catalog.
pub static PRODUCT_SCHEMA: EntitySchema = EntitySchema {
    entity: "product",
    default_sort: "created_at",
    sortable: &["name", "price", "quantity", "created_at", "updated_at"],
    searchable: &["name", "description"],
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
        FilterSpec {
            param: "in_stock",
            field: "in_stock",
            kind: FilterKind::Bool,
        },
        FilterSpec {
            param: "created_after",
            field: "created_at",
            kind: FilterKind::After,
        },
        FilterSpec {
            param: "created_before",
            field: "created_at",
            kind: FilterKind::Before,
        },
    ],
};

/// A catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: String,
        description: String,
        price: f64,
        quantity: i64,
        category: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            price,
            quantity,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a product from a payload that already passed validation.
    pub fn from_payload(payload: &CreateProduct) -> Self {
        Self::new(
            payload.name.clone().unwrap_or_default(),
            payload.description.clone().unwrap_or_default(),
            payload.price.unwrap_or_default(),
            payload.quantity.unwrap_or(0),
            payload
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        )
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Apply a partial update; fields absent from the payload are kept.
    pub fn apply(&mut self, payload: &UpdateProduct) {
        if let Some(name) = &payload.name {
            self.name = name.clone();
        }
        if let Some(description) = &payload.description {
            self.description = description.clone();
        }
        if let Some(price) = payload.price {
            self.price = price;
        }
        if let Some(quantity) = payload.quantity {
            self.quantity = quantity;
        }
        if let Some(category) = &payload.category {
            self.category = category.clone();
        }
        self.touch();
    }
}

impl Entity for Product {
    fn resource_name() -> &'static str {
        "products"
    }

    fn resource_name_singular() -> &'static str {
        "product"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Record for Product {
    fn schema() -> &'static EntitySchema {
        &PRODUCT_SCHEMA
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => Some(FieldValue::String(self.name.clone())),
            "description" => Some(FieldValue::String(self.description.clone())),
            "price" => Some(FieldValue::Float(self.price)),
            "quantity" => Some(FieldValue::Integer(self.quantity)),
            "category" => Some(FieldValue::String(self.category.clone())),
            // Derived flag: a product is in stock while quantity is positive.
            "in_stock" => Some(FieldValue::Boolean(self.quantity > 0)),
            "created_at" => Some(FieldValue::DateTime(self.created_at)),
            "updated_at" => Some(FieldValue::DateTime(self.updated_at)),
            _ => None,
        }
    }
}

/// Creation payload. Fields are optional so missing values surface as
/// validation messages instead of deserialization rejections.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub category: Option<String>,
}

/// Partial update payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub category: Option<String>,
}

fn validate_name(name: &str, errors: &mut Vec<String>) {
    if name.len() > 100 {
        errors.push("Product name must not exceed 100 characters".to_string());
    }
}

fn validate_price(price: f64, errors: &mut Vec<String>) {
    if !price.is_finite() || price < 0.0 {
        errors.push("Price must be a positive number".to_string());
    }
}

fn validate_quantity(quantity: i64, errors: &mut Vec<String>) {
    if quantity < 0 {
        errors.push("Quantity must be a non-negative integer".to_string());
    }
}

/// Validate a creation payload, returning every broken rule.
pub fn validate_create(payload: &CreateProduct) -> Vec<String> {
    let mut errors = Vec::new();

    match payload.name.as_deref() {
        Some(name) if !name.is_empty() => validate_name(name, &mut errors),
        _ => errors.push("Product name is required".to_string()),
    }

    match payload.price {
        Some(price) => validate_price(price, &mut errors),
        None => errors.push("Price is required".to_string()),
    }

    if let Some(quantity) = payload.quantity {
        validate_quantity(quantity, &mut errors);
    }

    errors
}

/// Validate an update payload; absent fields are not checked.
pub fn validate_update(payload: &UpdateProduct) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(name) = payload.name.as_deref() {
        validate_name(name, &mut errors);
    }
    if let Some(price) = payload.price {
        validate_price(price, &mut errors);
    }
    if let Some(quantity) = payload.quantity {
        validate_quantity(quantity, &mut errors);
    }

    errors
}
