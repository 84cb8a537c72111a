//! User entity, payload types and validation rules

use crate::core::entity::{Entity, Record};
use crate::core::field::{self, FieldValue};
use crate::query::schema::{EntitySchema, FilterKind, FilterSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Allowed values for the `role` field
pub const ROLES: &[&str] = &["user", "admin"];

/// Query surface of the user collection: what clients may sort, search
/// and filter on.
pub static USER_SCHEMA: EntitySchema = EntitySchema {
    entity: "user",
    default_sort: "created_at",
    sortable: &["username", "email", "created_at", "updated_at"],
    searchable: &["username", "email"],
    filters: &[
        FilterSpec {
            param: "role",
            field: "role",
            kind: FilterKind::Exact,
        },
        FilterSpec {
            param: "is_active",
            field: "is_active",
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

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, role: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Apply a partial update; fields absent from the payload are kept.
    pub fn apply(&mut self, payload: &UpdateUser) {
        if let Some(username) = &payload.username {
            self.username = username.clone();
        }
        if let Some(email) = &payload.email {
            self.email = email.clone();
        }
        if let Some(role) = &payload.role {
            self.role = role.clone();
        }
        if let Some(is_active) = payload.is_active {
            self.is_active = is_active;
        }
        self.touch();
    }
}

impl Entity for User {
    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
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

impl Record for User {
    fn schema() -> &'static EntitySchema {
        &USER_SCHEMA
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "username" => Some(FieldValue::String(self.username.clone())),
            "email" => Some(FieldValue::String(self.email.clone())),
            "role" => Some(FieldValue::String(self.role.clone())),
            "is_active" => Some(FieldValue::Boolean(self.is_active)),
            "created_at" => Some(FieldValue::DateTime(self.created_at)),
            "updated_at" => Some(FieldValue::DateTime(self.updated_at)),
            _ => None,
        }
    }
}

/// Creation payload. Fields are optional so missing values surface as
/// validation messages instead of deserialization rejections.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Partial update payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

fn validate_username(username: &str, errors: &mut Vec<String>) {
    if username.len() < 3 {
        errors.push("Username must be at least 3 characters".to_string());
    }
    if username.len() > 80 {
        errors.push("Username must not exceed 80 characters".to_string());
    }
}

fn validate_email(email: &str, errors: &mut Vec<String>) {
    if !field::is_valid_email(email) {
        errors.push("Invalid email format".to_string());
    }
    if email.len() > 120 {
        errors.push("Email must not exceed 120 characters".to_string());
    }
}

fn validate_role(role: &str, errors: &mut Vec<String>) {
    if !ROLES.contains(&role) {
        errors.push(format!("Role must be one of: {}", ROLES.join(", ")));
    }
}

/// Validate a creation payload, returning every broken rule.
pub fn validate_create(payload: &CreateUser) -> Vec<String> {
    let mut errors = Vec::new();

    match payload.username.as_deref() {
        Some(username) if !username.is_empty() => validate_username(username, &mut errors),
        _ => errors.push("Username is required".to_string()),
    }

    match payload.email.as_deref() {
        Some(email) if !email.is_empty() => validate_email(email, &mut errors),
        _ => errors.push("Email is required".to_string()),
    }

    if let Some(role) = payload.role.as_deref() {
        validate_role(role, &mut errors);
    }

    errors
}

/// Validate an update payload; absent fields are not checked.
pub fn validate_update(payload: &UpdateUser) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(username) = payload.username.as_deref() {
        validate_username(username, &mut errors);
    }
    if let Some(email) = payload.email.as_deref() {
        validate_email(email, &mut errors);
    }
    if let Some(role) = payload.role.as_deref() {
        validate_role(role, &mut errors);
    }

    errors
}
