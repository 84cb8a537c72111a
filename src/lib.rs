//! # Storefront
//!
//! A REST backend managing users and a product catalog, built around a
//! deterministic request-filtering and pagination pipeline.
//!
//! ## Architecture
//!
//! - **Query pipeline** ([`query`]): raw query parameters are validated
//!   against static per-entity allow-lists into a [`query::QueryPlan`],
//!   then executed against a storage collaborator as exactly one count and
//!   one bounded fetch, yielding a page plus metadata.
//! - **Collaborators**: persistence ([`storage::EntityStore`]),
//!   authentication ([`core::auth::AuthProvider`]) and rate limiting
//!   ([`core::rate_limit::RateLimiter`]) are passed-in trait objects owned
//!   by [`server::AppState`] — no process-wide singletons.
//! - **Entities** ([`entities`]): `User` and `Product`, each with payload
//!   validation and an allow-list schema.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use storefront::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default_config();
//!     let state = AppState::from_config(&config);
//!     let app = build_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod query;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, AuthProvider, NoAuthProvider, StaticTokenProvider},
        entity::{Entity, Record},
        error::ApiError,
        field::FieldValue,
        rate_limit::{FixedWindowLimiter, RateLimiter, Unlimited},
    };

    // === Query pipeline ===
    pub use crate::query::{
        execute, parse_plan, EntitySchema, FilterKind, FilterSet, FilterSpec, Page, PageLimits,
        PageMeta, QueryError, QueryPlan,
    };

    // === Entities ===
    pub use crate::entities::{Product, User};

    // === Storage ===
    pub use crate::storage::{EntityStore, InMemoryStore, StoreError};

    // === Server ===
    pub use crate::server::{build_router, seed_demo, AppState};

    // === Config ===
    pub use crate::config::AppConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
