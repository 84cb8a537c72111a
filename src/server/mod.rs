//! Application state and router assembly

pub mod handlers;
pub mod middleware;
pub mod response;

use crate::config::AppConfig;
use crate::core::auth::{AuthProvider, NoAuthProvider, StaticTokenProvider};
use crate::core::rate_limit::{FixedWindowLimiter, RateLimiter, Unlimited};
use crate::entities::{Product, User};
use crate::query::plan::PageLimits;
use crate::storage::{EntityStore, InMemoryStore, StoreError};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state: the stores and collaborators every handler
/// works against. All members are passed-in objects so tests can assemble
/// a state from whatever combination they need.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn EntityStore<User>>,
    pub products: Arc<dyn EntityStore<Product>>,
    pub auth: Arc<dyn AuthProvider>,
    pub limiter: Arc<dyn RateLimiter>,
    pub page_limits: PageLimits,
}

impl AppState {
    /// Assemble state from configuration with in-memory stores.
    ///
    /// An empty token table means development mode: every caller is an
    /// admin.
    pub fn from_config(config: &AppConfig) -> Self {
        let auth: Arc<dyn AuthProvider> = if config.tokens.is_empty() {
            Arc::new(NoAuthProvider)
        } else {
            Arc::new(StaticTokenProvider::new(config.tokens.iter().map(|t| {
                (t.token.clone(), t.name.clone(), t.roles.clone())
            })))
        };

        let limiter: Arc<dyn RateLimiter> = match &config.rate_limit {
            Some(rl) => Arc::new(FixedWindowLimiter::new(
                rl.max_requests,
                Duration::from_secs(rl.window_secs),
            )),
            None => Arc::new(Unlimited),
        };

        Self {
            users: Arc::new(InMemoryStore::new()),
            products: Arc::new(InMemoryStore::new()),
            auth,
            limiter,
            page_limits: config.pagination.limits(),
        }
    }
}

/// Build the complete application router.
///
/// Layer order matters: rate limiting runs before authorization so an
/// abusive caller is rejected without touching the auth provider.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::system::index))
        .route("/health", get(handlers::system::health))
        .route("/healthz", get(handlers::system::health))
        .route("/api", get(handlers::system::api_info))
        .route("/api/health", get(handlers::system::health))
        .route("/api/stats", get(handlers::system::stats))
        .route("/api/auth/me", get(handlers::system::me))
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/api/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/api/products/bulk",
            post(handlers::products::bulk_create_products)
                .delete(handlers::products::bulk_delete_products),
        )
        .route(
            "/api/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .fallback(handlers::system::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::authorize,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Populate the stores with a small demo catalog for local development.
pub async fn seed_demo(state: &AppState) -> Result<(), StoreError> {
    const USERS: &[(&str, &str)] = &[
        ("john_doe", "user"),
        ("jane_smith", "user"),
        ("bob_wilson", "user"),
        ("alice_brown", "admin"),
        ("charlie_davis", "user"),
    ];

    const PRODUCTS: &[(&str, &str, f64, i64, &str)] = &[
        (
            "Laptop Pro 15",
            "High-performance laptop with 16GB RAM",
            1299.99,
            25,
            "Electronics",
        ),
        (
            "Wireless Mouse",
            "Ergonomic wireless mouse with long battery life",
            29.99,
            100,
            "Electronics",
        ),
        (
            "Mechanical Keyboard",
            "RGB mechanical keyboard with blue switches",
            89.99,
            50,
            "Electronics",
        ),
        (
            "Office Chair",
            "Ergonomic office chair with lumbar support",
            299.99,
            15,
            "Furniture",
        ),
        (
            "Standing Desk",
            "Electric height-adjustable standing desk",
            499.99,
            10,
            "Furniture",
        ),
        (
            "Desk Lamp LED",
            "Adjustable LED desk lamp with USB charging port",
            39.99,
            60,
            "Furniture",
        ),
        (
            "REST API Design",
            "Best practices for designing RESTful APIs",
            34.99,
            55,
            "Books",
        ),
        (
            "Notebook Pack",
            "Pack of 5 spiral notebooks",
            12.99,
            200,
            "Office Supplies",
        ),
    ];

    for (username, role) in USERS {
        state
            .users
            .insert(User::new(
                username.to_string(),
                format!("{}@example.com", username),
                role.to_string(),
            ))
            .await?;
    }

    for (name, description, price, quantity, category) in PRODUCTS {
        state
            .products
            .insert(Product::new(
                name.to_string(),
                description.to_string(),
                *price,
                *quantity,
                category.to_string(),
            ))
            .await?;
    }

    tracing::info!(
        users = USERS.len(),
        products = PRODUCTS.len(),
        "demo data seeded"
    );
    Ok(())
}
