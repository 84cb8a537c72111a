//! Informational endpoints: index, API info, health, stats, token identity

use crate::core::auth::AuthContext;
use crate::core::error::ApiError;
use crate::core::field::FieldValue;
use crate::query::plan::{FilterOp, FilterPredicate, FilterSet};
use crate::server::response::ItemResponse;
use crate::server::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use serde_json::{json, Value};

/// Crate version reported by info and health endpoints
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Welcome to the Storefront REST API",
        "version": VERSION,
        "endpoints": {
            "users": "/api/users",
            "products": "/api/products"
        }
    }))
}

/// GET /api
pub async fn api_info() -> Json<Value> {
    Json(json!({
        "success": true,
        "version": VERSION,
        "endpoints": {
            "users": "/api/users",
            "products": "/api/products",
            "health": "/api/health",
            "stats": "/api/stats",
            "me": "/api/auth/me"
        },
        "features": [
            "pagination",
            "search",
            "filtering",
            "sorting",
            "token-auth",
            "rate-limiting"
        ]
    }))
}

/// GET /api/health (also /health and /healthz)
///
/// Probes the storage collaborator with an unfiltered count; a failing
/// store degrades the status instead of failing the endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let storage_ok = state.products.count(&FilterSet::default()).await.is_ok()
        && state.users.count(&FilterSet::default()).await.is_ok();

    Json(json!({
        "success": true,
        "data": {
            "status": if storage_ok { "healthy" } else { "degraded" },
            "database": if storage_ok { "reachable" } else { "unreachable" },
            "version": VERSION
        }
    }))
}

fn bool_filter(field: &'static str, value: bool) -> FilterSet {
    FilterSet {
        predicates: vec![FilterPredicate {
            field,
            op: FilterOp::Eq,
            value: FieldValue::Boolean(value),
        }],
        search: None,
    }
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<ItemResponse<Value>>, ApiError> {
    let total_users = state.users.count(&FilterSet::default()).await?;
    let active_users = state.users.count(&bool_filter("is_active", true)).await?;
    let total_products = state.products.count(&FilterSet::default()).await?;
    let products_in_stock = state.products.count(&bool_filter("in_stock", true)).await?;

    Ok(Json(ItemResponse::new(json!({
        "total_users": total_users,
        "active_users": active_users,
        "total_products": total_products,
        "products_in_stock": products_in_stock
    }))))
}

/// GET /api/auth/me
///
/// The authorization middleware has already rejected anonymous callers;
/// the guard here only covers misconfigured routing.
pub async fn me(
    Extension(context): Extension<AuthContext>,
) -> Result<Json<ItemResponse<Value>>, ApiError> {
    match context {
        AuthContext::Token { name, roles } => Ok(Json(ItemResponse::new(json!({
            "name": name,
            "roles": roles
        })))),
        AuthContext::Anonymous => Err(ApiError::Unauthorized(
            "Invalid or missing authentication token".to_string(),
        )),
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
