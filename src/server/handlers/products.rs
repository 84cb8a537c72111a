//! CRUD and bulk handlers for the product catalog

use crate::core::error::ApiError;
use crate::entities::product::{
    self, CreateProduct, Product, UpdateProduct, PRODUCT_SCHEMA,
};
use crate::query::{parse_plan, resolver};
use crate::server::response::{ItemResponse, ListResponse, MessageResponse};
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse<Product>>, ApiError> {
    let plan = parse_plan(&params, &PRODUCT_SCHEMA, state.page_limits)?;
    let page = resolver::execute(&plan, state.products.as_ref()).await?;
    Ok(Json(page.into()))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse<Product>>, ApiError> {
    let product = state.products.get(&id).await?.ok_or(ApiError::NotFound {
        entity: "product",
        id,
    })?;
    Ok(Json(ItemResponse::new(product)))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProduct>,
) -> Result<(StatusCode, Json<ItemResponse<Product>>), ApiError> {
    let errors = product::validate_create(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let created = state
        .products
        .insert(Product::from_payload(&payload))
        .await?;
    tracing::info!(product_id = %created.id, "product created");

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::with_message(
            created,
            "Product created successfully",
        )),
    ))
}

/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<ItemResponse<Product>>, ApiError> {
    let mut existing = state.products.get(&id).await?.ok_or(ApiError::NotFound {
        entity: "product",
        id,
    })?;

    let errors = product::validate_update(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    existing.apply(&payload);
    let updated = state.products.replace(&id, existing).await?;

    Ok(Json(ItemResponse::with_message(
        updated,
        "Product updated successfully",
    )))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.products.remove(&id).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// Body of POST /api/products/bulk
#[derive(Debug, Deserialize)]
pub struct BulkCreateProducts {
    pub products: Vec<CreateProduct>,
}

/// POST /api/products/bulk
///
/// Every payload is validated before any insert so a bad entry rejects the
/// whole batch instead of leaving a partial one behind.
pub async fn bulk_create_products(
    State(state): State<AppState>,
    Json(body): Json<BulkCreateProducts>,
) -> Result<(StatusCode, Json<ItemResponse<serde_json::Value>>), ApiError> {
    if body.products.is_empty() {
        return Err(ApiError::BadRequest("No products provided".to_string()));
    }

    let mut errors = Vec::new();
    for (index, payload) in body.products.iter().enumerate() {
        for error in product::validate_create(payload) {
            errors.push(format!("products[{}]: {}", index, error));
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let mut created = 0usize;
    for payload in &body.products {
        state
            .products
            .insert(Product::from_payload(payload))
            .await?;
        created += 1;
    }
    tracing::info!(created, "bulk product create");

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::with_message(
            json!({ "created": created }),
            "Products created successfully",
        )),
    ))
}

/// Body of DELETE /api/products/bulk
#[derive(Debug, Deserialize)]
pub struct BulkDeleteProducts {
    pub ids: Vec<Uuid>,
}

/// DELETE /api/products/bulk
///
/// Unknown ids are skipped, not errors; the response reports how many
/// products actually went away.
pub async fn bulk_delete_products(
    State(state): State<AppState>,
    Json(body): Json<BulkDeleteProducts>,
) -> Result<Json<ItemResponse<serde_json::Value>>, ApiError> {
    let mut deleted = 0usize;
    for id in &body.ids {
        match state.products.remove(id).await {
            Ok(()) => deleted += 1,
            Err(crate::storage::StoreError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }
    tracing::info!(deleted, "bulk product delete");

    Ok(Json(ItemResponse::with_message(
        json!({ "deleted": deleted }),
        "Products deleted successfully",
    )))
}
