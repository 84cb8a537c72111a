//! CRUD handlers for the user collection

use crate::core::error::ApiError;
use crate::entities::user::{
    self, CreateUser, UpdateUser, User, USER_SCHEMA,
};
use crate::query::{parse_plan, resolver};
use crate::server::response::{ItemResponse, ListResponse, MessageResponse};
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::collections::HashMap;
use uuid::Uuid;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse<User>>, ApiError> {
    let plan = parse_plan(&params, &USER_SCHEMA, state.page_limits)?;
    let page = resolver::execute(&plan, state.users.as_ref()).await?;
    Ok(Json(page.into()))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse<User>>, ApiError> {
    let user = state
        .users
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound { entity: "user", id })?;
    Ok(Json(ItemResponse::new(user)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<ItemResponse<User>>), ApiError> {
    let errors = user::validate_create(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let username = payload.username.unwrap_or_default();
    let email = payload.email.unwrap_or_default();

    if !state.users.find_by_field("username", &username).await?.is_empty() {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }
    if !state.users.find_by_field("email", &email).await?.is_empty() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let role = payload.role.unwrap_or_else(|| "user".to_string());
    let created = state.users.insert(User::new(username, email, role)).await?;
    tracing::info!(user_id = %created.id, "user created");

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::with_message(created, "User created successfully")),
    ))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<ItemResponse<User>>, ApiError> {
    let mut existing = state
        .users
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound { entity: "user", id })?;

    let errors = user::validate_update(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if let Some(username) = &payload.username {
        let taken = state
            .users
            .find_by_field("username", username)
            .await?
            .into_iter()
            .any(|u| u.id != id);
        if taken {
            return Err(ApiError::Conflict("Username already exists".to_string()));
        }
    }
    if let Some(email) = &payload.email {
        let taken = state
            .users
            .find_by_field("email", email)
            .await?
            .into_iter()
            .any(|u| u.id != id);
        if taken {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }

    existing.apply(&payload);
    let updated = state.users.replace(&id, existing).await?;

    Ok(Json(ItemResponse::with_message(
        updated,
        "User updated successfully",
    )))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.remove(&id).await?;
    tracing::info!(user_id = %id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
