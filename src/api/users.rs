use crate::api::AppState;
use crate::api::schemas::users::{UserPayload, UserResponse, field_errors};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub username: String,
}

/// `GET /api/users?username={prefix}`
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse> {
    let users = state.user_service.get_users_by_username(&params.username).await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(body))
}

/// `GET /api/users/{id}`
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse> {
    let user = state.user_service.get_user_by_id(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate().map_err(|e| AppError::Validation(field_errors(&e)))?;

    let user = state.user_service.register_user(payload.username, payload.password).await?;

    let location = format!("/api/users/{}", user.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(UserResponse::from(user))))
}

/// `PUT /api/users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate().map_err(|e| AppError::Validation(field_errors(&e)))?;

    let user = state.user_service.update_user(id, payload.username, payload.password).await?;
    Ok(Json(UserResponse::from(user)))
}

/// `DELETE /api/users/{id}`
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse> {
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::OK)
}
