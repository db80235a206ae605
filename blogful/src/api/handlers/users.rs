use crate::api::extract::{ValidJson, resource_location};
use crate::api::models::users::{UserCreate, UserResponse, UserUpdate};
use crate::db::models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest};
use crate::errors::{Error, ErrorBody, Result};
use crate::sanitize::Sanitize;
use crate::{AppState, types::UserId};
use axum::{
    Json,
    extract::{OriginalUri, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

async fn find_user(state: &AppState, id: &str) -> Result<UserDBResponse> {
    let not_found = || Error::NotFound {
        message: "User doesn't exist".to_string(),
    };
    let id: UserId = id.parse().map_err(|_| not_found())?;
    state.users.get_by_id(id).await?.ok_or_else(not_found)
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    summary = "List users",
    responses(
        (status = 200, description = "Every user, sanitized", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect::<Vec<_>>().sanitized()))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    summary = "Create user",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse,
            headers(("Location" = String, description = "Path of the new user"))),
        (status = 400, description = "Missing field or invalid body", body = ErrorBody),
        (status = 409, description = "Username already taken", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ValidJson(body): ValidJson<UserCreate>,
) -> Result<impl IntoResponse> {
    let request = UserCreateDBRequest::try_from(body)?;
    let user = state.users.create(&request).await?;
    tracing::info!(user_id = user.id, "Created user");

    let location = resource_location(uri.path(), user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(user).sanitized()),
    ))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    summary = "Get user",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user, sanitized", body = UserResponse),
        (status = 404, description = "User doesn't exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<UserResponse>> {
    let user = find_user(&state, &id).await?;

    Ok(Json(UserResponse::from(user).sanitized()))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    summary = "Update user",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "No updatable field supplied", body = ErrorBody),
        (status = 404, description = "User doesn't exist", body = ErrorBody),
        (status = 409, description = "Username already taken", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<UserUpdate>,
) -> Result<StatusCode> {
    let user = find_user(&state, &id).await?;
    let request = UserUpdateDBRequest::try_from(body)?;

    state.users.update(user.id, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    summary = "Delete user",
    description = "The user's comments are deleted with them; their articles remain without an author.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User doesn't exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let user = find_user(&state, &id).await?;

    state.users.delete(user.id).await?;
    tracing::info!(user_id = user.id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
