use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::extract::AppJson;
use crate::api::state::AppState;
use crate::db::{User, UserDetail};
use crate::error::AppError;
use crate::service::validation::{NewUser, UserChanges};
use crate::service::UserService;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = AppError;

    fn try_from(req: CreateUserRequest) -> Result<Self, Self::Error> {
        NewUser::new(req.username, req.email)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserChanges {
    type Error = AppError;

    fn try_from(req: UpdateUserRequest) -> Result<Self, Self::Error> {
        UserChanges::new(req.username, req.email)
    }
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(UserService::list(&state.db).await?))
}

/// GET /api/users/:userId
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDetail>, AppError> {
    Ok(Json(UserService::get(&state.db, &user_id).await?))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    let input = NewUser::try_from(req)?;
    Ok(Json(UserService::create(&state.db, input).await?))
}

/// PUT /api/users/:userId
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let changes = UserChanges::try_from(req)?;
    Ok(Json(UserService::update(&state.db, &user_id, changes).await?))
}

/// DELETE /api/users/:userId
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    UserService::delete(&state.db, &user_id).await?;
    Ok(Json(serde_json::json!({
        "message": "User and associated thoughts deleted!",
    })))
}

/// POST /api/users/:userId/friends/:friendId
pub async fn add_friend(
    State(state): State<AppState>,
    Path((user_id, friend_id)): Path<(String, String)>,
) -> Result<Json<User>, AppError> {
    Ok(Json(UserService::add_friend(&state.db, &user_id, &friend_id).await?))
}

/// DELETE /api/users/:userId/friends/:friendId
pub async fn remove_friend(
    State(state): State<AppState>,
    Path((user_id, friend_id)): Path<(String, String)>,
) -> Result<Json<User>, AppError> {
    Ok(Json(UserService::remove_friend(&state.db, &user_id, &friend_id).await?))
}
