use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::extract::AppJson;
use crate::api::state::AppState;
use crate::db::Thought;
use crate::error::AppError;
use crate::service::validation::{NewReaction, NewThought, ThoughtChanges};
use crate::service::ThoughtService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThoughtRequest {
    pub thought_text: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<String>,
}

impl TryFrom<CreateThoughtRequest> for NewThought {
    type Error = AppError;

    fn try_from(req: CreateThoughtRequest) -> Result<Self, Self::Error> {
        NewThought::new(req.thought_text, req.username, req.user_id)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThoughtRequest {
    pub thought_text: Option<String>,
}

impl TryFrom<UpdateThoughtRequest> for ThoughtChanges {
    type Error = AppError;

    fn try_from(req: UpdateThoughtRequest) -> Result<Self, Self::Error> {
        ThoughtChanges::new(req.thought_text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReactionRequest {
    pub reaction_body: Option<String>,
    pub username: Option<String>,
}

impl TryFrom<AddReactionRequest> for NewReaction {
    type Error = AppError;

    fn try_from(req: AddReactionRequest) -> Result<Self, Self::Error> {
        NewReaction::new(req.reaction_body, req.username)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateThoughtResponse {
    pub message: &'static str,
    pub thought: Thought,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteThoughtResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// GET /api/thoughts
pub async fn list_thoughts(State(state): State<AppState>) -> Result<Json<Vec<Thought>>, AppError> {
    Ok(Json(ThoughtService::list(&state.db).await?))
}

/// GET /api/thoughts/:thoughtId
pub async fn get_thought(
    State(state): State<AppState>,
    Path(thought_id): Path<String>,
) -> Result<Json<Thought>, AppError> {
    Ok(Json(ThoughtService::get(&state.db, &thought_id).await?))
}

/// POST /api/thoughts
///
/// Succeeds with a `warning` when the thought was stored but no user
/// matched `userId`.
pub async fn create_thought(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateThoughtRequest>,
) -> Result<Json<CreateThoughtResponse>, AppError> {
    let input = NewThought::try_from(req)?;
    let outcome = ThoughtService::create(&state.db, input).await?;

    Ok(Json(CreateThoughtResponse {
        message: "Thought successfully created!",
        thought: outcome.value,
        warning: outcome.warning,
    }))
}

/// PUT /api/thoughts/:thoughtId
pub async fn update_thought(
    State(state): State<AppState>,
    Path(thought_id): Path<String>,
    AppJson(req): AppJson<UpdateThoughtRequest>,
) -> Result<Json<Thought>, AppError> {
    let changes = ThoughtChanges::try_from(req)?;
    Ok(Json(ThoughtService::update(&state.db, &thought_id, changes).await?))
}

/// DELETE /api/thoughts/:thoughtId
pub async fn delete_thought(
    State(state): State<AppState>,
    Path(thought_id): Path<String>,
) -> Result<Json<DeleteThoughtResponse>, AppError> {
    let outcome = ThoughtService::delete(&state.db, &thought_id).await?;

    Ok(Json(DeleteThoughtResponse {
        message: "Thought successfully deleted!",
        warning: outcome.warning,
    }))
}

/// POST /api/thoughts/:thoughtId/reactions
pub async fn add_reaction(
    State(state): State<AppState>,
    Path(thought_id): Path<String>,
    AppJson(req): AppJson<AddReactionRequest>,
) -> Result<Json<Thought>, AppError> {
    let input = NewReaction::try_from(req)?;
    Ok(Json(ThoughtService::add_reaction(&state.db, &thought_id, input).await?))
}

/// DELETE /api/thoughts/:thoughtId/reactions/:reactionId
pub async fn remove_reaction(
    State(state): State<AppState>,
    Path((thought_id, reaction_id)): Path<(String, String)>,
) -> Result<Json<Thought>, AppError> {
    Ok(Json(
        ThoughtService::remove_reaction(&state.db, &thought_id, &reaction_id).await?,
    ))
}
