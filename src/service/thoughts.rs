use sqlx::{Pool, Sqlite};

use crate::db::{Thought, ThoughtRepository, UserRepository};
use crate::error::AppError;
use crate::service::outcome::Outcome;
use crate::service::validation::{parse_id, NewReaction, NewThought, ThoughtChanges};

pub const NO_THOUGHT: &str = "No thought with this ID";
pub const CREATED_WITHOUT_USER: &str = "Thought created, but no user with this ID";
pub const DELETED_WITHOUT_USER: &str = "Thought deleted, but no user with this ID";

fn not_found() -> AppError {
    AppError::NotFound(NO_THOUGHT.to_string())
}

pub struct ThoughtService;

impl ThoughtService {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<Thought>, AppError> {
        ThoughtRepository::get_all(pool).await
    }

    pub async fn get(pool: &Pool<Sqlite>, thought_id: &str) -> Result<Thought, AppError> {
        let thought_id = parse_id(thought_id, "thoughtId")?;
        ThoughtRepository::get_by_id(pool, &thought_id)
            .await?
            .ok_or_else(not_found)
    }

    /// Persists the thought, then links it into its author's `thoughts`.
    ///
    /// The two writes are independent: if no user matches `user_id` the
    /// thought is kept and the outcome carries a warning.
    pub async fn create(
        pool: &Pool<Sqlite>,
        input: NewThought,
    ) -> Result<Outcome<Thought>, AppError> {
        let thought =
            ThoughtRepository::create(pool, &input.thought_text, &input.username).await?;
        tracing::debug!(thought_id = %thought.id, user_id = %input.user_id, "thought created");

        match UserRepository::add_thought(pool, &input.user_id, &thought.id).await? {
            Some(_) => Ok(Outcome::complete(thought)),
            None => {
                tracing::warn!(
                    thought_id = %thought.id,
                    user_id = %input.user_id,
                    "thought created without an owning user"
                );
                Ok(Outcome::partial(thought, CREATED_WITHOUT_USER))
            }
        }
    }

    pub async fn update(
        pool: &Pool<Sqlite>,
        thought_id: &str,
        changes: ThoughtChanges,
    ) -> Result<Thought, AppError> {
        let thought_id = parse_id(thought_id, "thoughtId")?;
        let thought =
            ThoughtRepository::update_text(pool, &thought_id, changes.thought_text.as_deref())
                .await?
                .ok_or_else(not_found)?;
        tracing::debug!(thought_id = %thought.id, "thought updated");
        Ok(thought)
    }

    /// Removes the thought, then pulls its id from whichever user lists it.
    pub async fn delete(
        pool: &Pool<Sqlite>,
        thought_id: &str,
    ) -> Result<Outcome<Thought>, AppError> {
        let thought_id = parse_id(thought_id, "thoughtId")?;
        let thought = ThoughtRepository::delete(pool, &thought_id)
            .await?
            .ok_or_else(not_found)?;
        tracing::debug!(thought_id = %thought.id, "thought deleted");

        match UserRepository::pull_thought_from_owner(pool, &thought_id).await? {
            Some(owner) => {
                tracing::debug!(thought_id = %thought_id, user_id = %owner.id, "thought unlinked from owner");
                Ok(Outcome::complete(thought))
            }
            None => {
                tracing::warn!(thought_id = %thought_id, "deleted thought had no owning user");
                Ok(Outcome::partial(thought, DELETED_WITHOUT_USER))
            }
        }
    }

    pub async fn add_reaction(
        pool: &Pool<Sqlite>,
        thought_id: &str,
        input: NewReaction,
    ) -> Result<Thought, AppError> {
        let thought_id = parse_id(thought_id, "thoughtId")?;
        ThoughtRepository::add_reaction(pool, &thought_id, &input.reaction_body, &input.username)
            .await?
            .ok_or_else(not_found)
    }

    /// Removing a reaction id the thought does not carry returns it unchanged.
    pub async fn remove_reaction(
        pool: &Pool<Sqlite>,
        thought_id: &str,
        reaction_id: &str,
    ) -> Result<Thought, AppError> {
        let thought_id = parse_id(thought_id, "thoughtId")?;
        ThoughtRepository::remove_reaction(pool, &thought_id, reaction_id)
            .await?
            .ok_or_else(not_found)
    }
}
