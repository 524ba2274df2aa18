use sqlx::{Pool, Sqlite};

use crate::db::{ThoughtRepository, User, UserDetail, UserRepository};
use crate::error::AppError;
use crate::service::validation::{parse_id, NewUser, UserChanges};

pub const NO_USER: &str = "No user with this ID";

fn not_found() -> AppError {
    AppError::NotFound(NO_USER.to_string())
}

pub struct UserService;

impl UserService {
    pub async fn list(pool: &Pool<Sqlite>) -> Result<Vec<User>, AppError> {
        UserRepository::get_all(pool).await
    }

    /// Fetches a user with `thoughts` and `friends` expanded into records.
    pub async fn get(pool: &Pool<Sqlite>, user_id: &str) -> Result<UserDetail, AppError> {
        let user_id = parse_id(user_id, "userId")?;
        let user = UserRepository::get_by_id(pool, &user_id)
            .await?
            .ok_or_else(not_found)?;

        let thoughts = ThoughtRepository::get_owned_by(pool, &user.id).await?;
        let friends = UserRepository::get_friends_of(pool, &user.id).await?;

        Ok(UserDetail {
            id: user.id,
            username: user.username,
            email: user.email,
            thoughts,
            friends,
            friend_count: user.friend_count,
        })
    }

    pub async fn create(pool: &Pool<Sqlite>, input: NewUser) -> Result<User, AppError> {
        let user = UserRepository::create(pool, &input.username, &input.email).await?;
        tracing::debug!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    pub async fn update(
        pool: &Pool<Sqlite>,
        user_id: &str,
        changes: UserChanges,
    ) -> Result<User, AppError> {
        let user_id = parse_id(user_id, "userId")?;
        let user = UserRepository::update_fields(
            pool,
            &user_id,
            changes.username.as_deref(),
            changes.email.as_deref(),
        )
        .await?
        .ok_or_else(not_found)?;
        tracing::debug!(user_id = %user.id, "user updated");
        Ok(user)
    }

    /// Removes the user, then bulk-deletes every thought it listed.
    ///
    /// Other users' `friends` entries pointing at the removed user are left
    /// in place.
    pub async fn delete(pool: &Pool<Sqlite>, user_id: &str) -> Result<User, AppError> {
        let user_id = parse_id(user_id, "userId")?;
        let user = UserRepository::delete(pool, &user_id)
            .await?
            .ok_or_else(not_found)?;

        let removed = ThoughtRepository::delete_many(pool, &user.thoughts).await?;
        tracing::debug!(user_id = %user.id, thoughts_removed = removed, "user deleted");
        Ok(user)
    }

    pub async fn add_friend(
        pool: &Pool<Sqlite>,
        user_id: &str,
        friend_id: &str,
    ) -> Result<User, AppError> {
        let user_id = parse_id(user_id, "userId")?;
        let friend_id = parse_id(friend_id, "friendId")?;
        UserRepository::add_friend(pool, &user_id, &friend_id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn remove_friend(
        pool: &Pool<Sqlite>,
        user_id: &str,
        friend_id: &str,
    ) -> Result<User, AppError> {
        let user_id = parse_id(user_id, "userId")?;
        let friend_id = parse_id(friend_id, "friendId")?;
        UserRepository::remove_friend(pool, &user_id, &friend_id)
            .await?
            .ok_or_else(not_found)
    }
}
