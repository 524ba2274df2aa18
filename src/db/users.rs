use std::collections::HashMap;

use sqlx::{Pool, Sqlite};
use uuid::Uuid;
use crate::db::models::{User, UserRow};
use crate::error::AppError;

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        username: &str,
        email: &str,
    ) -> Result<User, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
INSERT INTO users (id, username, email, created_at)
VALUES (?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(email)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(User::from_parts(row, Vec::new(), Vec::new()))
    }

    pub async fn get_all(pool: &Pool<Sqlite>) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY rowid")
            .fetch_all(pool)
            .await?;

        let thoughts = load_sets(
            pool,
            "SELECT user_id, thought_id FROM user_thoughts ORDER BY seq",
            None,
        )
        .await?;
        let friends = load_sets(
            pool,
            "SELECT user_id, friend_id FROM user_friends ORDER BY seq",
            None,
        )
        .await?;

        Ok(assemble(rows, thoughts, friends))
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(pool, row).await?)),
            None => Ok(None),
        }
    }

    /// Users listed in `id`'s `friends`, in the order they were added.
    /// Friend ids that no longer resolve to a user are skipped.
    pub async fn get_friends_of(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
SELECT u.*
FROM user_friends f
JOIN users u ON u.id = f.friend_id
WHERE f.user_id = ?
ORDER BY f.seq
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let thoughts = load_sets(
            pool,
            r#"
SELECT user_id, thought_id FROM user_thoughts
WHERE user_id IN (SELECT friend_id FROM user_friends WHERE user_id = ?)
ORDER BY seq
            "#,
            Some(id),
        )
        .await?;
        let friends = load_sets(
            pool,
            r#"
SELECT user_id, friend_id FROM user_friends
WHERE user_id IN (SELECT friend_id FROM user_friends WHERE user_id = ?)
ORDER BY seq
            "#,
            Some(id),
        )
        .await?;

        Ok(assemble(rows, thoughts, friends))
    }

    /// Merges the given fields into the user. `None` leaves a field unchanged.
    pub async fn update_fields(
        pool: &Pool<Sqlite>,
        id: &str,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
UPDATE users
SET username = COALESCE(?, username),
    email = COALESCE(?, email)
WHERE id = ?
RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(pool, row).await?)),
            None => Ok(None),
        }
    }

    /// Set-add `thought_id` into the user's `thoughts`. `None` if the user is absent.
    pub async fn add_thought(
        pool: &Pool<Sqlite>,
        id: &str,
        thought_id: &str,
    ) -> Result<Option<User>, AppError> {
        sqlx::query(
            r#"
INSERT OR IGNORE INTO user_thoughts (user_id, thought_id)
SELECT id, ? FROM users WHERE id = ?
            "#,
        )
        .bind(thought_id)
        .bind(id)
        .execute(pool)
        .await?;

        Self::get_by_id(pool, id).await
    }

    /// Set-remove `thought_id` from the first user whose `thoughts` contains it.
    ///
    /// Returns the updated owner, or `None` when no user lists the thought.
    pub async fn pull_thought_from_owner(
        pool: &Pool<Sqlite>,
        thought_id: &str,
    ) -> Result<Option<User>, AppError> {
        let owner: Option<(String,)> = sqlx::query_as(
            "SELECT user_id FROM user_thoughts WHERE thought_id = ? ORDER BY seq LIMIT 1",
        )
        .bind(thought_id)
        .fetch_optional(pool)
        .await?;

        let Some((user_id,)) = owner else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM user_thoughts WHERE user_id = ? AND thought_id = ?")
            .bind(&user_id)
            .bind(thought_id)
            .execute(pool)
            .await?;

        Self::get_by_id(pool, &user_id).await
    }

    /// Set-add `friend_id` into the user's `friends`. The friend id is not checked.
    pub async fn add_friend(
        pool: &Pool<Sqlite>,
        id: &str,
        friend_id: &str,
    ) -> Result<Option<User>, AppError> {
        sqlx::query(
            r#"
INSERT OR IGNORE INTO user_friends (user_id, friend_id)
SELECT id, ? FROM users WHERE id = ?
            "#,
        )
        .bind(friend_id)
        .bind(id)
        .execute(pool)
        .await?;

        Self::get_by_id(pool, id).await
    }

    pub async fn remove_friend(
        pool: &Pool<Sqlite>,
        id: &str,
        friend_id: &str,
    ) -> Result<Option<User>, AppError> {
        sqlx::query("DELETE FROM user_friends WHERE user_id = ? AND friend_id = ?")
            .bind(id)
            .bind(friend_id)
            .execute(pool)
            .await?;

        Self::get_by_id(pool, id).await
    }

    /// Deletes the user and returns it as it was just before removal.
    pub async fn delete(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        // Membership rows go with the user row.
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(user))
    }

    pub async fn delete_all(pool: &Pool<Sqlite>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users").execute(pool).await?;
        Ok(result.rows_affected())
    }

    async fn hydrate(pool: &Pool<Sqlite>, row: UserRow) -> Result<User, AppError> {
        let thoughts = sqlx::query_scalar::<_, String>(
            "SELECT thought_id FROM user_thoughts WHERE user_id = ? ORDER BY seq",
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        let friends = sqlx::query_scalar::<_, String>(
            "SELECT friend_id FROM user_friends WHERE user_id = ? ORDER BY seq",
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        Ok(User::from_parts(row, thoughts, friends))
    }
}

/// Loads `(user_id, member_id)` pairs in set order, grouped per user.
async fn load_sets(
    pool: &Pool<Sqlite>,
    sql: &str,
    user_id: Option<&str>,
) -> Result<HashMap<String, Vec<String>>, AppError> {
    let mut query = sqlx::query_as::<_, (String, String)>(sql);
    if let Some(user_id) = user_id {
        query = query.bind(user_id);
    }

    let mut sets: HashMap<String, Vec<String>> = HashMap::new();
    for (user_id, member_id) in query.fetch_all(pool).await? {
        sets.entry(user_id).or_default().push(member_id);
    }
    Ok(sets)
}

fn assemble(
    rows: Vec<UserRow>,
    mut thoughts: HashMap<String, Vec<String>>,
    mut friends: HashMap<String, Vec<String>>,
) -> Vec<User> {
    rows.into_iter()
        .map(|row| {
            let user_thoughts = thoughts.remove(&row.id).unwrap_or_default();
            let user_friends = friends.remove(&row.id).unwrap_or_default();
            User::from_parts(row, user_thoughts, user_friends)
        })
        .collect()
}
