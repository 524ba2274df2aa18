use std::collections::HashMap;

use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;
use crate::db::models::{Reaction, Thought, ThoughtRow};
use crate::error::AppError;

/// Bound parameters per bulk statement, well under SQLite's variable limit.
const DELETE_CHUNK: usize = 500;

type ReactionRow = (String, String, String, String, i64);

pub struct ThoughtRepository;

impl ThoughtRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        thought_text: &str,
        username: &str,
    ) -> Result<Thought, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, ThoughtRow>(
            r#"
INSERT INTO thoughts (id, thought_text, username, created_at)
VALUES (?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(thought_text)
        .bind(username)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(Thought::from_parts(row, Vec::new()))
    }

    pub async fn get_all(pool: &Pool<Sqlite>) -> Result<Vec<Thought>, AppError> {
        let rows = sqlx::query_as::<_, ThoughtRow>("SELECT * FROM thoughts ORDER BY rowid")
            .fetch_all(pool)
            .await?;

        let reactions = load_reactions(
            pool,
            r#"
SELECT thought_id, reaction_id, reaction_body, username, created_at
FROM reactions
ORDER BY seq
            "#,
            None,
        )
        .await?;

        Ok(assemble(rows, reactions))
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<Thought>, AppError> {
        let row = sqlx::query_as::<_, ThoughtRow>("SELECT * FROM thoughts WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(pool, row).await?)),
            None => Ok(None),
        }
    }

    /// Thoughts listed in `user_id`'s `thoughts`, in the order they were added.
    /// Ids that no longer resolve to a thought are skipped.
    pub async fn get_owned_by(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<Thought>, AppError> {
        let rows = sqlx::query_as::<_, ThoughtRow>(
            r#"
SELECT t.*
FROM user_thoughts ut
JOIN thoughts t ON t.id = ut.thought_id
WHERE ut.user_id = ?
ORDER BY ut.seq
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let reactions = load_reactions(
            pool,
            r#"
SELECT thought_id, reaction_id, reaction_body, username, created_at
FROM reactions
WHERE thought_id IN (SELECT thought_id FROM user_thoughts WHERE user_id = ?)
ORDER BY seq
            "#,
            Some(user_id),
        )
        .await?;

        Ok(assemble(rows, reactions))
    }

    pub async fn update_text(
        pool: &Pool<Sqlite>,
        id: &str,
        thought_text: Option<&str>,
    ) -> Result<Option<Thought>, AppError> {
        let row = sqlx::query_as::<_, ThoughtRow>(
            r#"
UPDATE thoughts
SET thought_text = COALESCE(?, thought_text)
WHERE id = ?
RETURNING *
            "#,
        )
        .bind(thought_text)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(pool, row).await?)),
            None => Ok(None),
        }
    }

    /// Deletes the thought (its reactions with it) and returns what was removed.
    pub async fn delete(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<Thought>, AppError> {
        let Some(thought) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM thoughts WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(thought))
    }

    /// Bulk delete by id set. Returns the number of thoughts removed.
    pub async fn delete_many(
        pool: &Pool<Sqlite>,
        ids: &[String],
    ) -> Result<u64, AppError> {
        let mut removed = 0;
        for chunk in ids.chunks(DELETE_CHUNK) {
            let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM thoughts WHERE id IN (");
            let mut separated = query.separated(", ");
            for id in chunk {
                separated.push_bind(id.clone());
            }
            separated.push_unseparated(")");

            removed += query.build().execute(pool).await?.rows_affected();
        }
        Ok(removed)
    }

    pub async fn delete_all(pool: &Pool<Sqlite>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM thoughts").execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Appends a reaction with a freshly generated id. `None` if the thought is absent.
    pub async fn add_reaction(
        pool: &Pool<Sqlite>,
        id: &str,
        reaction_body: &str,
        username: &str,
    ) -> Result<Option<Thought>, AppError> {
        let reaction_id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
INSERT INTO reactions (thought_id, reaction_id, reaction_body, username, created_at)
SELECT id, ?, ?, ?, ? FROM thoughts WHERE id = ?
            "#,
        )
        .bind(&reaction_id)
        .bind(reaction_body)
        .bind(username)
        .bind(created_at)
        .bind(id)
        .execute(pool)
        .await?;

        Self::get_by_id(pool, id).await
    }

    /// Removes any reaction whose id matches. An unknown reaction id is a no-op.
    pub async fn remove_reaction(
        pool: &Pool<Sqlite>,
        id: &str,
        reaction_id: &str,
    ) -> Result<Option<Thought>, AppError> {
        sqlx::query("DELETE FROM reactions WHERE thought_id = ? AND reaction_id = ?")
            .bind(id)
            .bind(reaction_id)
            .execute(pool)
            .await?;

        Self::get_by_id(pool, id).await
    }

    async fn hydrate(pool: &Pool<Sqlite>, row: ThoughtRow) -> Result<Thought, AppError> {
        let reactions = sqlx::query_as::<_, Reaction>(
            r#"
SELECT reaction_id, reaction_body, username, created_at
FROM reactions
WHERE thought_id = ?
ORDER BY seq
            "#,
        )
        .bind(&row.id)
        .fetch_all(pool)
        .await?;

        Ok(Thought::from_parts(row, reactions))
    }
}

/// Loads reaction rows in insertion order, grouped per thought.
async fn load_reactions(
    pool: &Pool<Sqlite>,
    sql: &str,
    user_id: Option<&str>,
) -> Result<HashMap<String, Vec<Reaction>>, AppError> {
    let mut query = sqlx::query_as::<_, ReactionRow>(sql);
    if let Some(user_id) = user_id {
        query = query.bind(user_id);
    }

    let mut grouped: HashMap<String, Vec<Reaction>> = HashMap::new();
    for (thought_id, reaction_id, reaction_body, username, created_at) in
        query.fetch_all(pool).await?
    {
        grouped.entry(thought_id).or_default().push(Reaction {
            reaction_id,
            reaction_body,
            username,
            created_at,
        });
    }
    Ok(grouped)
}

fn assemble(rows: Vec<ThoughtRow>, mut reactions: HashMap<String, Vec<Reaction>>) -> Vec<Thought> {
    rows.into_iter()
        .map(|row| {
            let thought_reactions = reactions.remove(&row.id).unwrap_or_default();
            Thought::from_parts(row, thought_reactions)
        })
        .collect()
}
