use serde::{Serialize, Serializer};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct ThoughtRow {
    pub id: String,
    pub thought_text: String,
    pub username: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub reaction_id: String,
    pub reaction_body: String,
    pub username: String,
    #[serde(serialize_with = "display_timestamp")]
    pub created_at: i64,
}

/// A user with its `thoughts` and `friends` reference sets as raw ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub thoughts: Vec<String>,
    pub friends: Vec<String>,
    pub friend_count: usize,
}

impl User {
    pub fn from_parts(row: UserRow, thoughts: Vec<String>, friends: Vec<String>) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            friend_count: friends.len(),
            thoughts,
            friends,
        }
    }
}

/// A user with `thoughts` and `friends` resolved into their records.
///
/// References that no longer resolve are dropped from the expanded lists;
/// `friend_count` still reports the size of the stored friend set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub id: String,
    pub username: String,
    pub email: String,
    pub thoughts: Vec<Thought>,
    pub friends: Vec<User>,
    pub friend_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub id: String,
    pub thought_text: String,
    #[serde(serialize_with = "display_timestamp")]
    pub created_at: i64,
    pub username: String,
    pub reactions: Vec<Reaction>,
    pub reaction_count: usize,
}

impl Thought {
    pub fn from_parts(row: ThoughtRow, reactions: Vec<Reaction>) -> Self {
        Self {
            id: row.id,
            thought_text: row.thought_text,
            created_at: row.created_at,
            username: row.username,
            reaction_count: reactions.len(),
            reactions,
        }
    }
}

/// Renders a unix timestamp as e.g. `Oct 18, 2026 at 3:04 PM` (UTC).
pub fn format_timestamp(secs: i64) -> String {
    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(ts) => ts.format("%b %-d, %Y at %-I:%M %p").to_string(),
        None => secs.to_string(),
    }
}

fn display_timestamp<S: Serializer>(secs: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(*secs))
}
