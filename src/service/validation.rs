//! Field constraints and validated inputs for the relationship services.
//!
//! Every write reaching a service has already passed through one of the
//! constructors here, so services never see raw request data.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::AppError;

pub const USERNAME_MAX: usize = 25;
pub const TEXT_MAX: usize = 280;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("valid email regex")
    })
}

/// Parses a record identifier, normalising it to the stored form.
pub fn parse_id(raw: &str, field: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::Validation(format!("{} is not a valid id: {:?}", field, raw)))
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

fn bounded(value: &str, field: &str, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if len > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn validate_username(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    bounded(trimmed, "username", USERNAME_MAX)?;
    Ok(trimmed.to_string())
}

pub fn validate_email(raw: &str) -> Result<String, AppError> {
    if raw.is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }
    if !email_pattern().is_match(raw) {
        return Err(AppError::Validation(format!("{:?} is not a valid email", raw)));
    }
    Ok(raw.to_string())
}

pub fn validate_text(raw: &str, field: &str) -> Result<String, AppError> {
    bounded(raw, field, TEXT_MAX)?;
    Ok(raw.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: Option<String>, email: Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            username: validate_username(&required(username, "username")?)?,
            email: validate_email(&required(email, "email")?)?,
        })
    }
}

/// Partial user update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn new(username: Option<String>, email: Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            username: username.as_deref().map(validate_username).transpose()?,
            email: email.as_deref().map(validate_email).transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThought {
    pub thought_text: String,
    pub username: String,
    pub user_id: String,
}

impl NewThought {
    pub fn new(
        thought_text: Option<String>,
        username: Option<String>,
        user_id: Option<String>,
    ) -> Result<Self, AppError> {
        let username = required(username, "username")?;
        if username.is_empty() {
            return Err(AppError::Validation("username is required".to_string()));
        }

        Ok(Self {
            thought_text: validate_text(&required(thought_text, "thoughtText")?, "thoughtText")?,
            username,
            user_id: parse_id(&required(user_id, "userId")?, "userId")?,
        })
    }
}

/// Only `thought_text` may change after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThoughtChanges {
    pub thought_text: Option<String>,
}

impl ThoughtChanges {
    pub fn new(thought_text: Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            thought_text: thought_text
                .as_deref()
                .map(|text| validate_text(text, "thoughtText"))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReaction {
    pub reaction_body: String,
    pub username: String,
}

impl NewReaction {
    pub fn new(reaction_body: Option<String>, username: Option<String>) -> Result<Self, AppError> {
        let username = required(username, "username")?;
        if username.is_empty() {
            return Err(AppError::Validation("username is required".to_string()));
        }

        Ok(Self {
            reaction_body: validate_text(&required(reaction_body, "reactionBody")?, "reactionBody")?,
            username,
        })
    }
}
