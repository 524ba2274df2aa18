//! Resets the database to a small fixed data set.
//!
//! Seeded thoughts are not linked into any user's `thoughts`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_thoughts::{
    config::Config,
    db::{self, ThoughtRepository, UserRepository},
    error::AppError,
    service::validation::{validate_email, validate_text, validate_username},
};

const USERS: [(&str, &str); 2] = [
    ("lernantino", "lernantino@gmail.com"),
    ("amiko", "amiko@gmail.com"),
];

const THOUGHTS: [(&str, &str); 2] = [
    ("Here's a cool thought...", "lernantino"),
    ("Thoughts are the words of our minds 🤔", "amiko"),
];

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;
    tracing::info!("Database connected: {}", config.database_url);

    let users = UserRepository::delete_all(&pool).await?;
    let thoughts = ThoughtRepository::delete_all(&pool).await?;
    tracing::info!(users, thoughts, "Existing data deleted");

    for (username, email) in USERS {
        UserRepository::create(&pool, &validate_username(username)?, &validate_email(email)?)
            .await?;
    }
    tracing::info!("Users added");

    for (text, username) in THOUGHTS {
        ThoughtRepository::create(&pool, &validate_text(text, "thoughtText")?, username).await?;
    }
    tracing::info!("Thoughts added");

    tracing::info!("Seed data added");
    Ok(())
}
