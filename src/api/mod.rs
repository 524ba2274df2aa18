pub mod extract;
pub mod state;
pub mod thoughts;
pub mod users;

pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    timeout::TimeoutLayer,
};
use std::time::Duration;
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        // Health check
        .route("/api/health", get(health))

        // User endpoints
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:user_id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/users/:user_id/friends/:friend_id",
            post(users::add_friend).delete(users::remove_friend),
        )

        // Thought endpoints
        .route(
            "/api/thoughts",
            get(thoughts::list_thoughts).post(thoughts::create_thought),
        )
        .route(
            "/api/thoughts/:thought_id",
            get(thoughts::get_thought)
                .put(thoughts::update_thought)
                .delete(thoughts::delete_thought),
        )
        .route("/api/thoughts/:thought_id/reactions", post(thoughts::add_reaction))
        .route(
            "/api/thoughts/:thought_id/reactions/:reaction_id",
            axum::routing::delete(thoughts::remove_reaction),
        )

        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
