use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use social_thoughts::{
    api::{create_router, AppState},
    config::Config,
    db::pool::connect_in_memory,
};

async fn setup() -> Router {
    let pool = connect_in_memory().await.unwrap();
    let config = Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        db_min_connections: 1,
        request_timeout_secs: 30,
    };
    create_router(AppState {
        db: pool,
        config: Arc::new(config),
    })
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(json!(null))
    };
    (status, json)
}

async fn call_raw(router: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(json!(null)))
}

async fn create_user(router: &Router, username: &str) -> String {
    let (status, body) = call(
        router,
        "POST",
        "/api/users",
        Some(json!({ "username": username, "email": format!("{username}@gmail.com") })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn create_thought(router: &Router, text: &str, user_id: &str) -> (String, Value) {
    let (status, body) = call(
        router,
        "POST",
        "/api/thoughts",
        Some(json!({ "thoughtText": text, "username": "amiko", "userId": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (body["thought"]["id"].as_str().unwrap().to_string(), body)
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v["id"].as_str().unwrap().to_string()))
        .collect()
}

#[tokio::test]
async fn health_reports_version() {
    let r = setup().await;
    let (s, body) = call(&r, "GET", "/api/health", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn created_user_has_empty_relations() {
    let r = setup().await;
    let id = create_user(&r, "amiko").await;

    let (s, body) = call(&r, "GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["username"], "amiko");
    assert_eq!(body["thoughts"], json!([]));
    assert_eq!(body["friends"], json!([]));
    assert_eq!(body["friendCount"], 0);

    let (s, list) = call(&r, "GET", "/api/users", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_user_input_is_an_internal_fault() {
    let r = setup().await;
    let (s, _) = call(
        &r,
        "POST",
        "/api/users",
        Some(json!({ "username": "amiko", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);

    create_user(&r, "amiko").await;
    let (s, _) = call(
        &r,
        "POST",
        "/api/users",
        Some(json!({ "username": "amiko", "email": "second@gmail.com" })),
    )
    .await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn malformed_and_missing_ids_are_distinguishable() {
    let r = setup().await;
    let (s, body) = call(&r, "GET", &format!("/api/users/{}", Uuid::new_v4()), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No user with this ID");

    let (s, _) = call(&r, "GET", "/api/users/not-an-id", None).await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);

    let (s, body) = call(&r, "GET", &format!("/api/thoughts/{}", Uuid::new_v4()), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No thought with this ID");
}

#[tokio::test]
async fn create_thought_links_each_new_id_once() {
    let r = setup().await;
    let user = create_user(&r, "amiko").await;

    let (first, body) = create_thought(&r, "same words", &user).await;
    assert!(body.get("warning").is_none());
    let (second, _) = create_thought(&r, "same words", &user).await;
    assert_ne!(first, second);

    let (_, detail) = call(&r, "GET", &format!("/api/users/{user}"), None).await;
    let listed = ids(&detail["thoughts"]);
    assert_eq!(listed, vec![first, second]);
}

#[tokio::test]
async fn create_thought_for_missing_user_warns() {
    let r = setup().await;
    let (id, body) = create_thought(&r, "nobody owns me", &Uuid::new_v4().to_string()).await;
    assert_eq!(body["warning"], "Thought created, but no user with this ID");

    let (s, thought) = call(&r, "GET", &format!("/api/thoughts/{id}"), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(thought["thoughtText"], "nobody owns me");
    assert_eq!(thought["reactionCount"], 0);
}

#[tokio::test]
async fn update_thought_revalidates() {
    let r = setup().await;
    let user = create_user(&r, "amiko").await;
    let (id, _) = create_thought(&r, "draft", &user).await;

    let (s, body) = call(
        &r,
        "PUT",
        &format!("/api/thoughts/{id}"),
        Some(json!({ "thoughtText": "final" })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["thoughtText"], "final");

    let (s, _) = call(
        &r,
        "PUT",
        &format!("/api/thoughts/{id}"),
        Some(json!({ "thoughtText": "x".repeat(281) })),
    )
    .await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);

    let (s, _) = call(
        &r,
        "PUT",
        &format!("/api/thoughts/{}", Uuid::new_v4()),
        Some(json!({ "thoughtText": "final" })),
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_thought_removes_it_from_owner() {
    let r = setup().await;
    let user = create_user(&r, "amiko").await;
    let (id, _) = create_thought(&r, "short-lived", &user).await;

    let (s, body) = call(&r, "DELETE", &format!("/api/thoughts/{id}"), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["message"], "Thought successfully deleted!");
    assert!(body.get("warning").is_none());

    let (s, _) = call(&r, "GET", &format!("/api/thoughts/{id}"), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);

    let (_, detail) = call(&r, "GET", &format!("/api/users/{user}"), None).await;
    assert_eq!(detail["thoughts"], json!([]));

    let (s, _) = call(&r, "DELETE", &format!("/api/thoughts/{id}"), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_user_cascades_to_thoughts() {
    let r = setup().await;
    let user = create_user(&r, "amiko").await;
    let (t1, _) = create_thought(&r, "one", &user).await;
    let (t2, _) = create_thought(&r, "two", &user).await;

    let (s, body) = call(&r, "DELETE", &format!("/api/users/{user}"), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["message"], "User and associated thoughts deleted!");

    let (s, _) = call(&r, "GET", &format!("/api/users/{user}"), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    for t in [t1, t2] {
        let (s, _) = call(&r, "GET", &format!("/api/thoughts/{t}"), None).await;
        assert_eq!(s, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn add_friend_is_idempotent_and_one_directional() {
    let r = setup().await;
    let a = create_user(&r, "a").await;
    let b = create_user(&r, "b").await;

    let uri = format!("/api/users/{a}/friends/{b}");
    call(&r, "POST", &uri, None).await;
    let (s, body) = call(&r, "POST", &uri, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["friends"], json!([b.clone()]));
    assert_eq!(body["friendCount"], 1);

    let (_, b_detail) = call(&r, "GET", &format!("/api/users/{b}"), None).await;
    assert_eq!(b_detail["friends"], json!([]));

    let (_, a_detail) = call(&r, "GET", &format!("/api/users/{a}"), None).await;
    assert_eq!(a_detail["friends"][0]["username"], "b");

    let (s, body) = call(&r, "DELETE", &uri, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["friends"], json!([]));

    let (s, _) = call(&r, "POST", &format!("/api/users/{}/friends/{b}", Uuid::new_v4()), None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn remove_unknown_friend_returns_user_unchanged() {
    let r = setup().await;
    let a = create_user(&r, "a").await;
    let (_, before) = call(&r, "GET", "/api/users", None).await;

    let (s, body) = call(&r, "DELETE", &format!("/api/users/{a}/friends/{}", Uuid::new_v4()), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body, before[0]);
}

#[tokio::test]
async fn reaction_round_trip_restores_length() {
    let r = setup().await;
    let user = create_user(&r, "amiko").await;
    let (id, _) = create_thought(&r, "react", &user).await;

    let (s, with_reaction) = call(
        &r,
        "POST",
        &format!("/api/thoughts/{id}/reactions"),
        Some(json!({ "reactionBody": "love it", "username": "lernantino" })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(with_reaction["reactionCount"], 1);
    let reaction_id = with_reaction["reactions"][0]["reactionId"].as_str().unwrap().to_string();

    let (s, unchanged) = call(
        &r,
        "DELETE",
        &format!("/api/thoughts/{id}/reactions/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(unchanged, with_reaction);

    let (s, after) = call(&r, "DELETE", &format!("/api/thoughts/{id}/reactions/{reaction_id}"), None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(after["reactions"], json!([]));
    assert_eq!(after["reactionCount"], 0);

    let (s, _) = call(
        &r,
        "POST",
        &format!("/api/thoughts/{}/reactions", Uuid::new_v4()),
        Some(json!({ "reactionBody": "hello", "username": "amiko" })),
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_thoughts_returns_every_thought() {
    let r = setup().await;
    let user = create_user(&r, "amiko").await;
    create_thought(&r, "first", &user).await;
    create_thought(&r, "second", &Uuid::new_v4().to_string()).await;

    let (s, list) = call(&r, "GET", "/api/thoughts", None).await;
    assert_eq!(s, StatusCode::OK);
    let texts: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["thoughtText"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test]
async fn update_user_merges_and_trims() {
    let r = setup().await;
    let id = create_user(&r, "amiko").await;

    let (s, body) = call(
        &r,
        "PUT",
        &format!("/api/users/{id}"),
        Some(json!({ "username": "  amiko2  " })),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(body["username"], "amiko2");
    assert_eq!(body["email"], "amiko@gmail.com");

    let (s, _) = call(
        &r,
        "PUT",
        &format!("/api/users/{}", Uuid::new_v4()),
        Some(json!({ "email": "x@gmail.com" })),
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreadable_bodies_are_internal_faults() {
    let r = setup().await;

    let (s, body) = call(
        &r,
        "POST",
        "/api/users",
        Some(json!({ "username": 123, "email": "a@gmail.com" })),
    )
    .await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string(), "{body}");

    let (s, body) = call_raw(&r, "POST", "/api/users", "{\"username\": ").await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string(), "{body}");

    let id = create_user(&r, "amiko").await;
    let (s, body) = call(
        &r,
        "POST",
        "/api/thoughts",
        Some(json!({ "thoughtText": ["not", "text"], "username": "amiko", "userId": id })),
    )
    .await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string(), "{body}");

    let (s, body) = call_raw(&r, "PUT", &format!("/api/users/{id}"), "not json").await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string(), "{body}");

    // Nothing was written by the rejected requests.
    let (_, list) = call(&r, "GET", "/api/thoughts", None).await;
    assert_eq!(list, json!([]));
}
