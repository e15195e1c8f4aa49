//! Root, greeting and health routes

use axum::{
    Json, Router,
    extract::Query,
    response::Redirect,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

impl NameQuery {
    fn name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("World!")
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GoodbyeResponse {
    pub message: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

async fn welcome() -> &'static str {
    "Welcome to the Kata Dojo API"
}

async fn hello(Query(query): Query<NameQuery>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Hello, {}", query.name()),
    })
}

async fn goodbye(Query(query): Query<NameQuery>) -> Json<GoodbyeResponse> {
    Json(GoodbyeResponse {
        message: format!("Goodbye, {}", query.name()),
        date: Utc::now(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Routes mounted under `/api`
pub fn greeting_router() -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/hello", get(hello))
        .route("/goodbye", get(goodbye))
        .route("/health", get(health))
}

/// `GET /` sends clients to `/api`
pub fn root_redirect() -> Router {
    Router::new().route("/", get(|| async { Redirect::to("/api") }))
}
