//! Test utilities for integration testing (available with `test-utils` feature).

use crate::api::models::{
    articles::{ArticleCreate, ArticleResponse},
    users::{UserCreate, UserResponse},
};
use crate::config::{Config, CorsConfig, DatabaseConfig};
use crate::db::in_memory::InMemoryDatabase;
use crate::types::ArticleStyle;
use crate::{AppState, build_router};
use axum::http::StatusCode;
use axum_test::TestServer;
use std::sync::Arc;

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        database: DatabaseConfig::Memory,
        run_migrations: false,
        enable_otel_export: false,
        cors: CorsConfig::default(),
    }
}

/// A test server over a fresh in-memory database.
pub fn create_test_app() -> TestServer {
    let db = InMemoryDatabase::new();
    let state = AppState::builder()
        .articles(Arc::new(db.articles()))
        .users(Arc::new(db.users()))
        .comments(Arc::new(db.comments()))
        .config(create_test_config())
        .build();

    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

pub async fn create_test_user(server: &TestServer, username: &str) -> UserResponse {
    let response = server
        .post("/users")
        .json(&UserCreate {
            fullname: Some(format!("Test {username}")),
            username: Some(username.to_string()),
            password: Some("password".to_string()),
            nickname: None,
        })
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

pub async fn create_test_article(server: &TestServer, title: &str) -> ArticleResponse {
    let response = server
        .post("/articles")
        .json(&ArticleCreate {
            title: Some(title.to_string()),
            content: Some(format!("Content of {title}")),
            style: Some(ArticleStyle::Story),
            author: None,
        })
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}
