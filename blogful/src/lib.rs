//! # blogful: a REST API for blog articles, users and comments
//!
//! `blogful` serves three resources over JSON: articles, the users who write them, and the
//! comments users leave on them. Each supports list, create, read, partial update and delete.
//! Article text is stored exactly as submitted and sanitized every time it is returned, so a
//! stored `<script>` never reaches a browser as markup.
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum). Persistence goes through the
//! [`db::handlers::Repository`] trait, implemented for PostgreSQL ([`db::handlers`]) and for a
//! process-local store ([`db::in_memory`]) used in tests and demos. Which one runs is decided by
//! the `database` section of the configuration.
//!
//! A request flows through tracing and CORS middleware into a handler in [`api::handlers`]. The
//! handler converts the request model into a database request (checking required fields), calls
//! the repository, converts the record into a response model and runs it through
//! [`sanitize::Sanitize`] before serializing it. Failures become an [`errors::Error`], which
//! renders as `{"error": {"message": ...}}` with the matching status code.
//!
//! ## Quick start
//!
//! ```bash
//! export DATABASE_URL=postgres://localhost:5432/blogful
//! blogful -f config.yaml
//! ```
//!
//! Interactive API documentation is served at `/docs`.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod sanitize;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;

use crate::config::{CorsOrigin, DatabaseConfig};
use crate::db::handlers::{ArticleRepository, Articles, CommentRepository, Comments, UserRepository, Users};
use crate::db::in_memory::InMemoryDatabase;
use crate::openapi::ApiDoc;
use axum::{
    Json, Router,
    http::{HeaderValue, header},
    routing::get,
};
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Shared state handed to every handler.
///
/// Repositories are trait objects so the same router runs over PostgreSQL or the in-memory
/// store.
///
/// ```ignore
/// let state = AppState::builder()
///     .articles(Arc::new(Articles::new(pool.clone())))
///     .users(Arc::new(Users::new(pool.clone())))
///     .comments(Arc::new(Comments::new(pool)))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub articles: Arc<ArticleRepository>,
    pub users: Arc<UserRepository>,
    pub comments: Arc<CommentRepository>,
    pub config: Config,
}

/// Get the blogful database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

struct Repositories {
    articles: Arc<ArticleRepository>,
    users: Arc<UserRepository>,
    comments: Arc<CommentRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let db = InMemoryDatabase::new();
        Self {
            articles: Arc::new(db.articles()),
            users: Arc::new(db.users()),
            comments: Arc::new(db.comments()),
        }
    }

    fn postgres(pool: &PgPool) -> Self {
        Self {
            articles: Arc::new(Articles::new(pool.clone())),
            users: Arc::new(Users::new(pool.clone())),
            comments: Arc::new(Comments::new(pool.clone())),
        }
    }
}

/// Connect to the configured backend. The pool is returned so it can be closed on shutdown.
async fn setup_database(config: &Config) -> anyhow::Result<(Repositories, Option<PgPool>)> {
    match &config.database {
        DatabaseConfig::Memory => {
            info!("Using in-memory database; data will be lost on shutdown");
            Ok((Repositories::in_memory(), None))
        }
        DatabaseConfig::External { url, pool: settings } => {
            info!("Using external database");
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .min_connections(settings.min_connections)
                .acquire_timeout(settings.acquire_timeout())
                .idle_timeout(settings.idle_timeout())
                .max_lifetime(settings.max_lifetime())
                .connect(url)
                .await?;

            if config.run_migrations {
                info!("Running database migrations...");
                migrator().run(&pool).await?;
            }

            Ok((Repositories::postgres(&pool), Some(pool)))
        }
    }
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allowed = &config.cors.allowed_origins;

    let allow_origin = if allowed.contains(&CorsOrigin::Wildcard) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::with_capacity(allowed.len());
        for origin in allowed {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(tower_http::cors::Any)
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::LOCATION]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router: resource routes, health check, API docs and middleware.
///
/// Collection routes are registered with and without a trailing slash; the `Location` header of
/// a create reflects whichever form was requested.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{articles, comments, users};

    let articles_collection = get(articles::list_articles).post(articles::create_article);
    let users_collection = get(users::list_users).post(users::create_user);
    let comments_collection = get(comments::list_comments).post(comments::create_comment);

    let cors = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/articles", articles_collection.clone())
        .route("/articles/", articles_collection)
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .patch(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/users", users_collection.clone())
        .route("/users/", users_collection)
        .route(
            "/users/{id}",
            get(users::get_user).patch(users::update_user).delete(users::delete_user),
        )
        .route("/comments", comments_collection.clone())
        .route("/comments/", comments_collection)
        .route(
            "/comments/{id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/healthz", get(|| async { "OK" }))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Connect to the database, run migrations if configured, and build the router
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting blogful with configuration: {:#?}", config);

        let (repos, pool) = setup_database(&config).await?;

        let state = AppState::builder()
            .articles(repos.articles)
            .users(repos.users)
            .comments(repos.comments)
            .config(config.clone())
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> anyhow::Result<axum_test::TestServer> {
        axum_test::TestServer::new(self.router)
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Blogful listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::CorsConfig;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use url::Url;

    #[test_log::test(tokio::test)]
    async fn test_healthz() {
        let server = create_test_app();

        let response = server.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[test_log::test(tokio::test)]
    async fn test_docs_are_served() {
        let server = create_test_app();

        let response = server.get("/docs").await;
        response.assert_status_ok();
        assert!(response.text().contains("Blogful API"));

        let doc: serde_json::Value = server.get("/openapi.json").await.json();
        assert!(doc["paths"]["/articles/{id}"].is_object());
    }

    #[test_log::test(tokio::test)]
    async fn test_application_with_memory_database() {
        let app = Application::new(create_test_config()).await.unwrap();
        let server = app.into_test_server().unwrap();

        server
            .post("/users")
            .json(&serde_json::json!({ "fullname": "Ada", "username": "ada" }))
            .await
            .assert_status(StatusCode::CREATED);
        server.get("/users/1").await.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_cors_exposes_location() {
        let mut config = create_test_config();
        config.cors = CorsConfig {
            allowed_origins: vec![CorsOrigin::Url(Url::parse("https://blog.example.com/").unwrap())],
            max_age: None,
        };
        let state = AppState::builder()
            .articles(Arc::new(InMemoryDatabase::new().articles()))
            .users(Arc::new(InMemoryDatabase::new().users()))
            .comments(Arc::new(InMemoryDatabase::new().comments()))
            .config(config)
            .build();
        let server = axum_test::TestServer::new(build_router(state).unwrap()).unwrap();

        let response = server.get("/articles").add_header("origin", "https://blog.example.com").await;
        response.assert_status_ok();
        assert_eq!(response.header("access-control-allow-origin"), "https://blog.example.com");
        assert_eq!(response.header("access-control-expose-headers").to_str().unwrap().to_lowercase(), "location");
    }

    #[test_log::test(tokio::test)]
    async fn test_wildcard_cors() {
        let server = create_test_app();

        let response = server.get("/articles").add_header("origin", "https://anywhere.example").await;
        response.assert_status_ok();
        assert_eq!(response.header("access-control-allow-origin"), "*");
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_application_with_postgres(pool: PgPool) {
        use sqlx::ConnectOptions;

        let mut config = create_test_config();
        config.database = DatabaseConfig::External {
            url: pool.connect_options().to_url_lossy().to_string(),
            pool: Default::default(),
        };
        let server = Application::new(config).await.unwrap().into_test_server().unwrap();

        let response = server
            .post("/articles")
            .json(&serde_json::json!({ "title": "t", "content": "c", "style": "News" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        server.get("/articles").await.assert_status_ok();
    }
}
