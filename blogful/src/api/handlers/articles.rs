use crate::api::extract::{ValidJson, resource_location};
use crate::api::models::articles::{ArticleCreate, ArticleResponse, ArticleUpdate};
use crate::db::models::articles::{ArticleCreateDBRequest, ArticleDBResponse, ArticleUpdateDBRequest};
use crate::errors::{Error, ErrorBody, Result};
use crate::sanitize::Sanitize;
use crate::{AppState, types::ArticleId};
use axum::{
    Json,
    extract::{OriginalUri, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

/// Look up the article an item route refers to. Ids that do not parse cannot exist either.
async fn find_article(state: &AppState, id: &str) -> Result<ArticleDBResponse> {
    let not_found = || Error::NotFound {
        message: "Article doesn't exist".to_string(),
    };
    let id: ArticleId = id.parse().map_err(|_| not_found())?;
    state.articles.get_by_id(id).await?.ok_or_else(not_found)
}

#[utoipa::path(
    get,
    path = "/articles",
    tag = "articles",
    summary = "List articles",
    responses(
        (status = 200, description = "Every article, sanitized", body = Vec<ArticleResponse>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<ArticleResponse>>> {
    let articles = state.articles.list().await?;

    Ok(Json(articles.into_iter().map(ArticleResponse::from).collect::<Vec<_>>().sanitized()))
}

#[utoipa::path(
    post,
    path = "/articles",
    tag = "articles",
    summary = "Create article",
    request_body = ArticleCreate,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse,
            headers(("Location" = String, description = "Path of the new article"))),
        (status = 400, description = "Missing field or invalid body", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_article(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ValidJson(body): ValidJson<ArticleCreate>,
) -> Result<impl IntoResponse> {
    let request = ArticleCreateDBRequest::try_from(body)?;
    let article = state.articles.create(&request).await?;
    tracing::info!(article_id = article.id, "Created article");

    let location = resource_location(uri.path(), article.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ArticleResponse::from(article).sanitized()),
    ))
}

#[utoipa::path(
    get,
    path = "/articles/{id}",
    tag = "articles",
    summary = "Get article",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "The article, sanitized", body = ArticleResponse),
        (status = 404, description = "Article doesn't exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn get_article(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ArticleResponse>> {
    let article = find_article(&state, &id).await?;

    Ok(Json(ArticleResponse::from(article).sanitized()))
}

#[utoipa::path(
    patch,
    path = "/articles/{id}",
    tag = "articles",
    summary = "Update article",
    description = "Only the supplied fields change. The author cannot be changed.",
    params(("id" = i32, Path, description = "Article ID")),
    request_body = ArticleUpdate,
    responses(
        (status = 204, description = "Article updated"),
        (status = 400, description = "No updatable field supplied", body = ErrorBody),
        (status = 404, description = "Article doesn't exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<ArticleUpdate>,
) -> Result<StatusCode> {
    let article = find_article(&state, &id).await?;
    let request = ArticleUpdateDBRequest::try_from(body)?;

    state.articles.update(article.id, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/articles/{id}",
    tag = "articles",
    summary = "Delete article",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 404, description = "Article doesn't exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn delete_article(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let article = find_article(&state, &id).await?;

    state.articles.delete(article.id).await?;
    tracing::info!(article_id = article.id, "Deleted article");
    Ok(StatusCode::NO_CONTENT)
}
