use crate::api::extract::{ValidJson, resource_location};
use crate::api::models::comments::{CommentCreate, CommentResponse, CommentUpdate};
use crate::db::models::comments::{CommentCreateDBRequest, CommentDBResponse, CommentUpdateDBRequest};
use crate::errors::{Error, ErrorBody, Result};
use crate::sanitize::Sanitize;
use crate::{AppState, types::CommentId};
use axum::{
    Json,
    extract::{OriginalUri, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

async fn find_comment(state: &AppState, id: &str) -> Result<CommentDBResponse> {
    let not_found = || Error::NotFound {
        message: "Comment doesn't exist".to_string(),
    };
    let id: CommentId = id.parse().map_err(|_| not_found())?;
    state.comments.get_by_id(id).await?.ok_or_else(not_found)
}

#[utoipa::path(
    get,
    path = "/comments",
    tag = "comments",
    summary = "List comments",
    responses(
        (status = 200, description = "Every comment, sanitized", body = Vec<CommentResponse>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<CommentResponse>>> {
    let comments = state.comments.list().await?;

    Ok(Json(comments.into_iter().map(CommentResponse::from).collect::<Vec<_>>().sanitized()))
}

#[utoipa::path(
    post,
    path = "/comments",
    tag = "comments",
    summary = "Create comment",
    request_body = CommentCreate,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse,
            headers(("Location" = String, description = "Path of the new comment"))),
        (status = 400, description = "Missing field, invalid body or unknown article/user", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_comment(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ValidJson(body): ValidJson<CommentCreate>,
) -> Result<impl IntoResponse> {
    let request = CommentCreateDBRequest::try_from(body)?;
    let comment = state.comments.create(&request).await?;
    tracing::info!(comment_id = comment.id, article_id = comment.article_id, "Created comment");

    let location = resource_location(uri.path(), comment.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CommentResponse::from(comment).sanitized()),
    ))
}

#[utoipa::path(
    get,
    path = "/comments/{id}",
    tag = "comments",
    summary = "Get comment",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "The comment, sanitized", body = CommentResponse),
        (status = 404, description = "Comment doesn't exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn get_comment(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<CommentResponse>> {
    let comment = find_comment(&state, &id).await?;

    Ok(Json(CommentResponse::from(comment).sanitized()))
}

#[utoipa::path(
    patch,
    path = "/comments/{id}",
    tag = "comments",
    summary = "Update comment",
    params(("id" = i32, Path, description = "Comment ID")),
    request_body = CommentUpdate,
    responses(
        (status = 204, description = "Comment updated"),
        (status = 400, description = "No updatable field supplied", body = ErrorBody),
        (status = 404, description = "Comment doesn't exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<CommentUpdate>,
) -> Result<StatusCode> {
    let comment = find_comment(&state, &id).await?;
    let request = CommentUpdateDBRequest::try_from(body)?;

    state.comments.update(comment.id, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "comments",
    summary = "Delete comment",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 404, description = "Comment doesn't exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn delete_comment(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let comment = find_comment(&state, &id).await?;

    state.comments.delete(comment.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::models::comments::CommentResponse;
    use crate::errors::ErrorBody;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test_log::test(tokio::test)]
    async fn test_comment_lifecycle() {
        let server = create_test_app();
        let user = create_test_user(&server, "commenter").await;
        let article = create_test_article(&server, "Discussed").await;

        let response = server
            .post("/comments")
            .json(&json!({ "text": "Nice <b>post</b> <script>x()</script>", "article_id": article.id, "user_id": user.id }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.header("location"), "/comments/1");
        let created: CommentResponse = response.json();
        assert_eq!(created.text, "Nice <b>post</b> &lt;script&gt;x()&lt;/script&gt;");

        let when = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        server
            .patch("/comments/1")
            .json(&json!({ "date_commented": when }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let fetched: CommentResponse = server.get("/comments/1").await.json();
        assert_eq!(fetched.date_commented, when);
        assert_eq!(fetched.text, created.text);

        server.delete("/comments/1").await.assert_status(StatusCode::NO_CONTENT);
        let all: Vec<CommentResponse> = server.get("/comments").await.json();
        assert!(all.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_create_comment_validation() {
        let server = create_test_app();

        let cases = [
            (json!({ "article_id": 1, "user_id": 1 }), "text"),
            (json!({ "text": "hi", "user_id": 1 }), "article_id"),
            (json!({ "text": "hi", "article_id": 1 }), "user_id"),
        ];
        for (body, field) in cases {
            let response = server.post("/comments").json(&body).await;
            response.assert_status_bad_request();
            let body: ErrorBody = response.json();
            assert_eq!(body.error.message, format!("Missing '{field}' in request body"));
        }

        // Well-formed, but nothing to attach it to
        let response = server
            .post("/comments")
            .json(&json!({ "text": "hi", "article_id": 1, "user_id": 1 }))
            .await;
        response.assert_status_bad_request();
        let body: ErrorBody = response.json();
        assert_eq!(body.error.message, "Invalid reference to related resource");
    }

    #[test_log::test(tokio::test)]
    async fn test_patch_comment_requires_field() {
        let server = create_test_app();
        let user = create_test_user(&server, "commenter").await;
        let article = create_test_article(&server, "Discussed").await;
        server
            .post("/comments")
            .json(&json!({ "text": "hi", "article_id": article.id, "user_id": user.id }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.patch("/comments/1").json(&json!({ "user_id": 2 })).await;
        response.assert_status_bad_request();
        let body: ErrorBody = response.json();
        assert_eq!(body.error.message, "Request body must contain either 'text' or 'date_commented'");

        let response = server.get("/comments/2").await;
        response.assert_status_not_found();
        let body: ErrorBody = response.json();
        assert_eq!(body.error.message, "Comment doesn't exist");
    }

    #[test_log::test(tokio::test)]
    async fn test_deleting_article_removes_comments() {
        let server = create_test_app();
        let user = create_test_user(&server, "commenter").await;
        let article = create_test_article(&server, "Short-lived").await;
        server
            .post("/comments")
            .json(&json!({ "text": "hi", "article_id": article.id, "user_id": user.id }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete(&format!("/articles/{}", article.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server.get("/comments/1").await.assert_status_not_found();
    }
}
