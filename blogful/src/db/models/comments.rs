//! Database models for comments.

use crate::api::models::comments::{CommentCreate, CommentUpdate};
use crate::errors::Error;
use crate::types::{ArticleId, CommentId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new comment
#[derive(Debug, Clone)]
pub struct CommentCreateDBRequest {
    pub text: String,
    pub article_id: ArticleId,
    pub user_id: UserId,
}

impl TryFrom<CommentCreate> for CommentCreateDBRequest {
    type Error = Error;

    fn try_from(api: CommentCreate) -> Result<Self, Self::Error> {
        let text = api.text.ok_or_else(|| Error::missing_field("text"))?;
        let article_id = api.article_id.ok_or_else(|| Error::missing_field("article_id"))?;
        let user_id = api.user_id.ok_or_else(|| Error::missing_field("user_id"))?;

        Ok(Self { text, article_id, user_id })
    }
}

/// Database request for updating a comment
#[derive(Debug, Clone, Default)]
pub struct CommentUpdateDBRequest {
    pub text: Option<String>,
    pub date_commented: Option<DateTime<Utc>>,
}

impl TryFrom<CommentUpdate> for CommentUpdateDBRequest {
    type Error = Error;

    fn try_from(api: CommentUpdate) -> Result<Self, Self::Error> {
        if api.text.is_none() && api.date_commented.is_none() {
            return Err(Error::BadRequest {
                message: "Request body must contain either 'text' or 'date_commented'".to_string(),
            });
        }

        Ok(Self {
            text: api.text,
            date_commented: api.date_commented,
        })
    }
}

/// Database response for a comment
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CommentDBResponse {
    pub id: CommentId,
    pub text: String,
    pub date_commented: DateTime<Utc>,
    pub article_id: ArticleId,
    pub user_id: UserId,
}
