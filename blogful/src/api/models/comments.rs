//! API request/response models for comments.

use crate::db::models::comments::CommentDBResponse;
use crate::sanitize::Sanitize;
use crate::types::{ArticleId, CommentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a comment. Every field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CommentCreate {
    #[schema(example = "Great read!")]
    pub text: Option<String>,
    pub article_id: Option<ArticleId>,
    pub user_id: Option<UserId>,
}

/// Request body for updating a comment. At least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CommentUpdate {
    pub text: Option<String>,
    pub date_commented: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: CommentId,
    pub text: String,
    pub date_commented: DateTime<Utc>,
    pub article_id: ArticleId,
    pub user_id: UserId,
}

impl From<CommentDBResponse> for CommentResponse {
    fn from(db: CommentDBResponse) -> Self {
        Self {
            id: db.id,
            text: db.text,
            date_commented: db.date_commented,
            article_id: db.article_id,
            user_id: db.user_id,
        }
    }
}

impl Sanitize for CommentResponse {
    fn sanitized(self) -> Self {
        Self {
            text: self.text.sanitized(),
            ..self
        }
    }
}
