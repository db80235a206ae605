//! API request/response models for articles.

use crate::db::models::articles::ArticleDBResponse;
use crate::sanitize::Sanitize;
use crate::types::{ArticleId, ArticleStyle, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a new article.
///
/// `title`, `content` and `style` are required; they are optional here so the handler can report
/// the first missing one by name instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ArticleCreate {
    #[schema(example = "How to make a sandwich")]
    pub title: Option<String>,
    #[schema(example = "First, take two slices of bread...")]
    pub content: Option<String>,
    pub style: Option<ArticleStyle>,
    /// Id of an existing user, if the article has an author
    pub author: Option<UserId>,
}

/// Request body for updating an article. At least one field must be present; the author cannot
/// be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub style: Option<ArticleStyle>,
}

/// An article as returned by the API. Free-text fields are sanitized before leaving the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub style: ArticleStyle,
    pub author: Option<UserId>,
    pub date_published: DateTime<Utc>,
}

impl From<ArticleDBResponse> for ArticleResponse {
    fn from(db: ArticleDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            content: db.content,
            style: db.style,
            author: db.author,
            date_published: db.date_published,
        }
    }
}

impl Sanitize for ArticleResponse {
    fn sanitized(self) -> Self {
        Self {
            title: self.title.sanitized(),
            content: self.content.sanitized(),
            ..self
        }
    }
}
