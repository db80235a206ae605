//! Database models for articles.

use crate::api::models::articles::{ArticleCreate, ArticleUpdate};
use crate::errors::Error;
use crate::types::{ArticleId, ArticleStyle, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new article
#[derive(Debug, Clone)]
pub struct ArticleCreateDBRequest {
    pub title: String,
    pub content: String,
    pub style: ArticleStyle,
    pub author: Option<UserId>,
}

impl TryFrom<ArticleCreate> for ArticleCreateDBRequest {
    type Error = Error;

    /// Presence is checked in a fixed order and the first absent field is reported.
    fn try_from(api: ArticleCreate) -> Result<Self, Self::Error> {
        let title = api.title.ok_or_else(|| Error::missing_field("title"))?;
        let content = api.content.ok_or_else(|| Error::missing_field("content"))?;
        let style = api.style.ok_or_else(|| Error::missing_field("style"))?;

        Ok(Self {
            title,
            content,
            style,
            author: api.author,
        })
    }
}

/// Database request for updating an article
#[derive(Debug, Clone, Default)]
pub struct ArticleUpdateDBRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub style: Option<ArticleStyle>,
}

impl TryFrom<ArticleUpdate> for ArticleUpdateDBRequest {
    type Error = Error;

    fn try_from(api: ArticleUpdate) -> Result<Self, Self::Error> {
        if api.title.is_none() && api.content.is_none() && api.style.is_none() {
            return Err(Error::BadRequest {
                message: "Request body must contain either 'title', 'style' or 'content'".to_string(),
            });
        }

        Ok(Self {
            title: api.title,
            content: api.content,
            style: api.style,
        })
    }
}

/// Database response for an article
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ArticleDBResponse {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub style: ArticleStyle,
    pub author: Option<UserId>,
    pub date_published: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: Option<&str>, content: Option<&str>, style: Option<ArticleStyle>) -> ArticleCreate {
        ArticleCreate {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
            style,
            author: None,
        }
    }

    #[test]
    fn test_create_reports_first_missing_field() {
        let err = ArticleCreateDBRequest::try_from(create(None, None, None)).unwrap_err();
        assert_eq!(err.user_message(), "Missing 'title' in request body");

        let err = ArticleCreateDBRequest::try_from(create(Some("t"), None, None)).unwrap_err();
        assert_eq!(err.user_message(), "Missing 'content' in request body");

        let err = ArticleCreateDBRequest::try_from(create(Some("t"), Some("c"), None)).unwrap_err();
        assert_eq!(err.user_message(), "Missing 'style' in request body");
    }

    #[test]
    fn test_create_keeps_optional_author() {
        let mut api = create(Some("t"), Some("c"), Some(ArticleStyle::Story));
        api.author = Some(3);

        let request = ArticleCreateDBRequest::try_from(api).unwrap();
        assert_eq!(request.author, Some(3));
        assert_eq!(request.style, ArticleStyle::Story);
    }

    #[test]
    fn test_update_requires_a_field() {
        let empty = ArticleUpdate {
            title: None,
            content: None,
            style: None,
        };
        let err = ArticleUpdateDBRequest::try_from(empty).unwrap_err();
        assert_eq!(
            err.user_message(),
            "Request body must contain either 'title', 'style' or 'content'"
        );

        let style_only = ArticleUpdate {
            title: None,
            content: None,
            style: Some(ArticleStyle::News),
        };
        let request = ArticleUpdateDBRequest::try_from(style_only).unwrap();
        assert_eq!(request.style, Some(ArticleStyle::News));
        assert!(request.title.is_none());
    }
}
