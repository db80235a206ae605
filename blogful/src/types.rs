//! Common type definitions.
//!
//! # ID Types
//!
//! Every entity is keyed by a database-generated integer identity column, wrapped in a type
//! alias so signatures say which table an id belongs to:
//!
//! - [`ArticleId`]: Article identifier
//! - [`UserId`]: User account identifier
//! - [`CommentId`]: Comment identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// Type aliases for IDs
pub type ArticleId = i32;
pub type UserId = i32;
pub type CommentId = i32;

/// Editorial category of an article.
///
/// Stored as the PostgreSQL enum `article_category`; the JSON spelling matches the database
/// labels exactly (note the hyphen in `How-to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "article_category")]
pub enum ArticleStyle {
    Listicle,
    #[serde(rename = "How-to")]
    #[sqlx(rename = "How-to")]
    HowTo,
    News,
    Interview,
    Story,
}

impl fmt::Display for ArticleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArticleStyle::Listicle => "Listicle",
            ArticleStyle::HowTo => "How-to",
            ArticleStyle::News => "News",
            ArticleStyle::Interview => "Interview",
            ArticleStyle::Story => "Story",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_json_spelling() {
        assert_eq!(serde_json::to_string(&ArticleStyle::HowTo).unwrap(), "\"How-to\"");
        assert_eq!(serde_json::from_str::<ArticleStyle>("\"News\"").unwrap(), ArticleStyle::News);
        assert!(serde_json::from_str::<ArticleStyle>("\"HowTo\"").is_err());
        assert_eq!(ArticleStyle::HowTo.to_string(), "How-to");
    }
}
