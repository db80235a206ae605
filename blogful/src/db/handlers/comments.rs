//! Database repository for comments.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::comments::{CommentCreateDBRequest, CommentDBResponse, CommentUpdateDBRequest},
};
use crate::types::CommentId;
use sqlx::PgPool;
use tracing::instrument;

const COMMENT_COLUMNS: &str = "id, text, date_commented, article_id, user_id";

#[derive(Clone)]
pub struct Comments {
    db: PgPool,
}

impl Comments {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Comments {
    type CreateRequest = CommentCreateDBRequest;
    type UpdateRequest = CommentUpdateDBRequest;
    type Response = CommentDBResponse;
    type Id = CommentId;

    #[instrument(skip(self, request), fields(article_id = request.article_id, user_id = request.user_id), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let comment = sqlx::query_as::<_, CommentDBResponse>(&format!(
            "INSERT INTO blogful_comments (text, article_id, user_id) VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(&request.text)
        .bind(request.article_id)
        .bind(request.user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(comment)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let comment = sqlx::query_as::<_, CommentDBResponse>(&format!("SELECT {COMMENT_COLUMNS} FROM blogful_comments WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(comment)
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Self::Response>> {
        let comments = sqlx::query_as::<_, CommentDBResponse>(&format!("SELECT {COMMENT_COLUMNS} FROM blogful_comments ORDER BY id"))
            .fetch_all(&self.db)
            .await?;

        Ok(comments)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE blogful_comments SET
                text = COALESCE($2, text),
                date_commented = COALESCE($3, date_commented)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&request.text)
        .bind(request.date_commented)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: Self::Id) -> Result<()> {
        sqlx::query("DELETE FROM blogful_comments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Articles, Users};
    use crate::db::models::{articles::ArticleCreateDBRequest, users::UserCreateDBRequest};
    use crate::types::ArticleStyle;

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_comments_cascade_with_article(pool: PgPool) {
        let users = Users::new(pool.clone());
        let articles = Articles::new(pool.clone());
        let repo = Comments::new(pool);

        let user = users
            .create(&UserCreateDBRequest {
                fullname: "Commenter".to_string(),
                username: "commenter".to_string(),
                password: None,
                nickname: None,
            })
            .await
            .unwrap();
        let article = articles
            .create(&ArticleCreateDBRequest {
                title: "Discussed".to_string(),
                content: "Body".to_string(),
                style: ArticleStyle::Interview,
                author: Some(user.id),
            })
            .await
            .unwrap();

        let comment = repo
            .create(&CommentCreateDBRequest {
                text: "First!".to_string(),
                article_id: article.id,
                user_id: user.id,
            })
            .await
            .unwrap();
        assert_eq!(repo.list().await.unwrap(), vec![comment.clone()]);

        articles.delete(article.id).await.unwrap();
        assert!(repo.get_by_id(comment.id).await.unwrap().is_none());
    }
}
