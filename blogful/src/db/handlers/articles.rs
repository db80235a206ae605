//! Database repository for articles.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::articles::{ArticleCreateDBRequest, ArticleDBResponse, ArticleUpdateDBRequest},
};
use crate::types::ArticleId;
use sqlx::PgPool;
use tracing::instrument;

const ARTICLE_COLUMNS: &str = "id, title, content, style, author, date_published";

#[derive(Clone)]
pub struct Articles {
    db: PgPool,
}

impl Articles {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Articles {
    type CreateRequest = ArticleCreateDBRequest;
    type UpdateRequest = ArticleUpdateDBRequest;
    type Response = ArticleDBResponse;
    type Id = ArticleId;

    #[instrument(skip(self, request), fields(style = %request.style), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let article = sqlx::query_as::<_, ArticleDBResponse>(&format!(
            "INSERT INTO blogful_articles (title, content, style, author) VALUES ($1, $2, $3, $4) RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(&request.title)
        .bind(&request.content)
        .bind(request.style)
        .bind(request.author)
        .fetch_one(&self.db)
        .await?;

        Ok(article)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let article = sqlx::query_as::<_, ArticleDBResponse>(&format!("SELECT {ARTICLE_COLUMNS} FROM blogful_articles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(article)
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Self::Response>> {
        let articles = sqlx::query_as::<_, ArticleDBResponse>(&format!("SELECT {ARTICLE_COLUMNS} FROM blogful_articles ORDER BY id"))
            .fetch_all(&self.db)
            .await?;

        Ok(articles)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE blogful_articles SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                style = COALESCE($4, style)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.content)
        .bind(request.style)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: Self::Id) -> Result<()> {
        let result = sqlx::query("DELETE FROM blogful_articles WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::debug!(rows_affected = result.rows_affected(), "Deleted article");
        Ok(())
    }
}
