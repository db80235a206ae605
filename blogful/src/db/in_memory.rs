//! In-memory repository implementations.
//!
//! All three repositories share one [`InMemoryDatabase`], so foreign keys can be enforced
//! across tables the same way the PostgreSQL schema does. Data is lost on restart; this backend
//! exists for tests and for running the API without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::db::{
    errors::{DbError, Result},
    handlers::Repository,
    models::{
        articles::{ArticleCreateDBRequest, ArticleDBResponse, ArticleUpdateDBRequest},
        comments::{CommentCreateDBRequest, CommentDBResponse, CommentUpdateDBRequest},
        users::{USERNAME_CONSTRAINT, UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
    },
};
use crate::types::{ArticleId, CommentId, UserId};

/// Rows of one table keyed by id, with an identity counter that never reuses ids.
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
struct Tables {
    users: Table<UserDBResponse>,
    articles: Table<ArticleDBResponse>,
    comments: Table<CommentDBResponse>,
}

/// Shared storage behind the in-memory repositories.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> InMemoryArticles {
        InMemoryArticles { db: self.clone() }
    }

    pub fn users(&self) -> InMemoryUsers {
        InMemoryUsers { db: self.clone() }
    }

    pub fn comments(&self) -> InMemoryComments {
        InMemoryComments { db: self.clone() }
    }
}

fn foreign_key_violation(table: &str, column: &str) -> DbError {
    DbError::ForeignKeyViolation {
        constraint: Some(format!("{table}_{column}_fkey")),
        table: Some(table.to_string()),
        message: format!("insert or update on table \"{table}\" violates foreign key constraint on \"{column}\""),
    }
}

fn username_taken() -> DbError {
    DbError::UniqueViolation {
        constraint: Some(USERNAME_CONSTRAINT.to_string()),
        table: Some("blogful_users".to_string()),
        message: format!("duplicate key value violates unique constraint \"{USERNAME_CONSTRAINT}\""),
    }
}

#[derive(Clone)]
pub struct InMemoryArticles {
    db: InMemoryDatabase,
}

#[async_trait::async_trait]
impl Repository for InMemoryArticles {
    type CreateRequest = ArticleCreateDBRequest;
    type UpdateRequest = ArticleUpdateDBRequest;
    type Response = ArticleDBResponse;
    type Id = ArticleId;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tables = self.db.tables.write();
        if let Some(author) = request.author
            && !tables.users.rows.contains_key(&author)
        {
            return Err(foreign_key_violation("blogful_articles", "author"));
        }

        let article = ArticleDBResponse {
            id: tables.articles.next_id(),
            title: request.title.clone(),
            content: request.content.clone(),
            style: request.style,
            author: request.author,
            date_published: Utc::now(),
        };
        tables.articles.rows.insert(article.id, article.clone());
        Ok(article)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.db.tables.read().articles.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Self::Response>> {
        Ok(self.db.tables.read().articles.rows.values().cloned().collect())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<()> {
        let mut tables = self.db.tables.write();
        if let Some(article) = tables.articles.rows.get_mut(&id) {
            if let Some(title) = &request.title {
                article.title = title.clone();
            }
            if let Some(content) = &request.content {
                article.content = content.clone();
            }
            if let Some(style) = request.style {
                article.style = style;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<()> {
        let mut tables = self.db.tables.write();
        if tables.articles.rows.remove(&id).is_some() {
            tables.comments.rows.retain(|_, comment| comment.article_id != id);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemoryUsers {
    db: InMemoryDatabase,
}

#[async_trait::async_trait]
impl Repository for InMemoryUsers {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tables = self.db.tables.write();
        if tables.users.rows.values().any(|user| user.username == request.username) {
            return Err(username_taken());
        }

        let user = UserDBResponse {
            id: tables.users.next_id(),
            fullname: request.fullname.clone(),
            username: request.username.clone(),
            password: request.password.clone(),
            nickname: request.nickname.clone(),
            date_created: Utc::now(),
        };
        tables.users.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.db.tables.read().users.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Self::Response>> {
        Ok(self.db.tables.read().users.rows.values().cloned().collect())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<()> {
        let mut tables = self.db.tables.write();
        if let Some(username) = &request.username
            && tables.users.rows.values().any(|user| user.id != id && &user.username == username)
        {
            return Err(username_taken());
        }

        if let Some(user) = tables.users.rows.get_mut(&id) {
            if let Some(fullname) = &request.fullname {
                user.fullname = fullname.clone();
            }
            if let Some(username) = &request.username {
                user.username = username.clone();
            }
            if let Some(password) = &request.password {
                user.password = Some(password.clone());
            }
            if let Some(nickname) = &request.nickname {
                user.nickname = Some(nickname.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<()> {
        let mut tables = self.db.tables.write();
        if tables.users.rows.remove(&id).is_some() {
            for article in tables.articles.rows.values_mut() {
                if article.author == Some(id) {
                    article.author = None;
                }
            }
            tables.comments.rows.retain(|_, comment| comment.user_id != id);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemoryComments {
    db: InMemoryDatabase,
}

#[async_trait::async_trait]
impl Repository for InMemoryComments {
    type CreateRequest = CommentCreateDBRequest;
    type UpdateRequest = CommentUpdateDBRequest;
    type Response = CommentDBResponse;
    type Id = CommentId;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tables = self.db.tables.write();
        if !tables.articles.rows.contains_key(&request.article_id) {
            return Err(foreign_key_violation("blogful_comments", "article_id"));
        }
        if !tables.users.rows.contains_key(&request.user_id) {
            return Err(foreign_key_violation("blogful_comments", "user_id"));
        }

        let comment = CommentDBResponse {
            id: tables.comments.next_id(),
            text: request.text.clone(),
            date_commented: Utc::now(),
            article_id: request.article_id,
            user_id: request.user_id,
        };
        tables.comments.rows.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.db.tables.read().comments.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Self::Response>> {
        Ok(self.db.tables.read().comments.rows.values().cloned().collect())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<()> {
        let mut tables = self.db.tables.write();
        if let Some(comment) = tables.comments.rows.get_mut(&id) {
            if let Some(text) = &request.text {
                comment.text = text.clone();
            }
            if let Some(date_commented) = request.date_commented {
                comment.date_commented = date_commented;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Self::Id) -> Result<()> {
        self.db.tables.write().comments.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArticleStyle;

    fn user(username: &str) -> UserCreateDBRequest {
        UserCreateDBRequest {
            fullname: "Test User".to_string(),
            username: username.to_string(),
            password: None,
            nickname: None,
        }
    }

    fn article(author: Option<UserId>) -> ArticleCreateDBRequest {
        ArticleCreateDBRequest {
            title: "Title".to_string(),
            content: "Content".to_string(),
            style: ArticleStyle::Listicle,
            author,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_not_reused() {
        let db = InMemoryDatabase::new();
        let articles = db.articles();

        let first = articles.create(&article(None)).await.unwrap();
        let second = articles.create(&article(None)).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        articles.delete(second.id).await.unwrap();
        let third = articles.create(&article(None)).await.unwrap();
        assert_eq!(third.id, 3);

        let ids: Vec<_> = articles.list().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_article_author_must_exist() {
        let db = InMemoryDatabase::new();

        let err = db.articles().create(&article(Some(99))).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let author = db.users().create(&user("writer")).await.unwrap();
        let created = db.articles().create(&article(Some(author.id))).await.unwrap();
        assert_eq!(created.author, Some(author.id));
    }

    #[tokio::test]
    async fn test_deleting_user_clears_author_and_removes_comments() {
        let db = InMemoryDatabase::new();
        let author = db.users().create(&user("writer")).await.unwrap();
        let created = db.articles().create(&article(Some(author.id))).await.unwrap();
        db.comments()
            .create(&CommentCreateDBRequest {
                text: "Nice".to_string(),
                article_id: created.id,
                user_id: author.id,
            })
            .await
            .unwrap();

        db.users().delete(author.id).await.unwrap();

        let article = db.articles().get_by_id(created.id).await.unwrap().unwrap();
        assert!(article.author.is_none());
        assert!(db.comments().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_article_removes_its_comments() {
        let db = InMemoryDatabase::new();
        let commenter = db.users().create(&user("reader")).await.unwrap();
        let kept = db.articles().create(&article(None)).await.unwrap();
        let doomed = db.articles().create(&article(None)).await.unwrap();

        for article_id in [kept.id, doomed.id] {
            db.comments()
                .create(&CommentCreateDBRequest {
                    text: "Comment".to_string(),
                    article_id,
                    user_id: commenter.id,
                })
                .await
                .unwrap();
        }

        db.articles().delete(doomed.id).await.unwrap();

        let remaining = db.comments().list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].article_id, kept.id);
    }

    #[tokio::test]
    async fn test_comment_references_are_checked() {
        let db = InMemoryDatabase::new();
        let commenter = db.users().create(&user("reader")).await.unwrap();

        let err = db
            .comments()
            .create(&CommentCreateDBRequest {
                text: "Orphan".to_string(),
                article_id: 1,
                user_id: commenter.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let db = InMemoryDatabase::new();
        let users = db.users();

        let sam = users.create(&user("sam")).await.unwrap();
        let alex = users.create(&user("alex")).await.unwrap();
        assert!(matches!(users.create(&user("sam")).await, Err(DbError::UniqueViolation { .. })));

        let rename = UserUpdateDBRequest {
            username: Some("sam".to_string()),
            ..Default::default()
        };
        assert!(matches!(users.update(alex.id, &rename).await, Err(DbError::UniqueViolation { .. })));

        // Renaming to your own username is fine
        users.update(sam.id, &rename).await.unwrap();
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = InMemoryDatabase::new();
        let articles = db.articles();
        let created = articles.create(&article(None)).await.unwrap();

        articles
            .update(
                created.id,
                &ArticleUpdateDBRequest {
                    content: Some("New content".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = articles.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(updated.content, "New content");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.style, created.style);
    }
}
