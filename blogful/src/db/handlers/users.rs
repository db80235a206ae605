//! Database repository for users.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
};
use crate::types::UserId;
use sqlx::PgPool;
use tracing::instrument;

const USER_COLUMNS: &str = "id, fullname, username, password, nickname, date_created";

#[derive(Clone)]
pub struct Users {
    db: PgPool,
}

impl Users {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Users {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!(
            "INSERT INTO blogful_users (fullname, username, password, nickname) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(&request.fullname)
        .bind(&request.username)
        .bind(&request.password)
        .bind(&request.nickname)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!("SELECT {USER_COLUMNS} FROM blogful_users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Self::Response>> {
        let users = sqlx::query_as::<_, UserDBResponse>(&format!("SELECT {USER_COLUMNS} FROM blogful_users ORDER BY id"))
            .fetch_all(&self.db)
            .await?;

        Ok(users)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE blogful_users SET
                fullname = COALESCE($2, fullname),
                username = COALESCE($3, username),
                password = COALESCE($4, password),
                nickname = COALESCE($5, nickname)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&request.fullname)
        .bind(&request.username)
        .bind(&request.password)
        .bind(&request.nickname)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: Self::Id) -> Result<()> {
        sqlx::query("DELETE FROM blogful_users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;

    fn new_user(username: &str) -> UserCreateDBRequest {
        UserCreateDBRequest {
            fullname: "Sam Smith".to_string(),
            username: username.to_string(),
            password: Some("password".to_string()),
            nickname: None,
        }
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_create_user(pool: PgPool) {
        let repo = Users::new(pool);

        let user = repo.create(&new_user("sam.smith")).await.unwrap();
        assert_eq!(user.username, "sam.smith");
        assert_eq!(user.password.as_deref(), Some("password"));

        let fetched = repo.get_by_id(user.id).await.unwrap();
        assert_eq!(fetched, Some(user));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_username_is_unique(pool: PgPool) {
        let repo = Users::new(pool);

        repo.create(&new_user("taken")).await.unwrap();
        let err = repo.create(&new_user("taken")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_update_nickname_only(pool: PgPool) {
        let repo = Users::new(pool);
        let user = repo.create(&new_user("nick")).await.unwrap();

        let update = UserUpdateDBRequest {
            nickname: Some("Nicky".to_string()),
            ..Default::default()
        };
        repo.update(user.id, &update).await.unwrap();

        let updated = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(updated.nickname.as_deref(), Some("Nicky"));
        assert_eq!(updated.fullname, user.fullname);
        assert_eq!(updated.password, user.password);
    }
}
