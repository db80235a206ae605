//! Database models for users.

use crate::api::models::users::{UserCreate, UserUpdate};
use crate::errors::Error;
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// Name PostgreSQL gives the `UNIQUE` constraint on `blogful_users.username`
pub const USERNAME_CONSTRAINT: &str = "blogful_users_username_key";

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub fullname: String,
    pub username: String,
    pub password: Option<String>,
    pub nickname: Option<String>,
}

impl TryFrom<UserCreate> for UserCreateDBRequest {
    type Error = Error;

    fn try_from(api: UserCreate) -> Result<Self, Self::Error> {
        let fullname = api.fullname.ok_or_else(|| Error::missing_field("fullname"))?;
        let username = api.username.ok_or_else(|| Error::missing_field("username"))?;

        Ok(Self {
            fullname,
            username,
            password: api.password,
            nickname: api.nickname,
        })
    }
}

/// Database request for updating a user
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
}

impl TryFrom<UserUpdate> for UserUpdateDBRequest {
    type Error = Error;

    fn try_from(api: UserUpdate) -> Result<Self, Self::Error> {
        if api.fullname.is_none() && api.username.is_none() && api.password.is_none() && api.nickname.is_none() {
            return Err(Error::BadRequest {
                message: "Request body must contain either 'fullname', 'username', 'password' or 'nickname'".to_string(),
            });
        }

        Ok(Self {
            fullname: api.fullname,
            username: api.username,
            password: api.password,
            nickname: api.nickname,
        })
    }
}

/// Database response for a user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub fullname: String,
    pub username: String,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub date_created: DateTime<Utc>,
}
