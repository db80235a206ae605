//! API request/response models for users.

use crate::db::models::users::UserDBResponse;
use crate::sanitize::Sanitize;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a user. `fullname` and `username` are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UserCreate {
    #[schema(example = "Sam Smith")]
    pub fullname: Option<String>,
    #[schema(example = "sam.smith")]
    pub username: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
}

/// Request body for updating a user. At least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
}

/// A user as returned by the API. The password is never included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub fullname: String,
    pub username: String,
    pub nickname: Option<String>,
    pub date_created: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            fullname: db.fullname,
            username: db.username,
            nickname: db.nickname,
            date_created: db.date_created,
        }
    }
}

impl Sanitize for UserResponse {
    fn sanitized(self) -> Self {
        Self {
            fullname: self.fullname.sanitized(),
            username: self.username.sanitized(),
            nickname: self.nickname.sanitized(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_not_exposed() {
        let user = UserResponse::from(UserDBResponse {
            id: 1,
            fullname: "Sam Smith".to_string(),
            username: "sam".to_string(),
            password: Some("hunter2".to_string()),
            nickname: Some("<b>Sammy</b>".to_string()),
            date_created: Utc::now(),
        });

        let json = serde_json::to_value(user.sanitized()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["nickname"], "<b>Sammy</b>");
    }
}
