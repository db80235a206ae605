//! PostgreSQL repository implementations.
//!
//! Each repository owns a clone of the connection pool and implements [`Repository`]. The
//! application state stores them as trait objects through the aliases below, so the in-memory
//! backend can stand in without the handlers noticing.

pub mod articles;
pub mod comments;
pub mod repository;
pub mod users;

pub use articles::Articles;
pub use comments::Comments;
pub use repository::Repository;
pub use users::Users;

use crate::db::models::{
    articles::{ArticleCreateDBRequest, ArticleDBResponse, ArticleUpdateDBRequest},
    comments::{CommentCreateDBRequest, CommentDBResponse, CommentUpdateDBRequest},
    users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
};
use crate::types::{ArticleId, CommentId, UserId};

pub type ArticleRepository = dyn Repository<
        CreateRequest = ArticleCreateDBRequest,
        UpdateRequest = ArticleUpdateDBRequest,
        Response = ArticleDBResponse,
        Id = ArticleId,
    >;

pub type UserRepository =
    dyn Repository<CreateRequest = UserCreateDBRequest, UpdateRequest = UserUpdateDBRequest, Response = UserDBResponse, Id = UserId>;

pub type CommentRepository = dyn Repository<
        CreateRequest = CommentCreateDBRequest,
        UpdateRequest = CommentUpdateDBRequest,
        Response = CommentDBResponse,
        Id = CommentId,
    >;
