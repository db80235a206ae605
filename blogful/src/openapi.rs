//! OpenAPI document for the REST API, served as an interactive reference at `/docs` and as
//! raw JSON at `/openapi.json`.

use crate::{api, errors, types};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::articles::list_articles,
        api::handlers::articles::create_article,
        api::handlers::articles::get_article,
        api::handlers::articles::update_article,
        api::handlers::articles::delete_article,
        api::handlers::users::list_users,
        api::handlers::users::create_user,
        api::handlers::users::get_user,
        api::handlers::users::update_user,
        api::handlers::users::delete_user,
        api::handlers::comments::list_comments,
        api::handlers::comments::create_comment,
        api::handlers::comments::get_comment,
        api::handlers::comments::update_comment,
        api::handlers::comments::delete_comment,
    ),
    components(
        schemas(
            types::ArticleStyle,
            api::models::articles::ArticleCreate,
            api::models::articles::ArticleUpdate,
            api::models::articles::ArticleResponse,
            api::models::users::UserCreate,
            api::models::users::UserUpdate,
            api::models::users::UserResponse,
            api::models::comments::CommentCreate,
            api::models::comments::CommentUpdate,
            api::models::comments::CommentResponse,
            errors::ErrorBody,
            errors::ErrorMessage,
        )
    ),
    tags(
        (name = "articles", description = "Blog articles. Titles and content are sanitized whenever they are returned."),
        (name = "users", description = "Authors and commenters. Passwords are accepted but never returned."),
        (name = "comments", description = "Comments left by users on articles."),
    ),
    info(
        title = "Blogful API",
        version = "1.0.0",
        description = "Create, read, update and delete blog articles, users and comments.

## Errors

Every error response has the same shape:

```json
{
  \"error\": {
    \"message\": \"Article doesn't exist\"
  }
}
```

## Sanitization

Stored text is returned with disallowed HTML escaped, event-handler attributes removed and
`javascript:` style links dropped. Input is stored exactly as submitted."
    )
)]
pub struct ApiDoc;
