//! Request extractors that report failures in the API error envelope.

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::errors::Error;

/// JSON request body.
///
/// Unlike [`axum::Json`], a rejected body becomes an [`Error::BadRequest`], and an empty body is
/// read as `{}` so required-field checks can name what is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| Error::BadRequest {
            message: rejection.body_text(),
        })?;

        let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
            Bytes::from_static(b"{}")
        } else {
            bytes
        };

        let Json(value) = Json::<T>::from_bytes(&bytes).map_err(|rejection| Error::BadRequest {
            message: rejection.body_text(),
        })?;
        Ok(Self(value))
    }
}

/// Path of a newly created resource: the collection path the request was made to, joined with
/// the new id, with repeated `/` collapsed.
pub fn resource_location(collection_path: &str, id: impl std::fmt::Display) -> String {
    let mut location = String::with_capacity(collection_path.len() + 12);
    for segment in collection_path.split('/').filter(|segment| !segment.is_empty()) {
        location.push('/');
        location.push_str(segment);
    }
    location.push('/');
    location.push_str(&id.to_string());
    location
}
