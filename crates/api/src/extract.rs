//! Request extractors that fail with the uniform error envelope.

use axum::extract::{FromRequest, Request};

use crate::error::AppError;

/// JSON body extractor whose rejection goes through [`AppError`], so
/// malformed payloads produce the same `{"message", "detail"}` envelope as
/// every other 400.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}
