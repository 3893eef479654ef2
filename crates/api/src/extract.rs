//! Body extractor that deserializes JSON and runs `validator` rules.

use axum::extract::{FromRequest, Request};
use axum::Json;
use harbor_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// Like [`Json`], but rejects bodies failing their `#[validate(...)]` rules
/// with a 400 `VALIDATION_ERROR` before the handler runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::Validation(errors.to_string())))?;
        Ok(ValidatedJson(value))
    }
}
