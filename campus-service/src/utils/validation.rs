use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// JSON body that has been deserialized and passed its `validator` rules.
///
/// Malformed JSON, missing or mistyped fields and rule violations are all
/// rejected with [`AppError::ValidationError`]. A request without a
/// `Content-Type` header is still parsed as JSON; any other non-JSON content
/// type is rejected.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if req.headers().contains_key(CONTENT_TYPE) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            value
        } else {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::ValidationError(e.body_text()))?;
            serde_json::from_slice(&bytes).map_err(|e| {
                AppError::ValidationError(format!(
                    "Failed to deserialize the JSON body into the target type: {}",
                    e
                ))
            })?
        };

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
