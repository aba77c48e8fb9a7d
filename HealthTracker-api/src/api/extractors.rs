// Request extractors that report every rejection as a 422 ErrorResponse

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::{Validate, ValidationErrors};

use crate::entities::common::ErrorResponse;

/// JSON body extractor with 422 rejections
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            warn!("Rejected request body: {}", rejection.body_text());
            ErrorResponse::validation_error("Invalid request body", Some(rejection.body_text().into()))
        })?;

        Ok(Self(value))
    }
}

/// Query string extractor that also runs `validator` rules
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await.map_err(|rejection| {
            warn!("Rejected query string: {}", rejection.body_text());
            ErrorResponse::validation_error("Invalid query parameters", Some(rejection.body_text().into()))
        })?;

        value.validate().map_err(|errors| {
            warn!("Query validation failed: {}", errors);
            ErrorResponse::validation_error("Invalid query parameters", Some(validation_details(&errors)))
        })?;

        Ok(Self(value))
    }
}

/// Flatten field errors into `{field: [message, ...]}`
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect::<serde_json::Map<_, _>>()
        .into()
}
