use axum::{http::StatusCode, response::Json};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::store::StoreError;

pub const VALIDATION_ERRORS_MESSAGE: &str = "validation errors";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Why a restaurant-pizza payload was rejected. Only logged; clients always
/// receive the generic validation body.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("price is not a number: {0}")]
    NonNumericPrice(String),
    #[error("price {0} is outside the allowed range")]
    PriceOutOfRange(f64),
    #[error("pizza {0} does not exist")]
    UnknownPizza(i32),
    #[error("restaurant {0} does not exist")]
    UnknownRestaurant(i32),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => ApiError::NotFound(entity),
            StoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        ApiError::Internal(format!("database error: {err}"))
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        ApiError::Internal(format!("connection pool error: {err}"))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {err}"))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorsResponse {
    /// Generic error messages
    pub errors: Vec<String>,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                Json(ApiErrorResponse {
                    error: format!("{entity} not found"),
                }),
            )
                .into_response(),
            ApiError::Validation(reason) => {
                warn!(%reason, "rejected restaurant pizza payload");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiErrorsResponse {
                        errors: vec![VALIDATION_ERRORS_MESSAGE.to_string()],
                    }),
                )
                    .into_response()
            }
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiErrorsResponse {
                        errors: vec![UNEXPECTED_ERROR_MESSAGE.to_string()],
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_json(ApiError::NotFound("Restaurant")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": "Restaurant not found" }));
    }

    #[tokio::test]
    async fn test_validation_body_hides_reason() {
        let (status, body) =
            body_json(ValidationError::UnknownPizza(42).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "errors": ["validation errors"] }));
    }

    #[tokio::test]
    async fn test_internal_body_hides_detail() {
        let (status, body) =
            body_json(ApiError::Internal("disk I/O error".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({ "errors": ["An unexpected error occurred"] })
        );
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: ApiError = StoreError::NotFound {
            entity: "Restaurant",
            id: 7,
        }
        .into();

        assert!(matches!(err, ApiError::NotFound("Restaurant")));
    }
}
