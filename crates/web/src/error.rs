//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Every error body is JSON: `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use sous_chef_core::PricingError;

use crate::db::RepositoryError;
use crate::services::OrderError;
use crate::spoonacular::RecipeApiError;

/// Application-level error type for the web service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Recipe API request failed.
    #[error("Recipe API error: {0}")]
    RecipeApi(#[from] RecipeApiError),

    /// A cart or order line was rejected.
    #[error("{0}")]
    Pricing(#[from] PricingError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No user in the session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Pricing(e) => Self::Pricing(e),
            OrderError::EmptyOrder => Self::BadRequest(OrderError::EmptyOrder.to_string()),
            OrderError::Repository(e) => Self::from(e),
            OrderError::Transaction(e) => Self::Database(RepositoryError::Database(e)),
        }
    }
}

impl AppError {
    /// Whether this error is our fault rather than the client's.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
            ) | Self::Internal(_)
                | Self::RecipeApi(
                    RecipeApiError::Http(_)
                        | RecipeApiError::Parse(_)
                        | RecipeApiError::RateLimited(_)
                        | RecipeApiError::Status { .. }
                )
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RecipeApi(RecipeApiError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::RecipeApi(_) => StatusCode::BAD_GATEWAY,
            Self::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details stay in the logs.
    fn message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) | Self::Unauthorized(msg) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::RecipeApi(RecipeApiError::NotFound(_)) => "Recipe not found".to_string(),
            Self::RecipeApi(_) => "Recipe service unavailable".to_string(),
            Self::Pricing(err) => err.to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in user.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use rust_decimal_macros::dec;

    use sous_chef_core::IngredientId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn body_json(err: AppError) -> serde_json::Value {
        let body = to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("recipe-123".to_string());
        assert_eq!(err.to_string(), "Not found: recipe-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict("x".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::RecipeApi(RecipeApiError::RateLimited(60))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::RecipeApi(RecipeApiError::NotFound("1".into()))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_pricing_errors_are_unprocessable() {
        let err = AppError::Pricing(PricingError::InvalidQuantity {
            identifier: IngredientId::new(1),
            count: 0,
        });
        assert_eq!(get_status(err), StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::Pricing(PricingError::InvalidPrice {
            identifier: IngredientId::new(1),
            price: dec!(-1),
        });
        assert_eq!(get_status(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_order_errors_map() {
        assert_eq!(
            get_status(AppError::from(OrderError::EmptyOrder)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::from(OrderError::Repository(
                RepositoryError::Conflict("taken".into())
            ))),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let body = body_json(AppError::Internal("pool exhausted at 10.0.0.3".into())).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_unauthorized_message_passed_through() {
        let body = body_json(AppError::Unauthorized("Please register or sign in first".into())).await;
        assert_eq!(body["error"], "Please register or sign in first");
    }

    #[tokio::test]
    async fn test_conflict_message_passed_through() {
        let body = body_json(AppError::Database(RepositoryError::Conflict(
            "Username already taken".into(),
        )))
        .await;
        assert_eq!(body["error"], "Username already taken");
    }
}
