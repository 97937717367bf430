use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Handler-level error taxonomy. Every failure is converted to a JSON
/// `{"error": "..."}` response; nothing propagates past the router.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid or expired token (401)
    #[error("{0}")]
    Unauthenticated(String),

    /// Valid token, wrong role (403)
    #[error("{0}")]
    Forbidden(String),

    /// Resolvable entity missing (404)
    #[error("{0}")]
    NotFound(String),

    /// Database failure (500); detail is logged, never echoed
    #[error("database error")]
    Database(#[from] sea_orm::DbErr),

    /// Anything else unexpected (500)
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Infrastructure detail stays in the logs.
        match &self {
            ApiError::Database(err) => {
                tracing::error!(error = %err, "database error");
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
            }
            _ => {}
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_error_not_echoed() {
        let err = ApiError::Database(sea_orm::DbErr::Custom("secret dsn".into()));
        assert_eq!(err.to_string(), "database error");
    }
}
