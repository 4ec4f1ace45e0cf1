use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "ValidationError", "fields": errors }),
            ),
            Error::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "BadRequest", "message": msg }),
            ),
            Error::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Unauthorized", "message": msg }),
            ),
            Error::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                json!({ "error": "Forbidden", "message": msg }),
            ),
            Error::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "NotFound", "message": msg }),
            ),
            Error::Conflict(msg) => (
                StatusCode::CONFLICT,
                json!({ "error": "Conflict", "message": msg }),
            ),
            other => {
                tracing::error!(error = ?other, "request failed with an unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "ServerError", "message": "An unexpected error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Conflict(db.message().to_string())
            }
            other => Error::Database(other),
        }
    }
}

/// Builds a single-field validation failure in the same shape `validator` derives produce.
pub fn field_error(field: &'static str, code: &'static str, message: impl Into<String>) -> Error {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.into().into());
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);
    Error::Validation(errors)
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn render(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let cases = [
            (Error::BadRequest("no fields".into()), StatusCode::BAD_REQUEST, "BadRequest", "no fields"),
            (Error::Forbidden("not yours".into()), StatusCode::FORBIDDEN, "Forbidden", "not yours"),
            (Error::NotFound("gone".into()), StatusCode::NOT_FOUND, "NotFound", "gone"),
            (Error::Conflict("twice".into()), StatusCode::CONFLICT, "Conflict", "twice"),
        ];
        for (error, expected, label, message) in cases {
            let (status, body) = render(error).await;
            assert_eq!(status, expected);
            assert_eq!(body["error"], label);
            assert_eq!(body["message"], message);
        }
    }

    #[tokio::test]
    async fn validation_errors_list_the_failing_fields() {
        let (status, body) = render(field_error("status", "invalid", "unknown status")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
        assert!(body["fields"]["status"].is_array());
    }

    #[tokio::test]
    async fn server_errors_hide_their_detail() {
        for error in [
            Error::Internal("memory store lock poisoned".into()),
            Error::Config("Missing environment variable: JWT_SECRET".into()),
            Error::Database(sqlx::Error::PoolTimedOut),
        ] {
            let (status, body) = render(error).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], "ServerError");
            assert_eq!(body["message"], "An unexpected error occurred");
        }
    }

    #[test]
    fn storage_errors_map_to_domain_errors() {
        assert!(matches!(
            Error::from(sqlx::Error::RowNotFound),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from(sqlx::Error::PoolClosed),
            Error::Database(_)
        ));
    }
}
