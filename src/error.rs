//! Authentication Error Types
//!
//! Centralized error handling for all authentication operations. Every error
//! that crosses the HTTP boundary is normalized into the standard error
//! envelope; raw internal errors are logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Authentication errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("user with email or username already exists")]
    IdentityExists,

    #[error("user does not exist")]
    UserNotFound,

    #[error("invalid user credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("refresh token is required")]
    MissingRefreshToken,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("refresh token is expired or used")]
    TokenReused,

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error")]
    Internal,
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::IdentityExists => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::MissingRefreshToken
            | AuthError::InvalidToken
            | AuthError::TokenReused => StatusCode::UNAUTHORIZED,
            AuthError::Upload(_)
            | AuthError::Database(_)
            | AuthError::Config(_)
            | AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client; internal detail is masked
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::Internal => {
                "something went wrong".to_string()
            }
            AuthError::Config(_) => "server configuration error".to_string(),
            AuthError::Upload(_) => "media upload failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        (
            status,
            Json(serde_json::json!({
                "statusCode": status.as_u16(),
                "message": self.public_message(),
                "success": false,
                "errors": []
            })),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AuthError::Database(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        AuthError::Internal
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("JWT error: {:?}", err);
        AuthError::InvalidToken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            AuthError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::IdentityExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::TokenReused.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Upload("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_masked() {
        let msg = AuthError::Database("connection reset on 10.0.0.3".into()).public_message();
        assert!(!msg.contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = AuthError::TokenReused.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "refresh token is expired or used");
        assert!(body["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_jwt_error_normalizes_to_invalid_token() {
        let err = jsonwebtoken::decode::<serde_json::Value>(
            "not.a.token",
            &jsonwebtoken::DecodingKey::from_secret(b"secret"),
            &jsonwebtoken::Validation::default(),
        )
        .unwrap_err();

        assert!(matches!(AuthError::from(err), AuthError::InvalidToken));
    }
}
