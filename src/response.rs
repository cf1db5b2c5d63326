//! Response Envelope
//!
//! Uniform success wrapper for every outward response body. The body's
//! `statusCode` mirrors the HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope: `{statusCode, data, message, success}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag() {
        let ok = ApiResponse::new(201, serde_json::json!({}), "created");
        assert!(ok.success);

        let failed = ApiResponse::new(500, serde_json::json!({}), "boom");
        assert!(!failed.success);
    }

    #[test]
    fn test_envelope_field_names() {
        let envelope = ApiResponse::new(200, serde_json::json!({"id": 1}), "ok");
        let body = serde_json::to_value(&envelope).unwrap();

        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "ok");
        assert_eq!(body["data"]["id"], 1);
    }

    #[tokio::test]
    async fn test_http_status_mirrors_body() {
        let response = ApiResponse::new(201, serde_json::json!({}), "created").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
