//! Authentication Models
//!
//! Data structures for authentication requests, responses, database entities,
//! and JWT claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// ============================================
// Database Entities
// ============================================

/// User entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Unique handle, stored lowercase
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    /// Current session's rotating secret; exactly one valid value at a time
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new user record
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

// ============================================
// Request DTOs
// ============================================

/// Text fields of the multipart registration request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterFields {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl RegisterFields {
    /// True when any required field is empty after trimming
    pub fn any_blank(&self) -> bool {
        [&self.username, &self.email, &self.full_name, &self.password]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

/// Login request; at least one of username/email must be present
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh request body; the handler falls back to the cookie
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

// ============================================
// Response DTOs
// ============================================

/// Public user projection; never carries `password_hash` or `refresh_token`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            created_at: user.created_at,
        }
    }
}

/// Login response data: user plus both tokens
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh response data: the rotated pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// A freshly signed access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

// ============================================
// JWT Claims
// ============================================

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Username
    pub username: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// JWT ID (unique identifier)
    pub jti: Uuid,
}

/// JWT claims for refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// JWT ID; makes every rotation distinct
    pub jti: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "abc".to_string(),
            email: "a@b.com".to_string(),
            full_name: "A B".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            avatar_url: "https://media.test/avatar.png".to_string(),
            cover_image_url: None,
            refresh_token: Some("persisted-token".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_response_excludes_secrets() {
        let body = serde_json::to_value(UserResponse::from(sample_user())).unwrap();
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();

        assert!(keys.contains(&"username"));
        assert!(keys.contains(&"fullName"));
        assert!(keys.contains(&"avatarUrl"));
        assert!(!keys.contains(&"password"));
        assert!(!keys.contains(&"passwordHash"));
        assert!(!keys.contains(&"refreshToken"));
    }

    #[test]
    fn test_user_entity_skips_secrets_when_serialized() {
        let body = serde_json::to_value(sample_user()).unwrap();
        assert!(body.get("password_hash").is_none());
        assert!(body.get("refresh_token").is_none());
    }

    #[test]
    fn test_any_blank_catches_whitespace() {
        let mut fields = RegisterFields {
            username: "abc".to_string(),
            email: "a@b.com".to_string(),
            full_name: "A B".to_string(),
            password: "secret".to_string(),
        };
        assert!(!fields.any_blank());

        fields.full_name = "   ".to_string();
        assert!(fields.any_blank());
    }

    #[test]
    fn test_register_fields_email_validation() {
        let fields = RegisterFields {
            username: "abc".to_string(),
            email: "not-an-email".to_string(),
            full_name: "A B".to_string(),
            password: "secret".to_string(),
        };
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_auth_response_key_names() {
        let response = AuthResponse {
            user: sample_user().into(),
            access_token: "acc".to_string(),
            refresh_token: "ref".to_string(),
        };
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["accessToken"], "acc");
        assert_eq!(body["refreshToken"], "ref");
        assert_eq!(body["user"]["username"], "abc");
    }
}
