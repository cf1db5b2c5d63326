//! Authentication Extractors
//!
//! Axum extractors for the authenticated-user identity carried by access
//! tokens.

use crate::error::AuthError;
use crate::handlers::AuthState;
use crate::middleware::extract_access_token;
use crate::models::AccessTokenClaims;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Authenticated user information extracted from JWT claims
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl AuthUser {
    /// Create user from JWT claims
    pub fn from_claims(claims: &AccessTokenClaims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username.clone(),
            email: claims.email.clone(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AuthState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthState,
    ) -> Result<Self, Self::Rejection> {
        // claims validated by the middleware land in extensions
        if let Some(claims) = parts.extensions.get::<AccessTokenClaims>() {
            return Ok(AuthUser::from_claims(claims));
        }

        let token = extract_access_token(&parts.headers, &parts.extensions)
            .ok_or(AuthError::Unauthenticated)?;
        let claims = state.verify_access_token(&token)?;

        Ok(AuthUser::from_claims(&claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claims() {
        let id = Uuid::new_v4();
        let claims = AccessTokenClaims {
            sub: id,
            username: "abc".to_string(),
            email: "a@b.com".to_string(),
            iat: 0,
            exp: 0,
            iss: "cliphive-test".to_string(),
            jti: Uuid::new_v4(),
        };

        let user = AuthUser::from_claims(&claims);
        assert_eq!(user.id, id);
        assert_eq!(user.username, "abc");
        assert_eq!(user.email, "a@b.com");
    }
}
