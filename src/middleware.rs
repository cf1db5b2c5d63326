//! Authentication Middleware
//!
//! Access-token validation guarding the protected routes. The token may
//! arrive as a Bearer header or as the access-token cookie.

use crate::error::AuthError;
use crate::handlers::{AuthState, ACCESS_TOKEN_COOKIE};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Extensions, HeaderMap},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

/// Pull the access token from the Authorization header or the cookie jar
pub(crate) fn extract_access_token(
    headers: &HeaderMap,
    extensions: &Extensions,
) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| {
        extensions
            .get::<Cookies>()
            .and_then(|cookies| cookies.get(ACCESS_TOKEN_COOKIE))
            .map(|cookie| cookie.value().to_string())
    })
}

/// Require authenticated user
///
/// Validates the access token and stores the claims in request extensions
/// for use by extractors.
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_access_token(req.headers(), req.extensions())
        .ok_or(AuthError::Unauthenticated)?;

    let claims = auth.verify_access_token(&token)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
