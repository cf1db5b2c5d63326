//! Authentication HTTP Handlers
//!
//! REST API endpoints for the session operations, plus the cookie transport
//! that delivers the token pair to browsers.

use crate::error::AuthError;
use crate::extractors::AuthUser;
use crate::media::MediaFile;
use crate::middleware;
use crate::models::*;
use crate::response::ApiResponse;
use crate::service::AuthService;

use axum::{
    extract::{
        multipart::Field,
        Multipart, State,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_cookies::{Cookie, CookieManagerLayer, Cookies};
use validator::Validate;

/// Shared auth service state
pub type AuthState = Arc<AuthService>;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

// ============================================
// Route Builder
// ============================================

/// Create authentication routes
pub fn create_routes(auth_service: Arc<AuthService>) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token));

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(current_user))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_service.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(CookieManagerLayer::new())
        .with_state(auth_service)
}

// ============================================
// Cookie Transport
// ============================================

fn token_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .build()
}

fn set_token_cookies(cookies: &Cookies, secure: bool, access_token: &str, refresh_token: &str) {
    cookies.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        access_token.to_string(),
        secure,
    ));
    cookies.add(token_cookie(
        REFRESH_TOKEN_COOKIE,
        refresh_token.to_string(),
        secure,
    ));
}

fn clear_token_cookies(cookies: &Cookies, secure: bool) {
    cookies.remove(token_cookie(ACCESS_TOKEN_COOKIE, String::new(), secure));
    cookies.remove(token_cookie(REFRESH_TOKEN_COOKIE, String::new(), secure));
}

// ============================================
// Registration
// ============================================

/// Multipart registration payload: text fields plus the image files
struct RegisterUpload {
    fields: RegisterFields,
    avatar: Option<MediaFile>,
    cover_image: Option<MediaFile>,
}

async fn read_file_field(field: Field<'_>) -> Result<MediaFile, AuthError> {
    let filename = field
        .file_name()
        .ok_or_else(|| AuthError::Validation("no filename provided".to_string()))?
        .to_string();

    let content_type = field
        .content_type()
        .ok_or_else(|| AuthError::Validation("no content type provided".to_string()))?
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| AuthError::Validation(e.to_string()))?
        .to_vec();

    Ok(MediaFile {
        filename,
        content_type,
        data,
    })
}

/// Walk the multipart stream; only the first file per image field is used
async fn collect_register_upload(mut multipart: Multipart) -> Result<RegisterUpload, AuthError> {
    let mut fields = RegisterFields::default();
    let mut avatar = None;
    let mut cover_image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AuthError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => {
                fields.username = field
                    .text()
                    .await
                    .map_err(|e| AuthError::Validation(e.to_string()))?
            }
            "email" => {
                fields.email = field
                    .text()
                    .await
                    .map_err(|e| AuthError::Validation(e.to_string()))?
            }
            "fullName" => {
                fields.full_name = field
                    .text()
                    .await
                    .map_err(|e| AuthError::Validation(e.to_string()))?
            }
            "password" => {
                fields.password = field
                    .text()
                    .await
                    .map_err(|e| AuthError::Validation(e.to_string()))?
            }
            "avatar" if avatar.is_none() => avatar = Some(read_file_field(field).await?),
            "coverImage" if cover_image.is_none() => {
                cover_image = Some(read_file_field(field).await?)
            }
            _ => {}
        }
    }

    Ok(RegisterUpload {
        fields,
        avatar,
        cover_image,
    })
}

/// POST /auth/register
///
/// Register a new user account from a multipart form with an avatar file
pub async fn register(
    State(auth): State<AuthState>,
    multipart: Multipart,
) -> Result<ApiResponse<UserResponse>, AuthError> {
    let upload = collect_register_upload(multipart).await?;

    let user = auth
        .register(upload.fields, upload.avatar, upload.cover_image)
        .await?;

    Ok(ApiResponse::new(201, user, "user registered successfully"))
}

// ============================================
// Login / Logout
// ============================================

/// POST /auth/login
///
/// Authenticate by username or email; delivers the token pair in the body
/// and as http-only cookies
pub async fn login(
    State(auth): State<AuthState>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let response = auth.login(req).await?;

    set_token_cookies(
        &cookies,
        auth.config().cookie_secure,
        &response.access_token,
        &response.refresh_token,
    );

    Ok(ApiResponse::new(200, response, "user logged in successfully"))
}

/// POST /auth/logout
///
/// Clear the persisted refresh token and drop both cookies
pub async fn logout(
    State(auth): State<AuthState>,
    cookies: Cookies,
    user: AuthUser,
) -> Result<ApiResponse<serde_json::Value>, AuthError> {
    auth.logout(user.id).await?;
    clear_token_cookies(&cookies, auth.config().cookie_secure);

    Ok(ApiResponse::new(200, serde_json::json!({}), "user logged out"))
}

// ============================================
// Token Refresh
// ============================================

/// POST /auth/refresh
///
/// Rotate the refresh token, accepting it from the cookie or the body;
/// both cookies are reset, each under its own name
pub async fn refresh_token(
    State(auth): State<AuthState>,
    cookies: Cookies,
    body: Option<Json<RefreshTokenRequest>>,
) -> Result<ApiResponse<TokenResponse>, AuthError> {
    let incoming = cookies
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| body.and_then(|Json(req)| req.refresh_token));

    let response = auth.refresh(incoming.as_deref()).await?;

    set_token_cookies(
        &cookies,
        auth.config().cookie_secure,
        &response.access_token,
        &response.refresh_token,
    );

    Ok(ApiResponse::new(200, response, "access token refreshed"))
}

// ============================================
// User Profile
// ============================================

/// GET /auth/me
///
/// Current user projection for the authenticated caller
pub async fn current_user(
    State(auth): State<AuthState>,
    user: AuthUser,
) -> Result<ApiResponse<UserResponse>, AuthError> {
    let user = auth
        .get_user(user.id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(ApiResponse::new(
        200,
        UserResponse::from(user),
        "current user fetched",
    ))
}
