//! Authentication Service
//!
//! Core authentication logic: credential validation, password hashing,
//! token-pair issuance with refresh rotation, and the session operations
//! (register, login, logout, refresh).

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::media::{MediaFile, MediaStore};
use crate::models::*;
use crate::store::UserStore;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Authentication service
pub struct AuthService {
    store: Arc<dyn UserStore>,
    media: Arc<dyn MediaStore>,
    config: AuthConfig,
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: Arc<dyn UserStore>, media: Arc<dyn MediaStore>, config: AuthConfig) -> Self {
        let access_encoding_key = EncodingKey::from_secret(config.access_token_secret.as_bytes());
        let access_decoding_key = DecodingKey::from_secret(config.access_token_secret.as_bytes());
        let refresh_encoding_key = EncodingKey::from_secret(config.refresh_token_secret.as_bytes());
        let refresh_decoding_key = DecodingKey::from_secret(config.refresh_token_secret.as_bytes());

        Self {
            store,
            media,
            config,
            access_encoding_key,
            access_decoding_key,
            refresh_encoding_key,
            refresh_decoding_key,
        }
    }

    /// Get reference to config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    // ============================================
    // Password Hashing
    // ============================================

    fn argon2(&self) -> Result<Argon2<'_>, AuthError> {
        let params = Params::new(
            self.config.argon2_memory_cost,
            self.config.argon2_time_cost,
            self.config.argon2_parallelism,
            None,
        )
        .map_err(|_| AuthError::Internal)?;

        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    /// Hash a password using Argon2id
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::Internal)?;
        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    // ============================================
    // Token Issuer
    // ============================================

    fn sign_access_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_expiration);

        let claims = AccessTokenClaims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            jti: Uuid::new_v4(),
        };

        Ok(encode(&Header::default(), &claims, &self.access_encoding_key)?)
    }

    pub(crate) fn sign_refresh_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.refresh_token_expiration);

        let claims = RefreshTokenClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            jti: Uuid::new_v4(),
        };

        Ok(encode(&Header::default(), &claims, &self.refresh_encoding_key)?)
    }

    /// Validate an access token and return its claims
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.jwt_issuer]);

        let token_data = decode::<AccessTokenClaims>(token, &self.access_decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    fn verify_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.jwt_issuer]);

        let token_data =
            decode::<RefreshTokenClaims>(token, &self.refresh_decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Sign an access/refresh pair for the user and persist the new refresh
    /// token on the record, overwriting any previously stored value.
    ///
    /// Failures in lookup, signing, or persistence surface as `Internal`;
    /// the caller has already established that the user exists.
    pub async fn issue_token_pair(&self, user_id: Uuid) -> Result<TokenPair, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await
            .map_err(|_| AuthError::Internal)?
            .ok_or(AuthError::Internal)?;

        let access_token = self.sign_access_token(&user).map_err(|_| AuthError::Internal)?;
        let refresh_token = self
            .sign_refresh_token(user.id)
            .map_err(|_| AuthError::Internal)?;

        self.store
            .set_refresh_token(user.id, Some(&refresh_token))
            .await
            .map_err(|_| AuthError::Internal)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    // ============================================
    // Registration
    // ============================================

    /// Register a new user
    ///
    /// All-or-nothing: no user record is written unless validation,
    /// uniqueness, and the avatar upload have all succeeded.
    pub async fn register(
        &self,
        fields: RegisterFields,
        avatar: Option<MediaFile>,
        cover_image: Option<MediaFile>,
    ) -> Result<UserResponse, AuthError> {
        if fields.any_blank() {
            return Err(AuthError::Validation("all fields are required".to_string()));
        }

        fields
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let username = fields.username.trim().to_lowercase();
        let email = fields.email.trim().to_string();

        let existing = self
            .store
            .find_by_username_or_email(Some(&username), Some(&email))
            .await?;
        if existing.is_some() {
            return Err(AuthError::IdentityExists);
        }

        let avatar =
            avatar.ok_or_else(|| AuthError::Validation("avatar file is required".to_string()))?;

        let hosted_avatar = self.media.upload(avatar).await?;

        // cover image is best-effort; a failed upload leaves it absent
        let cover_image_url = match cover_image {
            Some(file) => match self.media.upload(file).await {
                Ok(media) => Some(media.url),
                Err(err) => {
                    tracing::warn!(error = %err, "cover image upload failed, continuing without");
                    None
                }
            },
            None => None,
        };

        let password_hash = self.hash_password(&fields.password)?;

        let user = self
            .store
            .create(NewUser {
                username,
                email,
                full_name: fields.full_name.trim().to_string(),
                password_hash,
                avatar_url: hosted_avatar.url,
                cover_image_url,
            })
            .await?;

        let created = self
            .store
            .find_by_id(user.id)
            .await?
            .ok_or(AuthError::Internal)?;

        tracing::info!(user_id = %created.id, username = %created.username, "user registered");
        Ok(UserResponse::from(created))
    }

    // ============================================
    // Login / Logout
    // ============================================

    /// Attempt to login a user by username or email
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        req.validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let username = req
            .username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let email = req
            .email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if username.is_none() && email.is_none() {
            return Err(AuthError::Validation(
                "username or email is required".to_string(),
            ));
        }

        let user = self
            .store
            .find_by_username_or_email(username.as_deref(), email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.verify_password(&req.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.issue_token_pair(user.id).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user logged in");
        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Clear the persisted refresh token, ending the session
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.store.set_refresh_token(user_id, None).await?;
        tracing::info!(user_id = %user_id, "user logged out");
        Ok(())
    }

    // ============================================
    // Token Refresh
    // ============================================

    /// Exchange a refresh token for a new pair (rotation)
    ///
    /// The incoming token must verify against the refresh secret AND match
    /// the persisted value exactly; the match check is what invalidates
    /// every previously issued refresh token.
    pub async fn refresh(&self, incoming: Option<&str>) -> Result<TokenResponse, AuthError> {
        let incoming = incoming
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingRefreshToken)?;

        let claims = self.verify_refresh_token(incoming)?;

        let user = self
            .store
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if user.refresh_token.as_deref() != Some(incoming) {
            tracing::warn!(user_id = %user.id, "refresh token mismatch, possible reuse");
            return Err(AuthError::TokenReused);
        }

        let pair = self.issue_token_pair(user.id).await?;

        Ok(TokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    // ============================================
    // User Helpers
    // ============================================

    /// Get user by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AuthError> {
        self.store.find_by_id(user_id).await
    }
}
