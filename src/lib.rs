//! ClipHive Authentication
//!
//! Authentication core for ClipHive providing:
//! - User registration with avatar and cover-image uploads
//! - Login issuing a paired access/refresh token set
//! - Refresh token rotation (single active refresh token per user)
//! - Argon2id password hashing
//! - Http-only cookie transport for both tokens
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `ACCESS_TOKEN_SECRET` - Secret for signing access tokens (required, min 32 chars)
//! - `REFRESH_TOKEN_SECRET` - Secret for signing refresh tokens (required, min 32 chars)
//! - `ACCESS_TOKEN_EXPIRATION` - Access token expiration in seconds (default: 900)
//! - `REFRESH_TOKEN_EXPIRATION` - Refresh token expiration in seconds (default: 864000)
//! - `JWT_ISSUER` - JWT issuer claim (default: "cliphive")
//! - `MEDIA_UPLOAD_URL` - Upload endpoint of the media host
//! - `MEDIA_UPLOAD_TIMEOUT` - Deadline for media host calls in seconds (default: 30)
//! - `DATABASE_URL` - PostgreSQL connection string (required by the embedding app)
//!
//! # Usage
//!
//! ```rust,ignore
//! use cliphive_auth::{create_routes, AuthConfig, AuthService, HttpMediaStore, PgUserStore};
//! use std::sync::Arc;
//!
//! let config = AuthConfig::from_env();
//! config.validate()?;
//!
//! cliphive_auth::run_migrations(&db_pool).await?;
//!
//! let store = Arc::new(PgUserStore::new(db_pool));
//! let media = Arc::new(HttpMediaStore::new(&config)?);
//! let service = Arc::new(AuthService::new(store, media, config));
//!
//! let app = create_routes(service);
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod models;
pub mod response;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use handlers::{create_routes, AuthState, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use media::{HttpMediaStore, MediaFile, MediaStore, UploadedMedia};
pub use models::*;
pub use response::ApiResponse;
pub use service::AuthService;
pub use store::{run_migrations, PgUserStore, UserStore};
