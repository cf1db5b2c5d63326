//! Media Host Client
//!
//! Trait seam over the external media-upload service plus an HTTP
//! implementation. Uploads carry an explicit deadline so a hung media host
//! cannot stall a registration indefinitely.

use crate::config::AuthConfig;
use crate::error::AuthError;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Allowed MIME types for avatar and cover uploads
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Max file size: 10MB
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Hosted file reference returned by the media host
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedMedia {
    pub url: String,
}

/// Media host capability consumed by the session controller
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Push a file to the media host and return its hosted URL
    async fn upload(&self, file: MediaFile) -> Result<UploadedMedia, AuthError>;
}

/// Media host client speaking multipart over HTTP
pub struct HttpMediaStore {
    client: reqwest::Client,
    upload_url: String,
}

impl HttpMediaStore {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.media_upload_timeout))
            .build()
            .map_err(|e| AuthError::Config(format!("failed to build media client: {e}")))?;

        Ok(Self {
            client,
            upload_url: config.media_upload_url.clone(),
        })
    }

    fn check_file(file: &MediaFile) -> Result<(), AuthError> {
        if file.data.is_empty() {
            return Err(AuthError::Validation("uploaded file is empty".to_string()));
        }

        if file.data.len() > MAX_FILE_SIZE {
            return Err(AuthError::Validation(format!(
                "file too large, max size: {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        if !ALLOWED_IMAGE_TYPES.contains(&file.content_type.as_str()) {
            return Err(AuthError::Validation(format!(
                "file type '{}' not allowed, allowed types: {:?}",
                file.content_type, ALLOWED_IMAGE_TYPES
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, file: MediaFile) -> Result<UploadedMedia, AuthError> {
        Self::check_file(&file)?;

        let part = reqwest::multipart::Part::bytes(file.data)
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)
            .map_err(|_| AuthError::Upload("invalid content type".to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AuthError::Upload(format!("media host request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::Upload(format!(
                "media host returned {}",
                response.status()
            )));
        }

        let media: UploadedMedia = response
            .json()
            .await
            .map_err(|e| AuthError::Upload(format!("media host response unreadable: {e}")))?;

        if media.url.trim().is_empty() {
            return Err(AuthError::Upload("media host returned no url".to_string()));
        }

        tracing::debug!(filename = %file.filename, url = %media.url, "file uploaded");
        Ok(media)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! Recording media host used by unit tests.

    use super::*;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct MemoryMediaStore {
        uploads: RwLock<Vec<String>>,
        fail: bool,
    }

    impl MemoryMediaStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// A media host whose every upload fails
        pub fn failing() -> Self {
            Self {
                uploads: RwLock::new(Vec::new()),
                fail: true,
            }
        }

        pub async fn upload_count(&self) -> usize {
            self.uploads.read().await.len()
        }
    }

    #[async_trait]
    impl MediaStore for MemoryMediaStore {
        async fn upload(&self, file: MediaFile) -> Result<UploadedMedia, AuthError> {
            if self.fail {
                return Err(AuthError::Upload("media host unavailable".to_string()));
            }
            self.uploads.write().await.push(file.filename.clone());
            Ok(UploadedMedia {
                url: format!("https://media.test/{}", file.filename),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(data: Vec<u8>) -> MediaFile {
        MediaFile {
            filename: "avatar.png".to_string(),
            content_type: "image/png".to_string(),
            data,
        }
    }

    #[test]
    fn test_check_file_rejects_empty() {
        let err = HttpMediaStore::check_file(&png(vec![])).unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn test_check_file_rejects_oversize() {
        let err = HttpMediaStore::check_file(&png(vec![0u8; MAX_FILE_SIZE + 1])).unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn test_check_file_rejects_mime_type() {
        let file = MediaFile {
            filename: "payload.exe".to_string(),
            content_type: "application/octet-stream".to_string(),
            data: vec![1, 2, 3],
        };
        assert!(matches!(
            HttpMediaStore::check_file(&file).unwrap_err(),
            AuthError::Validation(_)
        ));
    }

    #[test]
    fn test_check_file_accepts_image() {
        assert!(HttpMediaStore::check_file(&png(vec![1, 2, 3])).is_ok());
    }
}
